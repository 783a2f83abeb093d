//! CPU pixel buffer canvas for headless capture
//!
//! Implements the rig's [`Canvas`] by rasterising world-space strokes into
//! an RGBA buffer centred on a camera point.

use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec2;
use skitter_rig::{Canvas, Creature, GaitRng};

const BACKGROUND: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];
const POINTER: [u8; 4] = [255, 64, 64, 255];

/// Pixels per arc sample (lower bound on sample count is 8)
const ARC_STEP: f32 = 3.0;

pub struct PixelCanvas {
    pub width: usize,
    pub height: usize,
    /// RGBA pixel buffer (4 bytes per pixel)
    pub buffer: Vec<u8>,
    /// World point shown at the centre of the image
    pub centre: Vec2,
    /// Screen pixels per world unit
    pub scale: f32,
    /// Colour of creature strokes
    pub stroke: [u8; 4],
    /// Creature stroke width in pixels
    pub stroke_width: u32,
}

impl PixelCanvas {
    pub fn new(width: usize, height: usize, scale: f32) -> Self {
        let mut canvas = Self {
            width,
            height,
            buffer: vec![0u8; width * height * 4],
            centre: Vec2::ZERO,
            scale,
            stroke: WHITE,
            stroke_width: 1,
        };
        canvas.clear();
        canvas
    }

    /// Set the creature stroke colour (RGB) and width (pixels, at least 1)
    pub fn with_stroke(mut self, color: [u8; 3], width: u32) -> Self {
        self.stroke = [color[0], color[1], color[2], 255];
        self.stroke_width = width.max(1);
        self
    }

    pub fn clear(&mut self) {
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&BACKGROUND);
        }
    }

    /// Draw a frame centred on the creature with a marker at the pointer
    pub fn render<R: GaitRng>(&mut self, creature: &Creature<R>, pointer: Vec2) {
        self.centre = creature.position();
        self.clear();

        creature.draw(self);

        let (x, y) = self.to_screen(pointer);
        self.draw_line(x - 3, y, x + 3, y, POINTER);
        self.draw_line(x, y - 3, x, y + 3, POINTER);
    }

    /// World to screen; world Y increases upward
    pub fn to_screen(&self, world: Vec2) -> (i32, i32) {
        let offset = (world - self.centre) * self.scale;
        let x = self.width as f32 / 2.0 + offset.x;
        let y = self.height as f32 / 2.0 - offset.y;
        (x.round() as i32, y.round() as i32)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut color = [0u8; 4];
        color.copy_from_slice(&self.buffer[idx..idx + 4]);
        Some(color)
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let idx = (y as usize * self.width + x as usize) * 4;
            self.buffer[idx..idx + 4].copy_from_slice(&color);
        }
    }

    /// Filled disc at screen coordinates
    pub fn draw_filled_circle(&mut self, cx: i32, cy: i32, radius: i32, color: [u8; 4]) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// One-pixel Bresenham line in screen coordinates
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: [u8; 4]) {
        self.draw_wide_line(x0, y0, x1, y1, color, 1);
    }

    /// Bresenham line stamped with a disc for widths above one pixel
    pub fn draw_wide_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: [u8; 4],
        width: u32,
    ) {
        let radius = (width / 2) as i32;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            if radius == 0 {
                self.set_pixel(x, y, color);
            } else {
                self.draw_filled_circle(x, y, radius, color);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Count of pixels that differ from the background
    pub fn ink(&self) -> usize {
        self.buffer
            .chunks_exact(4)
            .filter(|pixel| *pixel != BACKGROUND)
            .count()
    }

    /// RGB buffer for GIF encoding (drops alpha)
    pub fn rgb_buffer(&self) -> Vec<u8> {
        self.buffer
            .chunks_exact(4)
            .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
            .collect()
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        image::save_buffer(
            path.as_ref(),
            &self.buffer,
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
        )
        .with_context(|| format!("Failed to write PNG to {}", path.as_ref().display()))
    }
}

impl Canvas for PixelCanvas {
    fn line(&mut self, from: Vec2, to: Vec2) {
        let (x0, y0) = self.to_screen(from);
        let (x1, y1) = self.to_screen(to);
        self.draw_wide_line(x0, y0, x1, y1, self.stroke, self.stroke_width);
    }

    fn arc(&mut self, centre: Vec2, radius: f32, start: f32, end: f32) {
        let span = (end - start).abs();
        let pixels = span * radius * self.scale;
        let samples = ((pixels / ARC_STEP).ceil() as usize).max(8);

        let mut prev = centre + Vec2::from_angle(start) * radius;
        for i in 1..=samples {
            let t = start + (end - start) * i as f32 / samples as f32;
            let next = centre + Vec2::from_angle(t) * radius;
            self.line(prev, next);
            prev = next;
        }
    }
}
