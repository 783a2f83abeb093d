//! Animated GIF capture of headless runs

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use gif::{Encoder, Frame, Repeat};

use super::PixelCanvas;

/// Collects RGB frames and encodes them as a looping GIF
pub struct GifCapture {
    frames: Vec<Vec<u8>>,
    width: u16,
    height: u16,
    /// Centiseconds between frames
    frame_delay: u16,
}

impl GifCapture {
    pub fn new(width: u16, height: u16, fps: u16) -> Self {
        let frame_delay = if fps > 0 { (100 / fps).max(2) } else { 10 };

        Self {
            frames: Vec::new(),
            width,
            height,
            frame_delay,
        }
    }

    /// Capture sized to match `canvas`
    pub fn for_canvas(canvas: &PixelCanvas, fps: u16) -> Result<Self> {
        let width = u16::try_from(canvas.width).context("Canvas too wide for GIF")?;
        let height = u16::try_from(canvas.height).context("Canvas too tall for GIF")?;
        Ok(Self::new(width, height, fps))
    }

    pub fn capture_frame(&mut self, canvas: &PixelCanvas) {
        debug_assert_eq!(canvas.width, self.width as usize);
        debug_assert_eq!(canvas.height, self.height as usize);
        self.frames.push(canvas.rgb_buffer());
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_delay(&self) -> u16 {
        self.frame_delay
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if self.frames.is_empty() {
            anyhow::bail!("No frames to save");
        }

        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create GIF file {}", path.as_ref().display()))?;

        let mut encoder = Encoder::new(file, self.width, self.height, &[])
            .context("Failed to create GIF encoder")?;
        encoder
            .set_repeat(Repeat::Infinite)
            .context("Failed to set GIF repeat")?;

        for rgb in &self.frames {
            let mut frame = Frame::from_rgb(self.width, self.height, rgb);
            frame.delay = self.frame_delay;
            encoder
                .write_frame(&frame)
                .context("Failed to write GIF frame")?;
        }

        log::info!(
            "Wrote {} frames to {}",
            self.frames.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_delay_from_fps() {
        assert_eq!(GifCapture::new(8, 8, 10).frame_delay(), 10);
        assert_eq!(GifCapture::new(8, 8, 25).frame_delay(), 4);
        assert_eq!(GifCapture::new(8, 8, 100).frame_delay(), 2);
        assert_eq!(GifCapture::new(8, 8, 0).frame_delay(), 10);
    }

    #[test]
    fn test_frame_capture() {
        let canvas = PixelCanvas::new(16, 8, 1.0);
        let mut capture = GifCapture::for_canvas(&canvas, 10).unwrap();
        capture.capture_frame(&canvas);
        capture.capture_frame(&canvas);
        assert_eq!(capture.frame_count(), 2);
        assert_eq!(capture.frames[0].len(), 16 * 8 * 3);
    }

    #[test]
    fn test_save_without_frames_fails() {
        let capture = GifCapture::new(8, 8, 10);
        let dir = tempfile::tempdir().unwrap();
        assert!(capture.save(dir.path().join("empty.gif")).is_err());
    }
}
