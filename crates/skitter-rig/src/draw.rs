//! Renderer boundary
//!
//! The rig never owns stroke style or surfaces. It emits world-space lines
//! and arcs to a [`Canvas`]; drawing is a read-only traversal.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_4, SQRT_2};

use crate::node::{RootPose, SegmentId};
use crate::skeleton::Skeleton;

/// Radius of the body's head indicator
pub const HEAD_RADIUS: f32 = 4.0;

/// A surface that can stroke lines and arcs in world coordinates
pub trait Canvas {
    fn line(&mut self, from: Vec2, to: Vec2);

    /// Arc around `centre` from `start` to `end` radians (increasing angle)
    fn arc(&mut self, centre: Vec2, radius: f32, start: f32, end: f32);
}

/// A single recorded drawing primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Vec2,
        to: Vec2,
    },
    Arc {
        centre: Vec2,
        radius: f32,
        start: f32,
        end: f32,
    },
}

/// Canvas that records primitives instead of drawing them
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.commands.iter().filter_map(|cmd| match *cmd {
            DrawCommand::Line { from, to } => Some((from, to)),
            DrawCommand::Arc { .. } => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn line(&mut self, from: Vec2, to: Vec2) {
        self.commands.push(DrawCommand::Line { from, to });
    }

    fn arc(&mut self, centre: Vec2, radius: f32, start: f32, end: f32) {
        self.commands.push(DrawCommand::Arc {
            centre,
            radius,
            start,
            end,
        });
    }
}

/// Open arc with a wedge pointing along the heading
pub fn draw_head(canvas: &mut impl Canvas, root: &RootPose) {
    let centre = root.position;
    let heading = root.abs_angle;
    let start = heading + FRAC_PI_4;
    let end = heading + 7.0 * FRAC_PI_4;

    canvas.arc(centre, HEAD_RADIUS, start, end);

    let tip = centre + Vec2::from_angle(heading) * HEAD_RADIUS * SQRT_2;
    canvas.line(centre + Vec2::from_angle(end) * HEAD_RADIUS, tip);
    canvas.line(tip, centre + Vec2::from_angle(start) * HEAD_RADIUS);
}

impl Skeleton {
    /// Emit a line from the segment's parent to the segment, then its
    /// children pre-order when `recurse` is set
    pub fn draw_segment(&self, id: SegmentId, canvas: &mut impl Canvas, recurse: bool) {
        let (anchor, _) = self.parent_pose(id);
        let seg = self.seg(id);
        canvas.line(anchor, seg.position);

        if recurse {
            for &child in &seg.children {
                self.draw_segment(child, canvas, true);
            }
        }
    }

    /// Emit every branch of the root
    pub fn draw(&self, canvas: &mut impl Canvas) {
        for &child in &self.root().children {
            self.draw_segment(child, canvas, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeRef;
    use crate::segment::SegmentSpec;

    #[test]
    fn test_head_shape() {
        let root = RootPose::new(Vec2::new(10.0, 0.0), 0.0);
        let mut canvas = RecordingCanvas::default();
        draw_head(&mut canvas, &root);

        assert_eq!(canvas.commands.len(), 3);
        match canvas.commands[0] {
            DrawCommand::Arc { radius, start, end, .. } => {
                assert_eq!(radius, HEAD_RADIUS);
                assert!((start - FRAC_PI_4).abs() < 1e-6);
                assert!((end - 7.0 * FRAC_PI_4).abs() < 1e-6);
            }
            other => panic!("expected arc, got {:?}", other),
        }

        let lines: Vec<_> = canvas.lines().collect();
        let tip = Vec2::new(10.0 + HEAD_RADIUS * SQRT_2, 0.0);
        assert!((lines[0].1 - tip).length() < 1e-4);
        assert!((lines[1].0 - tip).length() < 1e-4);
    }

    #[test]
    fn test_segments_drawn_pre_order() {
        let mut skeleton = Skeleton::new(Vec2::ZERO, 0.0);
        let a = skeleton
            .add_segment(NodeRef::Root, SegmentSpec::new(5.0, 0.0, 1.0, 1.0))
            .unwrap();
        let b = skeleton
            .add_segment(a, SegmentSpec::new(5.0, 0.0, 1.0, 1.0))
            .unwrap();
        let c = skeleton
            .add_segment(a, SegmentSpec::new(3.0, 1.0, 1.0, 1.0))
            .unwrap();

        let mut canvas = RecordingCanvas::default();
        skeleton.draw(&mut canvas);

        let lines: Vec<_> = canvas.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], (Vec2::ZERO, skeleton.segment(a).unwrap().position));
        assert_eq!(lines[1].1, skeleton.segment(b).unwrap().position);
        assert_eq!(lines[2].1, skeleton.segment(c).unwrap().position);
        assert_eq!(lines[2].0, skeleton.segment(a).unwrap().position);
    }

    #[test]
    fn test_draw_single_segment_without_recursion() {
        let mut skeleton = Skeleton::new(Vec2::ZERO, 0.0);
        let a = skeleton
            .add_segment(NodeRef::Root, SegmentSpec::new(5.0, 0.0, 1.0, 1.0))
            .unwrap();
        skeleton
            .add_segment(a, SegmentSpec::new(5.0, 0.0, 1.0, 1.0))
            .unwrap();

        let mut canvas = RecordingCanvas::default();
        skeleton.draw_segment(a, &mut canvas, false);
        assert_eq!(canvas.commands.len(), 1);
    }
}
