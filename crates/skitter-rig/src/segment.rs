//! Rigid skeletal links with an elastic angular constraint
//!
//! A segment stores its angle relative to the parent and derives its absolute
//! angle and world position from the parent's pose. Every tick the relative
//! angle is relaxed toward its rest angle and clamped to the allowed range.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::angle::wrap_around;
use crate::error::{Result, RigError};
use crate::node::{Node, NodeRef, SegmentId};

/// Construction parameters for a segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    /// Link length
    pub size: f32,
    /// Rest angle relative to the parent (radians)
    pub angle: f32,
    /// Total angular freedom around the rest angle (radians)
    pub range: f32,
    /// Relaxation divisor, at least 1 (1 = no relaxation)
    pub stiffness: f32,
}

impl SegmentSpec {
    pub fn new(size: f32, angle: f32, range: f32, stiffness: f32) -> Self {
        Self {
            size,
            angle,
            range,
            stiffness,
        }
    }

    /// Reject parameters that would poison the per-tick math
    pub fn validate(&self) -> Result<()> {
        if !self.size.is_finite() || self.size < 0.0 {
            return Err(RigError::InvalidSegment(format!(
                "size must be finite and non-negative, got {}",
                self.size
            )));
        }
        if !self.angle.is_finite() {
            return Err(RigError::InvalidSegment(format!(
                "rest angle must be finite, got {}",
                self.angle
            )));
        }
        if !self.range.is_finite() || self.range < 0.0 {
            return Err(RigError::InvalidSegment(format!(
                "range must be finite and non-negative, got {}",
                self.range
            )));
        }
        if !self.stiffness.is_finite() || self.stiffness < 1.0 {
            return Err(RigError::InvalidSegment(format!(
                "stiffness must be at least 1, got {}",
                self.stiffness
            )));
        }
        Ok(())
    }
}

/// One rigid link of the skeleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub(crate) parent: NodeRef,
    pub(crate) children: Vec<SegmentId>,
    pub(crate) size: f32,
    pub(crate) rel_angle: f32,
    pub(crate) def_angle: f32,
    pub(crate) abs_angle: f32,
    pub(crate) range: f32,
    pub(crate) stiffness: f32,
    pub(crate) position: Vec2,
}

impl Segment {
    pub(crate) fn new(parent: NodeRef, spec: &SegmentSpec, parent_abs_angle: f32) -> Self {
        Self {
            parent,
            children: Vec::new(),
            size: spec.size,
            rel_angle: spec.angle,
            def_angle: spec.angle,
            abs_angle: parent_abs_angle + spec.angle,
            range: spec.range,
            stiffness: spec.stiffness,
            position: Vec2::ZERO,
        }
    }

    pub fn parent(&self) -> NodeRef {
        self.parent
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn rel_angle(&self) -> f32 {
        self.rel_angle
    }

    pub fn def_angle(&self) -> f32 {
        self.def_angle
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    /// Lowest and highest relative angle the elastic limit allows
    pub fn limits(&self) -> (f32, f32) {
        let half = self.range / 2.0;
        (self.def_angle - half, self.def_angle + half)
    }

    /// Overwrite the relative angle; the pose is stale until the next update
    pub fn set_rel_angle(&mut self, rel_angle: f32) {
        self.rel_angle = rel_angle;
    }

    /// Normalise the relative angle around the rest angle, then optionally
    /// apply the elastic limit (divide the deviation, then clamp).
    pub(crate) fn relax(&mut self, elastic: bool) {
        self.rel_angle = wrap_around(self.rel_angle, self.def_angle);

        if elastic {
            let (low, high) = self.limits();
            let relaxed = (self.rel_angle - self.def_angle) / self.stiffness + self.def_angle;
            self.rel_angle = relaxed.clamp(low, high);
        }
    }

    /// Derive absolute angle and position from the parent pose
    pub(crate) fn place(&mut self, anchor: Vec2, parent_abs_angle: f32) {
        self.abs_angle = parent_abs_angle + self.rel_angle;
        self.position = anchor + Vec2::from_angle(self.abs_angle) * self.size;
    }
}

impl Node for Segment {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn abs_angle(&self) -> f32 {
        self.abs_angle
    }

    fn children(&self) -> &[SegmentId] {
        &self.children
    }

    fn as_segment(&self) -> Option<&Segment> {
        Some(self)
    }
}
