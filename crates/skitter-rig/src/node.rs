//! The positional capability shared by the body and every segment
//!
//! Anything with a world position and an absolute orientation can anchor
//! child segments. The body (through [`RootPose`]) and [`Segment`] are the
//! only two implementors; consumers depend on the [`Node`] trait and address
//! parents through [`NodeRef`] handles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::segment::Segment;

/// Stable handle of a segment inside its [`Skeleton`](crate::Skeleton) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(u32);

impl SegmentId {
    pub(crate) fn from_index(index: usize) -> Self {
        SegmentId(index as u32)
    }

    /// Arena slot of this segment
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Segment({})", self.0)
    }
}

/// Parent handle: either the creature's root body or another segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRef {
    Root,
    Segment(SegmentId),
}

impl From<SegmentId> for NodeRef {
    fn from(id: SegmentId) -> Self {
        NodeRef::Segment(id)
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRef::Root => write!(f, "Root"),
            NodeRef::Segment(id) => write!(f, "{}", id),
        }
    }
}

/// Something with a position and orientation that can own child segments
pub trait Node {
    /// World position
    fn position(&self) -> Vec2;

    /// Absolute orientation (radians)
    fn abs_angle(&self) -> f32;

    /// Directly owned child segments, in insertion order
    fn children(&self) -> &[SegmentId];

    /// Downcast to a segment; `None` for the root body
    fn as_segment(&self) -> Option<&Segment> {
        None
    }
}

/// Pose of the creature's root body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootPose {
    pub position: Vec2,
    pub abs_angle: f32,
    pub(crate) children: Vec<SegmentId>,
}

impl RootPose {
    pub fn new(position: Vec2, abs_angle: f32) -> Self {
        Self {
            position,
            abs_angle,
            children: Vec::new(),
        }
    }
}

impl Node for RootPose {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn abs_angle(&self) -> f32 {
        self.abs_angle
    }

    fn children(&self) -> &[SegmentId] {
        &self.children
    }
}
