//! Segment arena and the elastic chain operations
//!
//! The skeleton owns every segment of a creature plus the root body pose.
//! Segments refer to their parent by handle, so the tree is acyclic by
//! construction: a parent must exist before a child can be attached to it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RigError};
use crate::node::{Node, NodeRef, RootPose, SegmentId};
use crate::segment::{Segment, SegmentSpec};

/// Arena of segments hanging off a root body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    root: RootPose,
    segments: Vec<Segment>,
}

impl Skeleton {
    /// Create an empty skeleton with the root body at `position` facing `angle`
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self {
            root: RootPose::new(position, angle),
            segments: Vec::new(),
        }
    }

    pub fn root(&self) -> &RootPose {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut RootPose {
        &mut self.root
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterate all segments in creation order
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &Segment)> {
        self.segments
            .iter()
            .enumerate()
            .map(|(index, seg)| (SegmentId::from_index(index), seg))
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.index())
    }

    pub fn segment_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        self.segments.get_mut(id.index())
    }

    /// Whether a handle addresses a node of this skeleton
    pub fn contains(&self, node: NodeRef) -> bool {
        match node {
            NodeRef::Root => true,
            NodeRef::Segment(id) => id.index() < self.segments.len(),
        }
    }

    /// Resolve a handle to the shared node capability
    pub fn node(&self, node: NodeRef) -> Option<&dyn Node> {
        match node {
            NodeRef::Root => Some(&self.root),
            NodeRef::Segment(id) => self.segment(id).map(|seg| seg as &dyn Node),
        }
    }

    /// Position and absolute angle of a node
    ///
    /// # Panics
    /// If the handle was not minted by this skeleton.
    pub fn pose_of(&self, node: NodeRef) -> (Vec2, f32) {
        match node {
            NodeRef::Root => (self.root.position, self.root.abs_angle),
            NodeRef::Segment(id) => {
                let seg = &self.segments[id.index()];
                (seg.position, seg.abs_angle)
            }
        }
    }

    /// Position and absolute angle of a segment's parent
    ///
    /// # Panics
    /// If the handle was not minted by this skeleton.
    pub fn parent_pose(&self, id: SegmentId) -> (Vec2, f32) {
        self.pose_of(self.segments[id.index()].parent)
    }

    pub(crate) fn seg(&self, id: SegmentId) -> &Segment {
        &self.segments[id.index()]
    }

    pub(crate) fn seg_mut(&mut self, id: SegmentId) -> &mut Segment {
        &mut self.segments[id.index()]
    }

    /// Attach a new segment to an existing node and pose it immediately
    pub fn add_segment(
        &mut self,
        parent: impl Into<NodeRef>,
        spec: SegmentSpec,
    ) -> Result<SegmentId> {
        let parent = parent.into();
        if !self.contains(parent) {
            return Err(RigError::UnknownParent(parent));
        }
        spec.validate()?;

        let id = SegmentId::from_index(self.segments.len());
        let (_, parent_abs) = self.pose_of(parent);
        self.segments.push(Segment::new(parent, &spec, parent_abs));

        match parent {
            NodeRef::Root => self.root.children.push(id),
            NodeRef::Segment(parent_id) => self.seg_mut(parent_id).children.push(id),
        }

        self.update_relative(id, false, true);
        Ok(id)
    }

    /// Recompute a segment's relative angle, absolute angle and position from
    /// its parent's current pose, optionally applying the elastic limit.
    /// Children are visited pre-order when `recurse` is set.
    ///
    /// # Panics
    /// If the handle was not minted by this skeleton.
    pub fn update_relative(&mut self, id: SegmentId, recurse: bool, elastic: bool) {
        let (anchor, parent_abs) = self.parent_pose(id);
        let seg = self.seg_mut(id);
        seg.relax(elastic);
        seg.place(anchor, parent_abs);

        if recurse {
            for i in 0..self.seg(id).children.len() {
                let child = self.seg(id).children[i];
                self.update_relative(child, true, elastic);
            }
        }
    }

    /// Drag a segment after its parent moved: keep the direction toward the
    /// segment's previous position, restore the link length and apply the
    /// elastic limit. Children are visited pre-order when `recurse` is set.
    ///
    /// # Panics
    /// If the handle was not minted by this skeleton.
    pub fn follow(&mut self, id: SegmentId, recurse: bool) {
        let (anchor, parent_abs) = self.parent_pose(id);
        let seg = self.seg_mut(id);

        // Coincident with the anchor: keep the previous absolute angle
        let offset = seg.position - anchor;
        if offset.length() > f32::EPSILON {
            seg.abs_angle = offset.y.atan2(offset.x);
        }
        seg.rel_angle = seg.abs_angle - parent_abs;
        seg.relax(true);
        seg.place(anchor, parent_abs);

        if recurse {
            for i in 0..self.seg(id).children.len() {
                let child = self.seg(id).children[i];
                self.follow(child, true);
            }
        }
    }

    /// Run the passive follow cascade over every branch of the root
    pub fn follow_all(&mut self) {
        for i in 0..self.root.children.len() {
            let child = self.root.children[i];
            self.follow(child, true);
        }
    }

    /// Walk parent handles from a segment up to (and including) the root
    pub fn ancestors(&self, id: SegmentId) -> Ancestors<'_> {
        Ancestors {
            skeleton: self,
            next: self.segment(id).map(|seg| seg.parent),
            remaining: self.segments.len() + 1,
        }
    }

    /// Whether `node` lies on the parent path of `id`
    pub fn is_ancestor(&self, node: NodeRef, id: SegmentId) -> bool {
        self.ancestors(id).any(|ancestor| ancestor == node)
    }

    /// Check that every parent handle resolves, every segment reaches the
    /// root and child lists agree with parent handles.
    pub fn validate(&self) -> Result<()> {
        for (id, seg) in self.iter() {
            let mut node = seg.parent;
            let mut steps = 0;
            while let NodeRef::Segment(parent) = node {
                if steps > self.segments.len() {
                    return Err(RigError::Cycle(id));
                }
                node = self
                    .segment(parent)
                    .ok_or(RigError::UnknownSegment(parent))?
                    .parent;
                steps += 1;
            }

            let listed = match seg.parent {
                NodeRef::Root => self.root.children.contains(&id),
                NodeRef::Segment(parent) => self.seg(parent).children.contains(&id),
            };
            if !listed {
                return Err(RigError::UnknownSegment(id));
            }
        }
        Ok(())
    }
}

/// Iterator over a segment's ancestors, nearest first
pub struct Ancestors<'a> {
    skeleton: &'a Skeleton,
    next: Option<NodeRef>,
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.next?;
        self.next = match current {
            NodeRef::Root => None,
            NodeRef::Segment(id) => self.skeleton.segment(id).map(|seg| seg.parent),
        };
        Some(current)
    }
}
