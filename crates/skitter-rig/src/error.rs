//! Errors raised while assembling a rig
//!
//! Ticking a creature never fails; only construction misuse is reported.

use thiserror::Error;

use crate::node::{NodeRef, SegmentId};

/// Construction-time rig errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RigError {
    #[error("parent {0} does not exist in this skeleton")]
    UnknownParent(NodeRef),

    #[error("{0} does not exist in this skeleton")]
    UnknownSegment(SegmentId),

    #[error("invalid segment parameters: {0}")]
    InvalidSegment(String),

    #[error("{0} is its own ancestor")]
    Cycle(SegmentId),
}

pub type Result<T> = std::result::Result<T, RigError>;
