//! Procedural creature rig for Skitter
//!
//! This crate implements:
//! - An arena of rigid, elastically-jointed segments rooted at a mobile body
//! - Passive chain following for spines, tails and ribs
//! - Inverse-kinematics legs with a two-phase (planted/swinging) gait
//! - The root locomotion controller that turns a pointer into motion
//!
//! One call to [`Creature::follow`] runs a whole simulation tick. Drawing is a
//! separate read-only traversal through the [`Canvas`] trait.

pub mod angle;
pub mod blueprint;
pub mod body;
pub mod draw;
pub mod error;
pub mod leg;
pub mod node;
pub mod rng;
pub mod segment;
pub mod skeleton;

// Re-export main types for convenience
pub use blueprint::LizardBlueprint;
pub use body::{Creature, FrameInput, Locomotion};
pub use draw::{Canvas, DrawCommand, RecordingCanvas};
pub use error::{Result, RigError};
pub use leg::{GaitPhase, LegSystem};
pub use node::{Node, NodeRef, RootPose, SegmentId};
pub use rng::GaitRng;
pub use segment::{Segment, SegmentSpec};
pub use skeleton::Skeleton;
