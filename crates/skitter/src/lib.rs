//! Skitter - headless driver for procedural creatures
//!
//! Loads a layered configuration, assembles a lizard, walks it along a
//! scripted pointer path and optionally captures the run as a GIF.

pub mod config;
pub mod headless;

pub use crate::config::SimConfig;
pub use crate::headless::{GifCapture, PixelCanvas, PointerPath, RunStats, Runner};
