//! Headless simulation: scripted pointer, runner and frame capture

mod gif_capture;
mod path;
mod pixel_canvas;
mod runner;

pub use gif_capture::GifCapture;
pub use path::PointerPath;
pub use pixel_canvas::PixelCanvas;
pub use runner::{RunStats, Runner};
