//! Pixel buffers handed to and produced by the crop engine.
//!
//! Decoding and encoding live outside this crate. The loader hands over an
//! RGBA buffer plus its orientation tag, and everything downstream of
//! [`normalize_orientation`] works on canonical, top-left-origin buffers.

mod orientation;
mod types;

pub use orientation::normalize_orientation;
pub use types::{Orientation, RasterImage, SourceImage, CHANNELS};
