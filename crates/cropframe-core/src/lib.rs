//! Cropframe Core - interactive image cropping engine
//!
//! This crate provides the geometry behind a pan/zoom/rotate crop widget:
//! a transform state model that clamps gesture input so the mask always
//! stays covered by the image, and a crop engine that maps the committed
//! transform back into source pixel space and extracts the result.
//!
//! Rendering, gesture recognition and image codecs are left to the caller;
//! the crate only consumes numeric gesture deltas and RGBA pixel buffers.

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod model;
pub mod raster;
pub mod session;
pub mod transform;

pub use config::{CropConfiguration, CropParameters, MaskShape};
pub use engine::crop_image;
pub use error::{ConfigError, CropError, LayoutError, SessionError};
pub use geometry::{PixelRect, Rect, Size, Vector};
pub use model::{TransformSnapshot, TransformState};
pub use raster::{Orientation, RasterImage, SourceImage};
pub use session::{CropJob, CropSession, SessionStatus};
pub use transform::InterpolationFilter;
