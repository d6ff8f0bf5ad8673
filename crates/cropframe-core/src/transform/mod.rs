//! Raster operations of the crop engine: rotation, crop extraction and
//! circular clipping.
//!
//! # Transform Order
//!
//! 1. Rotation about the image center (canvas size preserved)
//! 2. Crop rectangle computation and extraction
//! 3. Circular alpha clip (circle masks with circular output only)
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop rectangles are in source pixels
//! - Origin is top-left corner

mod circle;
mod crop;
mod rotation;

pub use circle::apply_circular_mask;
pub use crop::{compute_crop_rect, extract_padded, extract_region, pixel_region};
pub use rotation::{rotate_about_center, InterpolationFilter};
