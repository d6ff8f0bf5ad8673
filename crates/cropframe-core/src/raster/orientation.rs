//! Orientation normalization.
//!
//! Re-renders a tagged source buffer into canonical orientation: top-left
//! origin, no further rotation needed for correct display.

use image::DynamicImage;
use tracing::trace;

use super::{Orientation, RasterImage, SourceImage};
use crate::error::CropError;

/// Return the canonical pixel buffer for `source`.
///
/// # Errors
///
/// Returns `CropError::OrientationNormalization` if the buffer is empty or its
/// length doesn't match the declared dimensions.
pub fn normalize_orientation(source: &SourceImage) -> Result<RasterImage, CropError> {
    let image = &source.image;
    if image.is_empty() {
        return Err(CropError::OrientationNormalization(format!(
            "empty source image ({}x{})",
            image.width, image.height
        )));
    }

    // Fast path: already upright
    if source.orientation == Orientation::Normal {
        if !image.is_consistent() {
            return Err(buffer_mismatch(image));
        }
        return Ok(image.clone());
    }

    let rgba = image.to_rgba_image().ok_or_else(|| buffer_mismatch(image))?;
    trace!(orientation = ?source.orientation, "normalizing source orientation");

    let oriented = apply_orientation(DynamicImage::ImageRgba8(rgba), source.orientation);
    Ok(RasterImage::from_rgba_image(oriented.into_rgba8()))
}

fn buffer_mismatch(image: &RasterImage) -> CropError {
    CropError::OrientationNormalization(format!(
        "pixel buffer holds {} bytes, expected {} for {}x{} RGBA",
        image.pixels.len(),
        image.width as usize * image.height as usize * super::CHANNELS,
        image.width,
        image.height
    ))
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
