//! Crop compute engine.
//!
//! Pure mapping from a source image, a committed transform snapshot and the
//! session parameters to the cropped output.

use tracing::debug;

use crate::config::CropParameters;
use crate::error::CropError;
use crate::model::TransformSnapshot;
use crate::raster::{normalize_orientation, RasterImage, SourceImage};
use crate::transform::{
    apply_circular_mask, compute_crop_rect, extract_padded, extract_region, pixel_region,
    rotate_about_center,
};

/// Produce the cropped image for `snapshot`.
///
/// Steps: normalize orientation, rotate by the committed angle when rotation
/// is enabled, compute and extract the crop rectangle, then clip to a circle
/// for circular output. The source is never modified.
///
/// # Errors
///
/// - `CropError::OrientationNormalization` if the source can't be canonicalized
/// - `CropError::FilterUnavailable` if the rotation can't be applied
/// - `CropError::CropExtraction` if the crop region is empty or invalid
pub fn crop_image(
    source: &SourceImage,
    snapshot: &TransformSnapshot,
    params: &CropParameters,
) -> Result<RasterImage, CropError> {
    let canonical = normalize_orientation(source)?;

    // The preview rotates clockwise for positive angles; rotating the source
    // the same way reproduces what is visible inside the mask.
    let working = if params.rotation_enabled && snapshot.angle != 0.0 {
        rotate_about_center(&canonical, snapshot.angle, params.interpolation)?
    } else {
        canonical
    };

    let rect = compute_crop_rect(working.width, working.height, snapshot)?;
    let output = if params.clips_to_circle() {
        // Clip to the circle of the whole crop rect, even past the source edge
        let mut padded = extract_padded(&working, &rect)?;
        apply_circular_mask(&mut padded);
        padded
    } else {
        let region = pixel_region(&rect, working.width, working.height)?;
        extract_region(&working, region)
    };

    debug!(
        width = output.width,
        height = output.height,
        shape = ?params.mask_shape,
        "crop produced"
    );
    Ok(output)
}
