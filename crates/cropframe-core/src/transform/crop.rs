//! Crop rectangle computation and extraction.
//!
//! # Coordinate Conversion
//!
//! The image is displayed "fit" inside `image_size_in_view`, so one view unit
//! corresponds to `factor = min(original_w / view_w, original_h / view_h)`
//! source pixels on both axes. On screen the image is scaled about its center
//! and then translated by the pan offset, which gives in source pixels:
//!
//! ```text
//! half_extent = (mask_size / 2) * factor / scale
//! offset      = pan_offset * factor / scale
//! origin      = source_center - half_extent - offset
//! ```
//!
//! The same order of operations is used for every mask shape. Square and
//! circle masks simply have equal width and height.

use tracing::debug;

use crate::error::CropError;
use crate::geometry::{PixelRect, Rect, Vector};
use crate::model::TransformSnapshot;
use crate::raster::{RasterImage, CHANNELS};

/// Upper bound on padded output size (16384 x 16384).
const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Compute the crop rectangle in source pixel space.
///
/// # Errors
///
/// Returns `CropError::CropExtraction` if the snapshot has no usable layout
/// (zero view or mask size, non-positive scale) or the source is empty.
pub fn compute_crop_rect(
    original_width: u32,
    original_height: u32,
    snapshot: &TransformSnapshot,
) -> Result<Rect, CropError> {
    let view = snapshot.image_size_in_view;
    if !view.is_positive() {
        return Err(CropError::CropExtraction(format!(
            "displayed image size is not known ({}x{})",
            view.width, view.height
        )));
    }
    if !snapshot.mask_size.is_positive() {
        return Err(CropError::CropExtraction(format!(
            "mask has no area ({}x{})",
            snapshot.mask_size.width, snapshot.mask_size.height
        )));
    }
    if !(snapshot.scale.is_finite() && snapshot.scale > 0.0) {
        return Err(CropError::CropExtraction(format!(
            "invalid scale {}",
            snapshot.scale
        )));
    }
    if original_width == 0 || original_height == 0 {
        return Err(CropError::CropExtraction("source image is empty".to_string()));
    }

    let (ow, oh) = (original_width as f64, original_height as f64);
    let factor = (ow / view.width).min(oh / view.height);
    let to_original = factor / snapshot.scale;

    let half = snapshot.mask_size.half().scaled(to_original);
    let offset: Vector = snapshot.offset.scaled(to_original);

    let rect = Rect::new(
        ow / 2.0 - half.x - offset.x,
        oh / 2.0 - half.y - offset.y,
        half.x * 2.0,
        half.y * 2.0,
    );
    debug!(
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        factor,
        "crop rect in source pixels"
    );
    Ok(rect)
}

/// Round `rect` to whole pixels inside a `width` x `height` source.
///
/// # Errors
///
/// Returns `CropError::CropExtraction` when the rectangle doesn't intersect
/// the source.
pub fn pixel_region(rect: &Rect, width: u32, height: u32) -> Result<PixelRect, CropError> {
    rect.to_pixel_rect(width, height).ok_or_else(|| {
        CropError::CropExtraction(format!(
            "region ({:.1}, {:.1}, {:.1}x{:.1}) does not intersect the {}x{} source",
            rect.x, rect.y, rect.width, rect.height, width, height
        ))
    })
}

/// Copy `region` out of `image`.
///
/// `region` must lie inside the image, as produced by [`pixel_region`].
pub fn extract_region(image: &RasterImage, region: PixelRect) -> RasterImage {
    debug_assert!(region.x + region.width <= image.width);
    debug_assert!(region.y + region.height <= image.height);

    // Fast path: the whole image
    if region.x == 0
        && region.y == 0
        && region.width == image.width
        && region.height == image.height
    {
        return image.clone();
    }

    let row_bytes = region.width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * region.height as usize);

    // Copy pixel data row by row
    for y in region.y..region.y + region.height {
        let start = (y as usize * image.width as usize + region.x as usize) * CHANNELS;
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    RasterImage::new(region.width, region.height, output)
}

/// Copy `rect` out of `image` at its full rounded size.
///
/// Unlike [`extract_region`] the rectangle is not trimmed to the source:
/// the output is `round(width) x round(height)` and any part of it outside
/// the source stays fully transparent. Used for circular output, where the
/// clip must be the circle inscribed in the whole crop rectangle.
///
/// # Errors
///
/// Returns `CropError::CropExtraction` when the rectangle is degenerate, too
/// large to allocate, or doesn't overlap the source.
pub fn extract_padded(image: &RasterImage, rect: &Rect) -> Result<RasterImage, CropError> {
    let left = rect.x.round();
    let top = rect.y.round();
    let width = rect.width.round();
    let height = rect.height.round();

    if !(left.is_finite() && top.is_finite() && width >= 1.0 && height >= 1.0) {
        return Err(CropError::CropExtraction(format!(
            "region ({:.1}, {:.1}, {:.1}x{:.1}) has no whole pixels",
            rect.x, rect.y, rect.width, rect.height
        )));
    }
    if width * height > MAX_CANVAS_PIXELS as f64 {
        return Err(CropError::CropExtraction(format!(
            "region {:.0}x{:.0} exceeds the {} pixel output limit",
            width, height, MAX_CANVAS_PIXELS
        )));
    }

    // Overlap with the source, in source coordinates
    let src_left = left.max(0.0);
    let src_top = top.max(0.0);
    let src_right = (left + width).min(image.width as f64);
    let src_bottom = (top + height).min(image.height as f64);
    if src_right <= src_left || src_bottom <= src_top {
        return Err(CropError::CropExtraction(format!(
            "region ({:.1}, {:.1}, {:.1}x{:.1}) does not intersect the {}x{} source",
            rect.x, rect.y, rect.width, rect.height, image.width, image.height
        )));
    }

    let (out_w, out_h) = (width as u32, height as u32);
    let mut output = RasterImage::transparent(out_w, out_h);

    let row_bytes = (src_right - src_left) as usize * CHANNELS;
    let dst_x = (src_left - left) as usize;
    for y in src_top as u32..src_bottom as u32 {
        let src_start = (y as usize * image.width as usize + src_left as usize) * CHANNELS;
        let dst_y = (y as f64 - top) as usize;
        let dst_start = (dst_y * out_w as usize + dst_x) * CHANNELS;
        output.pixels[dst_start..dst_start + row_bytes]
            .copy_from_slice(&image.pixels[src_start..src_start + row_bytes]);
    }

    debug!(
        width = out_w,
        height = out_h,
        left,
        top,
        "padded crop extracted"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    const EPS: f64 = 1e-9;

    fn snapshot(view: Size, mask: Size, scale: f64, offset: Vector) -> TransformSnapshot {
        TransformSnapshot {
            scale,
            offset,
            angle: 0.0,
            image_size_in_view: view,
            mask_size: mask,
        }
    }

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((width * height) as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        RasterImage::new(width, height, pixels)
    }

    fn assert_rect(rect: Rect, expected: (f64, f64, f64, f64)) {
        assert!((rect.x - expected.0).abs() < EPS, "x: {:?}", rect);
        assert!((rect.y - expected.1).abs() < EPS, "y: {:?}", rect);
        assert!((rect.width - expected.2).abs() < EPS, "w: {:?}", rect);
        assert!((rect.height - expected.3).abs() < EPS, "h: {:?}", rect);
    }

    #[test]
    fn test_zoomed_square_crop() {
        let snap = snapshot(
            Size::new(1000.0, 800.0),
            Size::new(200.0, 200.0),
            2.0,
            Vector::ZERO,
        );
        let rect = compute_crop_rect(2000, 1600, &snap).unwrap();
        assert_rect(rect, (900.0, 700.0, 200.0, 200.0));
    }

    #[test]
    fn test_full_short_side_crop() {
        // Mask diameter equals the shorter view side at scale 1
        let snap = snapshot(
            Size::new(1000.0, 800.0),
            Size::new(800.0, 800.0),
            1.0,
            Vector::ZERO,
        );
        let rect = compute_crop_rect(2000, 1600, &snap).unwrap();
        assert_rect(rect, (200.0, 0.0, 1600.0, 1600.0));
    }

    #[test]
    fn test_offset_moves_crop_opposite() {
        // Panning the image right reveals content further left
        let snap = snapshot(
            Size::new(1000.0, 800.0),
            Size::new(200.0, 200.0),
            2.0,
            Vector::new(100.0, -50.0),
        );
        let rect = compute_crop_rect(2000, 1600, &snap).unwrap();
        assert_rect(rect, (800.0, 750.0, 200.0, 200.0));
    }

    #[test]
    fn test_rectangle_keeps_aspect_ratio() {
        let snap = snapshot(
            Size::new(400.0, 300.0),
            Size::new(240.0, 180.0),
            1.5,
            Vector::ZERO,
        );
        let rect = compute_crop_rect(1200, 900, &snap).unwrap();
        // factor 3, half extents 120*3/1.5 = 240, 90*3/1.5 = 180
        assert_rect(rect, (360.0, 270.0, 480.0, 360.0));
        assert!((rect.width / rect.height - 4.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_factor_uses_fit_axis() {
        // Source 3000x1000 shown in a 600x300 box: width fits at factor 5,
        // height would suggest 3.33, the min wins
        let snap = snapshot(
            Size::new(600.0, 300.0),
            Size::new(100.0, 100.0),
            1.0,
            Vector::ZERO,
        );
        let rect = compute_crop_rect(3000, 1000, &snap).unwrap();
        let factor = 1000.0 / 300.0;
        assert!((rect.width - 100.0 * factor).abs() < EPS);
    }

    #[test]
    fn test_missing_layout_fails() {
        let snap = snapshot(Size::ZERO, Size::ZERO, 1.0, Vector::ZERO);
        assert!(matches!(
            compute_crop_rect(100, 100, &snap),
            Err(CropError::CropExtraction(_))
        ));
    }

    #[test]
    fn test_zero_mask_fails() {
        let snap = snapshot(Size::new(100.0, 100.0), Size::ZERO, 1.0, Vector::ZERO);
        assert!(matches!(
            compute_crop_rect(100, 100, &snap),
            Err(CropError::CropExtraction(_))
        ));
    }

    #[test]
    fn test_invalid_scale_fails() {
        for scale in [0.0, -1.0, f64::NAN] {
            let snap = snapshot(
                Size::new(100.0, 100.0),
                Size::new(50.0, 50.0),
                scale,
                Vector::ZERO,
            );
            assert!(compute_crop_rect(100, 100, &snap).is_err());
        }
    }

    #[test]
    fn test_pixel_region_outside_fails() {
        let rect = Rect::new(500.0, 500.0, 10.0, 10.0);
        assert!(matches!(
            pixel_region(&rect, 100, 100),
            Err(CropError::CropExtraction(_))
        ));
    }

    #[test]
    fn test_extract_region() {
        let img = test_image(10, 10);
        let region = PixelRect {
            x: 2,
            y: 3,
            width: 4,
            height: 5,
        };
        let result = extract_region(&img, region);
        assert_eq!((result.width, result.height), (4, 5));
        assert_eq!(result.pixels.len(), 4 * 5 * CHANNELS);
        // First pixel from (2, 3): 3 * 10 + 2 = 32
        assert_eq!(result.pixel(0, 0), Some([32, 32, 32, 255]));
        // Last pixel from (5, 7): 7 * 10 + 5 = 75
        assert_eq!(result.pixel(3, 4), Some([75, 75, 75, 255]));
    }

    #[test]
    fn test_extract_full_region() {
        let img = test_image(6, 4);
        let region = PixelRect {
            x: 0,
            y: 0,
            width: 6,
            height: 4,
        };
        assert_eq!(extract_region(&img, region), img);
    }

    #[test]
    fn test_extract_padded_inside_matches_region() {
        let img = test_image(10, 10);
        let padded = extract_padded(&img, &Rect::new(2.0, 3.0, 4.0, 5.0)).unwrap();
        let region = PixelRect {
            x: 2,
            y: 3,
            width: 4,
            height: 5,
        };
        assert_eq!(padded, extract_region(&img, region));
    }

    #[test]
    fn test_extract_padded_keeps_full_size() {
        let img = test_image(10, 10);
        // Overhangs the source by 3 px left and 2 px top
        let padded = extract_padded(&img, &Rect::new(-3.0, -2.0, 8.0, 8.0)).unwrap();
        assert_eq!((padded.width, padded.height), (8, 8));

        // Outside the source is transparent
        assert_eq!(padded.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(padded.pixel(2, 5), Some([0, 0, 0, 0]));
        assert_eq!(padded.pixel(5, 1), Some([0, 0, 0, 0]));
        // Source (0, 0) lands at (3, 2)
        assert_eq!(padded.pixel(3, 2), Some([0, 0, 0, 255]));
        // Source (4, 5): 5 * 10 + 4 = 54
        assert_eq!(padded.pixel(7, 7), Some([54, 54, 54, 255]));
    }

    #[test]
    fn test_extract_padded_larger_than_source() {
        let img = test_image(4, 2);
        let padded = extract_padded(&img, &Rect::new(-2.0, -3.0, 8.0, 8.0)).unwrap();
        assert_eq!((padded.width, padded.height), (8, 8));
        let opaque = padded.pixels.chunks_exact(CHANNELS).filter(|px| px[3] == 255).count();
        assert_eq!(opaque, 8);
    }

    #[test]
    fn test_extract_padded_outside_fails() {
        let img = test_image(10, 10);
        for rect in [
            Rect::new(20.0, 0.0, 5.0, 5.0),
            Rect::new(0.0, 0.0, 0.2, 5.0),
            Rect::new(f64::NAN, 0.0, 5.0, 5.0),
        ] {
            assert!(matches!(
                extract_padded(&img, &rect),
                Err(CropError::CropExtraction(_))
            ));
        }
    }

    #[test]
    fn test_extract_padded_size_limit() {
        let img = test_image(4, 4);
        let rect = Rect::new(-50_000.0, -50_000.0, 100_000.0, 100_000.0);
        assert!(extract_padded(&img, &rect).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
