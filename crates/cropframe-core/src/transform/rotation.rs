//! Canvas-preserving image rotation with bilinear and Lanczos3 interpolation.
//!
//! The image is rotated about its center and the output keeps the source
//! dimensions. Pixels that map outside the source are fully transparent.
//! Keeping the canvas and the center fixed mirrors how the preview rotates the
//! displayed image before scale and offset are applied, so crop rectangles
//! computed in the unrotated frame stay valid.
//!
//! # Algorithm
//!
//! Inverse mapping: for each output pixel we find the source position that
//! lands on it and interpolate there. With y pointing down and a clockwise
//! angle θ:
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + cx
//! src_y = -dx * sin(θ) + dy * cos(θ) + cy
//! ```
//! where `(dx, dy)` is the output pixel center relative to the image center.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CropError;
use crate::raster::{RasterImage, CHANNELS};

/// Angles closer than this to a full turn are treated as no rotation.
const ANGLE_EPSILON: f64 = 0.001;

/// Interpolation filter for rotation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation - good for interactive previews.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation - good for final output.
    Lanczos3,
}

/// Rotate `image` clockwise by `angle_degrees` about its center.
///
/// # Errors
///
/// Returns `CropError::FilterUnavailable` if the angle is not finite or the
/// buffer cannot be sampled (empty or inconsistent with its dimensions).
pub fn rotate_about_center(
    image: &RasterImage,
    angle_degrees: f64,
    filter: InterpolationFilter,
) -> Result<RasterImage, CropError> {
    if !angle_degrees.is_finite() {
        return Err(CropError::FilterUnavailable(format!(
            "cannot rotate by a non-finite angle ({})",
            angle_degrees
        )));
    }
    if image.is_empty() || !image.is_consistent() {
        return Err(CropError::FilterUnavailable(format!(
            "cannot sample a {}x{} buffer of {} bytes",
            image.width,
            image.height,
            image.pixels.len()
        )));
    }

    // Fast path: whole turns
    let normalized = angle_degrees.rem_euclid(360.0);
    if normalized < ANGLE_EPSILON || 360.0 - normalized < ANGLE_EPSILON {
        return Ok(image.clone());
    }

    debug!(angle = angle_degrees, ?filter, "rotating source");

    let angle_rad = angle_degrees.to_radians();
    let (sin, cos) = angle_rad.sin_cos();

    let (w, h) = (image.width, image.height);
    let cx = w as f64 / 2.0;
    let cy = h as f64 / 2.0;

    let mut output = RasterImage::transparent(w, h);

    for dst_y in 0..h {
        for dst_x in 0..w {
            // Pixel centers sit at +0.5
            let dx = dst_x as f64 + 0.5 - cx;
            let dy = dst_y as f64 + 0.5 - cy;

            // Back to index space where pixel centers are integers
            let src_x = dx * cos + dy * sin + cx - 0.5;
            let src_y = -dx * sin + dy * cos + cy - 0.5;

            let pixel = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
                InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y),
            };

            let dst_idx = (dst_y as usize * w as usize + dst_x as usize) * CHANNELS;
            output.pixels[dst_idx..dst_idx + CHANNELS].copy_from_slice(&pixel);
        }
    }

    Ok(output)
}

/// Get a pixel as [f64; 4] from an image at the given coordinates.
#[inline]
fn get_pixel_f64(image: &RasterImage, px: usize, py: usize) -> [f64; 4] {
    let idx = (py * image.width as usize + px) * CHANNELS;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
        image.pixels[idx + 3] as f64,
    ]
}

/// True if `(x, y)` in index space falls inside some source pixel.
#[inline]
fn covers(image: &RasterImage, x: f64, y: f64) -> bool {
    x >= -0.5 && y >= -0.5 && x < image.width as f64 - 0.5 && y < image.height as f64 - 0.5
}

/// Sample a pixel using bilinear interpolation.
///
/// Positions outside the source are transparent. Inside the outer half pixel
/// the edge row/column is repeated.
fn sample_bilinear(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    if !covers(image, x, y) {
        return [0; 4];
    }

    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 4];
    for i in 0..CHANNELS {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Sample a pixel using Lanczos3 interpolation.
///
/// Lanczos3 considers a 6x6 neighborhood of pixels; near the edges it
/// falls back to bilinear.
fn sample_lanczos3(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as i64, image.height as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            if px >= 0 && px < w && py >= 0 && py < h {
                let weight =
                    lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);

                let pixel = get_pixel_f64(image, px as usize, py as usize);
                for i in 0..CHANNELS {
                    sum[i] += pixel[i] * weight;
                }
                weight_sum += weight;
            }
        }
    }

    let mut result = [0u8; 4];
    if weight_sum > 0.0 {
        for i in 0..CHANNELS {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
