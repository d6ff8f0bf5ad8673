//! Circular alpha clipping for round crops.
//!
//! The clip shape is the ellipse inscribed in the image bounds, which is a
//! circle for the square crops produced by circle masks. Pixels outside are
//! made fully transparent, with a one pixel anti-aliased edge.

use crate::raster::{RasterImage, CHANNELS};

/// Multiply every pixel's alpha by its coverage of the inscribed ellipse.
pub fn apply_circular_mask(image: &mut RasterImage) {
    if image.is_empty() {
        return;
    }

    let rx = image.width as f64 / 2.0;
    let ry = image.height as f64 / 2.0;
    let edge_radius = rx.min(ry);
    let width = image.width as usize;

    for (i, px) in image.pixels.chunks_exact_mut(CHANNELS).enumerate() {
        let x = (i % width) as f64 + 0.5;
        let y = (i / width) as f64 + 0.5;
        let coverage = ellipse_coverage(x - rx, y - ry, rx, ry, edge_radius);
        if coverage < 1.0 {
            px[3] = (px[3] as f64 * coverage).round() as u8;
        }
    }
}

/// Approximate fraction of a unit pixel at `(dx, dy)` from the center that
/// lies inside the ellipse with radii `rx`, `ry`.
#[inline]
fn ellipse_coverage(dx: f64, dy: f64, rx: f64, ry: f64, edge_radius: f64) -> f64 {
    let norm_dist = ((dx / rx).powi(2) + (dy / ry).powi(2)).sqrt();
    // Signed distance to the boundary in pixels, positive inside
    let inside = (1.0 - norm_dist) * edge_radius;
    (inside + 0.5).clamp(0.0, 1.0)
}
