//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core cropframe
//! types, handling the conversion between Rust and JavaScript representations.

use cropframe_core::raster::{Orientation, RasterImage, SourceImage};
use wasm_bindgen::prelude::*;

/// An RGBA image wrapper for JavaScript.
///
/// Pixel data is RGBA, 4 bytes per pixel, row-major, which is the layout of
/// `ImageData.data` on a canvas.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is
/// made to JavaScript memory as a `Uint8Array`. The `free()` method can be
/// called to explicitly release WASM memory, but this is optional as
/// wasm-bindgen's finalizer will handle cleanup automatically.
#[wasm_bindgen]
pub struct JsRasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Create a new JsRasterImage from dimensions and RGBA pixel data.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsRasterImage {
        JsRasterImage {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsRasterImage {
    pub(crate) fn from_raster(img: RasterImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert to a core source image with the given EXIF orientation value.
    ///
    /// Note: This clones the pixel data.
    pub(crate) fn to_source(&self, orientation: u8) -> SourceImage {
        let image = RasterImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        };
        SourceImage::new(image, Orientation::from(orientation as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_raster_image_creation() {
        let img = JsRasterImage::new(100, 50, vec![0u8; 100 * 50 * 4]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_js_raster_image_pixels() {
        let pixels = vec![255u8, 128, 64, 255, 32, 16, 8, 0];
        let img = JsRasterImage::new(2, 1, pixels.clone());
        assert_eq!(img.pixels(), pixels);
    }

    #[test]
    fn test_from_raster() {
        let js_img = JsRasterImage::from_raster(RasterImage::transparent(20, 10));
        assert_eq!(js_img.width(), 20);
        assert_eq!(js_img.height(), 10);
        assert_eq!(js_img.byte_length(), 800);
    }

    #[test]
    fn test_to_source_orientation() {
        let js_img = JsRasterImage::new(4, 2, vec![0u8; 32]);
        let source = js_img.to_source(6);
        assert_eq!(source.orientation, Orientation::Rotate90CW);
        assert_eq!(source.oriented_dimensions(), (2, 4));

        // Unknown tags fall back to upright
        assert_eq!(js_img.to_source(0).orientation, Orientation::Normal);
    }
}
