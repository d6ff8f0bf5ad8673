//! Pixel buffer and orientation types.

use serde::{Deserialize, Serialize};

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Mirrored across the main diagonal; upright after a 90 CW turn then a
    /// horizontal flip.
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Mirrored across the anti-diagonal; upright after a 270 CW turn then a
    /// horizontal flip.
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// An RGBA8 image in row-major order.
///
/// Alpha is carried so circular crops can produce transparent corners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data (4 bytes per pixel). Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Create a new RasterImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A fully transparent image.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * CHANNELS],
        }
    }

    /// Build from tightly packed RGB8 data, with every pixel opaque.
    ///
    /// Returns `None` if `rgb` does not hold exactly `width * height` pixels.
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> Option<Self> {
        if rgb.len() != width as usize * height as usize * 3 {
            return None;
        }
        let mut pixels = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for px in rgb.chunks_exact(3) {
            pixels.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a RasterImage from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbaImage, or `None` if the buffer length is wrong.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// True if the buffer length matches the dimensions.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.width as usize * self.height as usize * CHANNELS
    }

    /// Read one pixel, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let px = self.pixels.get(idx..idx + CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

/// A source image as delivered by the loader, with its orientation tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub image: RasterImage,
    pub orientation: Orientation,
}

impl SourceImage {
    pub fn new(image: RasterImage, orientation: Orientation) -> Self {
        Self { image, orientation }
    }

    /// A source that is already in canonical orientation.
    pub fn upright(image: RasterImage) -> Self {
        Self::new(image, Orientation::Normal)
    }

    /// Dimensions after the orientation tag is applied, i.e. the size the
    /// image is displayed at.
    pub fn oriented_dimensions(&self) -> (u32, u32) {
        if self.orientation.swaps_dimensions() {
            (self.image.height, self.image.width)
        } else {
            (self.image.width, self.image.height)
        }
    }
}
