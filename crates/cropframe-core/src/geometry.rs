//! Plain geometry value types shared by the transform model and crop engine.
//!
//! # Coordinate System
//!
//! - View space values (sizes, offsets) are in layout units, y pointing down
//! - Original space values are in source pixels, origin at the top-left corner

use serde::{Deserialize, Serialize};

/// A width/height pair in view or pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both extents are finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Half extents, i.e. the "radius" of a box of this size on each axis.
    pub fn half(&self) -> Vector {
        Vector::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A 2D translation (pan offsets, gesture deltas, drag limits).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp each component into `[-limit, +limit]`.
    ///
    /// `limit` components are expected to be non-negative.
    pub fn clamp_symmetric(self, limit: Vector) -> Vector {
        Vector {
            x: self.x.clamp(-limit.x, limit.x),
            y: self.y.clamp(-limit.y, limit.y),
        }
    }

    pub fn scaled(self, factor: f64) -> Vector {
        Vector::new(self.x * factor, self.y * factor)
    }
}

impl std::ops::Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Axis-aligned rectangle with floating point origin and extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` centered inside a container of `container` size.
    pub fn centered(size: Size, container: Size) -> Self {
        Self {
            x: (container.width - size.width) / 2.0,
            y: (container.height - size.height) / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Round to whole pixels and intersect with `[0, bounds_w] x [0, bounds_h]`.
    ///
    /// Returns `None` when the rectangle is non-finite or the intersection is empty.
    pub fn to_pixel_rect(&self, bounds_w: u32, bounds_h: u32) -> Option<PixelRect> {
        if !self.is_finite() {
            return None;
        }

        let left = self.x.round().max(0.0);
        let top = self.y.round().max(0.0);
        let right = (self.x + self.width).round().min(bounds_w as f64);
        let bottom = (self.y + self.height).round().min(bounds_h as f64);

        if right <= left || bottom <= top {
            return None;
        }

        Some(PixelRect {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

/// Integer pixel region, always non-empty and inside its source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_positive() {
        assert!(Size::new(10.0, 5.0).is_positive());
        assert!(!Size::ZERO.is_positive());
        assert!(!Size::new(10.0, -1.0).is_positive());
        assert!(!Size::new(f64::NAN, 1.0).is_positive());
        assert!(!Size::new(f64::INFINITY, 1.0).is_positive());
    }

    #[test]
    fn test_clamp_symmetric() {
        let v = Vector::new(50.0, -80.0).clamp_symmetric(Vector::new(30.0, 40.0));
        assert_eq!(v, Vector::new(30.0, -40.0));

        let v = Vector::new(5.0, -5.0).clamp_symmetric(Vector::ZERO);
        assert_eq!(v, Vector::ZERO);
    }

    #[test]
    fn test_centered_rect() {
        let r = Rect::centered(Size::new(200.0, 100.0), Size::new(400.0, 300.0));
        assert_eq!(r, Rect::new(100.0, 100.0, 200.0, 100.0));
    }

    #[test]
    fn test_pixel_rect_inside_bounds() {
        let r = Rect::new(900.0, 700.0, 200.0, 200.0).to_pixel_rect(2000, 1600);
        assert_eq!(
            r,
            Some(PixelRect {
                x: 900,
                y: 700,
                width: 200,
                height: 200
            })
        );
    }

    #[test]
    fn test_pixel_rect_rounds() {
        let r = Rect::new(9.6, 10.4, 20.2, 19.8).to_pixel_rect(100, 100).unwrap();
        assert_eq!((r.x, r.y), (10, 10));
        assert_eq!((r.width, r.height), (20, 20));
    }

    #[test]
    fn test_pixel_rect_clipped_to_bounds() {
        let r = Rect::new(-10.0, 90.0, 50.0, 50.0).to_pixel_rect(100, 100).unwrap();
        assert_eq!((r.x, r.y, r.width, r.height), (0, 90, 40, 10));
    }

    #[test]
    fn test_pixel_rect_outside_bounds() {
        assert!(Rect::new(200.0, 0.0, 50.0, 50.0).to_pixel_rect(100, 100).is_none());
        assert!(Rect::new(10.0, 10.0, 0.0, 0.0).to_pixel_rect(100, 100).is_none());
        assert!(Rect::new(f64::NAN, 0.0, 5.0, 5.0).to_pixel_rect(100, 100).is_none());
    }
}
