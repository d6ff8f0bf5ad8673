//! Mask sizing.
//!
//! The mask is sized from the configured radius and shape, then capped so it
//! never exceeds the displayed image on either axis.

use crate::config::MaskShape;
use crate::geometry::{Rect, Size};

/// Shape parameters that determine the on-screen mask size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskSpec {
    pub shape: MaskShape,
    pub radius: f64,
    /// Width / height, only used for rectangles.
    pub aspect_ratio: f64,
}

impl MaskSpec {
    pub fn new(shape: MaskShape, radius: f64, aspect_ratio: f64) -> Self {
        Self {
            shape,
            radius,
            aspect_ratio,
        }
    }

    /// Mask size for an image displayed at `view`.
    ///
    /// Square and circle masks use `min(2 * radius, shorter view side)` as
    /// their side. Rectangles take the largest box of the configured aspect
    /// ratio that fits both the radius budget and the view.
    pub fn size_in(&self, view: Size) -> Size {
        let budget = self.radius * 2.0;
        match self.shape {
            MaskShape::Circle | MaskShape::Square => {
                let diameter = budget.min(view.width.min(view.height));
                Size::new(diameter, diameter)
            }
            MaskShape::Rectangle => {
                let max_width = view.width.min(budget);
                let max_height = view.height.min(budget);
                if max_width / max_height > self.aspect_ratio {
                    // Too wide for the ratio, height is the binding side
                    Size::new(max_height * self.aspect_ratio, max_height)
                } else {
                    Size::new(max_width, max_width / self.aspect_ratio)
                }
            }
        }
    }
}

/// Frame of a mask of `mask` size centered in `container`.
pub fn mask_frame(mask: Size, container: Size) -> Rect {
    Rect::centered(mask, container)
}
