//! Live transform state of one crop session.
//!
//! Holds the current and committed scale, pan offset and rotation angle, and
//! enforces two invariants after every mutation:
//!
//! - `min_scale <= scale <= max_magnification_scale`, where `min_scale` is
//!   the smallest scale at which the image still covers the mask
//! - `|offset|` stays within [`TransformState::drag_limit`] on both axes, so
//!   the mask never shows area outside the image

use tracing::{debug, trace};

use super::mask::MaskSpec;
use crate::config::CropParameters;
use crate::error::LayoutError;
use crate::geometry::{Size, Vector};

/// Base pinch sensitivity, multiplied by the configured zoom sensitivity.
const PINCH_SENSITIVITY: f64 = 0.1;

/// Degrees per rotate-button step.
const QUARTER_TURN: f64 = 90.0;

/// Mutable transform state, exclusively owned by one crop session.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    mask: MaskSpec,
    max_magnification_scale: f64,

    scale: f64,
    last_scale: f64,
    offset: Vector,
    last_offset: Vector,
    /// Degrees, unclamped.
    angle: f64,
    last_angle: f64,

    image_size_in_view: Size,
    mask_size: Size,
}

/// Immutable copy of the committed transform, taken when a crop starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSnapshot {
    pub scale: f64,
    pub offset: Vector,
    /// Degrees.
    pub angle: f64,
    pub image_size_in_view: Size,
    pub mask_size: Size,
}

impl TransformState {
    pub fn new(params: &CropParameters) -> Self {
        Self {
            mask: MaskSpec::new(params.mask_shape, params.mask_radius, params.rect_aspect_ratio),
            max_magnification_scale: params.max_magnification_scale,
            scale: 1.0,
            last_scale: 1.0,
            offset: Vector::ZERO,
            last_offset: Vector::ZERO,
            angle: 0.0,
            last_angle: 0.0,
            image_size_in_view: Size::ZERO,
            mask_size: Size::ZERO,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn last_scale(&self) -> f64 {
        self.last_scale
    }

    pub fn offset(&self) -> Vector {
        self.offset
    }

    pub fn last_offset(&self) -> Vector {
        self.last_offset
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn last_angle(&self) -> f64 {
        self.last_angle
    }

    pub fn image_size_in_view(&self) -> Size {
        self.image_size_in_view
    }

    pub fn mask_size(&self) -> Size {
        self.mask_size
    }

    /// True once a layout pass has reported the displayed image size.
    pub fn has_layout(&self) -> bool {
        self.image_size_in_view.is_positive()
    }

    /// Record the displayed image size and recompute the mask size.
    ///
    /// Scale and offsets are re-clamped against the new layout so neither the
    /// live nor the committed values are left stale.
    pub fn update_mask_dimensions(&mut self, view_size: Size) -> Result<Size, LayoutError> {
        if !view_size.is_positive() {
            return Err(LayoutError::InvalidViewSize {
                width: view_size.width,
                height: view_size.height,
            });
        }

        self.image_size_in_view = view_size;
        self.mask_size = self.mask.size_in(view_size);

        let (min_scale, max_scale) = self.magnification_limits();
        self.scale = self.scale.clamp(min_scale, max_scale);
        self.last_scale = self.last_scale.clamp(min_scale, max_scale);
        let limit = self.drag_limit();
        self.offset = self.offset.clamp_symmetric(limit);
        self.last_offset = self.last_offset.clamp_symmetric(self.drag_limit_at(self.last_scale));

        debug!(
            view_w = view_size.width,
            view_h = view_size.height,
            mask_w = self.mask_size.width,
            mask_h = self.mask_size.height,
            "mask dimensions updated"
        );
        Ok(self.mask_size)
    }

    /// Maximum `|offset|` per axis that keeps the mask inside the scaled image.
    pub fn drag_limit(&self) -> Vector {
        self.drag_limit_at(self.scale)
    }

    fn drag_limit_at(&self, scale: f64) -> Vector {
        let x = (self.image_size_in_view.width / 2.0) * scale - self.mask_size.width / 2.0;
        let y = (self.image_size_in_view.height / 2.0) * scale - self.mask_size.height / 2.0;
        Vector::new(x.max(0.0), y.max(0.0))
    }

    /// `(min_scale, max_scale)` for pinch gestures.
    ///
    /// `min_scale` is the smallest scale at which the image still covers the
    /// mask on both axes. If the configured cap is lower, the cap wins. Before
    /// the first layout pass the minimum is 1.
    pub fn magnification_limits(&self) -> (f64, f64) {
        let max_scale = self.max_magnification_scale;
        if !self.has_layout() {
            return (max_scale.min(1.0), max_scale);
        }
        let min_scale = (self.mask_size.width / self.image_size_in_view.width)
            .max(self.mask_size.height / self.image_size_in_view.height);
        (min_scale.min(max_scale), max_scale)
    }

    /// Apply a continuous pinch magnitude (1.0 = no change) relative to the
    /// committed scale.
    pub fn apply_pinch(&mut self, delta: f64, sensitivity: f64) {
        if !delta.is_finite() || !sensitivity.is_finite() {
            return;
        }
        let scaled = (delta - 1.0) * PINCH_SENSITIVITY * sensitivity + 1.0;
        let (min_scale, max_scale) = self.magnification_limits();
        self.scale = (scaled * self.last_scale).clamp(min_scale, max_scale);

        // A smaller scale shrinks the drag bound, pull the offset back in
        self.offset = self.offset.clamp_symmetric(self.drag_limit());
        trace!(scale = self.scale, "pinch");
    }

    /// Apply a continuous pan translation relative to the committed offset.
    pub fn apply_pan(&mut self, translation: Vector) {
        if !translation.x.is_finite() || !translation.y.is_finite() {
            return;
        }
        self.offset = (self.last_offset + translation).clamp_symmetric(self.drag_limit());
        trace!(x = self.offset.x, y = self.offset.y, "pan");
    }

    /// Apply a continuous rotation in degrees relative to the committed angle.
    pub fn apply_rotate(&mut self, delta_degrees: f64) {
        if !delta_degrees.is_finite() {
            return;
        }
        self.angle = self.last_angle + delta_degrees;
        trace!(angle = self.angle, "rotate");
    }

    /// Finalize the running gesture into the committed baseline.
    pub fn commit(&mut self) {
        self.last_scale = self.scale;
        self.last_offset = self.offset;
        self.last_angle = self.angle;
        debug!(
            scale = self.scale,
            offset_x = self.offset.x,
            offset_y = self.offset.y,
            angle = self.angle,
            "gesture committed"
        );
    }

    /// Rotate by whole quarter turns and commit (negative = counter-clockwise).
    pub fn rotate_quarter_turns(&mut self, turns: i32) {
        self.angle += QUARTER_TURN * turns as f64;
        self.last_angle = self.angle;
    }

    /// Snap the angle back to the nearest full turn toward zero.
    ///
    /// Only the partial turn is undone, so 450° becomes 360° and -450°
    /// becomes -360°.
    pub fn reset_rotation(&mut self) {
        let full_turns = (self.angle / 360.0).trunc();
        self.angle = full_turns * 360.0;
        self.last_angle = self.angle;
    }

    /// False when the image is already upright, i.e. resetting is a no-op.
    pub fn can_reset_rotation(&self) -> bool {
        self.angle % 360.0 != 0.0
    }

    /// Copy of the committed (`last_*`) values plus layout.
    pub fn snapshot(&self) -> TransformSnapshot {
        TransformSnapshot {
            scale: self.last_scale,
            offset: self.last_offset,
            angle: self.last_angle,
            image_size_in_view: self.image_size_in_view,
            mask_size: self.mask_size,
        }
    }
}
