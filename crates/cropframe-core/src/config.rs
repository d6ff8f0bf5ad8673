//! Crop configuration and the per-session parameters derived from it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transform::InterpolationFilter;

/// Shape of the on-screen mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskShape {
    #[default]
    Circle,
    Square,
    /// Fixed aspect ratio rectangle, see [`CropConfiguration::rect_aspect_ratio`].
    Rectangle,
}

impl FromStr for MaskShape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "circle" => Ok(MaskShape::Circle),
            "square" => Ok(MaskShape::Square),
            "rectangle" | "rect" => Ok(MaskShape::Rectangle),
            _ => Err(ConfigError::UnknownMaskShape(s.to_string())),
        }
    }
}

/// Caller-facing configuration record.
///
/// Missing fields fall back to their defaults when deserialized, so a
/// JavaScript caller may pass `{ maskRadius: 100 }` and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropConfiguration {
    /// Upper bound for the zoom scale (default 4.0).
    pub max_magnification_scale: f64,
    /// Nominal mask radius in view units (default 130).
    pub mask_radius: f64,
    /// Clip circle-mask output to a circle (default false).
    pub crop_image_circular: bool,
    /// Enable the rotation gesture (default false).
    pub rotate_image: bool,
    /// Enable the quarter-turn and reset rotation buttons (default false).
    pub rotate_image_with_buttons: bool,
    /// Pinch sensitivity multiplier (default 1.0).
    pub zoom_sensitivity: f64,
    /// Width / height of the rectangle mask (default 4/3).
    pub rect_aspect_ratio: f64,
    /// Resampling kernel used when rotating the source.
    pub interpolation: InterpolationFilter,
}

impl Default for CropConfiguration {
    fn default() -> Self {
        Self {
            max_magnification_scale: 4.0,
            mask_radius: 130.0,
            crop_image_circular: false,
            rotate_image: false,
            rotate_image_with_buttons: false,
            zoom_sensitivity: 1.0,
            rect_aspect_ratio: 4.0 / 3.0,
            interpolation: InterpolationFilter::default(),
        }
    }
}

impl CropConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject values that would break the transform math.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("maxMagnificationScale", self.max_magnification_scale)?;
        positive("maskRadius", self.mask_radius)?;
        positive("zoomSensitivity", self.zoom_sensitivity)?;
        positive("rectAspectRatio", self.rect_aspect_ratio)?;
        Ok(())
    }

    /// Whether the committed rotation is applied to the output.
    pub fn rotation_enabled(&self) -> bool {
        self.rotate_image || self.rotate_image_with_buttons
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be a positive finite number, got {}", value),
        })
    }
}

/// Immutable parameters of one crop session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropParameters {
    pub mask_shape: MaskShape,
    pub mask_radius: f64,
    /// Only consulted for [`MaskShape::Rectangle`].
    pub rect_aspect_ratio: f64,
    pub max_magnification_scale: f64,
    /// Only honored for [`MaskShape::Circle`].
    pub circular_output: bool,
    pub rotation_enabled: bool,
    pub interpolation: InterpolationFilter,
}

impl CropParameters {
    /// Validate `config` and freeze the values the engine needs.
    pub fn new(mask_shape: MaskShape, config: &CropConfiguration) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            mask_shape,
            mask_radius: config.mask_radius,
            rect_aspect_ratio: config.rect_aspect_ratio,
            max_magnification_scale: config.max_magnification_scale,
            circular_output: config.crop_image_circular,
            rotation_enabled: config.rotation_enabled(),
            interpolation: config.interpolation,
        })
    }

    /// True when the output gets a circular alpha mask.
    pub fn clips_to_circle(&self) -> bool {
        self.mask_shape == MaskShape::Circle && self.circular_output
    }
}
