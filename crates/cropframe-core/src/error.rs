//! Error types for configuration, layout, session and crop operations.

use thiserror::Error;

/// Failures of the crop pipeline.
///
/// Every variant means "no cropped image was produced"; the source image
/// is never modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// The source buffer could not be re-rendered into canonical orientation.
    #[error("Could not normalize image orientation: {0}")]
    OrientationNormalization(String),

    /// The rotation primitive cannot be applied to this input.
    #[error("Rotation filter unavailable: {0}")]
    FilterUnavailable(String),

    /// The computed crop region is invalid or outside the source bounds.
    #[error("Crop region could not be extracted: {0}")]
    CropExtraction(String),
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Unknown mask shape: {0}")]
    UnknownMaskShape(String),
}

/// Invalid layout input from the render pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("View size must be positive and finite, got {width}x{height}")]
    InvalidViewSize { width: f64, height: f64 },
}

/// Illegal transition of the crop session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A crop was requested while another one is still running.
    #[error("A crop is already in progress")]
    CropInFlight,

    /// A result was delivered without a crop having been started.
    #[error("No crop is in progress")]
    NotCropping,

    /// The session already completed or was cancelled.
    #[error("Crop session has already finished")]
    AlreadyFinished,

    /// No layout pass has reported the displayed image size yet.
    #[error("Image layout is not known yet")]
    LayoutUnknown,
}
