//! Crop session: one interactive crop from start to save or dismissal.
//!
//! The session owns the [`TransformState`], forwards gesture input to it,
//! and gates the save action through an explicit status:
//!
//! ```text
//! Idle --begin_crop--> Cropping --finish--> Done
//!   |                     |
//!   +-------cancel--------+-------------> Done
//! ```
//!
//! The crop itself runs on a [`CropJob`], an owned snapshot of the committed
//! transform that can be moved to a worker thread. Live gestures after
//! `begin_crop` are ignored and never reach a running job.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{CropConfiguration, CropParameters, MaskShape};
use crate::engine::crop_image;
use crate::error::{ConfigError, CropError, LayoutError, SessionError};
use crate::geometry::{Rect, Size, Vector};
use crate::model::{mask_frame, TransformSnapshot, TransformState};
use crate::raster::{RasterImage, SourceImage};

/// Receives the crop result exactly once; `None` means no image was produced.
pub type CompletionHandler = Box<dyn FnOnce(Option<RasterImage>)>;
/// Called when the user dismisses the session without saving.
pub type CancelHandler = Box<dyn FnOnce()>;
/// Receives the mask frame after each layout pass.
pub type MaskGeometryHandler = Box<dyn FnMut(Rect)>;

/// Lifecycle of a crop session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Accepting gestures.
    #[default]
    Idle,
    /// A crop job is running; gestures and further saves are rejected.
    Cropping,
    /// Completed, failed or cancelled. Terminal.
    Done,
}

/// Everything a crop needs, detached from the session.
#[derive(Debug, Clone)]
pub struct CropJob {
    source: Arc<SourceImage>,
    snapshot: TransformSnapshot,
    params: CropParameters,
}

impl CropJob {
    /// Run the crop. Pure, so it may run on any thread.
    pub fn run(&self) -> Result<RasterImage, CropError> {
        crop_image(&self.source, &self.snapshot, &self.params)
    }

    pub fn snapshot(&self) -> &TransformSnapshot {
        &self.snapshot
    }
}

pub struct CropSession {
    source: Arc<SourceImage>,
    params: CropParameters,
    zoom_sensitivity: f64,
    rotate_gesture: bool,
    rotate_buttons: bool,
    state: TransformState,
    status: SessionStatus,
    on_complete: Option<CompletionHandler>,
    on_cancel: Option<CancelHandler>,
    on_mask_geometry: Option<MaskGeometryHandler>,
}

impl fmt::Debug for CropSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropSession")
            .field("params", &self.params)
            .field("state", &self.state)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl CropSession {
    /// Start a session for `source` with the given mask and configuration.
    pub fn new(
        source: SourceImage,
        mask_shape: MaskShape,
        config: &CropConfiguration,
        on_complete: impl FnOnce(Option<RasterImage>) + 'static,
    ) -> Result<Self, ConfigError> {
        let params = CropParameters::new(mask_shape, config)?;
        Ok(Self {
            source: Arc::new(source),
            params,
            zoom_sensitivity: config.zoom_sensitivity,
            rotate_gesture: config.rotate_image,
            rotate_buttons: config.rotate_image_with_buttons,
            state: TransformState::new(&params),
            status: SessionStatus::Idle,
            on_complete: Some(Box::new(on_complete)),
            on_cancel: None,
            on_mask_geometry: None,
        })
    }

    pub fn with_cancel_handler(mut self, on_cancel: impl FnOnce() + 'static) -> Self {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }

    pub fn with_mask_geometry_handler(
        mut self,
        on_mask_geometry: impl FnMut(Rect) + 'static,
    ) -> Self {
        self.on_mask_geometry = Some(Box::new(on_mask_geometry));
        self
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn state(&self) -> &TransformState {
        &self.state
    }

    pub fn params(&self) -> &CropParameters {
        &self.params
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    /// Whether the rotate-left/right and reset buttons are shown.
    pub fn rotation_buttons_enabled(&self) -> bool {
        self.rotate_buttons
    }

    fn accepts_input(&self) -> bool {
        if self.status == SessionStatus::Idle {
            true
        } else {
            debug!(status = ?self.status, "ignoring input outside idle state");
            false
        }
    }

    /// Layout pass: record the displayed image size and report the mask frame.
    pub fn update_mask_dimensions(&mut self, view_size: Size) -> Result<Size, LayoutError> {
        let mask = self.state.update_mask_dimensions(view_size)?;
        if let Some(handler) = self.on_mask_geometry.as_mut() {
            handler(mask_frame(mask, view_size));
        }
        Ok(mask)
    }

    /// Mask rectangle centered in `container`.
    pub fn mask_frame(&self, container: Size) -> Rect {
        mask_frame(self.state.mask_size(), container)
    }

    pub fn pinch(&mut self, magnitude: f64) {
        if self.accepts_input() {
            self.state.apply_pinch(magnitude, self.zoom_sensitivity);
        }
    }

    pub fn pan(&mut self, translation: Vector) {
        if self.accepts_input() {
            self.state.apply_pan(translation);
        }
    }

    /// Rotation gesture; a no-op unless `rotate_image` is enabled.
    pub fn rotate(&mut self, delta_degrees: f64) {
        if self.rotate_gesture && self.accepts_input() {
            self.state.apply_rotate(delta_degrees);
        }
    }

    /// Gesture ended.
    pub fn end_gesture(&mut self) {
        if self.accepts_input() {
            self.state.commit();
        }
    }

    pub fn rotate_left(&mut self) {
        if self.rotate_buttons && self.accepts_input() {
            self.state.rotate_quarter_turns(-1);
        }
    }

    pub fn rotate_right(&mut self) {
        if self.rotate_buttons && self.accepts_input() {
            self.state.rotate_quarter_turns(1);
        }
    }

    /// Reset button; like the rotate buttons it needs `rotate_image_with_buttons`.
    pub fn reset_rotation(&mut self) {
        if self.rotate_buttons && self.accepts_input() {
            self.state.reset_rotation();
        }
    }

    pub fn can_reset_rotation(&self) -> bool {
        self.rotate_buttons
            && self.status == SessionStatus::Idle
            && self.state.can_reset_rotation()
    }

    /// Freeze the committed transform and move to `Cropping`.
    pub fn begin_crop(&mut self) -> Result<CropJob, SessionError> {
        match self.status {
            SessionStatus::Cropping => return Err(SessionError::CropInFlight),
            SessionStatus::Done => return Err(SessionError::AlreadyFinished),
            SessionStatus::Idle => {}
        }
        if !self.state.has_layout() {
            return Err(SessionError::LayoutUnknown);
        }

        self.status = SessionStatus::Cropping;
        let job = CropJob {
            source: Arc::clone(&self.source),
            snapshot: self.state.snapshot(),
            params: self.params,
        };
        debug!(snapshot = ?job.snapshot, "crop started");
        Ok(job)
    }

    /// Deliver a job's result and move to `Done`.
    ///
    /// Errors degrade to `None` for the completion handler. If the session
    /// was cancelled meanwhile the result is dropped and `AlreadyFinished`
    /// is returned.
    pub fn finish(&mut self, result: Result<RasterImage, CropError>) -> Result<(), SessionError> {
        match self.status {
            SessionStatus::Idle => return Err(SessionError::NotCropping),
            SessionStatus::Done => {
                debug!("discarding crop result after dismissal");
                return Err(SessionError::AlreadyFinished);
            }
            SessionStatus::Cropping => {}
        }

        self.status = SessionStatus::Done;
        let image = match result {
            Ok(image) => Some(image),
            Err(err) => {
                warn!(error = %err, "crop produced no image");
                None
            }
        };
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(image);
        }
        Ok(())
    }

    /// Crop on the calling thread: `begin_crop`, `run`, `finish`.
    pub fn save(&mut self) -> Result<(), SessionError> {
        let job = self.begin_crop()?;
        let result = job.run();
        self.finish(result)
    }

    /// Dismiss without saving. Any in-flight result will be discarded.
    pub fn cancel(&mut self) {
        if self.status == SessionStatus::Done {
            return;
        }
        self.status = SessionStatus::Done;
        self.on_complete = None;
        if let Some(on_cancel) = self.on_cancel.take() {
            on_cancel();
        }
        debug!("crop session cancelled");
    }
}
