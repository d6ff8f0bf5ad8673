//! WASM bindings for an interactive crop session.
//!
//! Gesture handlers in the web UI forward their numeric deltas here, the
//! layout code reports the displayed image size, and `save()` produces the
//! cropped image through the `onComplete` callback.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const config = { maskRadius: 120, cropImageCircular: true };
//! const session = new JsCropSession(image, 1, 'circle', config,
//!   (result: JsRasterImage | null) => showResult(result),
//!   () => closeEditor(),
//!   null,
//! );
//! // Fit image_width x image_height into the view, then:
//! session.update_mask_dimensions(img.clientWidth, img.clientHeight);
//! // pinch / pan / rotate while the gesture runs, then:
//! session.end_gesture();
//! session.save();
//! ```

use cropframe_core::{
    ConfigError, CropConfiguration, CropSession, MaskShape, RasterImage, SessionStatus,
    Size, SourceImage, Vector,
};
use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::types::JsRasterImage;

/// JavaScript-accessible crop session.
#[wasm_bindgen]
pub struct JsCropSession {
    inner: CropSession,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Start a crop session.
    ///
    /// # Arguments
    /// * `image` - Source image (RGBA)
    /// * `orientation` - EXIF orientation tag of the source (1 = upright)
    /// * `mask_shape` - `"circle"`, `"square"` or `"rectangle"`
    /// * `config` - Configuration record; `undefined`/`null` uses defaults
    /// * `on_complete` - Called once with a `JsRasterImage` or `null`
    /// * `on_cancel` - Optional, called when the session is dismissed
    /// * `on_mask_geometry` - Optional, called with `{x, y, width, height}` after each layout pass
    ///
    /// # Errors
    /// Returns error if the shape is unknown or the configuration is invalid
    #[wasm_bindgen(constructor)]
    pub fn new(
        image: &JsRasterImage,
        orientation: u8,
        mask_shape: &str,
        config: JsValue,
        on_complete: js_sys::Function,
        on_cancel: Option<js_sys::Function>,
        on_mask_geometry: Option<js_sys::Function>,
    ) -> Result<JsCropSession, JsValue> {
        let config: CropConfiguration = if config.is_undefined() || config.is_null() {
            CropConfiguration::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid crop configuration: {}", e)))?
        };

        let mut inner = build_session(
            image.to_source(orientation),
            mask_shape,
            &config,
            move |result: Option<RasterImage>| {
                let value = match result {
                    Some(img) => JsValue::from(JsRasterImage::from_raster(img)),
                    None => JsValue::NULL,
                };
                if let Err(err) = on_complete.call1(&JsValue::NULL, &value) {
                    debug!(error = ?err, "onComplete callback threw");
                }
            },
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        if let Some(callback) = on_cancel {
            inner = inner.with_cancel_handler(move || {
                if let Err(err) = callback.call0(&JsValue::NULL) {
                    debug!(error = ?err, "onCancel callback threw");
                }
            });
        }
        if let Some(callback) = on_mask_geometry {
            inner = inner.with_mask_geometry_handler(move |frame| {
                let result = serde_wasm_bindgen::to_value(&frame)
                    .map_err(JsValue::from)
                    .and_then(|value| callback.call1(&JsValue::NULL, &value));
                if let Err(err) = result {
                    debug!(error = ?err, "onMaskGeometry callback failed");
                }
            });
        }

        Ok(JsCropSession { inner })
    }

    /// Report the displayed (fit) size of the image after layout.
    pub fn update_mask_dimensions(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.inner
            .update_mask_dimensions(Size::new(width, height))
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Pinch magnitude since the gesture began (1.0 = unchanged).
    pub fn pinch(&mut self, magnitude: f64) {
        self.inner.pinch(magnitude);
    }

    /// Drag translation since the gesture began.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.inner.pan(Vector::new(dx, dy));
    }

    /// Rotation in degrees since the gesture began.
    pub fn rotate(&mut self, degrees: f64) {
        self.inner.rotate(degrees);
    }

    pub fn end_gesture(&mut self) {
        self.inner.end_gesture();
    }

    pub fn rotate_left(&mut self) {
        self.inner.rotate_left();
    }

    pub fn rotate_right(&mut self) {
        self.inner.rotate_right();
    }

    pub fn reset_rotation(&mut self) {
        self.inner.reset_rotation();
    }

    pub fn can_reset_rotation(&self) -> bool {
        self.inner.can_reset_rotation()
    }

    /// Width of the source as displayed, after its orientation tag is applied.
    #[wasm_bindgen(getter)]
    pub fn image_width(&self) -> u32 {
        self.inner.source().oriented_dimensions().0
    }

    /// Height of the source as displayed, after its orientation tag is applied.
    #[wasm_bindgen(getter)]
    pub fn image_height(&self) -> u32 {
        self.inner.source().oriented_dimensions().1
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.state().scale()
    }

    #[wasm_bindgen(getter)]
    pub fn offset_x(&self) -> f64 {
        self.inner.state().offset().x
    }

    #[wasm_bindgen(getter)]
    pub fn offset_y(&self) -> f64 {
        self.inner.state().offset().y
    }

    /// Current rotation in degrees.
    #[wasm_bindgen(getter)]
    pub fn angle(&self) -> f64 {
        self.inner.state().angle()
    }

    #[wasm_bindgen(getter)]
    pub fn mask_width(&self) -> f64 {
        self.inner.state().mask_size().width
    }

    #[wasm_bindgen(getter)]
    pub fn mask_height(&self) -> f64 {
        self.inner.state().mask_size().height
    }

    /// `"idle"`, `"cropping"` or `"done"`.
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        status_name(self.inner.status()).to_string()
    }

    /// Crop synchronously and deliver the result through `onComplete`.
    ///
    /// # Errors
    /// Returns error if the layout is unknown or the session already finished
    pub fn save(&mut self) -> Result<(), JsValue> {
        self.inner
            .save()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Dismiss without saving.
    pub fn cancel(&mut self) {
        self.inner.cancel();
    }
}

fn build_session(
    source: SourceImage,
    mask_shape: &str,
    config: &CropConfiguration,
    on_complete: impl FnOnce(Option<RasterImage>) + 'static,
) -> Result<CropSession, ConfigError> {
    let shape: MaskShape = mask_shape.parse()?;
    CropSession::new(source, shape, config, on_complete)
}

fn status_name(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Idle => "idle",
        SessionStatus::Cropping => "cropping",
        SessionStatus::Done => "done",
    }
}


/// WASM-specific tests that require JsValue.
///
/// These tests construct sessions through the JavaScript-facing constructor and
/// can only run on wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn image() -> JsRasterImage {
        JsRasterImage::new(100, 100, vec![255u8; 100 * 100 * 4])
    }

    fn noop() -> js_sys::Function {
        js_sys::Function::new_no_args("")
    }

    #[wasm_bindgen_test]
    fn test_constructor_with_default_config() {
        let session =
            JsCropSession::new(&image(), 1, "square", JsValue::UNDEFINED, noop(), None, None);
        assert!(session.is_ok());
        assert_eq!(session.unwrap().status(), "idle");
    }

    #[wasm_bindgen_test]
    fn test_constructor_rejects_bad_config() {
        let config = serde_wasm_bindgen::to_value(&"not a config").unwrap();
        let session = JsCropSession::new(&image(), 1, "square", config, noop(), None, None);
        assert!(session.is_err());
    }

    #[wasm_bindgen_test]
    fn test_save_flow() {
        let mut config = CropConfiguration::default();
        config.mask_radius = 25.0;
        let config = serde_wasm_bindgen::to_value(&config).unwrap();
        let mut session = JsCropSession::new(
            &image(),
            1,
            "circle",
            config,
            noop(),
            Some(noop()),
            Some(noop()),
        )
        .unwrap();

        assert!(session.save().is_err(), "save before layout must fail");
        session.update_mask_dimensions(100.0, 100.0).unwrap();
        assert_eq!(session.mask_width(), 50.0);
        session.save().unwrap();
        assert_eq!(session.status(), "done");
    }

    #[wasm_bindgen_test]
    fn test_throwing_callbacks_are_contained() {
        let throws = || js_sys::Function::new_no_args("throw new Error('callback failed')");
        let mut session = JsCropSession::new(
            &image(),
            1,
            "square",
            JsValue::UNDEFINED,
            throws(),
            Some(throws()),
            Some(throws()),
        )
        .unwrap();

        session.update_mask_dimensions(100.0, 100.0).unwrap();
        session.cancel();
        assert_eq!(session.status(), "done");
    }

    #[wasm_bindgen_test]
    fn test_image_size_follows_orientation() {
        let wide = JsRasterImage::new(100, 50, vec![255u8; 100 * 50 * 4]);
        let session =
            JsCropSession::new(&wide, 6, "square", JsValue::UNDEFINED, noop(), None, None).unwrap();
        assert_eq!((session.image_width(), session.image_height()), (50, 100));
    }
}
