//! Cropframe WASM - WebAssembly bindings for the crop engine
//!
//! This crate exposes cropframe-core to JavaScript/TypeScript so a web crop
//! widget can drive the transform model from its gesture handlers and get the
//! cropped RGBA image back.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `session` - Interactive crop session bindings
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession, JsRasterImage } from '@cropframe/wasm';
//!
//! await init();
//!
//! const data = ctx.getImageData(0, 0, w, h).data;
//! const image = new JsRasterImage(w, h, new Uint8Array(data.buffer));
//! const session = new JsCropSession(image, 1, 'square', {}, onDone, null, null);
//! ```

use wasm_bindgen::prelude::*;

mod session;
mod types;

// Re-export public types
pub use session::JsCropSession;
pub use types::JsRasterImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
