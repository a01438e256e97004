//! Retouch WASM - WebAssembly bindings for Retouch
//!
//! This crate provides WASM bindings to expose the retouch-core editing engine
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `session` - `JsEditingSession`, the stateful editor (load, edit, reset, save)
//! - `ops` - Standalone crop/resize/filter/blur/merge functions
//! - `types` - WASM-compatible wrapper types for image data
//! - `io` - Canvas `ImageData` source and callback sink
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditingSession } from '@retouch/wasm';
//!
//! await init();
//!
//! const session = new JsEditingSession();
//! session.load_image_data(ctx.getImageData(0, 0, canvas.width, canvas.height));
//! session.apply({ op: "filter", preset: { kind: "grayscale" } });
//! ctx.putImageData(session.working_image_data(), 0, 0);
//! ```

use std::fmt::Display;

use wasm_bindgen::prelude::*;

mod io;
mod ops;
mod session;
mod types;

// Re-export public types
pub use ops::{
    blur, brightness, color_matrix, contrast, crop, grayscale, merge, negative, resize, sepia,
};
pub use session::JsEditingSession;
pub use types::JsPixelBuffer;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert a Rust error into a JS exception value, logging it to the console.
pub(crate) fn to_js_error(err: impl Display) -> JsValue {
    let message = JsValue::from_str(&err.to_string());
    web_sys::console::warn_1(&message);
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn image_data_round_trip() {
        let img = JsPixelBuffer::new(2, 1, vec![1, 2, 3, 255, 4, 5, 6, 255]).unwrap();
        let data = img.to_image_data().unwrap();
        let back = JsPixelBuffer::from_image_data(&data).unwrap();
        assert_eq!(back.pixels(), img.pixels());
    }

    #[wasm_bindgen_test]
    fn session_reports_missing_image() {
        let mut session = JsEditingSession::new();
        let err = session.sepia().unwrap_err();
        assert_eq!(err.as_string().as_deref(), Some("No image loaded"));
    }
}
