//! Browser-side image source and sink.
//!
//! The browser decodes images itself (via `<img>` + canvas), so the source is
//! just a canvas `ImageData`. Saving goes through a JS callback that receives
//! `(imageData, name, description)` and may throw to report failure.

use retouch_core::{
    buffer_from_samples, ImageSink, ImageSource, LoadError, PixelBuffer, SaveError, SaveReceipt,
    SaveRequest,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::ImageData;

use crate::types::image_data_from;

/// Reads pixels out of canvas `ImageData`.
///
/// `ImageData` whose buffer was transferred away reads as empty and fails with
/// `LoadError::Undecodable`.
pub(crate) struct ImageDataSource;

impl ImageSource for ImageDataSource {
    type Handle = ImageData;

    fn load(&mut self, handle: &ImageData) -> Result<PixelBuffer, LoadError> {
        buffer_from_samples(handle.width(), handle.height(), handle.data().0)
    }
}

/// Hands finished images to a JS callback.
pub(crate) struct CallbackSink<'a> {
    callback: &'a js_sys::Function,
}

impl<'a> CallbackSink<'a> {
    pub(crate) fn new(callback: &'a js_sys::Function) -> Self {
        Self { callback }
    }
}

impl ImageSink for CallbackSink<'_> {
    fn save(
        &mut self,
        image: &PixelBuffer,
        request: &SaveRequest,
    ) -> Result<SaveReceipt, SaveError> {
        let data = image_data_from(image).map_err(|e| SaveError::Rejected(describe(&e)))?;
        let location = self
            .callback
            .call3(
                &JsValue::NULL,
                &data,
                &JsValue::from_str(&request.name),
                &JsValue::from_str(&request.description),
            )
            .map_err(|e| SaveError::Io(describe(&e)))?;

        Ok(SaveReceipt {
            location: location.as_string().unwrap_or_else(|| request.name.clone()),
        })
    }
}

/// Request named after the current JS clock.
pub(crate) fn timestamped_request() -> SaveRequest {
    SaveRequest::timestamped(js_sys::Date::now() as u64)
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}
