//! Editing session bindings.
//!
//! `JsEditingSession` owns one core `EditingSession`. Every editing method
//! throws a string error (`"No image loaded"`, ...) instead of returning a
//! status, and leaves the session untouched when it does.
//!
//! # Example
//!
//! ```typescript
//! const session = new JsEditingSession();
//! session.load_image_data(ctx.getImageData(0, 0, w, h));
//! session.sepia();
//! session.blur_default();
//! ctx.putImageData(session.working_image_data(), 0, 0);
//! ```

use retouch_core::{
    ColorPreset, DisplaySize, EditOperation, EditingSession, EditorConfig, SelectionRect,
};
use wasm_bindgen::prelude::*;
use web_sys::ImageData;

use crate::io::{timestamped_request, CallbackSink, ImageDataSource};
use crate::types::{image_data_from, radius_from_i32, JsPixelBuffer};
use crate::to_js_error;

/// A single-image editing session.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsEditingSession {
    inner: EditingSession,
}

#[wasm_bindgen]
impl JsEditingSession {
    /// Create an empty session with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session from a config object, e.g.
    /// `{ blur_radius: 3, crop_scaling: "ScaleThenTruncate" }`.
    /// Missing fields take their defaults.
    pub fn with_config(config: JsValue) -> Result<JsEditingSession, JsValue> {
        let config: EditorConfig = serde_wasm_bindgen::from_value(config).map_err(to_js_error)?;
        Ok(Self {
            inner: EditingSession::with_config(config),
        })
    }

    /// Whether a primary image is loaded.
    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.working().is_some()
    }

    /// Whether a second image is loaded for merging.
    #[wasm_bindgen(getter)]
    pub fn has_secondary(&self) -> bool {
        self.inner.secondary().is_some()
    }

    /// Start editing `image`.
    pub fn load_primary(&mut self, image: &JsPixelBuffer) {
        self.inner.load_primary(image.buffer().clone());
    }

    /// Set the image to merge below the working image.
    pub fn load_secondary(&mut self, image: &JsPixelBuffer) {
        self.inner.load_secondary(image.buffer().clone());
    }

    /// Start editing the pixels of a canvas `ImageData`.
    pub fn load_image_data(&mut self, data: &ImageData) -> Result<(), JsValue> {
        self.inner
            .load_primary_from(&mut ImageDataSource, data)
            .map_err(to_js_error)
    }

    /// Load canvas `ImageData` as the second image for merging.
    pub fn load_secondary_image_data(&mut self, data: &ImageData) -> Result<(), JsValue> {
        self.inner
            .load_secondary_from(&mut ImageDataSource, data)
            .map_err(to_js_error)
    }

    /// Crop to a drag selection made on a view of `display_width x display_height`.
    pub fn crop(
        &mut self,
        start_x: f32,
        start_y: f32,
        end_x: f32,
        end_y: f32,
        display_width: f32,
        display_height: f32,
    ) -> Result<(), JsValue> {
        let rect = SelectionRect::new(start_x, start_y, end_x, end_y);
        let display = DisplaySize::new(display_width, display_height);
        self.inner.crop(&rect, display).map_err(to_js_error)
    }

    /// Scale by `scale` (0.5 halves, 1.5 enlarges).
    pub fn resize(&mut self, scale: f64) -> Result<(), JsValue> {
        self.inner.resize(scale).map_err(to_js_error)
    }

    pub fn grayscale(&mut self) -> Result<(), JsValue> {
        self.filter(ColorPreset::Grayscale)
    }

    pub fn sepia(&mut self) -> Result<(), JsValue> {
        self.filter(ColorPreset::Sepia)
    }

    pub fn negative(&mut self) -> Result<(), JsValue> {
        self.filter(ColorPreset::Negative)
    }

    /// Add `delta` to R, G and B (negative darkens).
    pub fn brightness(&mut self, delta: i32) -> Result<(), JsValue> {
        self.inner.adjust_brightness(delta).map_err(to_js_error)
    }

    /// One configured brightness step up.
    pub fn brighten(&mut self) -> Result<(), JsValue> {
        self.brightness(self.inner.config().brightness_step)
    }

    /// One configured brightness step down.
    pub fn darken(&mut self) -> Result<(), JsValue> {
        self.brightness(self.inner.config().brightness_step.saturating_neg())
    }

    /// Contrast as a percentage (-100 flattens to mid-gray).
    pub fn contrast(&mut self, amount: f32) -> Result<(), JsValue> {
        self.filter(ColorPreset::Contrast { amount })
    }

    /// Saturation factor (0 = grayscale, 1 = unchanged).
    pub fn saturation(&mut self, amount: f32) -> Result<(), JsValue> {
        self.filter(ColorPreset::Saturation { amount })
    }

    /// Box blur; a radius of 0 or less leaves the image unchanged.
    pub fn blur(&mut self, radius: i32) -> Result<(), JsValue> {
        self.inner.blur(radius_from_i32(radius)).map_err(to_js_error)
    }

    /// Box blur with the configured radius.
    pub fn blur_default(&mut self) -> Result<(), JsValue> {
        self.inner.blur_default().map_err(to_js_error)
    }

    /// Stack the second image below the working image.
    pub fn merge(&mut self) -> Result<(), JsValue> {
        self.inner.merge().map_err(to_js_error)
    }

    /// Discard all edits.
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.inner.reset().map_err(to_js_error)
    }

    /// Apply an operation object, e.g. `{ op: "blur", radius: 5 }` or
    /// `{ op: "filter", preset: { kind: "sepia" } }`.
    pub fn apply(&mut self, op: JsValue) -> Result<(), JsValue> {
        let op: EditOperation = serde_wasm_bindgen::from_value(op).map_err(to_js_error)?;
        self.inner.apply(&op).map_err(to_js_error)
    }

    /// A copy of the working image, if any.
    pub fn working(&self) -> Option<JsPixelBuffer> {
        self.inner.working().cloned().map(JsPixelBuffer::from_buffer)
    }

    /// The working image as `ImageData`, ready for `putImageData`.
    pub fn working_image_data(&self) -> Result<ImageData, JsValue> {
        let working = self
            .inner
            .working()
            .ok_or_else(|| to_js_error(retouch_core::SessionError::NoImageLoaded))?;
        image_data_from(working)
    }

    /// Save the working image through `callback(imageData, name, description)`.
    ///
    /// The name is `IMG_<millis>`. Returns whatever string the callback
    /// returns (a URL, say), or the name if it returns nothing.
    pub fn save(&self, callback: &js_sys::Function) -> Result<String, JsValue> {
        let mut sink = CallbackSink::new(callback);
        self.inner
            .save_to(&mut sink, &timestamped_request())
            .map(|receipt| receipt.location)
            .map_err(to_js_error)
    }
}

impl JsEditingSession {
    fn filter(&mut self, preset: ColorPreset) -> Result<(), JsValue> {
        self.inner.apply_filter(preset).map_err(to_js_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retouch_core::PixelBuffer;

    fn image(width: u32, height: u32, color: [u8; 4]) -> JsPixelBuffer {
        JsPixelBuffer::from_buffer(PixelBuffer::filled(width, height, color).unwrap())
    }

    #[test]
    fn test_new_session_has_no_image() {
        let session = JsEditingSession::new();
        assert!(!session.has_image());
        assert!(!session.has_secondary());
        assert!(session.working().is_none());
    }

    #[test]
    fn test_filters_apply_to_working() {
        let mut session = JsEditingSession::new();
        session.load_primary(&image(4, 4, [255, 0, 0, 255]));

        session.negative().unwrap();
        assert_eq!(session.working().unwrap().pixels()[..4], [0, 255, 255, 255]);

        session.reset().unwrap();
        session.grayscale().unwrap();
        assert_eq!(session.working().unwrap().pixels()[..4], [54, 54, 54, 255]);
    }

    #[test]
    fn test_brighten_and_darken_use_step() {
        let mut session = JsEditingSession::new();
        session.load_primary(&image(2, 2, [100, 100, 100, 255]));

        session.brighten().unwrap();
        assert_eq!(session.working().unwrap().pixels()[..4], [130, 130, 130, 255]);
        session.darken().unwrap();
        session.darken().unwrap();
        assert_eq!(session.working().unwrap().pixels()[..4], [70, 70, 70, 255]);
    }

    #[test]
    fn test_darken_with_extreme_step_saturates() {
        let mut session = JsEditingSession {
            inner: EditingSession::with_config(EditorConfig {
                brightness_step: i32::MIN,
                ..EditorConfig::default()
            }),
        };
        session.load_primary(&image(2, 2, [100, 100, 100, 255]));

        session.darken().unwrap();
        assert_eq!(session.working().unwrap().pixels()[..4], [255, 255, 255, 255]);
        session.brighten().unwrap();
        assert_eq!(session.working().unwrap().pixels()[..4], [0, 0, 0, 255]);
    }

    #[test]
    fn test_crop_resize_merge() {
        let mut session = JsEditingSession::new();
        session.load_primary(&image(40, 20, [10, 20, 30, 255]));
        session.load_secondary(&image(10, 10, [0, 0, 0, 255]));

        session.crop(0.0, 0.0, 10.0, 5.0, 20.0, 10.0).unwrap();
        assert_eq!(session.working().unwrap().width(), 20);
        assert_eq!(session.working().unwrap().height(), 10);

        session.resize(0.5).unwrap();
        session.merge().unwrap();
        let merged = session.working().unwrap();
        assert_eq!((merged.width(), merged.height()), (10, 15));
    }

    #[test]
    fn test_negative_blur_radius_is_noop() {
        let mut session = JsEditingSession::new();
        let mut buffer = PixelBuffer::filled(12, 12, [0, 0, 0, 255]).unwrap();
        buffer.put_pixel(6, 6, [255, 255, 255, 255]);
        session.load_primary(&JsPixelBuffer::from_buffer(buffer.clone()));

        session.blur(-4).unwrap();
        assert_eq!(session.working().unwrap().pixels(), buffer.as_raw());
    }
}
