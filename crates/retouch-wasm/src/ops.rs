//! Standalone operations on a single image.
//!
//! These mirror the session methods but take and return `JsPixelBuffer`s, for
//! hosts that manage image state themselves.

use retouch_core::{
    apply_color_matrix, box_blur, crop_to_selection, merge_vertical, ColorMatrix, CropScaling,
    DisplaySize, SelectionRect,
};
use wasm_bindgen::prelude::*;

use crate::types::{filter_from_u8, radius_from_i32, JsPixelBuffer};

/// Crop to a drag selection made on a view of `display_width x display_height`.
///
/// `precise` scales the selection before truncating instead of after.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn crop(
    image: &JsPixelBuffer,
    start_x: f32,
    start_y: f32,
    end_x: f32,
    end_y: f32,
    display_width: f32,
    display_height: f32,
    precise: bool,
) -> JsPixelBuffer {
    let scaling = if precise {
        CropScaling::ScaleThenTruncate
    } else {
        CropScaling::TruncateThenScale
    };
    let rect = SelectionRect::new(start_x, start_y, end_x, end_y);
    let display = DisplaySize::new(display_width, display_height);
    JsPixelBuffer::from_buffer(crop_to_selection(image.buffer(), &rect, display, scaling))
}

/// Scale uniformly. `filter`: 0 = nearest, 1 = bilinear, 2 = lanczos3.
#[wasm_bindgen]
pub fn resize(image: &JsPixelBuffer, scale: f64, filter: u8) -> JsPixelBuffer {
    JsPixelBuffer::from_buffer(retouch_core::resize(
        image.buffer(),
        scale,
        filter_from_u8(filter),
    ))
}

#[wasm_bindgen]
pub fn grayscale(image: &JsPixelBuffer) -> JsPixelBuffer {
    with_matrix(image, &ColorMatrix::grayscale())
}

#[wasm_bindgen]
pub fn sepia(image: &JsPixelBuffer) -> JsPixelBuffer {
    with_matrix(image, &ColorMatrix::sepia())
}

#[wasm_bindgen]
pub fn negative(image: &JsPixelBuffer) -> JsPixelBuffer {
    with_matrix(image, &ColorMatrix::negative())
}

#[wasm_bindgen]
pub fn brightness(image: &JsPixelBuffer, delta: i32) -> JsPixelBuffer {
    with_matrix(image, &ColorMatrix::brightness(delta))
}

#[wasm_bindgen]
pub fn contrast(image: &JsPixelBuffer, amount: f32) -> JsPixelBuffer {
    with_matrix(image, &ColorMatrix::contrast(amount))
}

/// Apply a 20-element row-major 4x5 color matrix.
#[wasm_bindgen]
pub fn color_matrix(image: &JsPixelBuffer, values: &[f32]) -> Result<JsPixelBuffer, JsValue> {
    let values: [f32; 20] = values.try_into().map_err(|_| {
        JsValue::from_str(&format!(
            "Color matrix needs 20 values, got {}",
            values.len()
        ))
    })?;
    Ok(with_matrix(image, &ColorMatrix::from_array(values)))
}

/// Box blur; a radius of 0 or less returns an unchanged copy.
#[wasm_bindgen]
pub fn blur(image: &JsPixelBuffer, radius: i32) -> JsPixelBuffer {
    JsPixelBuffer::from_buffer(box_blur(image.buffer(), radius_from_i32(radius)))
}

/// Stack `top` above `bottom` on a white canvas.
#[wasm_bindgen]
pub fn merge(top: &JsPixelBuffer, bottom: &JsPixelBuffer) -> JsPixelBuffer {
    JsPixelBuffer::from_buffer(merge_vertical(top.buffer(), bottom.buffer()))
}

fn with_matrix(image: &JsPixelBuffer, matrix: &ColorMatrix) -> JsPixelBuffer {
    JsPixelBuffer::from_buffer(apply_color_matrix(image.buffer(), matrix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use retouch_core::PixelBuffer;

    /// Create a simple test image.
    fn test_image(width: u32, height: u32) -> JsPixelBuffer {
        let pixels: Vec<u8> = (0..(width * height * 4) as usize)
            .map(|i| if i % 4 == 3 { 255 } else { (i % 256) as u8 })
            .collect();
        JsPixelBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_crop_precise_flag() {
        let img = test_image(40, 40);
        let legacy = crop(&img, 0.0, 0.0, 10.9, 10.9, 20.0, 20.0, false);
        let precise = crop(&img, 0.0, 0.0, 10.9, 10.9, 20.0, 20.0, true);
        assert_eq!(legacy.width(), 20);
        assert_eq!(precise.width(), 21);
    }

    #[test]
    fn test_resize() {
        let img = test_image(30, 20);
        let result = resize(&img, 0.5, 1);
        assert_eq!((result.width(), result.height()), (15, 10));
    }

    #[test]
    fn test_negative_twice() {
        let img = test_image(8, 8);
        assert_eq!(negative(&negative(&img)).pixels(), img.pixels());
    }

    #[test]
    fn test_color_matrix_identity() {
        let img = test_image(5, 5);
        let identity: [f32; 20] = [
            1.0, 0.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ];
        assert_eq!(color_matrix(&img, &identity).unwrap().pixels(), img.pixels());
    }

    #[test]
    fn test_blur_keeps_dimensions() {
        let img = test_image(20, 15);
        let result = blur(&img, 3);
        assert_eq!((result.width(), result.height()), (20, 15));
    }

    #[test]
    fn test_merge() {
        let top = JsPixelBuffer::from_buffer(PixelBuffer::filled(3, 2, [0, 0, 0, 255]).unwrap());
        let bottom = test_image(5, 4);
        let merged = merge(&top, &bottom);
        assert_eq!((merged.width(), merged.height()), (5, 6));
    }

    #[test]
    fn test_brightness_and_contrast() {
        let img = JsPixelBuffer::from_buffer(PixelBuffer::filled(2, 2, [100, 100, 100, 255]).unwrap());
        assert_eq!(brightness(&img, 30).pixels()[..4], [130, 130, 130, 255]);
        assert_eq!(contrast(&img, -100.0).pixels()[..4], [128, 128, 128, 255]);
        assert_eq!(sepia(&img).pixels()[3], 255);
        assert_eq!(grayscale(&img).pixels()[..4], [100, 100, 100, 255]);
    }
}
