//! Cropping by a selection rectangle.
//!
//! Selections come from a pointer drag over a display surface, so their
//! coordinates live in that surface's space. The surface is usually a
//! fit-to-view rendering of the image, which means display and pixel
//! dimensions differ and the selection has to be rescaled first.
//!
//! # Example
//!
//! ```ignore
//! // A 400x300 image shown on a 200x150 view; drag from (10, 10) to (60, 40)
//! let rect = SelectionRect::new(10.0, 10.0, 60.0, 40.0);
//! let display = DisplaySize::new(200.0, 150.0);
//! let cropped = crop_to_selection(&image, &rect, display, CropScaling::default());
//! assert_eq!(cropped.dimensions(), (100, 60));
//! ```

use serde::{Deserialize, Serialize};

use crate::PixelBuffer;

/// A dragged selection in display coordinates.
///
/// Start and end may be given in any order; the crop uses the rectangle they span.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionRect {
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
}

impl SelectionRect {
    pub fn new(start_x: f32, start_y: f32, end_x: f32, end_y: f32) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }
}

/// Size of the surface the selection was made on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

impl DisplaySize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Order in which display coordinates are truncated and rescaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CropScaling {
    /// Truncate each display value to a whole number, then scale by the exact
    /// image/display ratio and truncate again. Loses up to one display pixel
    /// of the selection.
    #[default]
    TruncateThenScale,
    /// Scale the exact display value, then truncate once.
    ScaleThenTruncate,
}

impl CropScaling {
    #[inline]
    fn to_pixels(self, value: f32, scale: f32) -> i64 {
        match self {
            CropScaling::TruncateThenScale => ((value as i64) as f32 * scale) as i64,
            CropScaling::ScaleThenTruncate => (value * scale) as i64,
        }
    }
}

/// Crop an image to a selection made on a display surface.
///
/// # Arguments
///
/// * `image` - Source image
/// * `rect` - Selection in display coordinates
/// * `view` - Dimensions of the display surface at selection time
/// * `scaling` - Truncation order used when mapping into pixel space
///
/// # Behavior
///
/// - The origin is clamped into the image; width/height are clamped so the
///   region stays inside it
/// - A selection that clamps to zero area returns an unchanged copy
/// - A zero or non-finite display size returns an unchanged copy
pub fn crop_to_selection(
    image: &PixelBuffer,
    rect: &SelectionRect,
    view: DisplaySize,
    scaling: CropScaling,
) -> PixelBuffer {
    if !view.is_usable() {
        tracing::warn!(?view, "ignoring crop against unusable display size");
        return image.clone();
    }

    let scale_x = image.width() as f32 / view.width;
    let scale_y = image.height() as f32 / view.height;

    let x = scaling.to_pixels(rect.start_x.min(rect.end_x), scale_x);
    let y = scaling.to_pixels(rect.start_y.min(rect.end_y), scale_y);
    let w = scaling.to_pixels((rect.end_x - rect.start_x).abs(), scale_x);
    let h = scaling.to_pixels((rect.end_y - rect.start_y).abs(), scale_y);

    crop_region(image, x, y, w, h)
}

/// Copy a pixel-space region out of an image.
///
/// `x`/`y` are clamped to `[0, width-1]`/`[0, height-1]`, then `w`/`h` are
/// clamped to what remains of the image past that origin. If either extent
/// ends up `<= 0` the image is returned unchanged.
pub fn crop_region(image: &PixelBuffer, x: i64, y: i64, w: i64, h: i64) -> PixelBuffer {
    let img_w = image.width() as i64;
    let img_h = image.height() as i64;

    let x = x.clamp(0, img_w - 1);
    let y = y.clamp(0, img_h - 1);
    let w = w.min(img_w - x);
    let h = h.min(img_h - y);

    if w <= 0 || h <= 0 {
        return image.clone();
    }

    // Fast path: the region covers the whole image
    if w == img_w && h == img_h {
        return image.clone();
    }

    let (x, y, w, h) = (x as usize, y as usize, w as usize, h as usize);
    let src_stride = image.stride();
    let dst_stride = w * crate::buffer::CHANNELS;
    let src = image.as_raw();

    let mut output = Vec::with_capacity(dst_stride * h);
    for row in y..y + h {
        let start = row * src_stride + x * crate::buffer::CHANNELS;
        output.extend_from_slice(&src[start..start + dst_stride]);
    }

    PixelBuffer::from_parts(w as u32, h as u32, output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
