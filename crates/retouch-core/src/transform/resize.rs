//! Uniform scaling by a factor.
//!
//! Resampling is delegated to `image::imageops::resize`. The default bilinear
//! filter gives the smooth result a filtered affine scale produces, rather than
//! blocky nearest-neighbor output.

use image::{ImageBuffer, Rgba};
use serde::{Deserialize, Serialize};

use crate::PixelBuffer;

/// Filter type for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, smooth).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, sharpest).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Largest width or height [`resize`] will produce.
pub const MAX_DIMENSION: u32 = 32_768;

/// Largest pixel count [`resize`] will produce (256 MiB of RGBA).
pub const MAX_PIXELS: u64 = 1 << 26;

/// Compute the output dimensions for a scale factor.
///
/// Each dimension is `round(dim * scale)`, never less than 1. Returns `None`
/// when `scale` is not a finite positive number, or when the result would
/// exceed [`MAX_DIMENSION`] on a side or [`MAX_PIXELS`] in total.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> Option<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let scale_dim = |dim: u32| {
        let scaled = (dim as f64 * scale).round().max(1.0);
        (scaled <= MAX_DIMENSION as f64).then_some(scaled as u32)
    };
    let (w, h) = (scale_dim(width)?, scale_dim(height)?);
    (w as u64 * h as u64 <= MAX_PIXELS).then_some((w, h))
}

/// Scale an image uniformly by `scale`.
///
/// # Arguments
///
/// * `image` - The source image
/// * `scale` - Positive scale factor (0.5 halves, 1.5 enlarges by half)
/// * `filter` - Interpolation filter to use
///
/// # Returns
///
/// A new `PixelBuffer` of [`scaled_dimensions`]. A non-positive or non-finite
/// scale, or one whose output would exceed the size caps, leaves the image
/// unchanged.
pub fn resize(image: &PixelBuffer, scale: f64, filter: FilterType) -> PixelBuffer {
    let Some((width, height)) = scaled_dimensions(image.width(), image.height(), scale) else {
        tracing::warn!(
            scale,
            width = image.width(),
            height = image.height(),
            "ignoring resize with unusable scale"
        );
        return image.clone();
    };

    // Fast path: if dimensions match, just clone
    if (width, height) == image.dimensions() {
        return image.clone();
    }

    let Some(view) =
        ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(image.width(), image.height(), image.as_raw())
    else {
        return image.clone();
    };

    let resized = image::imageops::resize(&view, width, height, filter.to_image_filter());
    PixelBuffer::from_parts(width, height, resized.into_raw())
}
