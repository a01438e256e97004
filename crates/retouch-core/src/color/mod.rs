//! Color transform engine.
//!
//! All color filters are expressed as a 4x5 [`ColorMatrix`] applied per pixel.
//! [`ColorPreset`] names the filters an editor exposes so they can be passed
//! around as data (from a host UI or a serialized edit list).

mod apply;
mod matrix;

use serde::{Deserialize, Serialize};

pub use apply::apply_color_matrix;
pub use matrix::ColorMatrix;

/// A named color filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorPreset {
    /// Luminance-preserving desaturation
    Grayscale,
    /// Warm brown tone
    Sepia,
    /// Inverted RGB
    Negative,
    /// Constant offset on RGB (negative darkens)
    Brightness { delta: i32 },
    /// Percentage stretch around mid-gray (-100..)
    Contrast { amount: f32 },
    /// Saturation factor (0 = grayscale, 1 = unchanged)
    Saturation { amount: f32 },
}

impl ColorPreset {
    /// The matrix implementing this preset.
    pub fn matrix(&self) -> ColorMatrix {
        match *self {
            ColorPreset::Grayscale => ColorMatrix::grayscale(),
            ColorPreset::Sepia => ColorMatrix::sepia(),
            ColorPreset::Negative => ColorMatrix::negative(),
            ColorPreset::Brightness { delta } => ColorMatrix::brightness(delta),
            ColorPreset::Contrast { amount } => ColorMatrix::contrast(amount),
            ColorPreset::Saturation { amount } => ColorMatrix::saturation(amount),
        }
    }
}
