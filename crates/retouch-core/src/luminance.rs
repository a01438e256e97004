//! Perceptual luma weights used for desaturation.
//!
//! These are the BT.709 coefficients rounded to three decimals, which is what
//! common color-matrix saturation filters use. Keeping the rounded values
//! means grayscale output matches those filters exactly.

/// Luma weight for the red channel.
pub const LUMA_R: f32 = 0.213;

/// Luma weight for the green channel.
pub const LUMA_G: f32 = 0.715;

/// Luma weight for the blue channel.
pub const LUMA_B: f32 = 0.072;

/// Luma of a u8 RGB triple, in 0.0..=255.0.
///
/// Reference value for checking matrix output.
#[cfg(test)]
pub(crate) fn luma(r: u8, g: u8, b: u8) -> f32 {
    LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32
}

/// Luma of a u8 RGB triple, rounded to the nearest u8.
#[cfg(test)]
pub(crate) fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    luma(r, g, b).clamp(0.0, 255.0).round() as u8
}
