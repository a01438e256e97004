//! The 4x5 affine color matrix and its named presets.
//!
//! Row `c` of the matrix produces output channel `c` (R, G, B, A):
//!
//! ```text
//! out_c = m[c][0]*R + m[c][1]*G + m[c][2]*B + m[c][3]*A + m[c][4]
//! ```
//!
//! Results are clamped to 0..=255 and rounded. Every filter in the editor
//! (grayscale, sepia, negative, brightness, contrast, saturation) is one of
//! these matrices; none of them has a dedicated code path.

use serde::{Deserialize, Serialize};

use crate::luminance::{LUMA_B, LUMA_G, LUMA_R};

/// A 4x5 affine color transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorMatrix {
    rows: [[f32; 5]; 4],
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorMatrix {
    /// Create a matrix from its four rows.
    pub const fn new(rows: [[f32; 5]; 4]) -> Self {
        Self { rows }
    }

    /// Create a matrix from 20 row-major coefficients.
    pub fn from_array(values: [f32; 20]) -> Self {
        let mut rows = [[0.0; 5]; 4];
        for (c, row) in rows.iter_mut().enumerate() {
            row.copy_from_slice(&values[c * 5..c * 5 + 5]);
        }
        Self { rows }
    }

    /// The matrix rows, R first.
    pub fn rows(&self) -> &[[f32; 5]; 4] {
        &self.rows
    }

    /// Pass-through matrix.
    pub const fn identity() -> Self {
        Self::new([
            [1.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Scale saturation: `0.0` is grayscale, `1.0` is unchanged, above `1.0`
    /// oversaturates.
    pub fn saturation(sat: f32) -> Self {
        let inv = 1.0 - sat;
        let r = LUMA_R * inv;
        let g = LUMA_G * inv;
        let b = LUMA_B * inv;
        Self::new([
            [r + sat, g, b, 0.0, 0.0],
            [r, g + sat, b, 0.0, 0.0],
            [r, g, b + sat, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Luminance-preserving desaturation.
    pub fn grayscale() -> Self {
        Self::saturation(0.0)
    }

    /// Classic sepia tone.
    pub const fn sepia() -> Self {
        Self::new([
            [0.393, 0.769, 0.189, 0.0, 0.0],
            [0.349, 0.686, 0.168, 0.0, 0.0],
            [0.272, 0.534, 0.131, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Invert R, G and B; alpha is kept.
    pub const fn negative() -> Self {
        Self::new([
            [-1.0, 0.0, 0.0, 0.0, 255.0],
            [0.0, -1.0, 0.0, 0.0, 255.0],
            [0.0, 0.0, -1.0, 0.0, 255.0],
            [0.0, 0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Add `delta` to R, G and B. Negative values darken.
    pub fn brightness(delta: i32) -> Self {
        let d = delta as f32;
        Self::new([
            [1.0, 0.0, 0.0, 0.0, d],
            [0.0, 1.0, 0.0, 0.0, d],
            [0.0, 0.0, 1.0, 0.0, d],
            [0.0, 0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Stretch (positive) or flatten (negative) R, G and B around mid-gray.
    ///
    /// `amount` is a percentage; `-100` collapses every channel to 128.
    pub fn contrast(amount: f32) -> Self {
        let scale = 1.0 + amount.max(-100.0) / 100.0;
        let offset = 128.0 * (1.0 - scale);
        Self::new([
            [scale, 0.0, 0.0, 0.0, offset],
            [0.0, scale, 0.0, 0.0, offset],
            [0.0, 0.0, scale, 0.0, offset],
            [0.0, 0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Matrix equivalent to applying `self` and then `next`.
    ///
    /// The composed matrix skips the intermediate clamp, so it only matches
    /// two separate passes when the first pass stays within 0..=255.
    pub fn then(&self, next: &ColorMatrix) -> ColorMatrix {
        let mut rows = [[0.0f32; 5]; 4];
        for (c, row) in rows.iter_mut().enumerate() {
            for (k, cell) in row.iter_mut().enumerate() {
                let mut acc: f32 = (0..4).map(|j| next.rows[c][j] * self.rows[j][k]).sum();
                if k == 4 {
                    acc += next.rows[c][4];
                }
                *cell = acc;
            }
        }
        ColorMatrix { rows }
    }

    /// Whether this matrix leaves every pixel unchanged.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Transform a single RGBA pixel.
    #[inline]
    pub fn map_pixel(&self, px: [u8; 4]) -> [u8; 4] {
        let input = [px[0] as f32, px[1] as f32, px[2] as f32, px[3] as f32];
        let mut out = [0u8; 4];
        for (c, row) in self.rows.iter().enumerate() {
            let v = row[0] * input[0] + row[1] * input[1] + row[2] * input[2] + row[3] * input[3]
                + row[4];
            out[c] = v.clamp(0.0, 255.0).round() as u8;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_maps_pixel_to_itself() {
        let m = ColorMatrix::identity();
        for px in [[0, 0, 0, 0], [12, 200, 99, 255], [255, 255, 255, 128]] {
            assert_eq!(m.map_pixel(px), px);
        }
        assert!(m.is_identity());
        assert_eq!(ColorMatrix::default(), m);
    }

    #[test]
    fn test_from_array_row_major() {
        let mut values = [0.0f32; 20];
        values[4] = 7.0;
        values[18] = 1.0;
        let m = ColorMatrix::from_array(values);
        assert_eq!(m.rows()[0][4], 7.0);
        assert_eq!(m.rows()[3][3], 1.0);
    }

    #[test]
    fn test_negative() {
        let m = ColorMatrix::negative();
        assert_eq!(m.map_pixel([255, 0, 0, 255]), [0, 255, 255, 255]);
        assert_eq!(m.map_pixel([10, 20, 30, 77]), [245, 235, 225, 77]);
    }

    #[test]
    fn test_grayscale_red() {
        let m = ColorMatrix::grayscale();
        // 0.213 * 255 = 54.315
        assert_eq!(m.map_pixel([255, 0, 0, 255]), [54, 54, 54, 255]);
    }

    #[test]
    fn test_grayscale_rows_identical() {
        let m = ColorMatrix::grayscale();
        assert_eq!(m.rows()[0], m.rows()[1]);
        assert_eq!(m.rows()[1], m.rows()[2]);
    }

    #[test]
    fn test_saturation_one_is_identity() {
        let m = ColorMatrix::saturation(1.0);
        for px in [[1, 2, 3, 4], [250, 128, 0, 255]] {
            assert_eq!(m.map_pixel(px), px);
        }
    }

    #[test]
    fn test_sepia_red() {
        let m = ColorMatrix::sepia();
        // .393*255 = 100.2, .349*255 = 89.0, .272*255 = 69.4
        assert_eq!(m.map_pixel([255, 0, 0, 255]), [100, 89, 69, 255]);
    }

    #[test]
    fn test_sepia_white_clamps() {
        let m = ColorMatrix::sepia();
        // Row sums of the first two rows exceed 1.0
        let out = m.map_pixel([255, 255, 255, 255]);
        assert_eq!(out[0], 255);
        assert_eq!(out[1], 255);
        assert_eq!(out[3], 255);
    }

    #[test]
    fn test_brightness_clamps_both_ways() {
        assert_eq!(
            ColorMatrix::brightness(30).map_pixel([240, 100, 0, 200]),
            [255, 130, 30, 200]
        );
        assert_eq!(
            ColorMatrix::brightness(-30).map_pixel([240, 100, 10, 200]),
            [210, 70, 0, 200]
        );
    }

    #[test]
    fn test_contrast() {
        let m = ColorMatrix::contrast(100.0);
        // scale 2, offset -128
        assert_eq!(m.map_pixel([128, 64, 200, 255]), [128, 0, 255, 255]);

        let flat = ColorMatrix::contrast(-100.0);
        assert_eq!(flat.map_pixel([0, 90, 255, 255]), [128, 128, 128, 255]);

        assert!(ColorMatrix::contrast(0.0).is_identity());
    }

    #[test]
    fn test_then_composes() {
        let both = ColorMatrix::brightness(10).then(&ColorMatrix::negative());
        let px = [50, 100, 150, 255];
        let two_pass = ColorMatrix::negative().map_pixel(ColorMatrix::brightness(10).map_pixel(px));
        assert_eq!(both.map_pixel(px), two_pass);
        assert_eq!(both.map_pixel(px), [195, 145, 95, 255]);
    }

    #[test]
    fn test_then_identity_is_neutral() {
        let m = ColorMatrix::sepia();
        assert_eq!(m.then(&ColorMatrix::identity()), m);
        assert_eq!(ColorMatrix::identity().then(&m), m);
    }
}
