//! Per-pixel application of a [`ColorMatrix`].

use super::ColorMatrix;
use crate::PixelBuffer;

/// Apply a color matrix to every pixel of an image.
///
/// Each output channel is clamped to 0..=255 independently. The output has
/// the same dimensions as the input.
///
/// # Example
/// ```ignore
/// use retouch_core::color::{apply_color_matrix, ColorMatrix};
///
/// let red = PixelBuffer::filled(4, 4, [255, 0, 0, 255])?;
/// let cyan = apply_color_matrix(&red, &ColorMatrix::negative());
/// assert_eq!(cyan.pixel(0, 0), [0, 255, 255, 255]);
/// ```
pub fn apply_color_matrix(image: &PixelBuffer, matrix: &ColorMatrix) -> PixelBuffer {
    // Early exit if the matrix is a no-op
    if matrix.is_identity() {
        return image.clone();
    }

    let mut output = Vec::with_capacity(image.as_raw().len());
    for chunk in image.as_raw().chunks_exact(4) {
        let mapped = matrix.map_pixel([chunk[0], chunk[1], chunk[2], chunk[3]]);
        output.extend_from_slice(&mapped);
    }

    PixelBuffer::from_parts(image.width(), image.height(), output)
}
