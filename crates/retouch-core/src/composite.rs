//! Two-image compositing.

use crate::buffer::{CHANNELS, WHITE};
use crate::PixelBuffer;

/// Stack `top` above `bottom` on an opaque white canvas.
///
/// The canvas is `max(top.width, bottom.width)` wide and
/// `top.height + bottom.height` tall. Both images are copied as-is (replace,
/// not alpha-over), so translucent pixels keep their alpha rather than
/// blending with the white background. A narrower image leaves a white
/// margin on its right.
pub fn merge_vertical(top: &PixelBuffer, bottom: &PixelBuffer) -> PixelBuffer {
    let width = top.width().max(bottom.width());
    let height = top.height() + bottom.height();

    let mut canvas = PixelBuffer::canvas(width, height, WHITE);
    paint(&mut canvas, top, 0);
    paint(&mut canvas, bottom, top.height());
    canvas
}

/// Overwrite `canvas` rows starting at `y_offset` with `src`, left-aligned.
fn paint(canvas: &mut PixelBuffer, src: &PixelBuffer, y_offset: u32) {
    let len = src.width() as usize * CHANNELS;
    for y in 0..src.height() {
        canvas.row_mut(y_offset + y)[..len].copy_from_slice(src.row(y));
    }
}
