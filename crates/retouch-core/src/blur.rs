//! Fixed-radius box blur.
//!
//! Every interior pixel is replaced by the unweighted mean of the
//! `(2r+1) x (2r+1)` window around it, read from the unblurred input. Pixels
//! closer than `radius` to any edge have no full window and are copied
//! through unchanged. That border is part of the expected output, not a gap
//! to fill.
//!
//! ## Algorithm
//!
//! Window sums come from a summed-area table, so the cost is O(width * height)
//! regardless of radius. Sums are exact integers, so the result is identical
//! to the naive O(width * height * r²) loop: `sum / count`, truncated.

use crate::PixelBuffer;

/// Blur an image with a square box filter of the given radius.
///
/// # Arguments
/// * `image` - Source image (read only; results go to a new buffer)
/// * `radius` - Half-width of the window; `0` returns an unchanged copy
///
/// # Behavior
/// - Only R, G and B are averaged; each pixel keeps its own alpha
/// - Pixels within `radius` of an edge are byte-identical to the input
/// - If the image has no interior (`width <= 2r` or `height <= 2r`) the
///   output equals the input
pub fn box_blur(image: &PixelBuffer, radius: u32) -> PixelBuffer {
    let (width, height) = image.dimensions();
    let r = radius as u64;

    if radius == 0 || 2 * r >= width as u64 || 2 * r >= height as u64 {
        return image.clone();
    }

    let table = SummedArea::build(image);
    let side = 2 * r + 1;
    let count = side * side;

    let mut output = image.clone();
    for y in radius..height - radius {
        for x in radius..width - radius {
            let [sr, sg, sb] = table.window(x - radius, y - radius, x + radius + 1, y + radius + 1);
            let alpha = image.pixel(x, y)[3];
            output.put_pixel(
                x,
                y,
                [
                    (sr / count) as u8,
                    (sg / count) as u8,
                    (sb / count) as u8,
                    alpha,
                ],
            );
        }
    }

    output
}

/// Inclusive prefix sums of R, G and B.
///
/// Entry `(x, y)` holds the sum over pixels `[0, x) x [0, y)`, so the table is
/// `(width + 1) x (height + 1)` with a zero first row and column.
struct SummedArea {
    stride: usize,
    sums: Vec<[u64; 3]>,
}

impl SummedArea {
    fn build(image: &PixelBuffer) -> Self {
        let (width, height) = image.dimensions();
        let stride = width as usize + 1;
        let mut sums = vec![[0u64; 3]; stride * (height as usize + 1)];

        for y in 0..height as usize {
            let row = image.row(y as u32);
            let mut running = [0u64; 3];
            for x in 0..width as usize {
                let px = &row[x * 4..x * 4 + 3];
                for c in 0..3 {
                    running[c] += px[c] as u64;
                }
                let above = sums[y * stride + x + 1];
                sums[(y + 1) * stride + x + 1] = [
                    above[0] + running[0],
                    above[1] + running[1],
                    above[2] + running[2],
                ];
            }
        }

        Self { stride, sums }
    }

    /// Sum over the half-open pixel rectangle `[x0, x1) x [y0, y1)`.
    #[inline]
    fn window(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> [u64; 3] {
        let at = |x: u32, y: u32| self.sums[y as usize * self.stride + x as usize];
        let (a, b, c, d) = (at(x1, y1), at(x0, y1), at(x1, y0), at(x0, y0));
        [
            a[0] + d[0] - b[0] - c[0],
            a[1] + d[1] - b[1] - c[1],
            a[2] + d[2] - b[2] - c[2],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct window average, as the blur is defined.
    pub(super) fn naive_blur(image: &PixelBuffer, radius: u32) -> PixelBuffer {
        let (w, h) = image.dimensions();
        let mut out = image.clone();
        let r = radius as i64;
        for y in r..h as i64 - r {
            for x in r..w as i64 - r {
                let (mut sr, mut sg, mut sb, mut n) = (0u32, 0u32, 0u32, 0u32);
                for ky in -r..=r {
                    for kx in -r..=r {
                        let px = image.pixel((x + kx) as u32, (y + ky) as u32);
                        sr += px[0] as u32;
                        sg += px[1] as u32;
                        sb += px[2] as u32;
                        n += 1;
                    }
                }
                let alpha = image.pixel(x as u32, y as u32)[3];
                out.put_pixel(
                    x as u32,
                    y as u32,
                    [(sr / n) as u8, (sg / n) as u8, (sb / n) as u8, alpha],
                );
            }
        }
        out
    }

    fn pattern(width: u32, height: u32) -> PixelBuffer {
        let mut img = PixelBuffer::blank(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 37 + y * 91) % 256) as u8;
                img.put_pixel(x, y, [v, 255 - v, (x * y % 256) as u8, 200]);
            }
        }
        img
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let img = PixelBuffer::filled(20, 20, [80, 160, 240, 255]).unwrap();
        assert_eq!(box_blur(&img, 5), img);
    }

    #[test]
    fn test_radius_zero_is_noop() {
        let img = pattern(10, 10);
        assert_eq!(box_blur(&img, 0), img);
    }

    #[test]
    fn test_radius_too_large_is_noop() {
        let img = pattern(10, 12);
        // width 10 <= 2 * 5 leaves no interior column
        assert_eq!(box_blur(&img, 5), img);
        assert_eq!(box_blur(&img, u32::MAX), img);
    }

    #[test]
    fn test_single_interior_pixel() {
        // 3x3 image, radius 1: only the center has a full window
        let mut img = PixelBuffer::filled(3, 3, [0, 0, 0, 255]).unwrap();
        img.put_pixel(0, 0, [90, 9, 18, 255]);
        let result = box_blur(&img, 1);

        assert_eq!(result.pixel(1, 1), [10, 1, 2, 255]);
        // Border copied through
        assert_eq!(result.pixel(0, 0), [90, 9, 18, 255]);
    }

    #[test]
    fn test_average_truncates() {
        let mut img = PixelBuffer::filled(3, 3, [0, 0, 0, 255]).unwrap();
        // Sum 17 over 9 pixels: 1.88 truncates to 1
        img.put_pixel(2, 2, [17, 17, 17, 255]);
        assert_eq!(box_blur(&img, 1).pixel(1, 1), [1, 1, 1, 255]);
    }

    #[test]
    fn test_edges_byte_identical() {
        let img = pattern(30, 20);
        let radius = 4;
        let result = box_blur(&img, radius);

        for y in 0..20 {
            for x in 0..30 {
                let on_edge = x < radius || y < radius || x >= 30 - radius || y >= 20 - radius;
                if on_edge {
                    assert_eq!(result.pixel(x, y), img.pixel(x, y), "edge ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_reads_snapshot_not_partial_output() {
        // A single bright pixel: with in-place feedback, later windows would
        // see already-blurred values and spread it differently
        let mut img = PixelBuffer::filled(9, 9, [0, 0, 0, 255]).unwrap();
        img.put_pixel(4, 4, [225, 225, 225, 255]);
        let result = box_blur(&img, 1);

        for y in 3..=5 {
            for x in 3..=5 {
                assert_eq!(result.pixel(x, y), [25, 25, 25, 255]);
            }
        }
        assert_eq!(result.pixel(2, 2), [0, 0, 0, 255]);
        assert_eq!(result.pixel(6, 6), [0, 0, 0, 255]);
    }

    #[test]
    fn test_alpha_kept_per_pixel() {
        let mut img = pattern(7, 7);
        img.put_pixel(3, 3, [10, 10, 10, 17]);
        let result = box_blur(&img, 1);
        assert_eq!(result.pixel(3, 3)[3], 17);
        assert_eq!(result.pixel(2, 2)[3], 200);
    }

    #[test]
    fn test_matches_naive_blur() {
        let img = pattern(25, 18);
        for radius in [1, 2, 5, 8] {
            assert_eq!(box_blur(&img, radius), naive_blur(&img, radius), "radius {radius}");
        }
    }
}
