//! Luma statistics over square samples of a buffer.

use crate::buffer::RasterBuffer;

/// BT.601 luma weights
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Mean and spread of luma over one sample area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    /// Mean luma (0-255)
    pub mean: f32,
    /// Population standard deviation of luma
    pub std_dev: f32,
    /// Number of pixels sampled
    pub samples: usize,
}

/// Luma of one RGBA pixel; alpha is ignored
#[inline]
pub fn luma(rgba: [u8; 4]) -> f32 {
    LUMA_R * rgba[0] as f32 + LUMA_G * rgba[1] as f32 + LUMA_B * rgba[2] as f32
}

/// Sample the square `(x, y, size)` on a `stride` grid.
///
/// The square is clamped to the buffer. If clamping leaves nothing to
/// visit, the nearest in-bounds pixel is sampled instead so the result is
/// never empty for a non-empty buffer.
pub fn sample_square(
    buffer: &RasterBuffer,
    x: usize,
    y: usize,
    size: usize,
    stride: usize,
) -> SampleStats {
    if buffer.is_empty() {
        return SampleStats {
            mean: 0.0,
            std_dev: 0.0,
            samples: 0,
        };
    }

    let stride = stride.max(1);
    let x_end = x.saturating_add(size.max(1)).min(buffer.width());
    let y_end = y.saturating_add(size.max(1)).min(buffer.height());

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0usize;

    for sy in (y..y_end).step_by(stride) {
        for sx in (x..x_end).step_by(stride) {
            let gray = luma(buffer.pixel(sx, sy)) as f64;
            sum += gray;
            sum_sq += gray * gray;
            count += 1;
        }
    }

    if count == 0 {
        let gray = luma(buffer.pixel(
            x.min(buffer.width() - 1),
            y.min(buffer.height() - 1),
        )) as f64;
        sum = gray;
        sum_sq = gray * gray;
        count = 1;
    }

    let mean = sum / count as f64;
    // E[x²] − E[x]² can dip just below zero from rounding
    let variance = (sum_sq / count as f64 - mean * mean).max(0.0);

    SampleStats {
        mean: mean as f32,
        std_dev: variance.sqrt() as f32,
        samples: count,
    }
}

/// Map mean luma through the contrast curve around mid-gray
#[inline]
pub fn apply_contrast(mean: f32, contrast: f32) -> f32 {
    ((mean - 128.0) * contrast + 128.0).clamp(0.0, 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_weights() {
        assert!((luma([255, 255, 255, 0]) - 255.0).abs() < 1e-3);
        assert_eq!(luma([0, 0, 0, 255]), 0.0);
        assert!((luma([100, 0, 0, 255]) - 29.9).abs() < 1e-4);
        assert!((luma([0, 100, 0, 255]) - 58.7).abs() < 1e-4);
        assert!((luma([0, 0, 100, 255]) - 11.4).abs() < 1e-4);
    }

    #[test]
    fn test_uniform_area_has_zero_deviation() {
        let buffer = RasterBuffer::filled(8, 8, [128, 128, 128, 255]);
        let stats = sample_square(&buffer, 0, 0, 8, 1);
        assert!((stats.mean - 128.0).abs() < 1e-3);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.samples, 64);
    }

    #[test]
    fn test_half_black_half_white() {
        let buffer = RasterBuffer::from_fn(4, 4, |x, _| {
            if x < 2 {
                [0, 0, 0, 255]
            } else {
                [255, 255, 255, 255]
            }
        });
        let stats = sample_square(&buffer, 0, 0, 4, 1);
        assert!((stats.mean - 127.5).abs() < 1e-2);
        assert!((stats.std_dev - 127.5).abs() < 1e-2);
    }

    #[test]
    fn test_stride_skips_pixels() {
        let buffer = RasterBuffer::filled(12, 12, [10, 10, 10, 255]);
        let stats = sample_square(&buffer, 0, 0, 12, 2);
        assert_eq!(stats.samples, 36);
    }

    #[test]
    fn test_clamped_to_buffer() {
        let buffer = RasterBuffer::filled(5, 5, [50, 50, 50, 255]);
        let stats = sample_square(&buffer, 4, 4, 8, 1);
        assert_eq!(stats.samples, 1);
        assert!((stats.mean - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_single_pixel_and_out_of_range_origin() {
        let buffer = RasterBuffer::from_fn(3, 3, |x, y| {
            let v = (x + y * 3) as u8 * 10;
            [v, v, v, 255]
        });
        let one = sample_square(&buffer, 1, 1, 1, 7);
        assert_eq!(one.samples, 1);
        assert!((one.mean - 40.0).abs() < 1e-3);

        let outside = sample_square(&buffer, 10, 10, 4, 1);
        assert_eq!(outside.samples, 1);
        assert!((outside.mean - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = RasterBuffer::filled(0, 0, [0, 0, 0, 0]);
        let stats = sample_square(&buffer, 0, 0, 4, 1);
        assert_eq!(stats.samples, 0);
    }

    #[test]
    fn test_apply_contrast() {
        assert_eq!(apply_contrast(128.0, 3.0), 128.0);
        assert_eq!(apply_contrast(200.0, 1.0), 200.0);
        assert_eq!(apply_contrast(200.0, 2.0), 255.0);
        assert_eq!(apply_contrast(10.0, 2.0), 0.0);
        assert_eq!(apply_contrast(10.0, 0.0), 128.0);
        assert_eq!(apply_contrast(64.0, 0.5), 96.0);
    }
}
