/**
 * Raster Buffer and Region Clipping
 *
 * The engine works on a plain row-major RGBA8 buffer that it borrows
 * mutably for the duration of one run. Regions arrive in signed buffer
 * coordinates (a drag selection may start left of or above the image) and
 * are clipped to the buffer before any tile is planned.
 */

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use std::path::Path;

use crate::engine::{HalftoneError, Result};

/// Number of channels per pixel (R, G, B, A)
pub const CHANNELS: usize = 4;

/// Rectangle in buffer coordinates, possibly reaching outside the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left edge, may be negative
    pub x: i64,
    /// Top edge, may be negative
    pub y: i64,
    /// Width in pixels, may be zero or negative
    pub width: i64,
    /// Height in pixels, may be zero or negative
    pub height: i64,
}

impl Region {
    /// Create a region from its top-left corner and extents
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region covering an entire `width × height` buffer
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, width as i64, height as i64)
    }

    /// Clip against `[0, width] × [0, height]`.
    ///
    /// Returns `None` when nothing of the region remains inside the buffer.
    pub fn clip(&self, width: usize, height: usize) -> Option<ClippedRegion> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.x.saturating_add(self.width).min(width as i64);
        let y1 = self.y.saturating_add(self.height).min(height as i64);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(ClippedRegion {
            x: x0 as usize,
            y: y0 as usize,
            width: (x1 - x0) as usize,
            height: (y1 - y0) as usize,
        })
    }
}

/// A region already clipped to a buffer; always non-empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedRegion {
    /// Left edge
    pub x: usize,
    /// Top edge
    pub y: usize,
    /// Width in pixels (at least 1)
    pub width: usize,
    /// Height in pixels (at least 1)
    pub height: usize,
}

impl ClippedRegion {
    /// One past the rightmost column
    #[inline]
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// One past the bottom row
    #[inline]
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Whether pixel `(px, py)` lies inside the region
    #[inline]
    pub fn contains(&self, px: usize, py: usize) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Whether the square `[x, x+size) × [y, y+size)` overlaps the region
    #[inline]
    pub fn intersects_square(&self, x: usize, y: usize, size: usize) -> bool {
        x < self.right() && x + size > self.x && y < self.bottom() && y + size > self.y
    }
}

/// Row-major RGBA8 pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Create a buffer filled with a single RGBA value
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width * height * CHANNELS);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap raw RGBA bytes, checking that they match the dimensions
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(HalftoneError::OutOfBounds {
                width,
                height,
                len: data.len(),
            })?;

        if data.len() != expected {
            return Err(HalftoneError::OutOfBounds {
                width,
                height,
                len: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer from a pixel callback, like `ImageBuffer::from_fn`
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> [u8; 4],
    {
        let mut data = Vec::with_capacity(width * height * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Take ownership of an `image` RGBA buffer
    pub fn from_rgba_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width: width as usize,
            height: height as usize,
            data: img.into_raw(),
        }
    }

    /// Convert any decoded image to RGBA8
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        Self::from_rgba_image(img.to_rgba8())
    }

    /// Convert back into an `image` buffer for encoding
    pub fn into_rgba_image(self) -> Result<RgbaImage> {
        RgbaImage::from_raw(self.width as u32, self.height as u32, self.data)
            .ok_or(HalftoneError::InvalidDimensions)
    }

    /// Width in pixels
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when either dimension is zero
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA bytes
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// True when the backing storage matches `width × height × 4`
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.width * self.height * CHANNELS
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * CHANNELS
    }

    /// RGBA value at `(x, y)`
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let idx = self.index(x, y);
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Overwrite the pixel at `(x, y)`
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let idx = self.index(x, y);
        self.data[idx..idx + CHANNELS].copy_from_slice(&rgba);
    }

    /// Write an opaque gray value to `(x, y)`
    #[inline]
    pub fn set_gray(&mut self, x: usize, y: usize, value: u8) {
        self.set_pixel(x, y, [value, value, value, 255]);
    }
}

/// Load an image file into a buffer.
///
/// Images wider than `max_width` are scaled down proportionally.
pub fn load_buffer<P: AsRef<Path>>(path: P, max_width: Option<u32>) -> Result<RasterBuffer> {
    let mut img = image::open(path)?;

    if img.width() == 0 || img.height() == 0 {
        return Err(HalftoneError::InvalidDimensions);
    }

    if let Some(max_width) = max_width {
        if max_width == 0 {
            return Err(HalftoneError::InvalidDimensions);
        }
        if img.width() > max_width {
            let height = ((img.height() as u64 * max_width as u64) / img.width() as u64).max(1);
            img = img.resize_exact(max_width, height as u32, FilterType::Lanczos3);
        }
    }

    Ok(RasterBuffer::from_dynamic(&img))
}

/// Encode a buffer to disk; the format follows the file extension
pub fn save_buffer<P: AsRef<Path>>(buffer: &RasterBuffer, path: P) -> Result<()> {
    let img = buffer.clone().into_rgba_image()?;
    img.save(path)?;
    Ok(())
}
