/**
 * Anti-Aliased Dot Rasterizer
 *
 * Paints one circular dot and its background into a square tile. Dark
 * areas get black dots on white, light areas white dots on black, with a
 * narrow linear ramp at the dot edge. Only pixels inside the render region
 * are written, so tiles hanging over a region edge are cut cleanly.
 */

use crate::buffer::{ClippedRegion, RasterBuffer};
use crate::jitter::JitterSource;
use crate::radius::dot_radius;

/// Width of the anti-aliasing ramp in pixels
pub const AA_WIDTH: f32 = 0.8;
/// Jitter amplitude as a fraction of the tile size
pub const JITTER_SCALE: f32 = 0.15;

/// One square placement on the base grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Left pixel column
    pub x: usize,
    /// Top pixel row
    pub y: usize,
    /// Side length in pixels
    pub size: usize,
}

/// Per-run settings shared by every tile
#[derive(Debug, Clone, Copy)]
pub struct DotStyle {
    /// Radius mapper threshold (0-255)
    pub threshold: u32,
    /// Radius reduction in percent
    pub spacing_percent: f32,
    /// Smallest tile size of the run
    pub global_min_dot_size: u32,
}

/// Dot and background gray levels for an adjusted gray value
#[inline]
pub fn tile_colors(adjusted_gray: f32) -> (u8, u8) {
    if adjusted_gray < 128.0 {
        (0, 255)
    } else {
        (255, 0)
    }
}

/// Gray level at signed distance `diff` inside the dot edge
#[inline]
pub fn edge_value(diff: f32, dot: u8, background: u8) -> u8 {
    if diff > AA_WIDTH {
        dot
    } else if diff < 0.0 {
        background
    } else {
        let t = diff / AA_WIDTH;
        let value = background as f32 + (dot as f32 - background as f32) * t;
        value.round().clamp(0.0, 255.0) as u8
    }
}

/// Final radius after jitter and spacing; may be negative
pub fn spaced_radius(radius: f32, jitter: f32, size: usize, spacing_percent: f32) -> f32 {
    let effective = radius + jitter * size as f32 * JITTER_SCALE;
    effective * (1.0 - spacing_percent / 100.0)
}

/// Rasterize one tile into `buffer`.
///
/// Draws exactly one jitter sample. The caller guarantees `region` lies
/// inside the buffer.
pub fn render_tile<J: JitterSource + ?Sized>(
    buffer: &mut RasterBuffer,
    tile: Tile,
    adjusted_gray: f32,
    region: &ClippedRegion,
    style: &DotStyle,
    jitter: &mut J,
) {
    let radius = dot_radius(
        adjusted_gray,
        tile.size as u32,
        style.threshold,
        style.global_min_dot_size,
    );
    let radius = spaced_radius(radius, jitter.next_offset(), tile.size, style.spacing_percent);
    let (dot, background) = tile_colors(adjusted_gray);

    let half = tile.size as f32 / 2.0;
    let center_x = tile.x as f32 + half;
    let center_y = tile.y as f32 + half;

    let x_start = tile.x.max(region.x);
    let y_start = tile.y.max(region.y);
    let x_end = (tile.x + tile.size).min(region.right());
    let y_end = (tile.y + tile.size).min(region.bottom());

    for py in y_start..y_end {
        let dy = py as f32 + 0.5 - center_y;
        for px in x_start..x_end {
            let dx = px as f32 + 0.5 - center_x;
            let dist = (dx * dx + dy * dy).sqrt();
            buffer.set_gray(px, py, edge_value(radius - dist, dot, background));
        }
    }
}
