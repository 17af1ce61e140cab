/**
 * Adaptive Tiling Planner
 *
 * Places tiles in two passes over the base grid.
 *
 * PASS 1: ADAPTIVE SIZING
 * =======================
 * For each candidate size, largest first, every free block whose origin
 * lies in the render region is sampled. The luma standard deviation rates
 * how detailed the block is; flat blocks earn an ideal size close to the
 * maximum, busy blocks one close to the base. A block takes the candidate
 * size only when the ideal size reaches three quarters of it. There is no
 * partial credit: a block that just misses every candidate is left to the
 * gap fill.
 *
 * PASS 2: GAP FILL
 * ================
 * Every cell still unclaimed that reaches into the render region gets a
 * base-size tile, sampled at full resolution. After this pass every pixel
 * of the region has been painted.
 *
 * Both passes scan row-major (y outer, x inner).
 */

use log::debug;

use crate::buffer::{ClippedRegion, RasterBuffer};
use crate::jitter::JitterSource;
use crate::occupancy::OccupancyGrid;
use crate::raster::{render_tile, DotStyle, Tile};
use crate::stats::{apply_contrast, sample_square};

/// Standard deviation at which a block counts as fully detailed
pub const COMPLEXITY_SCALE: f32 = 40.0;
/// Exponent shaping simplicity into ideal size
pub const SIMPLICITY_EXPONENT: f32 = 0.7;
/// Fraction of a candidate size the ideal size must reach
pub const ELIGIBILITY_RATIO: f32 = 0.75;
/// Pass-1 sampling density: roughly six samples per tile side
const SAMPLES_PER_SIDE: usize = 6;

/// Tile sizes tried in pass 1, largest first.
///
/// Multiples of `base` strictly greater than `base` and not exceeding `max`,
/// produced lazily.
pub fn candidate_sizes(base: usize, max: usize) -> impl Iterator<Item = usize> {
    let top = if base == 0 { 0 } else { max / base };
    (2..=top).rev().map(move |k| k * base)
}

/// Number of sizes [`candidate_sizes`] yields
pub fn candidate_count(base: usize, max: usize) -> usize {
    if base == 0 {
        0
    } else {
        (max / base).saturating_sub(1)
    }
}

/// Ideal tile size for a block with luma deviation `std_dev`
pub fn ideal_size(std_dev: f32, base: usize, max: usize) -> f32 {
    let complexity = (std_dev / COMPLEXITY_SCALE).min(1.0);
    let simplicity = 1.0 - complexity;
    base as f32 + (max - base) as f32 * simplicity.powf(SIMPLICITY_EXPONENT)
}

/// Whether a block with the given ideal size may take a `size` tile
#[inline]
pub fn is_eligible(ideal: f32, size: usize) -> bool {
    ideal >= size as f32 * ELIGIBILITY_RATIO
}

/// Drives both passes over one buffer; lives for a single engine run
pub struct TilingPlanner<'a, J: JitterSource + ?Sized> {
    buffer: &'a mut RasterBuffer,
    region: ClippedRegion,
    grid: OccupancyGrid,
    base: usize,
    max: usize,
    contrast: f32,
    style: DotStyle,
    jitter: &'a mut J,
}

impl<'a, J: JitterSource + ?Sized> TilingPlanner<'a, J> {
    /// Planner over `region`, which must already be clipped to `buffer`
    pub fn new(
        buffer: &'a mut RasterBuffer,
        region: ClippedRegion,
        base: usize,
        max: usize,
        contrast: f32,
        style: DotStyle,
        jitter: &'a mut J,
    ) -> Self {
        let grid = OccupancyGrid::new(buffer.width(), buffer.height(), base);
        Self {
            buffer,
            region,
            grid,
            base,
            max,
            contrast,
            style,
            jitter,
        }
    }

    /// Occupancy state so far
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Largest candidate size that can still place a tile.
    ///
    /// Pass-1 blocks of size `s` start at multiples of `s`. Once `s` reaches
    /// the far edge of the region, the only remaining origin is `(0, 0)`, so
    /// larger sizes are pointless unless the region starts there.
    pub fn largest_useful_size(&self) -> usize {
        if self.region.x == 0 && self.region.y == 0 {
            return self.max;
        }
        let limit = self.region.right().max(self.region.bottom());
        self.max.min(limit - 1)
    }

    /// Whether every cell touching the region is already claimed
    pub fn region_covered(&self) -> bool {
        let cols = self.region.x / self.base..self.region.right().div_ceil(self.base);
        let rows = self.region.y / self.base..self.region.bottom().div_ceil(self.base);
        self.grid.is_range_claimed(cols, rows)
    }

    /// Pass 1 for one candidate size. Returns the number of tiles placed.
    pub fn run_adaptive_pass(&mut self, size: usize) -> usize {
        let span = size / self.base;
        let stride = (size / SAMPLES_PER_SIDE).max(1);
        let (cols, rows) = self.grid.dimensions();
        let mut placed = 0;

        for gy in (0..rows).step_by(span) {
            for gx in (0..cols).step_by(span) {
                let x = gx * self.base;
                let y = gy * self.base;

                if !self.region.contains(x, y) || !self.grid.is_block_free(gx, gy, span) {
                    continue;
                }

                let stats = sample_square(self.buffer, x, y, size, stride);
                if !is_eligible(ideal_size(stats.std_dev, self.base, self.max), size) {
                    continue;
                }

                let adjusted = apply_contrast(stats.mean, self.contrast);
                self.grid.mark_occupied(gx, gy, span);
                render_tile(
                    self.buffer,
                    Tile { x, y, size },
                    adjusted,
                    &self.region,
                    &self.style,
                    &mut *self.jitter,
                );
                placed += 1;
            }
        }

        debug!("adaptive pass size={} placed {} tiles", size, placed);
        placed
    }

    /// Pass 2: base tiles for every unclaimed cell touching the region
    pub fn run_gap_fill(&mut self) -> usize {
        let (cols, rows) = self.grid.dimensions();
        let mut placed = 0;

        for gy in 0..rows {
            for gx in 0..cols {
                let x = gx * self.base;
                let y = gy * self.base;

                if self.grid.is_occupied(gx, gy)
                    || !self.region.intersects_square(x, y, self.base)
                {
                    continue;
                }

                let stats = sample_square(self.buffer, x, y, self.base, 1);
                let adjusted = apply_contrast(stats.mean, self.contrast);
                self.grid.mark_occupied(gx, gy, 1);
                render_tile(
                    self.buffer,
                    Tile {
                        x,
                        y,
                        size: self.base,
                    },
                    adjusted,
                    &self.region,
                    &self.style,
                    &mut *self.jitter,
                );
                placed += 1;
            }
        }

        debug!("gap fill placed {} base tiles", placed);
        placed
    }

    /// Hand back the occupancy grid once both passes are done
    pub fn finish(self) -> OccupancyGrid {
        self.grid
    }
}
