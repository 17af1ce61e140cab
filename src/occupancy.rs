//! Occupancy bookkeeping for base-sized grid cells.
//!
//! One cell per `base × base` block of the whole buffer. Cells are claimed
//! once and never released during a run.

use std::ops::Range;

/// Fixed-size claim map over the base grid
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
    claimed: usize,
}

impl OccupancyGrid {
    /// Grid covering a `width × height` buffer with `base`-pixel cells
    pub fn new(width: usize, height: usize, base: usize) -> Self {
        let base = base.max(1);
        let cols = width.div_ceil(base);
        let rows = height.div_ceil(base);
        Self {
            cols,
            rows,
            cells: vec![false; cols * rows],
            claimed: 0,
        }
    }

    /// `(columns, rows)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Number of claimed cells
    #[inline]
    pub fn claimed(&self) -> usize {
        self.claimed
    }

    /// Cells outside the grid count as unoccupied
    #[inline]
    pub fn is_occupied(&self, gx: usize, gy: usize) -> bool {
        gx < self.cols && gy < self.rows && self.cells[gy * self.cols + gx]
    }

    /// True if no cell of the `span × span` block at `(gx, gy)` is claimed.
    /// The block is clamped at the grid edges.
    pub fn is_block_free(&self, gx: usize, gy: usize, span: usize) -> bool {
        let x_end = gx.saturating_add(span).min(self.cols);
        let y_end = gy.saturating_add(span).min(self.rows);
        (gy..y_end).all(|y| (gx..x_end).all(|x| !self.cells[y * self.cols + x]))
    }

    /// True if every cell in `cols × rows` is claimed; ranges are clamped to the grid
    pub fn is_range_claimed(&self, cols: Range<usize>, rows: Range<usize>) -> bool {
        let x_end = cols.end.min(self.cols);
        let y_end = rows.end.min(self.rows);
        (rows.start..y_end).all(|y| (cols.start..x_end).all(|x| self.cells[y * self.cols + x]))
    }

    /// Claim the `span × span` block at `(gx, gy)`, clamped at the grid edges
    pub fn mark_occupied(&mut self, gx: usize, gy: usize, span: usize) {
        let x_end = gx.saturating_add(span).min(self.cols);
        let y_end = gy.saturating_add(span).min(self.rows);
        for y in gy..y_end {
            for x in gx..x_end {
                let cell = &mut self.cells[y * self.cols + x];
                if !*cell {
                    *cell = true;
                    self.claimed += 1;
                }
            }
        }
    }
}
