//! Editing session around the engine.
//!
//! Keeps the image as loaded next to the working copy, plus the current
//! selection. Screening always goes to the working copy; `reset` brings
//! back the loaded image.

use std::path::Path;

use crate::buffer::{load_buffer, save_buffer, RasterBuffer, Region};
use crate::engine::{HalftoneEngine, HalftoneReport, Result};
use crate::jitter::JitterSource;

/// Selections this size or smaller on either axis are discarded
pub const MIN_SELECTION_EXTENT: f64 = 5.0;

/// Widest image a session keeps by default; larger images are scaled down
pub const DEFAULT_MAX_WIDTH: u32 = 1000;

/// What part of the image to screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The whole working buffer
    WholeImage,
    /// The active selection, or the whole image when nothing is selected
    Selection,
}

/// Loaded image, working copy and selection
#[derive(Debug, Clone)]
pub struct EditorSession {
    original: RasterBuffer,
    current: RasterBuffer,
    selection: Option<Region>,
}

impl EditorSession {
    /// Start a session on an in-memory buffer
    pub fn from_buffer(buffer: RasterBuffer) -> Self {
        Self {
            current: buffer.clone(),
            original: buffer,
            selection: None,
        }
    }

    /// Load an image file, scaling it down to `max_width` if needed
    pub fn open<P: AsRef<Path>>(path: P, max_width: Option<u32>) -> Result<Self> {
        Ok(Self::from_buffer(load_buffer(path, max_width)?))
    }

    /// Working copy
    pub fn current(&self) -> &RasterBuffer {
        &self.current
    }

    /// Image as loaded
    pub fn original(&self) -> &RasterBuffer {
        &self.original
    }

    /// Active selection, if any
    pub fn selection(&self) -> Option<Region> {
        self.selection
    }

    /// Select the rectangle spanned by two drag points.
    ///
    /// Points may be given in any order and fractional coordinates are
    /// floored to pixels. Rectangles no larger than
    /// [`MIN_SELECTION_EXTENT`] on either axis clear the selection instead.
    /// Returns whether a selection is active afterwards.
    pub fn select(&mut self, start: (f64, f64), end: (f64, f64)) -> bool {
        let x = start.0.min(end.0);
        let y = start.1.min(end.1);
        let width = (end.0 - start.0).abs();
        let height = (end.1 - start.1).abs();

        if width > MIN_SELECTION_EXTENT && height > MIN_SELECTION_EXTENT {
            let x0 = x.floor() as i64;
            let y0 = y.floor() as i64;
            let x1 = (x + width).floor() as i64;
            let y1 = (y + height).floor() as i64;
            let region = Region::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0));
            self.selection = Some(region);
            true
        } else {
            self.selection = None;
            false
        }
    }

    /// Select an exact region, skipping the minimum-size rule of [`EditorSession::select`]
    pub fn set_selection(&mut self, region: Region) {
        self.selection = Some(region);
    }

    /// Drop the selection
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn target(&self, scope: Scope) -> Region {
        match (scope, self.selection) {
            (Scope::Selection, Some(region)) => region,
            _ => Region::full(self.current.width(), self.current.height()),
        }
    }

    /// Screen the working copy; the selection is cleared afterwards
    pub fn apply(&mut self, scope: Scope, engine: &HalftoneEngine) -> Result<HalftoneReport> {
        let region = self.target(scope);
        let report = engine.apply(&mut self.current, region)?;
        self.selection = None;
        Ok(report)
    }

    /// Like [`EditorSession::apply`] with an explicit jitter source
    pub fn apply_with_jitter<J: JitterSource + ?Sized>(
        &mut self,
        scope: Scope,
        engine: &HalftoneEngine,
        jitter: &mut J,
    ) -> Result<HalftoneReport> {
        let region = self.target(scope);
        let report = engine.apply_with_jitter(&mut self.current, region, jitter)?;
        self.selection = None;
        Ok(report)
    }

    /// Restore the loaded image and drop the selection
    pub fn reset(&mut self) {
        self.current.clone_from(&self.original);
        self.selection = None;
    }

    /// Write the working copy to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_buffer(&self.current, path)
    }
}
