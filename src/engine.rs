/**
 * Halftone Engine
 *
 * Entry point of the screening pipeline. Validates parameters, clips the
 * requested region, then runs the tiling planner: adaptive passes from the
 * largest candidate size down, then the gap fill. All validation happens before
 * the first pixel is written, so a failed call leaves the buffer as it was.
 */

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, trace};
use std::path::Path;
use thiserror::Error;

use crate::buffer::{load_buffer, save_buffer, ClippedRegion, RasterBuffer, Region};
use crate::jitter::{JitterSource, SeededJitter};
use crate::planner::{candidate_count, candidate_sizes, TilingPlanner};
use crate::raster::DotStyle;

/// Error types for halftone rendering
#[derive(Error, Debug)]
pub enum HalftoneError {
    /// A parameter is outside its documented range
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Buffer storage does not match its dimensions
    #[error("Out of bounds: {width}×{height} RGBA buffer backed by {len} bytes")]
    OutOfBounds {
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
        /// Actual byte length
        len: usize,
    },

    /// Failed to load or save an image
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Image has a zero dimension
    #[error("Image dimensions must be positive")]
    InvalidDimensions,
}

/// Result type for halftone operations
pub type Result<T> = std::result::Result<T, HalftoneError>;

/// Rendering parameters for one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalftoneParams {
    /// One bound of the tile size range, in pixels
    pub min_dot_size: u32,
    /// Other bound of the tile size range, in pixels
    pub max_dot_size: u32,
    /// Gap between neighbouring dots as a percentage of the radius (0-100)
    pub spacing_percent: f32,
    /// Contrast multiplier around mid-gray (1.0 = unchanged)
    pub contrast: f32,
    /// Inverted gray level below which dots are shrunk (0-255)
    pub threshold: u32,
}

impl Default for HalftoneParams {
    fn default() -> Self {
        Self {
            min_dot_size: HalftoneConfig::DEFAULT_MIN_DOT_SIZE,
            max_dot_size: HalftoneConfig::DEFAULT_MAX_DOT_SIZE,
            spacing_percent: HalftoneConfig::DEFAULT_SPACING_PERCENT,
            contrast: HalftoneConfig::DEFAULT_CONTRAST,
            threshold: HalftoneConfig::DEFAULT_THRESHOLD,
        }
    }
}

impl HalftoneParams {
    /// Reject out-of-range values; nothing is clamped
    pub fn validate(&self) -> Result<()> {
        if self.min_dot_size == 0 {
            return Err(invalid("min_dot_size", "must be a positive integer"));
        }
        if self.max_dot_size == 0 {
            return Err(invalid("max_dot_size", "must be a positive integer"));
        }
        if !(0.0..=100.0).contains(&self.spacing_percent) {
            return Err(invalid(
                "spacing_percent",
                format!("must be between 0 and 100, got {}", self.spacing_percent),
            ));
        }
        if !self.contrast.is_finite() || self.contrast < 0.0 {
            return Err(invalid(
                "contrast",
                format!("must be a finite value >= 0, got {}", self.contrast),
            ));
        }
        if self.threshold > 255 {
            return Err(invalid(
                "threshold",
                format!("must be between 0 and 255, got {}", self.threshold),
            ));
        }
        Ok(())
    }

    /// Smaller of the two dot sizes
    #[inline]
    pub fn base_size(&self) -> u32 {
        self.min_dot_size.min(self.max_dot_size)
    }

    /// Larger of the two dot sizes
    #[inline]
    pub fn max_size(&self) -> u32 {
        self.min_dot_size.max(self.max_dot_size)
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> HalftoneError {
    HalftoneError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

/// Configuration for the halftone engine
#[derive(Debug, Clone)]
pub struct HalftoneConfig {
    /// Rendering parameters
    pub params: HalftoneParams,
    /// Optional jitter seed for reproducible results
    pub seed: Option<u32>,
    /// Show progress indicators
    pub verbose: bool,
}

impl HalftoneConfig {
    /// Default smaller dot size
    pub const DEFAULT_MIN_DOT_SIZE: u32 = 4;
    /// Default larger dot size
    pub const DEFAULT_MAX_DOT_SIZE: u32 = 12;
    /// Default dot spacing
    pub const DEFAULT_SPACING_PERCENT: f32 = 5.0;
    /// Default contrast (unchanged)
    pub const DEFAULT_CONTRAST: f32 = 1.0;
    /// Default threshold
    pub const DEFAULT_THRESHOLD: u32 = 128;
}

impl Default for HalftoneConfig {
    fn default() -> Self {
        Self {
            params: HalftoneParams::default(),
            seed: None,
            verbose: false,
        }
    }
}

/// What one run placed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HalftoneReport {
    /// Region actually rendered, `None` when the clip was empty
    pub region: Option<ClippedRegion>,
    /// `(size, tiles placed)` for each pass-1 size that placed a tile, largest first
    pub adaptive_tiles: Vec<(usize, usize)>,
    /// Base tiles placed by the gap fill
    pub gap_fill_tiles: usize,
    /// Grid cells claimed over the whole run
    pub cells_claimed: usize,
}

impl HalftoneReport {
    /// Total number of tiles rendered
    pub fn total_tiles(&self) -> usize {
        self.adaptive_tiles.iter().map(|&(_, n)| n).sum::<usize>() + self.gap_fill_tiles
    }
}

/**
 * Runs the two-pass screening over buffers
 */
pub struct HalftoneEngine {
    params: HalftoneParams,
    seed: Option<u32>,
    verbose: bool,
}

impl HalftoneEngine {
    /// Create an engine, validating the configuration up front
    pub fn new(config: HalftoneConfig) -> Result<Self> {
        config.params.validate()?;
        Ok(Self {
            params: config.params,
            seed: config.seed,
            verbose: config.verbose,
        })
    }

    /// Parameters in use
    pub fn params(&self) -> &HalftoneParams {
        &self.params
    }

    /// Screen `region` of `buffer` with jitter seeded from the configuration
    pub fn apply(&self, buffer: &mut RasterBuffer, region: Region) -> Result<HalftoneReport> {
        let mut jitter = SeededJitter::new(self.seed);
        self.apply_with_jitter(buffer, region, &mut jitter)
    }

    /// Screen `region` of `buffer` drawing jitter from `jitter`
    pub fn apply_with_jitter<J: JitterSource + ?Sized>(
        &self,
        buffer: &mut RasterBuffer,
        region: Region,
        jitter: &mut J,
    ) -> Result<HalftoneReport> {
        // Buffers built field by field could disagree with their storage
        if !buffer.is_consistent() {
            return Err(HalftoneError::OutOfBounds {
                width: buffer.width(),
                height: buffer.height(),
                len: buffer.as_raw().len(),
            });
        }

        let Some(clipped) = region.clip(buffer.width(), buffer.height()) else {
            trace!("region {:?} is empty after clipping, nothing to do", region);
            return Ok(HalftoneReport::default());
        };

        let base = self.params.base_size() as usize;
        let max = self.params.max_size() as usize;
        let style = DotStyle {
            threshold: self.params.threshold,
            spacing_percent: self.params.spacing_percent,
            global_min_dot_size: base as u32,
        };

        let mut planner = TilingPlanner::new(
            buffer,
            clipped,
            base,
            max,
            self.params.contrast,
            style,
            jitter,
        );

        let top = planner.largest_useful_size();
        debug!(
            "halftone region {:?}, base {} max {}, candidate sizes {}..={}",
            clipped, base, max, 2 * base, top
        );

        let progress = self.progress_bar(candidate_count(base, top) as u64 + 1);
        let mut adaptive_tiles = Vec::new();
        for size in candidate_sizes(base, top) {
            if let Some(pb) = &progress {
                pb.set_message(format!("Adaptive pass: {size}px tiles"));
            }
            let placed = planner.run_adaptive_pass(size);
            if let Some(pb) = &progress {
                pb.inc(1);
            }
            if placed == 0 {
                continue;
            }
            adaptive_tiles.push((size, placed));
            if planner.region_covered() {
                debug!("region covered after {}px pass", size);
                break;
            }
        }

        if let Some(pb) = &progress {
            pb.set_message(format!("Gap fill: {base}px tiles"));
        }
        let gap_fill_tiles = planner.run_gap_fill();
        let cells_claimed = planner.finish().claimed();

        if let Some(pb) = &progress {
            pb.inc(1);
            pb.finish_with_message("Halftone complete");
        }

        Ok(HalftoneReport {
            region: Some(clipped),
            adaptive_tiles,
            gap_fill_tiles,
            cells_claimed,
        })
    }

    fn progress_bar(&self, passes: u64) -> Option<ProgressBar> {
        if !self.verbose {
            return None;
        }

        let pb = ProgressBar::new(passes);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("##-"));
        }
        Some(pb)
    }
}

/// Screen `region` of `buffer` and hand the buffer back.
///
/// Jitter is seeded from the clock, so repeated calls differ slightly.
pub fn apply_halftone(
    mut buffer: RasterBuffer,
    region: Region,
    params: HalftoneParams,
) -> Result<RasterBuffer> {
    let engine = HalftoneEngine::new(HalftoneConfig {
        params,
        ..Default::default()
    })?;
    engine.apply(&mut buffer, region)?;
    Ok(buffer)
}

/// Load `input_path`, screen the whole image (or `region`), save to `output_path`
pub fn apply_halftone_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    region: Option<Region>,
    config: HalftoneConfig,
) -> Result<HalftoneReport> {
    let engine = HalftoneEngine::new(config)?;
    let mut buffer = load_buffer(input_path, None)?;
    let region = region.unwrap_or_else(|| Region::full(buffer.width(), buffer.height()));
    let report = engine.apply(&mut buffer, region)?;
    save_buffer(&buffer, output_path)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jitter::NoJitter;

    fn params(min: u32, max: u32) -> HalftoneParams {
        HalftoneParams {
            min_dot_size: min,
            max_dot_size: max,
            spacing_percent: 0.0,
            contrast: 1.0,
            threshold: 128,
        }
    }

    #[test]
    fn test_params_validation() {
        assert!(params(4, 12).validate().is_ok());
        assert!(params(12, 4).validate().is_ok());

        assert!(params(0, 4).validate().is_err());
        assert!(params(4, 0).validate().is_err());

        let mut p = params(4, 8);
        p.spacing_percent = 100.5;
        assert!(p.validate().is_err());
        p.spacing_percent = -1.0;
        assert!(p.validate().is_err());
        p.spacing_percent = f32::NAN;
        assert!(p.validate().is_err());
        p.spacing_percent = 100.0;
        assert!(p.validate().is_ok());

        let mut p = params(4, 8);
        p.contrast = -0.1;
        assert!(p.validate().is_err());
        p.contrast = f32::INFINITY;
        assert!(p.validate().is_err());
        p.contrast = 0.0;
        assert!(p.validate().is_ok());

        let mut p = params(4, 8);
        p.threshold = 256;
        let err = p.validate().unwrap_err();
        assert!(matches!(
            err,
            HalftoneError::InvalidParameter {
                name: "threshold",
                ..
            }
        ));
    }

    #[test]
    fn test_sizes_are_ordered() {
        let p = params(12, 4);
        assert_eq!(p.base_size(), 4);
        assert_eq!(p.max_size(), 12);
    }

    #[test]
    fn test_default_config() {
        let config = HalftoneConfig::default();
        assert_eq!(config.params.min_dot_size, 4);
        assert_eq!(config.params.max_dot_size, 12);
        assert_eq!(config.params.spacing_percent, 5.0);
        assert_eq!(config.params.contrast, 1.0);
        assert_eq!(config.params.threshold, 128);
        assert_eq!(config.seed, None);
        assert!(!config.verbose);
    }

    #[test]
    fn test_invalid_config_rejected_by_engine() {
        let config = HalftoneConfig {
            params: params(0, 4),
            ..Default::default()
        };
        assert!(HalftoneEngine::new(config).is_err());
    }

    #[test]
    fn test_apply_halftone_rejects_invalid_params() {
        let buffer = RasterBuffer::filled(8, 8, [1, 2, 3, 4]);
        let mut p = params(4, 4);
        p.contrast = -1.0;
        assert!(apply_halftone(buffer, Region::full(8, 8), p).is_err());
    }

    #[test]
    fn test_empty_region_is_noop() {
        let engine = HalftoneEngine::new(HalftoneConfig {
            params: params(4, 8),
            ..Default::default()
        })
        .unwrap();
        let mut buffer = RasterBuffer::filled(8, 8, [1, 2, 3, 4]);
        let before = buffer.clone();

        let report = engine
            .apply_with_jitter(&mut buffer, Region::new(2, 2, 0, 4), &mut NoJitter)
            .unwrap();
        assert_eq!(report, HalftoneReport::default());
        assert_eq!(buffer, before);

        let report = engine
            .apply_with_jitter(&mut buffer, Region::new(20, 0, 4, 4), &mut NoJitter)
            .unwrap();
        assert_eq!(report.total_tiles(), 0);
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_report_counts() {
        let engine = HalftoneEngine::new(HalftoneConfig {
            params: params(4, 12),
            seed: Some(7),
            verbose: false,
        })
        .unwrap();
        let mut buffer = RasterBuffer::filled(24, 24, [60, 60, 60, 255]);
        let report = engine.apply(&mut buffer, Region::full(24, 24)).unwrap();

        assert_eq!(report.adaptive_tiles, vec![(12, 4)]);
        assert_eq!(report.gap_fill_tiles, 0);
        assert_eq!(report.total_tiles(), 4);
        assert_eq!(report.cells_claimed, 36);
    }

    #[test]
    fn test_largest_dot_size_range_finishes() {
        let engine = HalftoneEngine::new(HalftoneConfig {
            params: params(1, u32::MAX),
            seed: None,
            verbose: false,
        })
        .unwrap();
        let huge = u32::MAX as usize;

        // Region at the origin: the first size covers everything at once
        let mut buffer = RasterBuffer::filled(16, 16, [100, 100, 100, 255]);
        let report = engine
            .apply_with_jitter(&mut buffer, Region::full(16, 16), &mut NoJitter)
            .unwrap();
        assert_eq!(report.adaptive_tiles, vec![(huge, 1)]);
        assert_eq!(report.gap_fill_tiles, 0);
        assert_eq!(report.cells_claimed, 256);
        assert_eq!(buffer, RasterBuffer::filled(16, 16, [255, 255, 255, 255]));

        // Inset region: sizes past its far edge are skipped
        let mut buffer = RasterBuffer::filled(16, 16, [100, 100, 100, 255]);
        let region = Region::new(2, 3, 8, 10);
        let report = engine
            .apply_with_jitter(&mut buffer, region, &mut NoJitter)
            .unwrap();
        assert!(report.adaptive_tiles.iter().all(|&(size, n)| size <= 12 && n > 0));
        let clipped = region.clip(16, 16).unwrap();
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                assert_eq!(buffer.pixel(x, y)[3], 255);
            }
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = HalftoneConfig {
            params: params(4, 8),
            seed: Some(99),
            verbose: false,
        };
        let engine = HalftoneEngine::new(config).unwrap();
        let source = RasterBuffer::from_fn(32, 32, |x, y| {
            let v = ((x * 7 + y * 3) % 256) as u8;
            [v, v, v, 255]
        });

        let mut a = source.clone();
        let mut b = source.clone();
        engine.apply(&mut a, Region::full(32, 32)).unwrap();
        engine.apply(&mut b, Region::full(32, 32)).unwrap();
        assert_eq!(a, b);
    }
}
