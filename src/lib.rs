//! FM Halftone Library
//!
//! Adaptive frequency-modulated screening for raster images. An image is
//! rebuilt from a grid of anti-aliased dots whose size follows local
//! brightness, laid out on tiles whose size follows local detail.
//!
//! # Features
//!
//! - Two-pass adaptive tiling: large tiles on flat areas, base tiles elsewhere
//! - Anti-aliased dots with contrast, threshold and spacing controls
//! - Region screening with clipping against the image bounds
//! - Reproducible output through seeded or disabled radius jitter
//! - An editing session with selection, reset and save
//!
//! # Quick Start
//!
//! ```no_run
//! use fm_halftone::{apply_halftone, HalftoneParams, RasterBuffer, Region};
//!
//! let buffer = RasterBuffer::filled(64, 64, [128, 128, 128, 255]);
//! let params = HalftoneParams {
//!     min_dot_size: 4,
//!     max_dot_size: 12,
//!     ..Default::default()
//! };
//!
//! let screened = apply_halftone(buffer, Region::full(64, 64), params).unwrap();
//! assert_eq!(screened.width(), 64);
//! ```
//!
//! ## Reproducible runs
//!
//! ```no_run
//! use fm_halftone::{HalftoneConfig, HalftoneEngine, NoJitter, RasterBuffer, Region};
//!
//! let engine = HalftoneEngine::new(HalftoneConfig::default()).unwrap();
//! let mut buffer = RasterBuffer::filled(32, 32, [40, 40, 40, 255]);
//! let report = engine
//!     .apply_with_jitter(&mut buffer, Region::new(-4, -4, 20, 20), &mut NoJitter)
//!     .unwrap();
//! println!("placed {} tiles", report.total_tiles());
//! ```
//!
//! # Algorithm
//!
//! 1. **Adaptive pass**: for each multiple of the base size, largest first,
//!    free blocks are sampled; flat blocks (low luma deviation) take the
//!    larger tile
//! 2. **Gap fill**: every cell still free gets a base-size tile
//!
//! Each tile samples its mean luma, applies contrast, maps the result to a
//! dot radius and paints one dot with a 0.8 px anti-aliased edge.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Raster buffer, regions and file I/O
pub mod buffer;
/// Engine entry point, parameters and errors
pub mod engine;
/// Radius jitter sources
pub mod jitter;
/// Occupancy grid
pub mod occupancy;
/// Two-pass tiling planner
pub mod planner;
/// Dot radius mapping
pub mod radius;
/// Dot rasterizer
pub mod raster;
/// Editing session
pub mod session;
/// Luma statistics
pub mod stats;

// Re-export main types for convenience
pub use buffer::{load_buffer, save_buffer, ClippedRegion, RasterBuffer, Region};
pub use engine::{
    apply_halftone, apply_halftone_file, HalftoneConfig, HalftoneEngine, HalftoneError,
    HalftoneParams, HalftoneReport, Result,
};
pub use jitter::{JitterSource, NoJitter, SeededJitter};
pub use occupancy::OccupancyGrid;
pub use raster::Tile;
pub use session::{EditorSession, Scope};
