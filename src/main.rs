/**
 * FM Halftone CLI - command-line front end for adaptive FM screening
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use fm_halftone::session::DEFAULT_MAX_WIDTH;
use fm_halftone::{
    EditorSession, HalftoneConfig, HalftoneEngine, HalftoneParams, NoJitter, Region, Scope,
};

/// Render an image as adaptive FM halftone dots
#[derive(Parser)]
#[command(name = "fm-halftone")]
#[command(version)]
#[command(about = "Adaptive FM screening with anti-aliased dots", long_about = None)]
struct Cli {
    /// Input image path
    #[arg(short, long)]
    input: PathBuf,

    /// Output image path
    #[arg(short, long)]
    output: PathBuf,

    /// Smallest dot tile size in pixels
    #[arg(long, default_value_t = HalftoneConfig::DEFAULT_MIN_DOT_SIZE)]
    min_dot: u32,

    /// Largest dot tile size in pixels
    #[arg(long, default_value_t = HalftoneConfig::DEFAULT_MAX_DOT_SIZE)]
    max_dot: u32,

    /// Spacing between dots as a percentage of the radius (0-100)
    #[arg(short, long, default_value_t = HalftoneConfig::DEFAULT_SPACING_PERCENT)]
    spacing: f32,

    /// Contrast adjustment (1.0 = normal, >1 = more contrast, <1 = less)
    #[arg(short, long, default_value_t = HalftoneConfig::DEFAULT_CONTRAST)]
    contrast: f32,

    /// Threshold below which dots are shrunk (0-255)
    #[arg(short, long, default_value_t = HalftoneConfig::DEFAULT_THRESHOLD)]
    threshold: u32,

    /// Only screen this region, given as x,y,width,height
    #[arg(short, long, value_parser = parse_region)]
    region: Option<Region>,

    /// Scale images wider than this down before screening
    #[arg(long, default_value_t = DEFAULT_MAX_WIDTH)]
    max_width: u32,

    /// Random seed for reproducible jitter
    #[arg(long)]
    seed: Option<u32>,

    /// Disable radius jitter entirely
    #[arg(long, conflicts_with = "seed")]
    no_jitter: bool,

    /// Show detailed progress
    #[arg(short, long)]
    verbose: bool,
}

fn parse_region(value: &str) -> std::result::Result<Region, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(format!("expected x,y,width,height but got '{value}'"));
    }

    let mut numbers = [0i64; 4];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{part}' is not an integer"))?;
    }

    Ok(Region::new(numbers[0], numbers[1], numbers[2], numbers[3]))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // Validate inputs
    if !cli.input.exists() {
        anyhow::bail!("Input file does not exist: {}", cli.input.display());
    }
    if cli.max_width == 0 {
        anyhow::bail!("Max width must be positive");
    }

    let config = HalftoneConfig {
        params: HalftoneParams {
            min_dot_size: cli.min_dot,
            max_dot_size: cli.max_dot,
            spacing_percent: cli.spacing,
            contrast: cli.contrast,
            threshold: cli.threshold,
        },
        seed: cli.seed,
        verbose: cli.verbose,
    };
    let engine = HalftoneEngine::new(config).context("Invalid halftone parameters")?;

    println!("Processing: {}", cli.input.display());
    println!("Output: {}", cli.output.display());
    println!(
        "Dot sizes: {}-{}px",
        engine.params().base_size(),
        engine.params().max_size()
    );
    println!(
        "Contrast: {}  Threshold: {}  Spacing: {}%",
        cli.contrast, cli.threshold, cli.spacing
    );
    if let Some(r) = &cli.region {
        println!("Region: {},{} {}×{}", r.x, r.y, r.width, r.height);
    }
    if let Some(s) = cli.seed {
        println!("Seed: {}", s);
    }
    println!();

    // Create output directory if it doesn't exist
    if let Some(parent) = cli.output.parent() {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    let mut session = EditorSession::open(&cli.input, Some(cli.max_width))
        .context("Failed to load input image")?;

    let scope = match cli.region {
        Some(region) => {
            session.set_selection(region);
            Scope::Selection
        }
        None => Scope::WholeImage,
    };

    let report = if cli.no_jitter {
        session.apply_with_jitter(scope, &engine, &mut NoJitter)
    } else {
        session.apply(scope, &engine)
    }
    .context("Failed to apply halftone")?;

    session
        .save(&cli.output)
        .context("Failed to save halftone image")?;

    for (size, count) in &report.adaptive_tiles {
        println!("{}px tiles: {}", size, count);
    }
    println!(
        "{}px tiles: {}",
        engine.params().base_size(),
        report.gap_fill_tiles
    );
    println!("Halftone image saved to: {}", cli.output.display());
    println!();
    println!("Done!");

    Ok(())
}
