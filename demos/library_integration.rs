/**
 * Example: Using fm-halftone as a library
 *
 * Shows in-memory use with `image` buffers, region screening, and a custom
 * jitter source plugged into the engine.
 *
 * Run with:
 *   cargo run --example library_integration
 */

use fm_halftone::{
    HalftoneConfig, HalftoneEngine, HalftoneParams, JitterSource, RasterBuffer, Region,
};
use image::RgbaImage;

/// Cycles through a fixed list of offsets
struct PatternJitter {
    offsets: Vec<f32>,
    next: usize,
}

impl JitterSource for PatternJitter {
    fn next_offset(&mut self) -> f32 {
        let value = self.offsets[self.next % self.offsets.len()];
        self.next += 1;
        value
    }
}

fn create_test_image() -> RgbaImage {
    // 200×200 radial gradient
    let size = 200;
    let center = size as f32 / 2.0;
    let max_dist = (2.0 * center * center).sqrt();

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let value = ((1.0 - (dx * dx + dy * dy).sqrt() / max_dist) * 255.0) as u8;
        image::Rgba([value, value / 2, 255 - value, 255])
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("FM Halftone Library Integration Example\n");

    let engine = HalftoneEngine::new(HalftoneConfig {
        params: HalftoneParams {
            min_dot_size: 3,
            max_dot_size: 12,
            spacing_percent: 10.0,
            contrast: 1.4,
            threshold: 80,
        },
        seed: Some(7),
        verbose: false,
    })?;

    // Example 1: whole image, seeded jitter
    println!("Example 1: Whole image from an `image` buffer");
    let mut buffer = RasterBuffer::from_rgba_image(create_test_image());
    let whole = Region::full(buffer.width(), buffer.height());
    let report = engine.apply(&mut buffer, whole)?;
    println!("  placed {} tiles", report.total_tiles());
    buffer.into_rgba_image()?.save("example-lib-whole.png")?;
    println!("  ✓ Saved to example-lib-whole.png\n");

    // Example 2: region hanging off the top-left corner
    println!("Example 2: Region partly outside the image");
    let mut buffer = RasterBuffer::from_rgba_image(create_test_image());
    let report = engine.apply(&mut buffer, Region::new(-50, -50, 150, 150))?;
    if let Some(region) = report.region {
        println!(
            "  clipped to {},{} {}×{}",
            region.x, region.y, region.width, region.height
        );
    }
    buffer.into_rgba_image()?.save("example-lib-corner.png")?;
    println!("  ✓ Saved to example-lib-corner.png\n");

    // Example 3: custom jitter source
    println!("Example 3: Custom jitter pattern");
    let mut jitter = PatternJitter {
        offsets: vec![-0.5, -0.25, 0.0, 0.25, 0.49],
        next: 0,
    };
    let mut buffer = RasterBuffer::from_rgba_image(create_test_image());
    engine.apply_with_jitter(&mut buffer, Region::full(200, 200), &mut jitter)?;
    println!("  drew {} jitter samples", jitter.next);
    buffer.into_rgba_image()?.save("example-lib-pattern.png")?;
    println!("  ✓ Saved to example-lib-pattern.png\n");

    println!("✓ All examples completed!");
    Ok(())
}
