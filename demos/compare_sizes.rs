/**
 * Example: Compare dot size ranges
 *
 * Screens the same image with several min/max dot size pairs and reports
 * how the adaptive pass distributes tiles and how long each run takes.
 *
 * Run with:
 *   cargo run --example compare_sizes --release
 */

use fm_halftone::{
    save_buffer, HalftoneConfig, HalftoneEngine, HalftoneParams, NoJitter, RasterBuffer, Region,
};
use std::time::Instant;

fn test_image(size: usize) -> RasterBuffer {
    // Radial gradient: flat in the middle, a ring of fine detail outside
    let center = size as f32 / 2.0;
    RasterBuffer::from_fn(size, size, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let dist = (dx * dx + dy * dy).sqrt() / center;
        let v = if dist > 0.7 && (x + y) % 4 < 2 {
            255
        } else {
            ((1.0 - dist.min(1.0)) * 255.0) as u8
        };
        [v, v, v, 255]
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("FM Halftone Size Comparison\n");
    println!(
        "{:<12} {:<30} {:<12} {:<15}",
        "Sizes", "Adaptive tiles", "Time (ms)", "Output File"
    );
    println!("{}", "-".repeat(75));

    let source = test_image(256);

    for (min, max) in [(4u32, 4u32), (4, 8), (4, 16), (6, 24)] {
        let engine = HalftoneEngine::new(HalftoneConfig {
            params: HalftoneParams {
                min_dot_size: min,
                max_dot_size: max,
                ..Default::default()
            },
            ..Default::default()
        })?;

        let mut buffer = source.clone();
        let start = Instant::now();
        let report = engine.apply_with_jitter(&mut buffer, Region::full(256, 256), &mut NoJitter)?;
        let elapsed = start.elapsed().as_secs_f64() * 1000.0;

        let filename = format!("example-sizes-{}-{}.png", min, max);
        save_buffer(&buffer, &filename)?;

        let adaptive: Vec<String> = report
            .adaptive_tiles
            .iter()
            .map(|(size, count)| format!("{}px×{}", size, count))
            .collect();

        println!(
            "{:<12} {:<30} {:<12.2} {}",
            format!("{}-{}px", min, max),
            if adaptive.is_empty() {
                "-".to_string()
            } else {
                adaptive.join(" ")
            },
            elapsed,
            filename
        );
    }

    println!("\n✓ All variants written!");
    println!("\nKey observations:");
    println!("  - Equal sizes skip the adaptive pass entirely");
    println!("  - Wider ranges put large tiles on the flat center");
    println!("  - The detailed outer ring always stays on base tiles");

    Ok(())
}
