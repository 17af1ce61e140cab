/**
 * Example: Screen a synthetic image
 *
 * Builds a gradient with a detailed stripe, screens it once as a whole and
 * once through a selection, and writes both results.
 *
 * Run with:
 *   cargo run --example screen_gradient
 */

use fm_halftone::{
    EditorSession, HalftoneConfig, HalftoneEngine, HalftoneParams, RasterBuffer, Scope,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("FM Halftone Example\n");

    // Horizontal gradient with a striped band across the middle
    println!("Step 1: Creating test image...");
    let (width, height) = (320, 200);
    let buffer = RasterBuffer::from_fn(width, height, |x, y| {
        if (80..120).contains(&y) && (x / 3) % 2 == 0 {
            [20, 20, 20, 255]
        } else {
            let v = (x * 255 / (width - 1)) as u8;
            [v, v, v, 255]
        }
    });
    let mut session = EditorSession::from_buffer(buffer);
    println!("  ✓ Created {}×{} gradient\n", width, height);

    let engine = HalftoneEngine::new(HalftoneConfig {
        params: HalftoneParams {
            min_dot_size: 4,
            max_dot_size: 16,
            spacing_percent: 5.0,
            contrast: 1.2,
            threshold: 100,
        },
        seed: Some(42),
        verbose: false,
    })?;

    println!("Step 2: Screening the whole image...");
    let report = session.apply(Scope::WholeImage, &engine)?;
    for (size, count) in &report.adaptive_tiles {
        println!("  {}px tiles: {}", size, count);
    }
    println!("  4px tiles: {}", report.gap_fill_tiles);
    session.save("example-screened-whole.png")?;
    println!("  ✓ Saved to example-screened-whole.png\n");

    println!("Step 3: Screening a selection only...");
    session.reset();
    session.select((60.0, 40.0), (260.0, 160.0));
    let report = session.apply(Scope::Selection, &engine)?;
    println!("  placed {} tiles", report.total_tiles());
    session.save("example-screened-selection.png")?;
    println!("  ✓ Saved to example-screened-selection.png\n");

    println!("✓ Done!");
    Ok(())
}
