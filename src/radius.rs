/**
 * Dot Radius Mapping
 *
 * Converts a contrast-adjusted gray level into a dot radius. Darker input
 * gives larger dots. Values at or below the threshold are compressed by half
 * so flat midtones do not turn into heavy dots. The result is bounded away
 * from both zero and half the tile size, so every tile shows some dot and
 * some background.
 */

/// Lower radius bound as a fraction of the tile size
pub const MIN_RADIUS_FACTOR: f32 = 0.15;
/// Lower radius bound as a fraction of the smallest dot size
pub const GLOBAL_MIN_RADIUS_FACTOR: f32 = 0.3;
/// Upper radius bound as a fraction of the tile size
pub const MAX_RADIUS_FACTOR: f32 = 0.42;
/// Compression applied to inverted values at or below the threshold
const BELOW_THRESHOLD_SCALE: f32 = 0.5;

/// Radius range `[min, max]` for a tile of `dot_size` pixels
#[inline]
pub fn radius_bounds(dot_size: u32, global_min_dot_size: u32) -> (f32, f32) {
    let size = dot_size as f32;
    let min_radius =
        (size * MIN_RADIUS_FACTOR).max(global_min_dot_size as f32 * GLOBAL_MIN_RADIUS_FACTOR);
    (min_radius, size * MAX_RADIUS_FACTOR)
}

/// Dot coverage in `[0, 1]` for an adjusted gray level
#[inline]
pub fn coverage(adjusted_gray: f32, threshold: u32) -> f32 {
    let inverted = 255.0 - adjusted_gray;
    let shaped = if inverted > threshold as f32 {
        inverted
    } else {
        inverted * BELOW_THRESHOLD_SCALE
    };
    (shaped / 255.0).clamp(0.0, 1.0)
}

/// Dot radius for one tile.
///
/// `global_min_dot_size` is the smallest tile size in use for the run; it
/// keeps dots in large tiles from shrinking below what the finest tiles show.
pub fn dot_radius(
    adjusted_gray: f32,
    dot_size: u32,
    threshold: u32,
    global_min_dot_size: u32,
) -> f32 {
    let t = coverage(adjusted_gray, threshold);
    let (min_radius, max_radius) = radius_bounds(dot_size, global_min_dot_size);
    min_radius + (max_radius - min_radius) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_gives_min_radius() {
        let r = dot_radius(255.0, 10, 128, 4);
        assert!((r - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_black_gives_max_radius() {
        let r = dot_radius(0.0, 10, 128, 4);
        assert!((r - 4.2).abs() < 1e-5);
    }

    #[test]
    fn test_threshold_compresses() {
        // inverted = 100; below threshold 150 → 50
        assert!((coverage(155.0, 150) - 50.0 / 255.0).abs() < 1e-6);
        // above threshold 50 → untouched
        assert!((coverage(155.0, 50) - 100.0 / 255.0).abs() < 1e-6);
        // equal to threshold still compresses
        assert!((coverage(155.0, 100) - 50.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_global_min_raises_floor() {
        // 8 * 0.15 = 1.2 < 6 * 0.3 = 1.8
        let (min_radius, max_radius) = radius_bounds(8, 6);
        assert!((min_radius - 1.8).abs() < 1e-5);
        assert!((max_radius - 3.36).abs() < 1e-5);
    }

    #[test]
    fn test_radius_strictly_inside_tile() {
        for size in 1..=32u32 {
            for gray in (0..=255).step_by(5) {
                for threshold in [0u32, 64, 128, 255] {
                    let r = dot_radius(gray as f32, size, threshold, size);
                    assert!(r > 0.0, "radius must be positive");
                    assert!(r < size as f32 / 2.0, "radius must stay inside the tile");
                }
            }
        }
    }

    #[test]
    fn test_radius_monotonic_in_darkness() {
        for threshold in [0u32, 50, 128, 200, 255] {
            let mut previous = 0.0f32;
            for step in 0..=255 {
                let gray = 255.0 - step as f32;
                let r = dot_radius(gray, 12, threshold, 4);
                let (min_radius, max_radius) = radius_bounds(12, 4);
                assert!(r >= min_radius - 1e-5 && r <= max_radius + 1e-5);
                if step > 0 {
                    assert!(r >= previous - 1e-5, "darker input shrank the dot");
                }
                previous = r;
            }
        }
    }
}
