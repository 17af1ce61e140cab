/**
 * Radius Jitter Sources
 *
 * Each tile draws one jitter sample in [-0.5, 0.5) that perturbs its dot
 * radius. The source is injected into the engine so a run can be
 * reproduced from a seed, or jitter switched off entirely.
 */

/// Supplies one radius perturbation per tile
pub trait JitterSource {
    /// Next sample in `[-0.5, 0.5)`
    fn next_offset(&mut self) -> f32;
}

/// Always returns zero; output is fully determined by the input
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    #[inline]
    fn next_offset(&mut self) -> f32 {
        0.0
    }
}

/**
 * Mulberry32 seeded random number generator
 * Fast, small-state PRNG for reproducible jitter
 */
#[derive(Debug, Clone)]
pub struct SeededJitter {
    state: u32,
}

impl SeededJitter {
    /// Seeded generator; `None` seeds from the system clock
    pub fn new(seed: Option<u32>) -> Self {
        Self {
            state: seed.unwrap_or_else(clock_seed),
        }
    }

    /// Next value in `[0, 1)`
    pub fn next_unit(&mut self) -> f32 {
        self.state = self.state.wrapping_add(0x6D2B79F5);
        let mut t = self.state ^ (self.state >> 15);
        t = t.wrapping_mul(1 | self.state);
        t ^= t.wrapping_add(t.wrapping_mul(t ^ (t >> 7)).wrapping_mul(61 | t));
        // f64 keeps values just under 2^32 from rounding up to 1.0
        (((t ^ (t >> 14)) as f64) / 4294967296.0) as f32
    }
}

impl JitterSource for SeededJitter {
    #[inline]
    fn next_offset(&mut self) -> f32 {
        (self.next_unit() - 0.5).clamp(-0.5, 0.5 - f32::EPSILON)
    }
}

impl<J: JitterSource + ?Sized> JitterSource for &mut J {
    #[inline]
    fn next_offset(&mut self) -> f32 {
        (**self).next_offset()
    }
}

fn clock_seed() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(0x9E37_79B9)
}
