//! Seeded random number generation.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates an RNG from `seed`, or from OS entropy when `seed` is `None`.
pub fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => create_rng(s),
        None => create_rng(rand::random()),
    }
}

/// Draws a multiplier uniformly from the inclusive range `(lo, hi)`.
///
/// A degenerate range returns `lo` without consuming randomness.
pub(crate) fn draw_multiplier<R: rand::Rng>(range: (f64, f64), rng: &mut R) -> f64 {
    let (lo, hi) = range;
    if hi <= lo {
        lo
    } else {
        rng.random_range(lo..=hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = create_rng(7);
        let mut b = create_rng(7);
        let xs: Vec<u32> = (0..8).map(|_| a.random()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_draw_multiplier_bounds() {
        let mut rng = create_rng(1);
        assert_eq!(draw_multiplier((1.0, 1.0), &mut rng), 1.0);
        for _ in 0..100 {
            let m = draw_multiplier((0.5, 2.0), &mut rng);
            assert!((0.5..=2.0).contains(&m));
        }
    }
}
