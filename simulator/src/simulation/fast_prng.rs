//! Per-patient random streams and empirical sampling.
//!
//! Every patient owns a [`SplitMix64`] seeded with its own identifier, so a
//! trajectory depends only on `(identifier, parameters, horizon)` and never on the
//! order in which patients are simulated. SplitMix64 keeps a single u64 of
//! state, has no warm-up, and its output for a given seed is fixed by the
//! algorithm rather than by a library version.
//!
//! [`SplitMix64`] also implements `rand::RngCore`/`SeedableRng`, which lets
//! bootstrap resampling use `rand::Rng` helpers on a stream of its own.

use rand::{RngCore, SeedableRng};

/// 2^-53: scales the top 53 bits of a u64 into [0, 1).
const F64_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// SplitMix64 PRNG with a single u64 of state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Create from seed (the stream identifier).
    #[inline(always)]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate next u64.
    #[inline(always)]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    /// Uniform draw in [0, 1) with 53 bits of precision.
    #[inline(always)]
    pub fn draw(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * F64_UNIT
    }
}

impl RngCore for SplitMix64 {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        (SplitMix64::next_u64(self) >> 32) as u32
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        SplitMix64::next_u64(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = SplitMix64::next_u64(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for SplitMix64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

/// Map a uniform draw to a destination index by inverse CDF.
///
/// Returns the first index whose cumulative probability exceeds `u`. When
/// rounding leaves the cumulative sum just below `u` at the end of the row, the
/// last index with non-zero probability is returned instead of the literal
/// final index, so trailing zero-probability states are never selected.
#[inline]
pub fn index_for_draw(probabilities: &[f64], u: f64) -> usize {
    let mut cumulative = 0.0;
    let mut last_nonzero = probabilities.len().saturating_sub(1);
    for (i, &p) in probabilities.iter().enumerate() {
        if p > 0.0 {
            last_nonzero = i;
        }
        cumulative += p;
        if u < cumulative {
            return i;
        }
    }
    last_nonzero
}

/// Sample an index from an empirical distribution using one draw of `rng`.
#[inline]
pub fn sample_index(probabilities: &[f64], rng: &mut SplitMix64) -> usize {
    index_for_draw(probabilities, rng.draw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_splitmix64_deterministic() {
        let mut rng1 = SplitMix64::new(42);
        let mut rng2 = SplitMix64::new(42);
        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_adjacent_seeds_diverge() {
        let mut rng1 = SplitMix64::new(7);
        let mut rng2 = SplitMix64::new(8);
        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_draw_range() {
        let mut rng = SplitMix64::new(12345);
        for _ in 0..10000 {
            let u = rng.draw();
            assert!((0.0..1.0).contains(&u), "draw out of range: {}", u);
        }
    }

    #[test]
    fn test_seedable_matches_new() {
        let mut a = SplitMix64::seed_from_u64(99);
        let mut b = SplitMix64::from_seed(99u64.to_le_bytes());
        let mut c = SplitMix64::new(99);
        let x = c.next_u64();
        assert_eq!(RngCore::next_u64(&mut a), x);
        assert_eq!(RngCore::next_u64(&mut b), x);
    }

    #[test]
    fn test_rng_trait_range() {
        let mut rng = SplitMix64::new(3);
        for _ in 0..1000 {
            let i = rng.random_range(0..17usize);
            assert!(i < 17);
        }
    }

    #[test]
    fn test_index_for_draw_boundaries() {
        let row = [0.75, 0.10, 0.0, 0.15];
        assert_eq!(index_for_draw(&row, 0.0), 0);
        assert_eq!(index_for_draw(&row, 0.7499), 0);
        assert_eq!(index_for_draw(&row, 0.75), 1);
        assert_eq!(index_for_draw(&row, 0.8499), 1);
        // Zero-probability bucket is never selected.
        assert_eq!(index_for_draw(&row, 0.85), 3);
        assert_eq!(index_for_draw(&row, 0.999_999), 3);
    }

    #[test]
    fn test_index_for_draw_rounding_fallback() {
        // Sums to slightly less than 1; a draw above the sum falls back to the
        // last bucket with mass, not to a trailing zero entry.
        let row = [0.3, 0.3, 0.399_999_999_9, 0.0];
        assert_eq!(index_for_draw(&row, 0.999_999_999_99), 2);
    }

    #[test]
    fn test_sample_index_distribution() {
        let row = [0.2, 0.5, 0.3];
        let mut rng = SplitMix64::new(42);
        let mut counts = [0u32; 3];
        let n = 100_000;
        for _ in 0..n {
            counts[sample_index(&row, &mut rng)] += 1;
        }
        for (i, &p) in row.iter().enumerate() {
            let ratio = counts[i] as f64 / (p * n as f64);
            assert!(
                ratio > 0.97 && ratio < 1.03,
                "bucket {} has count {} (ratio {:.3})",
                i,
                counts[i],
                ratio
            );
        }
    }
}
