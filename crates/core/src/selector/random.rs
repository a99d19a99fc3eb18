//! Uniform random draws used by the selector.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Source of the selector's random choices.
///
/// Every draw is uniform and independent; there is no weighting and no memory
/// of earlier selections.
pub trait Randomness: Send {
    /// Index in `0..len`. Callers guarantee `len > 0`.
    fn index(&mut self, len: usize) -> usize;

    /// Page number in `1..=max_page`. Callers guarantee `max_page > 0`.
    fn page(&mut self, max_page: u32) -> u32;

    /// Permutation of `0..len`.
    fn permutation(&mut self, len: usize) -> Vec<usize>;
}

/// [`Randomness`] backed by a `StdRng`.
pub struct StdRandomness {
    rng: StdRng,
}

impl StdRandomness {
    /// Seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandomness {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Randomness for StdRandomness {
    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn page(&mut self, max_page: u32) -> u32 {
        self.rng.gen_range(1..=max_page)
    }

    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut self.rng);
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_stay_in_range() {
        let mut random = StdRandomness::seeded(7);
        for _ in 0..500 {
            assert!(random.index(3) < 3);
            let page = random.page(100);
            assert!((1..=100).contains(&page));
        }
    }

    #[test]
    fn test_permutation_covers_all_indices() {
        let mut random = StdRandomness::seeded(42);
        let mut order = random.permutation(25);
        order.sort_unstable();
        assert_eq!(order, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = StdRandomness::seeded(99);
        let mut b = StdRandomness::seeded(99);
        let draws_a: Vec<_> = (0..10).map(|_| a.index(1000)).collect();
        let draws_b: Vec<_> = (0..10).map(|_| b.index(1000)).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn test_every_page_is_reachable() {
        let mut random = StdRandomness::seeded(3);
        let mut seen = [false; 5];
        for _ in 0..1000 {
            seen[(random.page(5) - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
