//! RNG module - history-biased piece generation
//!
//! Draws piece kinds from a pool of 5 copies of each of the 7 kinds,
//! rejecting any candidate found in the history of the last 4 emitted kinds.
//! The result is an unbounded, stateful sequence biased against short-term
//! repeats.
//!
//! Randomness comes from a simple seedable LCG so identical seeds reproduce
//! identical piece sequences on every platform.

use crate::types::PieceKind;

/// Copies of each kind the pool is (re)filled with.
const POOL_COPIES: usize = 5;
/// Emitted kinds remembered for repeat rejection.
const HISTORY_LEN: usize = 4;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }
}

/// History-biased kind generator.
///
/// Carries pool and history internally; there is no global state and the
/// sequence is not restartable. One instance feeds one game session.
#[derive(Debug, Clone)]
pub struct KindRandomizer {
    pool: Vec<PieceKind>,
    /// Last emitted kinds, oldest first. Seeded with uniform rolls before
    /// the first draw, so the opening draws are biased too.
    history: [PieceKind; HISTORY_LEN],
    rng: SimpleRng,
}

impl KindRandomizer {
    /// Create a new randomizer with the given seed
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let history =
            std::array::from_fn(|_| PieceKind::ALL[rng.next_range(7) as usize]);
        let mut randomizer = Self {
            pool: Vec::with_capacity(POOL_COPIES * PieceKind::ALL.len()),
            history,
            rng,
        };
        randomizer.refill_pool();
        randomizer
    }

    fn refill_pool(&mut self) {
        self.pool.clear();
        for _ in 0..POOL_COPIES {
            self.pool.extend_from_slice(&PieceKind::ALL);
        }
    }

    /// Draw the next piece kind.
    ///
    /// Uniformly samples the pool, resampling (from the unfiltered pool)
    /// while the candidate appears in the history. The accepted kind loses
    /// one pool instance and pushes out the oldest history entry.
    pub fn next_kind(&mut self) -> PieceKind {
        // A nearly drained pool can consist entirely of recent kinds, in
        // which case no roll is ever acceptable; restock before sampling.
        // Afterwards at least 3 kinds outside the 4-entry history remain,
        // and the LCG never repeats a state within its period, so the
        // rejection loop cannot spin forever.
        if self
            .pool
            .iter()
            .all(|kind| self.history.contains(kind))
        {
            self.refill_pool();
        }

        let mut idx = self.rng.next_range(self.pool.len() as u32) as usize;
        while self.history.contains(&self.pool[idx]) {
            idx = self.rng.next_range(self.pool.len() as u32) as usize;
        }
        let accepted = self.pool.swap_remove(idx);
        if self.pool.is_empty() {
            self.refill_pool();
        }

        self.history.rotate_left(1);
        self.history[HISTORY_LEN - 1] = accepted;
        accepted
    }

    /// The last emitted kinds, oldest first.
    pub fn history(&self) -> &[PieceKind; HISTORY_LEN] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        let a = rng.next_u32();
        let b = rng.next_u32();
        assert_ne!(a, b);
    }

    #[test]
    fn test_randomizer_deterministic() {
        let mut r1 = KindRandomizer::new(98765);
        let mut r2 = KindRandomizer::new(98765);

        for _ in 0..500 {
            assert_eq!(r1.next_kind(), r2.next_kind());
        }
    }

    #[test]
    fn test_draw_never_matches_recent_history() {
        let mut randomizer = KindRandomizer::new(42);
        for _ in 0..10_000 {
            let before = *randomizer.history();
            let drawn = randomizer.next_kind();
            assert!(
                !before.contains(&drawn),
                "drew {drawn:?} with history {before:?}"
            );
        }
    }

    #[test]
    fn test_pool_refills_indefinitely() {
        let mut randomizer = KindRandomizer::new(7);
        // Several times the pool size; must keep producing without panic.
        for _ in 0..200 {
            randomizer.next_kind();
        }
    }

    #[test]
    fn test_each_kind_eventually_appears() {
        let mut randomizer = KindRandomizer::new(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(randomizer.next_kind());
        }
        assert_eq!(seen.len(), PieceKind::ALL.len());
    }
}
