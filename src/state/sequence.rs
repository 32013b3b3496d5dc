//! Level generation.
//!
//! A level is a secret order drawn without replacement from the symbol pool,
//! plus a starting arrangement that has no symbol in its correct place.

use std::collections::HashSet;
use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::error::PoolError;

/// Symbols in play at level 0.
pub const BASE_SEQUENCE_LENGTH: usize = 3;

/// An opaque token the players arrange. Only identity matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Symbol {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Build a pool from string tokens.
pub fn pool_of<I, S>(tokens: I) -> Vec<Symbol>
where
    I: IntoIterator<Item = S>,
    S: Into<Symbol>,
{
    tokens.into_iter().map(Into::into).collect()
}

/// The secret order and the arrangement players start from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelLayout {
    pub secret: Vec<Symbol>,
    pub start: Vec<Symbol>,
}

impl LevelLayout {
    pub fn len(&self) -> usize {
        self.secret.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }
}

/// Number of symbols in play for a level.
pub fn sequence_length(level: u32, pool_size: usize) -> usize {
    let wanted = BASE_SEQUENCE_LENGTH.saturating_add(level as usize);
    wanted.min(pool_size)
}

/// Count positions where both sequences hold the same symbol.
///
/// Sequences of different length never match anywhere.
pub fn correct_positions<T: PartialEq>(arrangement: &[T], target: &[T]) -> usize {
    if arrangement.len() != target.len() {
        return 0;
    }
    arrangement
        .iter()
        .zip(target)
        .filter(|(a, b)| a == b)
        .count()
}

/// True when no element of `candidate` sits at its index in `reference`.
pub fn is_derangement<T: PartialEq>(candidate: &[T], reference: &[T]) -> bool {
    candidate.len() == reference.len() && candidate.iter().zip(reference).all(|(a, b)| a != b)
}

/// Uniformly random derangement by rejection sampling.
///
/// One or zero items cannot be deranged; they come back unchanged.
pub fn derange<T, R>(items: &[T], rng: &mut R) -> Vec<T>
where
    T: PartialEq + Clone,
    R: Rng + ?Sized,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let mut candidate = items.to_vec();
    loop {
        candidate.shuffle(rng);
        if is_derangement(&candidate, items) {
            return candidate;
        }
    }
}

/// Check that a pool can feed level generation.
pub fn validate_pool(pool: &[Symbol]) -> Result<(), PoolError> {
    if pool.is_empty() {
        return Err(PoolError::Empty);
    }

    let mut seen = HashSet::with_capacity(pool.len());
    for symbol in pool {
        if !seen.insert(symbol) {
            return Err(PoolError::DuplicateSymbol {
                symbol: symbol.as_str().to_string(),
            });
        }
    }
    Ok(())
}

/// Draw a level from `pool`.
pub fn generate_level<R>(pool: &[Symbol], level: u32, rng: &mut R) -> Result<LevelLayout, PoolError>
where
    R: Rng + ?Sized,
{
    validate_pool(pool)?;

    let num_items = sequence_length(level, pool.len());
    let mut drawn = pool.to_vec();
    drawn.shuffle(rng);
    drawn.truncate(num_items);

    let start = derange(&drawn, rng);
    Ok(LevelLayout {
        secret: drawn,
        start,
    })
}

/// Source of level layouts for the engine.
pub trait LevelGenerator {
    fn generate(&mut self, pool: &[Symbol], level: u32) -> Result<LevelLayout, PoolError>;
}

/// Default generator: shuffles the pool with its own RNG.
#[derive(Debug, Clone)]
pub struct ShuffledLevels<R = StdRng> {
    rng: R,
}

impl<R: Rng> ShuffledLevels<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl ShuffledLevels<StdRng> {
    /// Reproducible levels.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl Default for ShuffledLevels<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> LevelGenerator for ShuffledLevels<R> {
    fn generate(&mut self, pool: &[Symbol], level: u32) -> Result<LevelLayout, PoolError> {
        generate_level(pool, level, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn letters(n: usize) -> Vec<Symbol> {
        ('A'..='Z').take(n).map(|c| Symbol::new(c.to_string())).collect()
    }

    #[test]
    fn test_sequence_length() {
        assert_eq!(sequence_length(0, 10), 3);
        assert_eq!(sequence_length(4, 10), 7);
        assert_eq!(sequence_length(9, 10), 10);
        assert_eq!(sequence_length(20, 10), 10);
        assert_eq!(sequence_length(0, 2), 2);
    }

    #[test]
    fn test_correct_positions() {
        let target = pool_of(["A", "B", "C", "D"]);
        assert_eq!(correct_positions(&pool_of(["A", "B", "C", "D"]), &target), 4);
        assert_eq!(correct_positions(&pool_of(["B", "A", "C", "D"]), &target), 2);
        assert_eq!(correct_positions(&pool_of(["D", "C", "B", "A"]), &target), 0);
        assert_eq!(correct_positions(&pool_of(["A", "B"]), &target), 0);
    }

    #[test]
    fn test_swapping_equal_elements_keeps_count() {
        let target = [1, 2, 1, 3];
        let mut arrangement = [1, 3, 1, 2];
        let before = correct_positions(&arrangement, &target);
        arrangement.swap(0, 2);
        assert_eq!(correct_positions(&arrangement, &target), before);
    }

    #[test]
    fn test_derange_small_inputs_unchanged() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: Vec<Symbol> = Vec::new();
        assert_eq!(derange(&empty, &mut rng), empty);

        let single = letters(1);
        assert_eq!(derange(&single, &mut rng), single);
    }

    #[test]
    fn test_derange_has_no_fixed_points() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 2..=10 {
            let items = letters(n);
            for _ in 0..50 {
                let deranged = derange(&items, &mut rng);
                assert!(is_derangement(&deranged, &items), "{:?}", deranged);

                let mut sorted = deranged.clone();
                sorted.sort();
                assert_eq!(sorted, items);
            }
        }
    }

    #[test]
    fn test_generate_level_properties() {
        let pool = letters(8);
        let mut rng = StdRng::seed_from_u64(42);

        for level in 0..8 {
            let layout = generate_level(&pool, level, &mut rng).unwrap();
            assert_eq!(layout.len(), sequence_length(level, pool.len()));
            assert!(layout.secret.iter().all(|s| pool.contains(s)));

            let distinct: HashSet<_> = layout.secret.iter().collect();
            assert_eq!(distinct.len(), layout.len());

            let mut secret = layout.secret.clone();
            let mut start = layout.start.clone();
            secret.sort();
            start.sort();
            assert_eq!(secret, start);

            assert!(is_derangement(&layout.start, &layout.secret));
        }
    }

    #[test]
    fn test_generate_level_single_symbol_pool() {
        let pool = letters(1);
        let mut rng = StdRng::seed_from_u64(3);
        let layout = generate_level(&pool, 0, &mut rng).unwrap();
        assert_eq!(layout.secret, pool);
        assert_eq!(layout.start, pool);
        assert_eq!(layout.len(), 1);
        assert!(!layout.is_empty());
    }

    #[test]
    fn test_generate_level_rejects_bad_pools() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(generate_level(&[], 0, &mut rng), Err(PoolError::Empty));

        let pool = pool_of(["A", "B", "A"]);
        assert_eq!(
            generate_level(&pool, 0, &mut rng),
            Err(PoolError::DuplicateSymbol {
                symbol: "A".to_string()
            })
        );
    }

    #[test]
    fn test_seeded_generator_is_reproducible() {
        let pool = letters(10);
        let mut a = ShuffledLevels::seeded(99);
        let mut b = ShuffledLevels::seeded(99);
        for level in 0..4 {
            assert_eq!(
                a.generate(&pool, level).unwrap(),
                b.generate(&pool, level).unwrap()
            );
        }
    }
}
