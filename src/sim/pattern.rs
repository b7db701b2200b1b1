//! Pattern generation
//!
//! Pure function of its inputs and the injected RNG. The controller seeds a
//! `Pcg32` so whole games replay identically.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::registry::TargetId;

/// Ordered sequence of targets the player must reproduce
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    targets: Vec<TargetId>,
}

impl Pattern {
    pub fn new(targets: Vec<TargetId>) -> Self {
        Self { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Target expected at cursor position `index`
    pub fn get(&self, index: usize) -> Option<TargetId> {
        self.targets.get(index).copied()
    }

    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    pub fn iter(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.targets.iter().copied()
    }
}

/// Result of a generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDraw {
    pub pattern: Pattern,
    /// Length the caller asked for
    pub requested: usize,
    /// True when the registry could not supply `requested` targets
    pub truncated: bool,
}

/// Generate a pattern of `length` targets drawn from a registry of `registry_size`.
///
/// Without duplicates the registry is Fisher-Yates shuffled and the first
/// `min(length, registry_size)` entries are taken. With duplicates every slot
/// is an independent uniform draw. An empty registry always yields an empty
/// pattern, flagged as truncated when `length > 0`.
pub fn generate<R: Rng>(
    rng: &mut R,
    length: usize,
    allow_duplicates: bool,
    registry_size: usize,
) -> PatternDraw {
    if registry_size == 0 {
        return PatternDraw {
            pattern: Pattern::default(),
            requested: length,
            truncated: length > 0,
        };
    }

    if allow_duplicates {
        let targets = (0..length)
            .map(|_| TargetId(rng.random_range(0..registry_size)))
            .collect();
        return PatternDraw {
            pattern: Pattern::new(targets),
            requested: length,
            truncated: false,
        };
    }

    let actual = length.min(registry_size);
    let mut pool: Vec<TargetId> = (0..registry_size).map(TargetId).collect();
    shuffle(rng, &mut pool);
    pool.truncate(actual);

    PatternDraw {
        pattern: Pattern::new(pool),
        requested: length,
        truncated: length > registry_size,
    }
}

/// In-place Fisher-Yates: slot `i` swaps with a uniform pick from `[i, n)`
fn shuffle<T, R: Rng>(rng: &mut R, items: &mut [T]) {
    let n = items.len();
    for i in 0..n {
        let j = rng.random_range(i..n);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    #[test]
    fn test_truncation_is_reported() {
        let mut rng = Pcg32::seed_from_u64(7);
        let draw = generate(&mut rng, 12, false, 9);
        assert!(draw.truncated);
        assert_eq!(draw.requested, 12);
        assert_eq!(draw.pattern.len(), 9);
    }

    #[test]
    fn test_duplicates_allowed_never_truncates() {
        let mut rng = Pcg32::seed_from_u64(7);
        let draw = generate(&mut rng, 20, true, 3);
        assert!(!draw.truncated);
        assert_eq!(draw.pattern.len(), 20);
        assert!(draw.pattern.iter().all(|t| t.0 < 3));
    }

    #[test]
    fn test_empty_registry_yields_empty_pattern() {
        let mut rng = Pcg32::seed_from_u64(1);
        let draw = generate(&mut rng, 3, true, 0);
        assert!(draw.pattern.is_empty());
        assert!(draw.truncated);

        let draw = generate(&mut rng, 0, false, 0);
        assert!(draw.pattern.is_empty());
        assert!(!draw.truncated);
    }

    #[test]
    fn test_same_seed_same_pattern() {
        let mut a = Pcg32::seed_from_u64(4242);
        let mut b = Pcg32::seed_from_u64(4242);
        assert_eq!(generate(&mut a, 5, false, 9), generate(&mut b, 5, false, 9));
    }

    proptest! {
        #[test]
        fn prop_unique_pattern_is_distinct_and_valid(
            seed in any::<u64>(),
            registry_size in 1usize..16,
            length in 0usize..16,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let draw = generate(&mut rng, length, false, registry_size);

            prop_assert_eq!(draw.pattern.len(), length.min(registry_size));
            prop_assert_eq!(draw.truncated, length > registry_size);

            let unique: HashSet<_> = draw.pattern.iter().collect();
            prop_assert_eq!(unique.len(), draw.pattern.len());
            prop_assert!(draw.pattern.iter().all(|t| t.0 < registry_size));
        }
    }
}
