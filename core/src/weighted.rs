//! Weighted sampling without replacement, and rank-tier weights.

use crate::{names, rng::PuzzleRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedEntity<T> {
    pub entity: T,
    pub weight: u32,
}

impl<T> WeightedEntity<T> {
    pub fn new(entity: T, weight: u32) -> Self {
        Self { entity, weight }
    }
}

/// Roulette-wheel selection without replacement.
///
/// Returns `min(count, entities.len())` distinct entities, fewer only if
/// every remaining weight is zero. Zero-weight entities are never picked.
/// Consumes one draw per selected entity. O(count × n).
pub fn sample_without_replacement<T: Clone>(
    entities: &[WeightedEntity<T>],
    count: usize,
    rng: &mut PuzzleRng,
) -> Vec<T> {
    let mut pool: Vec<&WeightedEntity<T>> = entities.iter().collect();
    let mut selected = Vec::with_capacity(count.min(pool.len()));

    while selected.len() < count && !pool.is_empty() {
        let total: u64 = pool.iter().map(|e| u64::from(e.weight)).sum();
        if total == 0 {
            log::warn!("{} entities left, all with zero weight", pool.len());
            break;
        }
        let mut r = rng.next_f64() * total as f64;
        let mut pick = None;
        for (i, e) in pool.iter().enumerate() {
            if e.weight == 0 {
                continue;
            }
            r -= f64::from(e.weight);
            pick = Some(i);
            if r <= 0.0 {
                break;
            }
        }
        // The walk always lands on a positive-weight entry: r starts
        // below `total` and the loop subtracts exactly `total`.
        let Some(i) = pick else { break };
        selected.push(pool.remove(i).entity.clone());
    }
    selected
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankTier {
    /// Inclusive upper rank bound for this tier.
    pub max_rank: u32,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankTiers {
    /// Checked in order; the first tier whose bound covers the rank wins.
    pub tiers: Vec<RankTier>,
    pub default_weight: u32,
}

impl RankTiers {
    pub fn weight_for(&self, rank: Option<u32>) -> u32 {
        rank.and_then(|r| self.tiers.iter().find(|t| r <= t.max_rank))
            .map_or(self.default_weight, |t| t.weight)
    }
}

impl Default for RankTiers {
    /// Top 20 → 5, 21–50 → 4, 51–100 → 3, everyone else → 1.
    fn default() -> Self {
        Self {
            tiers: vec![
                RankTier { max_rank: 20, weight: 5 },
                RankTier { max_rank: 50, weight: 4 },
                RankTier { max_rank: 100, weight: 3 },
            ],
            default_weight: 1,
        }
    }
}

/// External ranking keyed by normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankTable {
    ranks: HashMap<String, u32>,
}

impl RankTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` at `rank`. "Last, First" names are also
    /// registered as "First Last".
    pub fn insert(&mut self, name: &str, rank: u32) {
        self.ranks.insert(names::normalize_for_match(name), rank);
        if let Some(swapped) = names::swap_last_first(name) {
            self.ranks.insert(names::normalize_for_match(&swapped), rank);
        }
    }

    pub fn rank_of(&self, name: &str) -> Option<u32> {
        self.ranks.get(&names::normalize_for_match(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// Weight for `name`: its rank tier, or the default weight when there is
/// no table or the name is not in it.
pub fn derive_weight(name: &str, ranks: Option<&RankTable>, tiers: &RankTiers) -> u32 {
    tiers.weight_for(ranks.and_then(|t| t.rank_of(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_map_ranks_to_weights() {
        let tiers = RankTiers::default();
        assert_eq!(tiers.weight_for(Some(1)), 5);
        assert_eq!(tiers.weight_for(Some(20)), 5);
        assert_eq!(tiers.weight_for(Some(21)), 4);
        assert_eq!(tiers.weight_for(Some(100)), 3);
        assert_eq!(tiers.weight_for(Some(101)), 1);
        assert_eq!(tiers.weight_for(None), 1);
    }

    #[test]
    fn lookup_miss_gets_default_not_zero() {
        let mut table = RankTable::new();
        table.insert("Scheffler, Scottie", 1);
        let tiers = RankTiers::default();
        assert_eq!(derive_weight("Scottie Scheffler", Some(&table), &tiers), 5);
        assert_eq!(derive_weight("scheffler, scottie", Some(&table), &tiers), 5);
        assert_eq!(derive_weight("Unknown Golfer", Some(&table), &tiers), 1);
        assert_eq!(derive_weight("Scottie Scheffler", None, &tiers), 1);
    }

    #[test]
    fn samples_are_distinct_and_capped() {
        let entities: Vec<_> = (0..6).map(|i| WeightedEntity::new(i, 1 + i as u32)).collect();
        let mut rng = PuzzleRng::from_seed_str("distinct");
        let picked = sample_without_replacement(&entities, 4, &mut rng);
        assert_eq!(picked.len(), 4);
        let mut dedup = picked.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 4);

        let all = sample_without_replacement(&entities, 50, &mut rng);
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn zero_weight_is_never_selected() {
        let entities = vec![
            WeightedEntity::new("never", 0),
            WeightedEntity::new("a", 1),
            WeightedEntity::new("b", 1),
        ];
        for seed in 0..200u64 {
            let mut rng = PuzzleRng::from_int(seed);
            let picked = sample_without_replacement(&entities, 3, &mut rng);
            assert_eq!(picked.len(), 2);
            assert!(!picked.contains(&"never"));
        }
    }

    #[test]
    fn one_draw_per_pick() {
        let entities: Vec<_> = (0..5).map(|i| WeightedEntity::new(i, 2)).collect();
        let mut rng = PuzzleRng::from_seed_str("draws");
        let mut reference = rng.clone();
        sample_without_replacement(&entities, 3, &mut rng);
        for _ in 0..3 {
            reference.next_u32();
        }
        assert_eq!(rng, reference);
    }

    #[test]
    fn heavy_entity_wins_more_often() {
        let entities = vec![WeightedEntity::new("heavy", 5), WeightedEntity::new("light", 1)];
        let heavy_first = (0..2_000u64)
            .filter(|seed| {
                let mut rng = PuzzleRng::from_int(*seed);
                sample_without_replacement(&entities, 1, &mut rng)[0] == "heavy"
            })
            .count();
        // Expected 5/6 ≈ 1667.
        assert!((1_550..1_780).contains(&heavy_first), "heavy picked {heavy_first} times");
    }
}
