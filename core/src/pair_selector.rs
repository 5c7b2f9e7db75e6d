//! Constraint-based pair selection.
//!
//! Every unordered pair (i < j) of the pool is checked against the
//! constraints and the survivors are collected. One survivor is drawn
//! uniformly, then a second draw decides which record is shown as A.
//!
//! Brute-force enumeration is O(n²) over the pool. It always terminates
//! and the choice is exactly uniform over valid pairs. Pools longer than
//! the query's `max_pool_size` are truncated to their first records
//! before enumeration, which keeps the cost bounded but makes the tail
//! of an oversized pool unreachable.
//!
//! A pair is rejected when:
//!   - the two records share an identity key,
//!   - either identity key is already used in this pass,
//!   - any configured Exclusion applies,
//!   - the RatioGate fails,
//!   - the records tie on any stat_set field.

use crate::{
    record::{Record, StatSet, UsedKeys},
    rng::PuzzleRng,
    types::FieldName,
};
use serde::{Deserialize, Serialize};

/// Fairness filter on one magnitude field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioGate {
    pub field: FieldName,
    pub min_ratio: f64,
}

impl RatioGate {
    /// `min(|a|,|b|) / max(|a|,|b|)` on the magnitude field. Missing values
    /// count as zero; when the larger magnitude is zero the ratio is 1.
    pub fn ratio(&self, a: &Record, b: &Record) -> f64 {
        let x = a.number(&self.field).unwrap_or(0.0).abs();
        let y = b.number(&self.field).unwrap_or(0.0).abs();
        let max = x.max(y);
        if max == 0.0 {
            return 1.0;
        }
        x.min(y) / max
    }

    pub fn passes(&self, a: &Record, b: &Record) -> bool {
        self.ratio(a, b) >= self.min_ratio
    }
}

/// Value pairs on one field that must never meet, e.g. `Pos` RB vs TE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncompatiblePairs {
    pub field: FieldName,
    pub pairs: Vec<(String, String)>,
}

impl IncompatiblePairs {
    pub fn forbids(&self, a: &Record, b: &Record) -> bool {
        let (Some(x), Some(y)) = (a.raw(&self.field), b.raw(&self.field)) else {
            return false;
        };
        self.pairs
            .iter()
            .any(|(p, q)| (p == x && q == y) || (p == y && q == x))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Exclusion {
    /// Teammates in the same season.
    SameGroupAndPeriod,
    Incompatible(IncompatiblePairs),
}

impl Exclusion {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SameGroupAndPeriod => "same_group_and_period",
            Self::Incompatible(_) => "incompatible",
        }
    }

    pub fn excludes(&self, a: &Record, b: &Record) -> bool {
        match self {
            Self::SameGroupAndPeriod => a.same_group_and_period(b),
            Self::Incompatible(pairs) => pairs.forbids(a, b),
        }
    }
}

/// True when both records hold the same parsed value on any field.
/// Missing or non-numeric values never tie.
pub fn has_stat_tie(a: &Record, b: &Record, stat_set: &StatSet) -> bool {
    stat_set.iter().any(|field| match (a.number(field), b.number(field)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReusePolicy {
    Never,
    /// Retry with an empty used set when nothing survives.
    OnExhaustion,
}

/// Everything the selector needs besides the used set and the RNG.
///
/// `'p` is the pool's lifetime. Selected records borrow only the pool, so
/// the stat set and constraints may be dropped or moved once a pair is
/// chosen.
#[derive(Debug, Clone, Copy)]
pub struct PairQuery<'p, 'q> {
    pub pool: &'p [Record],
    pub stat_set: &'q StatSet,
    pub ratio_gate: Option<&'q RatioGate>,
    pub exclusions: &'q [Exclusion],
    pub reuse: ReusePolicy,
    pub max_pool_size: usize,
}

impl<'p, 'q> PairQuery<'p, 'q> {
    /// Pair constraints other than the used set.
    fn admits(&self, a: &Record, b: &Record) -> bool {
        if a.same_identity(b) {
            return false;
        }
        if let Some(e) = self.exclusions.iter().find(|e| e.excludes(a, b)) {
            log::trace!("{} vs {}: {}", a.key(), b.key(), e.name());
            return false;
        }
        if let Some(gate) = self.ratio_gate {
            if !gate.passes(a, b) {
                return false;
            }
        }
        !has_stat_tie(a, b, self.stat_set)
    }

    /// All valid unordered pairs, in (i, j) enumeration order.
    pub fn valid_pairs(&self, used: &UsedKeys) -> Vec<(&'p Record, &'p Record)> {
        let pool: &'p [Record] = if self.pool.len() > self.max_pool_size {
            log::warn!(
                "pool of {} truncated to {} for pair enumeration",
                self.pool.len(),
                self.max_pool_size
            );
            &self.pool[..self.max_pool_size]
        } else {
            self.pool
        };

        // One key lookup per record, not per pair.
        let fresh: Vec<bool> = pool.iter().map(|r| !used.contains(&r.key())).collect();

        let mut pairs = Vec::new();
        for (i, a) in pool.iter().enumerate() {
            if !fresh[i] {
                continue;
            }
            for (j, b) in pool.iter().enumerate().skip(i + 1) {
                if fresh[j] && self.admits(a, b) {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }
}

/// Pick one valid pair, or None when no pair survives (after the reuse
/// relaxation if the query allows it). Consumes exactly two draws on
/// success and none on failure.
pub fn select_pair<'p>(
    query: &PairQuery<'p, '_>,
    used: &UsedKeys,
    rng: &mut PuzzleRng,
) -> Option<(&'p Record, &'p Record)> {
    let mut candidates = query.valid_pairs(used);
    if candidates.is_empty() && query.reuse == ReusePolicy::OnExhaustion && !used.is_empty() {
        log::warn!("no fresh pairs left; allowing identity reuse");
        candidates = query.valid_pairs(&UsedKeys::new());
    }
    log::debug!("{} candidate pairs", candidates.len());
    if candidates.is_empty() {
        return None;
    }

    let (a, b) = candidates[rng.next_below(candidates.len())];
    if rng.chance(0.5) {
        Some((a, b))
    } else {
        Some((b, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, group: &str, stat1: &str) -> Record {
        Record::new(name, group, 2024).with_field("stat1", stat1)
    }

    fn stat1() -> StatSet {
        StatSet::new(vec!["stat1".into()]).unwrap()
    }

    #[test]
    fn ratio_gate_edge_cases() {
        let gate = RatioGate { field: "stat1".into(), min_ratio: 0.5 };
        assert_eq!(gate.ratio(&rec("A", "X", "0"), &rec("B", "Y", "0")), 1.0);
        assert_eq!(gate.ratio(&rec("A", "X", "?"), &rec("B", "Y", "")), 1.0);
        assert_eq!(gate.ratio(&rec("A", "X", "0"), &rec("B", "Y", "10")), 0.0);
        assert!((gate.ratio(&rec("A", "X", "-90"), &rec("B", "Y", "100")) - 0.9).abs() < 1e-12);
        assert!(gate.passes(&rec("A", "X", "50"), &rec("B", "Y", "100")));
        assert!(!gate.passes(&rec("A", "X", "49"), &rec("B", "Y", "100")));
    }

    #[test]
    fn ties_need_two_parsed_equal_values() {
        let set = stat1();
        assert!(has_stat_tie(&rec("A", "X", "100"), &rec("B", "Y", "100.0"), &set));
        assert!(!has_stat_tie(&rec("A", "X", "n/a"), &rec("B", "Y", "n/a"), &set));
        assert!(!has_stat_tie(&rec("A", "X", ""), &rec("B", "Y", "100"), &set));
    }

    #[test]
    fn incompatible_pairs_are_unordered() {
        let rule = IncompatiblePairs {
            field: "Pos".into(),
            pairs: vec![("RB".into(), "TE".into())],
        };
        let rb = Record::new("A", "X", 2024).with_field("Pos", "RB");
        let te = Record::new("B", "Y", 2024).with_field("Pos", "TE");
        let wr = Record::new("C", "Z", 2024).with_field("Pos", "WR");
        assert!(rule.forbids(&rb, &te));
        assert!(rule.forbids(&te, &rb));
        assert!(!rule.forbids(&rb, &wr));
        assert!(!rule.forbids(&rb, &Record::new("D", "W", 2024)));
    }

    #[test]
    fn failure_consumes_no_draws() {
        let pool = vec![rec("A", "X", "100")];
        let set = stat1();
        let query = PairQuery {
            pool: &pool,
            stat_set: &set,
            ratio_gate: None,
            exclusions: &[],
            reuse: ReusePolicy::OnExhaustion,
            max_pool_size: 100,
        };
        let mut rng = PuzzleRng::from_seed_str("none");
        let before = rng.clone();
        assert!(select_pair(&query, &UsedKeys::new(), &mut rng).is_none());
        assert_eq!(rng, before);
    }

    #[test]
    fn duplicate_identity_rows_never_pair() {
        let pool = vec![rec("A", "X", "100"), rec("A", "X", "90")];
        let set = stat1();
        let query = PairQuery {
            pool: &pool,
            stat_set: &set,
            ratio_gate: None,
            exclusions: &[],
            reuse: ReusePolicy::Never,
            max_pool_size: 100,
        };
        assert!(query.valid_pairs(&UsedKeys::new()).is_empty());
    }

    #[test]
    fn pool_cap_limits_enumeration() {
        let pool: Vec<Record> = (0..10)
            .map(|i| rec(&format!("P{i}"), &format!("T{i}"), &format!("{}", 100 + i)))
            .collect();
        let set = stat1();
        let query = PairQuery {
            pool: &pool,
            stat_set: &set,
            ratio_gate: None,
            exclusions: &[],
            reuse: ReusePolicy::Never,
            max_pool_size: 4,
        };
        assert_eq!(query.valid_pairs(&UsedKeys::new()).len(), 6);
    }

    #[test]
    fn selected_records_outlive_the_stat_set() {
        let pool = vec![rec("A", "X", "100"), rec("B", "Y", "90")];
        let mut rng = PuzzleRng::from_seed_str("scope");
        let picked = {
            let set = stat1();
            let query = PairQuery {
                pool: &pool,
                stat_set: &set,
                ratio_gate: None,
                exclusions: &[],
                reuse: ReusePolicy::Never,
                max_pool_size: 100,
            };
            select_pair(&query, &UsedKeys::new(), &mut rng)
        };
        let (a, b) = picked.unwrap();
        assert!(!a.same_identity(b));
    }

    #[test]
    fn used_records_drop_out_of_every_pair() {
        let pool = vec![rec("A", "X", "100"), rec("B", "Y", "90"), rec("C", "Z", "80")];
        let set = stat1();
        let query = PairQuery {
            pool: &pool,
            stat_set: &set,
            ratio_gate: None,
            exclusions: &[],
            reuse: ReusePolicy::Never,
            max_pool_size: 100,
        };
        let mut used = UsedKeys::new();
        used.mark_used(&rec("A", "X", "1"));
        let names: Vec<_> = query
            .valid_pairs(&used)
            .into_iter()
            .map(|(a, b)| (a.name.as_str(), b.name.as_str()))
            .collect();
        assert_eq!(names, vec![("B", "C")]);
    }
}
