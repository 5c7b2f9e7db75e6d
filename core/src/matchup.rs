//! A generated A-vs-B comparison and its answer key.

use crate::{
    record::{Record, StatSet},
    types::CategoryId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// True when `a` beats `b`.
///
/// A missing or malformed value never wins: `(Some, None)` is better,
/// `(None, _)` is not. Equal values are not better.
pub fn is_better(a: Option<f64>, b: Option<f64>, direction: Direction) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            Direction::HigherIsBetter => a > b,
            Direction::LowerIsBetter => a < b,
        },
        (Some(_), None) => true,
        (None, _) => false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub category: CategoryId,
    pub stat_set: StatSet,
    pub a: Record,
    pub b: Record,
    /// One entry per stat_set field. When A is not strictly better the
    /// answer is B, so ties and double-missing values resolve to B.
    pub correct: Vec<Side>,
}

impl Matchup {
    pub fn new(
        category: CategoryId,
        stat_set: StatSet,
        a: Record,
        b: Record,
        lower_is_better: &[String],
    ) -> Self {
        let correct = stat_set
            .iter()
            .map(|field| {
                let direction = if lower_is_better.iter().any(|f| f == field) {
                    Direction::LowerIsBetter
                } else {
                    Direction::HigherIsBetter
                };
                if is_better(a.number(field), b.number(field), direction) {
                    Side::A
                } else {
                    Side::B
                }
            })
            .collect();
        Self { category, stat_set, a, b, correct }
    }

    /// Number of picks matching the answer key. Extra picks are ignored.
    pub fn score(&self, picks: &[Side]) -> usize {
        self.correct
            .iter()
            .zip(picks)
            .filter(|(want, got)| want == got)
            .count()
    }
}
