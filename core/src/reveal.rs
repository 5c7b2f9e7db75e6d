//! Reveal order for "guess the player" puzzles.
//!
//! Layout of an order:
//!   [ lead prefix | shuffled middle | terminal ]
//! The lead prefix is `lead_count` fields drawn from the lead pool, so
//! the first clues are always stats that are hard to guess from. The
//! middle is the rest of the lead pool merged with the supplementary
//! fields, shuffled together. The terminal field (usually the team)
//! always comes last.

use crate::{
    error::{PuzzleError, PuzzleResult},
    names::normalize_for_match,
    record::Record,
    rng::PuzzleRng,
    shuffle::shuffle,
    types::{CategoryId, FieldName},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_initial_reveal() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealTiers {
    pub lead_pool: Vec<FieldName>,
    pub lead_count: usize,
    #[serde(default)]
    pub supplementary: Vec<FieldName>,
    pub terminal: FieldName,
    /// Fields shown before the first guess.
    #[serde(default = "default_initial_reveal")]
    pub initial_reveal: usize,
}

impl RevealTiers {
    pub fn validate(&self) -> PuzzleResult<()> {
        let mut seen = HashSet::new();
        for f in self.lead_pool.iter().chain(&self.supplementary) {
            if f == &self.terminal {
                return Err(PuzzleError::InvalidConfig(format!(
                    "terminal field '{f}' also listed in an earlier tier"
                )));
            }
            if !seen.insert(f.as_str()) {
                return Err(PuzzleError::InvalidConfig(format!(
                    "reveal field '{f}' listed twice"
                )));
            }
        }
        if self.lead_count > self.lead_pool.len() {
            return Err(PuzzleError::InvalidConfig(format!(
                "lead_count {} exceeds lead pool of {}",
                self.lead_count,
                self.lead_pool.len()
            )));
        }
        if self.initial_reveal == 0 {
            return Err(PuzzleError::InvalidConfig("initial_reveal must be at least 1".into()));
        }
        Ok(())
    }
}

/// Build one reveal order. Consumes `lead_pool.len() - 1` draws for the
/// lead shuffle and `middle.len() - 1` for the middle shuffle.
pub fn build_reveal_order(tiers: &RevealTiers, rng: &mut PuzzleRng) -> Vec<FieldName> {
    let lead = shuffle(&tiers.lead_pool, rng);
    let split = tiers.lead_count.min(lead.len());
    let (prefix, rest) = lead.split_at(split);

    let middle: Vec<FieldName> = rest.iter().chain(&tiers.supplementary).cloned().collect();
    let middle = shuffle(&middle, rng);

    let mut order = Vec::with_capacity(prefix.len() + middle.len() + 1);
    order.extend_from_slice(prefix);
    order.extend(middle);
    order.push(tiers.terminal.clone());
    order
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessPuzzle {
    pub category: CategoryId,
    pub target: Record,
    pub reveal_order: Vec<FieldName>,
    pub initial_reveal: usize,
}

impl GuessPuzzle {
    /// Pick a target uniformly from `pool` (one draw), then build its
    /// reveal order. None for an empty pool.
    pub fn new(
        category: CategoryId,
        pool: &[Record],
        tiers: &RevealTiers,
        rng: &mut PuzzleRng,
    ) -> Option<Self> {
        if pool.is_empty() {
            return None;
        }
        let target = pool[rng.next_below(pool.len())].clone();
        let reveal_order = build_reveal_order(tiers, rng);
        Some(Self {
            category,
            target,
            reveal_order,
            initial_reveal: tiers.initial_reveal,
        })
    }

    /// Fields visible after `wrong_guesses` misses: one more per miss.
    pub fn revealed(&self, wrong_guesses: usize) -> &[FieldName] {
        let n = self
            .initial_reveal
            .saturating_add(wrong_guesses)
            .min(self.reveal_order.len());
        &self.reveal_order[..n]
    }

    /// True once every field, including the terminal one, is showing.
    pub fn fully_revealed(&self, wrong_guesses: usize) -> bool {
        self.revealed(wrong_guesses).len() == self.reveal_order.len()
    }

    pub fn is_correct(&self, guess: &str) -> bool {
        normalize_for_match(guess) == normalize_for_match(&self.target.name)
    }
}
