//! Puzzle assembly: the generation passes built on the core components.
//!
//! RULES:
//!   - One pass owns exactly one PuzzleRng and one UsedKeys.
//!   - Both are threaded explicitly; nothing is global, so passes for
//!     different sports can interleave freely.
//!   - Draw order inside a round is fixed: stat set, then pair.
//!   - A round that cannot be filled is a value (fallback or skip),
//!     never an error.

use crate::{
    config::{seed_selector, CategoryConfig, FallbackPolicy, GameConfig},
    daily::daily_seed,
    error::{PuzzleError, PuzzleResult},
    matchup::Matchup,
    pair_selector::{select_pair, PairQuery, ReusePolicy},
    record::{Record, StatSet, UsedKeys},
    reveal::GuessPuzzle,
    rng::PuzzleRng,
    stat_pool::choose_stat_set,
    types::CategoryId,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchupSource {
    Selected,
    /// No valid pair existed; the category's fallback produced this one.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub index: usize,
    pub category: CategoryId,
    pub source: MatchupSource,
    pub matchup: Matchup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer than two records in the pool.
    InsufficientPool,
    /// Records exist but no pair satisfies the constraints.
    ExhaustedConstraints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRound {
    pub index: usize,
    pub category: CategoryId,
    pub reason: SkipReason,
}

/// Output of one fixed-length pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleDescriptor {
    pub seed: String,
    pub rounds: Vec<Round>,
    pub skipped: Vec<SkippedRound>,
}

impl PuzzleDescriptor {
    /// Maximum attainable score: one point per compared field.
    pub fn max_score(&self) -> usize {
        self.rounds.iter().map(|r| r.matchup.stat_set.len()).sum()
    }
}

enum Attempt {
    Filled(MatchupSource, Matchup),
    Skipped(SkipReason),
}

pub struct PuzzleEngine {
    pub config: GameConfig,
    pools: BTreeMap<CategoryId, Vec<Record>>,
}

impl PuzzleEngine {
    pub fn new(config: GameConfig, pools: BTreeMap<CategoryId, Vec<Record>>) -> Self {
        Self { config, pools }
    }

    /// The pool for `category`; empty when nothing was loaded for it.
    pub fn pool(&self, category: &str) -> &[Record] {
        self.pools.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The fixed-length pass used by unlimited play: one round per
    /// round-plan slot, shared generator, no identity reuse. "One of"
    /// slots resolve by the seed's code-unit sum.
    pub fn round_pass(&self, seed: &str) -> PuzzleResult<PuzzleDescriptor> {
        self.pass(seed, seed_selector(seed))
    }

    /// The puzzle for `date`, seeded with the date string. "One of" slots
    /// resolve by the day of month, so odd days get the second choice.
    pub fn daily_pass(&self, date: NaiveDate) -> PuzzleResult<PuzzleDescriptor> {
        self.pass(&daily_seed(date), u64::from(date.day()))
    }

    /// A practice puzzle from an arbitrary seed; see `rng::fresh_seed`.
    pub fn unlimited_pass(&self, seed: &str) -> PuzzleResult<PuzzleDescriptor> {
        self.round_pass(seed)
    }

    fn pass(&self, seed: &str, selector: u64) -> PuzzleResult<PuzzleDescriptor> {
        let mut rng = PuzzleRng::from_seed_str(seed);
        let mut used = UsedKeys::new();
        let mut rounds = Vec::new();
        let mut skipped = Vec::new();

        for (index, slot) in self.config.round_plan.iter().enumerate() {
            let category_id = slot.resolve_with(selector).ok_or_else(|| {
                PuzzleError::InvalidConfig(format!("round {index} has no category"))
            })?;
            let category = self.config.category(category_id)?;
            match self.attempt(category, &mut used, ReusePolicy::Never, true, &mut rng)? {
                Attempt::Filled(source, matchup) => rounds.push(Round {
                    index,
                    category: category_id.clone(),
                    source,
                    matchup,
                }),
                Attempt::Skipped(reason) => skipped.push(SkippedRound {
                    index,
                    category: category_id.clone(),
                    reason,
                }),
            }
        }

        Ok(PuzzleDescriptor {
            seed: seed.to_string(),
            rounds,
            skipped,
        })
    }

    /// Start an open-ended blitz session.
    pub fn blitz(&self, seed: &str) -> BlitzSession<'_> {
        BlitzSession {
            engine: self,
            rng: PuzzleRng::from_seed_str(seed),
            used: BTreeMap::new(),
            attempts: 0,
        }
    }

    /// A "guess the player" puzzle for `category`. None when the pool is
    /// empty.
    pub fn guess_puzzle(&self, category: &str, seed: &str) -> PuzzleResult<Option<GuessPuzzle>> {
        let config = self.config.category(category)?;
        let tiers = config.reveal.as_ref().ok_or_else(|| {
            PuzzleError::InvalidConfig(format!("category {category} has no reveal tiers"))
        })?;
        let mut rng = PuzzleRng::from_seed_str(seed);
        Ok(GuessPuzzle::new(config.id.clone(), self.pool(category), tiers, &mut rng))
    }

    /// One round: choose the stat set, select a pair, apply the fallback
    /// policy if selection fails. Marks the chosen identities as used.
    fn attempt(
        &self,
        category: &CategoryConfig,
        used: &mut UsedKeys,
        reuse: ReusePolicy,
        allow_fallback: bool,
        rng: &mut PuzzleRng,
    ) -> PuzzleResult<Attempt> {
        let stat_set = choose_stat_set(category, rng)?;
        let pool = self.pool(&category.id);
        let exclusions = category.exclusions();
        let query = PairQuery {
            pool,
            stat_set: &stat_set,
            ratio_gate: category.ratio_gate.as_ref(),
            exclusions: &exclusions,
            reuse,
            max_pool_size: self.config.max_pool_size,
        };

        if let Some((a, b)) = select_pair(&query, used, rng) {
            return Ok(Attempt::Filled(
                MatchupSource::Selected,
                self.finish(category, stat_set, a, b, used),
            ));
        }

        let Some((a, b)) = first_two_distinct(pool) else {
            log::warn!("{}: fewer than two distinct records; round skipped", category.id);
            return Ok(Attempt::Skipped(SkipReason::InsufficientPool));
        };
        if !allow_fallback || category.fallback == FallbackPolicy::Skip {
            log::warn!("{}: no valid pair; round skipped", category.id);
            return Ok(Attempt::Skipped(SkipReason::ExhaustedConstraints));
        }
        log::warn!("{}: no valid pair; using first two pool entries", category.id);
        Ok(Attempt::Filled(
            MatchupSource::Fallback,
            self.finish(category, stat_set, a, b, used),
        ))
    }

    fn finish(
        &self,
        category: &CategoryConfig,
        stat_set: StatSet,
        a: &Record,
        b: &Record,
        used: &mut UsedKeys,
    ) -> Matchup {
        used.mark_used(a);
        used.mark_used(b);
        Matchup::new(
            category.id.clone(),
            stat_set,
            a.clone(),
            b.clone(),
            &category.lower_is_better,
        )
    }
}

/// The first record and the next one with a different identity. Duplicate
/// rows of one player-season never face each other.
fn first_two_distinct(pool: &[Record]) -> Option<(&Record, &Record)> {
    let first = pool.first()?;
    let key = first.key();
    let second = pool[1..].iter().find(|r| r.key() != key)?;
    Some((first, second))
}

/// Endless rounds rotating through the blitz categories. Each category
/// keeps its own used set and falls back to reuse once exhausted.
pub struct BlitzSession<'e> {
    engine: &'e PuzzleEngine,
    rng: PuzzleRng,
    used: BTreeMap<CategoryId, UsedKeys>,
    attempts: usize,
}

impl<'e> BlitzSession<'e> {
    /// Generate the next round. The rotation always advances; a category
    /// that cannot produce a pair even with reuse yields `Ok(None)` and
    /// the following call moves on to the next category.
    pub fn next_round(&mut self) -> PuzzleResult<Option<Round>> {
        let rotation = &self.engine.config.blitz_rotation;
        let index = self.attempts;
        self.attempts += 1;
        if rotation.is_empty() {
            return Ok(None);
        }

        let category_id = &rotation[index % rotation.len()];
        let category = self.engine.config.category(category_id)?;
        let used = self.used.entry(category_id.clone()).or_default();
        match self
            .engine
            .attempt(category, used, ReusePolicy::OnExhaustion, false, &mut self.rng)?
        {
            Attempt::Filled(source, matchup) => Ok(Some(Round {
                index,
                category: category_id.clone(),
                source,
                matchup,
            })),
            Attempt::Skipped(_) => Ok(None),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn used_keys(&self, category: &str) -> Option<&UsedKeys> {
        self.used.get(category)
    }
}
