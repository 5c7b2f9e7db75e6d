//! "Pick the round": golfers × tournament cards.
//!
//! Golfers with enough qualifying events are weighted by world rank and
//! sampled without replacement; each selected golfer then gets a
//! shuffled handful of their events as cards.

use crate::{
    config::GolfConfig,
    error::{PuzzleError, PuzzleResult},
    record::Record,
    rng::PuzzleRng,
    shuffle::shuffle,
    types::Period,
    weighted::{derive_weight, sample_without_replacement, RankTable, WeightedEntity},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field holding a golfer's total relative to par for one event.
pub const SCORE_FIELD: &str = "score_to_par";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GolfCard {
    pub event_name: String,
    pub year: Period,
    pub score_to_par: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GolferColumn {
    pub player_name: String,
    pub cards: Vec<GolfCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GolfPuzzle {
    pub golfers: Vec<GolferColumn>,
}

impl GolfPuzzle {
    /// The lowest total a player could reach: the best card per golfer.
    pub fn best_total(&self) -> i32 {
        self.golfers
            .iter()
            .filter_map(|g| g.cards.iter().map(|c| c.score_to_par).min())
            .sum()
    }
}

fn to_card(record: &Record) -> Option<GolfCard> {
    let score = record.number(SCORE_FIELD)?.round();
    if !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&score) {
        return None;
    }
    Some(GolfCard {
        event_name: record.group.clone(),
        year: record.period,
        score_to_par: score as i32,
    })
}

/// Build one golf puzzle from per-event result records
/// (name = golfer, group = event, period = year).
///
/// Draw order: one draw per sampled golfer, then one shuffle per golfer
/// in selection order.
pub fn build_golf_puzzle(
    rows: &[Record],
    config: &GolfConfig,
    ranks: Option<&RankTable>,
    rng: &mut PuzzleRng,
) -> PuzzleResult<GolfPuzzle> {
    // Group by golfer, keeping first-appearance order.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut by_golfer: Vec<(&str, Vec<GolfCard>)> = Vec::new();
    for row in rows {
        let Some(card) = to_card(row) else {
            log::debug!("skipping {} without a usable {SCORE_FIELD}", row.key());
            continue;
        };
        let slot = *index.entry(row.name.as_str()).or_insert_with(|| {
            by_golfer.push((row.name.as_str(), Vec::new()));
            by_golfer.len() - 1
        });
        by_golfer[slot].1.push(card);
    }

    let eligible: Vec<WeightedEntity<usize>> = by_golfer
        .iter()
        .enumerate()
        .filter(|(_, (_, events))| events.len() >= config.cards_per_golfer)
        .map(|(i, (name, _))| {
            WeightedEntity::new(i, derive_weight(name, ranks, &config.rank_weights))
        })
        .collect();

    if eligible.len() < config.golfers_per_game {
        return Err(PuzzleError::InsufficientGolfers {
            needed: config.golfers_per_game,
            cards: config.cards_per_golfer,
            found: eligible.len(),
        });
    }

    let chosen = sample_without_replacement(&eligible, config.golfers_per_game, rng);
    let golfers = chosen
        .into_iter()
        .map(|i| {
            let (name, events) = &by_golfer[i];
            let cards = shuffle(events, rng)
                .into_iter()
                .take(config.cards_per_golfer)
                .collect();
            GolferColumn {
                player_name: name.to_string(),
                cards,
            }
        })
        .collect();

    Ok(GolfPuzzle { golfers })
}
