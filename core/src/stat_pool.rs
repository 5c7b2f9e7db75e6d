//! Per-category choice of the fields compared in a round.

use crate::{
    config::CategoryConfig,
    error::{PuzzleError, PuzzleResult},
    record::StatSet,
    rng::PuzzleRng,
    shuffle::shuffle,
    types::FieldName,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatRule {
    /// Always the same fields, no randomness consumed.
    Fixed { fields: Vec<FieldName> },
    /// Mandatory headline field(s) first, then `pick` fields from a
    /// shuffled optional pool.
    HeadlinePlusPool {
        mandatory: Vec<FieldName>,
        optional: Vec<FieldName>,
        pick: usize,
    },
}

impl StatRule {
    /// Every field this rule can ever put in a stat set.
    pub fn all_fields(&self) -> Vec<FieldName> {
        match self {
            Self::Fixed { fields } => fields.clone(),
            Self::HeadlinePlusPool { mandatory, optional, .. } => {
                mandatory.iter().chain(optional).cloned().collect()
            }
        }
    }

    pub fn validate(&self) -> PuzzleResult<()> {
        StatSet::new(self.all_fields())?;
        if let Self::HeadlinePlusPool { optional, pick, .. } = self {
            if *pick > optional.len() {
                return Err(PuzzleError::InvalidStatSet {
                    reason: format!("pick {pick} exceeds optional pool of {}", optional.len()),
                });
            }
        }
        Ok(())
    }

    /// Draw this round's stat set. `Fixed` consumes no draws;
    /// `HeadlinePlusPool` consumes `optional.len() - 1`.
    pub fn choose(&self, rng: &mut PuzzleRng) -> PuzzleResult<StatSet> {
        match self {
            Self::Fixed { fields } => StatSet::new(fields.clone()),
            Self::HeadlinePlusPool { mandatory, optional, pick } => {
                let shuffled = shuffle(optional, rng);
                let fields = mandatory
                    .iter()
                    .cloned()
                    .chain(shuffled.into_iter().take(*pick))
                    .collect();
                StatSet::new(fields)
            }
        }
    }
}

/// The stat set for one round of `category`.
pub fn choose_stat_set(category: &CategoryConfig, rng: &mut PuzzleRng) -> PuzzleResult<StatSet> {
    let set = category.stats.choose(rng)?;
    log::debug!("{}: stat set {:?}", category.id, set.fields());
    Ok(set)
}
