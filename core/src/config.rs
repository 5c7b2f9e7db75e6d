//! The category configuration table.
//!
//! One entry per category replaces per-sport branching: stat rule,
//! comparison directions, ratio gate, incompatible pairs, reveal tiers
//! and fallback policy. Generation code reads only this table.

use crate::{
    error::{PuzzleError, PuzzleResult},
    pair_selector::{Exclusion, IncompatiblePairs, RatioGate},
    reveal::RevealTiers,
    stat_pool::StatRule,
    types::{CategoryId, FieldName, Period},
    weighted::RankTiers,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_MAX_POOL_SIZE: usize = 1_000;

/// What a multi-round pass does when a category yields no valid pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Present the first two pool entries anyway.
    #[default]
    FirstTwo,
    /// Drop the round and report it.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub id: CategoryId,
    pub label: String,
    pub stats: StatRule,
    #[serde(default)]
    pub lower_is_better: Vec<FieldName>,
    #[serde(default)]
    pub ratio_gate: Option<RatioGate>,
    #[serde(default)]
    pub incompatible: Option<IncompatiblePairs>,
    #[serde(default)]
    pub reveal: Option<RevealTiers>,
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

impl CategoryConfig {
    /// Exclusions applied to every pair in this category. Teammates from
    /// the same season are always excluded.
    pub fn exclusions(&self) -> Vec<Exclusion> {
        let mut out = vec![Exclusion::SameGroupAndPeriod];
        if let Some(pairs) = &self.incompatible {
            out.push(Exclusion::Incompatible(pairs.clone()));
        }
        out
    }

    pub fn validate(&self) -> PuzzleResult<()> {
        self.stats.validate().map_err(|e| {
            PuzzleError::InvalidConfig(format!("category {}: {e}", self.id))
        })?;
        if let Some(gate) = &self.ratio_gate {
            if !(gate.min_ratio > 0.0 && gate.min_ratio <= 1.0) {
                return Err(PuzzleError::InvalidConfig(format!(
                    "category {}: ratio threshold {} outside (0, 1]",
                    self.id, gate.min_ratio
                )));
            }
        }
        if let Some(tiers) = &self.reveal {
            tiers.validate()?;
        }
        Ok(())
    }
}

/// One round of a fixed-length pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundSlot {
    Fixed { category: CategoryId },
    /// Chosen by a selector value modulo the number of choices: the day of
    /// month for daily puzzles, the sum of the seed's UTF-16 code units
    /// otherwise. Consumes no draws.
    OneOf { choices: Vec<CategoryId> },
}

impl RoundSlot {
    /// Resolve with the seed's code-unit sum as selector.
    pub fn resolve(&self, seed: &str) -> Option<&CategoryId> {
        self.resolve_with(seed_selector(seed))
    }

    pub fn resolve_with(&self, selector: u64) -> Option<&CategoryId> {
        match self {
            Self::Fixed { category } => Some(category),
            Self::OneOf { choices } => {
                if choices.is_empty() {
                    return None;
                }
                choices.get((selector % choices.len() as u64) as usize)
            }
        }
    }
}

/// Sum of the seed's UTF-16 code units.
pub fn seed_selector(seed: &str) -> u64 {
    seed.encode_utf16().map(u64::from).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GolfConfig {
    pub golfers_per_game: usize,
    pub cards_per_golfer: usize,
    pub min_year: Period,
    pub max_year: Period,
    /// Finishing positions that mean the golfer did not complete the
    /// event. Compared case-insensitively.
    pub excluded_positions: Vec<String>,
    #[serde(default)]
    pub rank_weights: RankTiers,
}

impl Default for GolfConfig {
    fn default() -> Self {
        Self {
            golfers_per_game: 4,
            cards_per_golfer: 3,
            min_year: 2020,
            max_year: 2025,
            excluded_positions: vec!["cut".into(), "wd".into(), "dq".into(), "mdf".into()],
            rank_weights: RankTiers::default(),
        }
    }
}

/// A stat file under the data directory and the pool it feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolFile {
    pub category: CategoryId,
    pub season: Period,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GameConfigFile {
    categories: Vec<CategoryConfig>,
    round_plan: Vec<RoundSlot>,
    blitz_rotation: Vec<CategoryId>,
    #[serde(default = "default_max_pool_size")]
    max_pool_size: usize,
    #[serde(default)]
    golf: GolfConfig,
    #[serde(default)]
    pool_files: Vec<PoolFile>,
}

fn default_max_pool_size() -> usize {
    DEFAULT_MAX_POOL_SIZE
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub categories: BTreeMap<CategoryId, CategoryConfig>,
    pub round_plan: Vec<RoundSlot>,
    pub blitz_rotation: Vec<CategoryId>,
    pub max_pool_size: usize,
    pub golf: GolfConfig,
    pub pool_files: Vec<PoolFile>,
}

impl GameConfig {
    /// Load `{data_dir}/config/game.json` and validate it.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/config/game.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> PuzzleResult<Self> {
        let file: GameConfigFile = serde_json::from_str(content)?;
        let categories = file
            .categories
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        let config = Self {
            categories,
            round_plan: file.round_plan,
            blitz_rotation: file.blitz_rotation,
            max_pool_size: file.max_pool_size,
            golf: file.golf,
            pool_files: file.pool_files,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn category(&self, id: &str) -> PuzzleResult<&CategoryConfig> {
        self.categories
            .get(id)
            .ok_or_else(|| PuzzleError::UnknownCategory { id: id.to_string() })
    }

    pub fn validate(&self) -> PuzzleResult<()> {
        for (id, category) in &self.categories {
            if id != &category.id {
                return Err(PuzzleError::InvalidConfig(format!(
                    "category keyed as {id} but named {}",
                    category.id
                )));
            }
            category.validate()?;
        }

        let mut referenced: Vec<&CategoryId> = self.blitz_rotation.iter().collect();
        for slot in &self.round_plan {
            match slot {
                RoundSlot::Fixed { category } => referenced.push(category),
                RoundSlot::OneOf { choices } => {
                    if choices.is_empty() {
                        return Err(PuzzleError::InvalidConfig(
                            "one_of round slot has no choices".into(),
                        ));
                    }
                    referenced.extend(choices);
                }
            }
        }
        referenced.extend(self.pool_files.iter().map(|f| &f.category));
        for id in referenced {
            self.category(id)?;
        }

        if self.max_pool_size < 2 {
            return Err(PuzzleError::InvalidConfig("max_pool_size must be at least 2".into()));
        }
        if self.golf.golfers_per_game == 0 || self.golf.cards_per_golfer == 0 {
            return Err(PuzzleError::InvalidConfig(
                "golf puzzle needs at least one golfer and one card".into(),
            ));
        }
        if self.golf.rank_weights.default_weight == 0 {
            return Err(PuzzleError::InvalidConfig(
                "default rank weight of 0 would make unranked golfers unselectable".into(),
            ));
        }
        Ok(())
    }

    /// The NFL table the game ships with.
    pub fn default_nfl() -> Self {
        let yards_gate = |min_ratio: f64| {
            Some(RatioGate {
                field: "Yds".into(),
                min_ratio,
            })
        };
        let fixed = |fields: &[&str]| StatRule::Fixed {
            fields: fields.iter().map(|f| f.to_string()).collect(),
        };
        let reveal = |lead: &[&str]| {
            Some(RevealTiers {
                lead_pool: lead.iter().map(|f| f.to_string()).collect(),
                lead_count: 2,
                supplementary: vec!["Age".into(), "G".into()],
                terminal: "Team".into(),
                initial_reveal: 1,
            })
        };

        let qb = CategoryConfig {
            id: "QB".into(),
            label: "Quarterback".into(),
            stats: StatRule::HeadlinePlusPool {
                mandatory: vec!["Yds".into()],
                optional: vec!["Cmp%".into(), "TD".into(), "Int".into(), "Rate".into()],
                pick: 2,
            },
            lower_is_better: vec!["Int".into()],
            ratio_gate: yards_gate(0.70),
            incompatible: None,
            reveal: reveal(&["Yds", "TD", "Int", "Cmp%", "Rate"]),
            fallback: FallbackPolicy::FirstTwo,
        };
        let rb = CategoryConfig {
            id: "RB".into(),
            label: "Running Back".into(),
            stats: fixed(&["Yds", "TD", "Y/A"]),
            lower_is_better: vec![],
            ratio_gate: yards_gate(0.55),
            incompatible: None,
            reveal: reveal(&["Yds", "TD", "Y/A", "Att"]),
            fallback: FallbackPolicy::FirstTwo,
        };
        let receiver = |id: &str, label: &str| CategoryConfig {
            id: id.into(),
            label: label.into(),
            stats: fixed(&["Rec", "Yds", "TD"]),
            lower_is_better: vec![],
            ratio_gate: yards_gate(0.55),
            incompatible: None,
            reveal: reveal(&["Rec", "Yds", "TD", "Tgt"]),
            fallback: FallbackPolicy::FirstTwo,
        };

        let categories = [qb, rb, receiver("WR", "Wide Receiver"), receiver("TE", "Tight End")]
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        let pool_files = ["QB", "RB", "WR", "TE"]
            .iter()
            .flat_map(|pos| {
                (2023..=2025).map(move |season| PoolFile {
                    category: pos.to_string(),
                    season,
                    path: format!("nfl/{}_{season}.csv", pos.to_lowercase()),
                })
            })
            .collect();

        Self {
            categories,
            round_plan: vec![
                RoundSlot::Fixed { category: "QB".into() },
                RoundSlot::Fixed { category: "RB".into() },
                RoundSlot::OneOf {
                    choices: vec!["WR".into(), "TE".into()],
                },
            ],
            blitz_rotation: vec!["QB".into(), "RB".into(), "WR".into(), "TE".into()],
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            golf: GolfConfig::default(),
            pool_files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        let config = GameConfig::default_nfl();
        config.validate().unwrap();
        assert_eq!(config.categories.len(), 4);
        assert_eq!(config.pool_files.len(), 12);
        assert_eq!(config.pool_files[0].path, "nfl/qb_2023.csv");
    }

    #[test]
    fn shipped_json_matches_default_table() {
        let shipped = include_str!("../../data/config/game.json");
        let config = GameConfig::from_json(shipped).unwrap();
        assert_eq!(config, GameConfig::default_nfl());
    }

    #[test]
    fn one_of_slot_uses_code_unit_parity() {
        let slot = RoundSlot::OneOf {
            choices: vec!["WR".into(), "TE".into()],
        };
        // '0' + '0' = 96 (even), '0' + '1' = 97 (odd)
        assert_eq!(slot.resolve("00").map(String::as_str), Some("WR"));
        assert_eq!(slot.resolve("01").map(String::as_str), Some("TE"));
    }

    #[test]
    fn one_of_slot_accepts_an_explicit_selector() {
        let slot = RoundSlot::OneOf {
            choices: vec!["WR".into(), "TE".into()],
        };
        assert_eq!(slot.resolve_with(18).map(String::as_str), Some("WR"));
        assert_eq!(slot.resolve_with(19).map(String::as_str), Some("TE"));
        let fixed = RoundSlot::Fixed { category: "QB".into() };
        assert_eq!(fixed.resolve_with(7).map(String::as_str), Some("QB"));
    }

    #[test]
    fn unknown_round_category_is_rejected() {
        let mut config = GameConfig::default_nfl();
        config.blitz_rotation.push("K".into());
        assert!(matches!(
            config.validate(),
            Err(PuzzleError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn bad_threshold_is_rejected() {
        let mut config = GameConfig::default_nfl();
        if let Some(qb) = config.categories.get_mut("QB") {
            qb.ratio_gate = Some(RatioGate { field: "Yds".into(), min_ratio: 1.5 });
        }
        assert!(matches!(config.validate(), Err(PuzzleError::InvalidConfig(_))));
    }

    #[test]
    fn zero_default_rank_weight_is_rejected() {
        let mut config = GameConfig::default_nfl();
        config.golf.rank_weights.default_weight = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn exclusions_always_include_teammates() {
        let config = GameConfig::default_nfl();
        let qb = config.category("QB").unwrap();
        assert_eq!(qb.exclusions(), vec![Exclusion::SameGroupAndPeriod]);
    }
}
