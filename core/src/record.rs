//! Typed records and the small sets built from them.
//!
//! A Record is one player-season or one golfer-event result. Numeric
//! fields are parsed once, when the record is built, never during
//! comparison.

use crate::{
    error::{PuzzleError, PuzzleResult},
    types::{FieldName, Period},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// One field of a record: the raw text plus its numeric reading, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub raw: String,
    pub number: Option<f64>,
}

impl FieldValue {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let number = parse_numeric(&raw);
        Self { raw, number }
    }
}

/// Parse a stat cell. Accepts plain decimals with an optional trailing
/// `%` and `,` thousands separators. Anything else, including NaN and
/// infinities, is None.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Uniquely identifies a record: name + group + period
/// (player + team + season, or golfer + event + year).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    pub name: String,
    pub group: String,
    pub period: Period,
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.name, self.group, self.period)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub group: String,
    pub period: Period,
    pub fields: BTreeMap<FieldName, FieldValue>,
}

impl Record {
    pub fn new(name: impl Into<String>, group: impl Into<String>, period: Period) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            period,
            fields: BTreeMap::new(),
        }
    }

    /// Builder used by loaders and tests.
    pub fn with_field(mut self, field: impl Into<String>, raw: impl Into<String>) -> Self {
        self.fields.insert(field.into(), FieldValue::new(raw));
        self
    }

    pub fn key(&self) -> IdentityKey {
        IdentityKey {
            name: self.name.clone(),
            group: self.group.clone(),
            period: self.period,
        }
    }

    pub fn raw(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(|v| v.raw.as_str())
    }

    /// The parsed numeric value of `field`, None when missing or malformed.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(|v| v.number)
    }

    /// Same name, group and period, compared without building keys.
    pub fn same_identity(&self, other: &Record) -> bool {
        self.name == other.name && self.group == other.group && self.period == other.period
    }

    pub fn same_group_and_period(&self, other: &Record) -> bool {
        self.group == other.group && self.period == other.period
    }
}

/// Identity keys consumed so far in one generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedKeys {
    keys: BTreeSet<IdentityKey>,
}

impl UsedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_used(&mut self, record: &Record) {
        self.keys.insert(record.key());
    }

    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// The ordered, duplicate-free fields compared in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct StatSet(Vec<FieldName>);

impl StatSet {
    pub fn new(fields: Vec<FieldName>) -> PuzzleResult<Self> {
        if fields.is_empty() {
            return Err(PuzzleError::InvalidStatSet {
                reason: "stat set is empty".into(),
            });
        }
        let mut seen = HashSet::new();
        for f in &fields {
            if !seen.insert(f.as_str()) {
                return Err(PuzzleError::InvalidStatSet {
                    reason: format!("duplicate field '{f}'"),
                });
            }
        }
        Ok(Self(fields))
    }

    pub fn fields(&self) -> &[FieldName] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for StatSet {
    type Error = PuzzleError;

    fn try_from(fields: Vec<String>) -> PuzzleResult<Self> {
        StatSet::new(fields)
    }
}

impl From<StatSet> for Vec<String> {
    fn from(set: StatSet) -> Self {
        set.0
    }
}
