//! Shared primitive types used across the puzzle core.

/// A category id, e.g. "QB" or "GOLF". Pools are partitioned by it.
pub type CategoryId = String;

/// A season or tournament year.
pub type Period = i32;

/// A stat field name as it appears in the source data header.
pub type FieldName = String;
