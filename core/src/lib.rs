//! betterseason-core: deterministic puzzle generation for stat-comparison
//! trivia.
//!
//! Layers, bottom up:
//!   rng, shuffle           seeded draws and permutations
//!   record, stat_pool      typed records and per-round stat sets
//!   pair_selector, matchup constrained pair choice and its answer
//!   weighted, reveal, golf sampling and ordering for the side modes
//!   puzzle                 full passes: rounds, blitz, guess
//!   config, loader, store  configuration, CSV input, play counters

pub mod config;
pub mod daily;
pub mod error;
pub mod golf;
pub mod loader;
pub mod matchup;
pub mod names;
pub mod pair_selector;
pub mod puzzle;
pub mod record;
pub mod reveal;
pub mod rng;
pub mod shuffle;
pub mod stat_pool;
pub mod store;
pub mod types;
pub mod weighted;
