//! Play-counter persistence.
//!
//! RULE: Only store.rs talks to the database.
//! The puzzle core never touches the store; the runner records finished
//! scores through the CounterStore trait.

use crate::error::{PuzzleError, PuzzleResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

pub const ALLOWED_SPORTS: [&str; 3] = ["nfl", "nba", "mlb"];

/// Aggregate for one (date, sport, mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayStats {
    pub games_played: i64,
    /// Mean score rounded to one decimal; None before the first game.
    pub average_score: Option<f64>,
}

pub fn stats_key(date: NaiveDate, sport: &str, mode: &str) -> String {
    format!("stats:{}:{sport}:{mode}", date.format("%Y-%m-%d"))
}

fn check_sport(sport: &str) -> PuzzleResult<()> {
    if ALLOWED_SPORTS.contains(&sport) {
        Ok(())
    } else {
        Err(PuzzleError::InvalidSport { sport: sport.to_string() })
    }
}

pub trait CounterStore {
    /// Count one finished game and add its score.
    fn record_play(&self, date: NaiveDate, sport: &str, mode: &str, score: f64) -> PuzzleResult<()>;

    fn stats(&self, date: NaiveDate, sport: &str, mode: &str) -> PuzzleResult<PlayStats>;
}

pub struct SqliteCounterStore {
    conn: Connection,
}

impl SqliteCounterStore {
    /// Open (or create) the counter database at `path`.
    pub fn open(path: &str) -> PuzzleResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> PuzzleResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> PuzzleResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_counters.sql"))?;
        Ok(())
    }
}

impl CounterStore for SqliteCounterStore {
    fn record_play(&self, date: NaiveDate, sport: &str, mode: &str, score: f64) -> PuzzleResult<()> {
        check_sport(sport)?;
        if mode.is_empty() {
            return Err(PuzzleError::InvalidConfig("mode must not be empty".into()));
        }
        self.conn.execute(
            "INSERT INTO play_counter (stats_key, date, sport, mode, games_played, total_score)
             VALUES (?1, ?2, ?3, ?4, 1, ?5)
             ON CONFLICT(stats_key) DO UPDATE SET
                 games_played = games_played + 1,
                 total_score  = total_score + excluded.total_score",
            params![
                stats_key(date, sport, mode),
                date.format("%Y-%m-%d").to_string(),
                sport,
                mode,
                score,
            ],
        )?;
        log::debug!("recorded {sport}/{mode} score {score} for {date}");
        Ok(())
    }

    /// Unknown sports read as zero plays; only writes reject them.
    fn stats(&self, date: NaiveDate, sport: &str, mode: &str) -> PuzzleResult<PlayStats> {
        if check_sport(sport).is_err() {
            return Ok(PlayStats { games_played: 0, average_score: None });
        }
        let row = self
            .conn
            .query_row(
                "SELECT games_played, total_score FROM play_counter WHERE stats_key = ?1",
                params![stats_key(date, sport, mode)],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?)),
            )
            .optional()?;
        let (games_played, total) = row.unwrap_or((0, 0.0));
        let average_score = if games_played > 0 {
            Some((total / games_played as f64 * 10.0).round() / 10.0)
        } else {
            None
        };
        Ok(PlayStats { games_played, average_score })
    }
}
