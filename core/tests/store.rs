use betterseason_core::{
    error::PuzzleError,
    store::{stats_key, CounterStore, SqliteCounterStore},
};
use chrono::NaiveDate;

fn store() -> SqliteCounterStore {
    let store = SqliteCounterStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
}

#[test]
fn fresh_key_has_no_games() {
    let s = store();
    let stats = s.stats(day(1), "nfl", "daily").unwrap();
    assert_eq!(stats.games_played, 0);
    assert_eq!(stats.average_score, None);
}

#[test]
fn average_is_rounded_to_one_decimal() {
    let s = store();
    for score in [7.0, 8.0, 8.0] {
        s.record_play(day(2), "nfl", "daily", score).unwrap();
    }
    let stats = s.stats(day(2), "nfl", "daily").unwrap();
    assert_eq!(stats.games_played, 3);
    assert_eq!(stats.average_score, Some(7.7));
}

#[test]
fn keys_separate_date_sport_and_mode() {
    let s = store();
    s.record_play(day(3), "nfl", "daily", 9.0).unwrap();
    s.record_play(day(3), "nfl", "blitz", 14.0).unwrap();
    s.record_play(day(3), "nba", "daily", 5.0).unwrap();
    s.record_play(day(4), "nfl", "daily", 1.0).unwrap();

    assert_eq!(s.stats(day(3), "nfl", "daily").unwrap().average_score, Some(9.0));
    assert_eq!(s.stats(day(3), "nfl", "blitz").unwrap().average_score, Some(14.0));
    assert_eq!(s.stats(day(3), "nba", "daily").unwrap().games_played, 1);
    assert_eq!(s.stats(day(4), "nfl", "daily").unwrap().average_score, Some(1.0));
    assert_eq!(stats_key(day(3), "nfl", "daily"), "stats:2025-10-03:nfl:daily");
}

#[test]
fn unknown_sport_is_rejected_on_write() {
    let s = store();
    let err = s.record_play(day(5), "nhl", "daily", 3.0).unwrap_err();
    assert!(matches!(err, PuzzleError::InvalidSport { sport } if sport == "nhl"));
}

#[test]
fn unknown_sport_reads_as_no_plays() {
    let s = store();
    let stats = s.stats(day(5), "cricket", "daily").unwrap();
    assert_eq!(stats.games_played, 0);
    assert_eq!(stats.average_score, None);
}

#[test]
fn migrate_is_idempotent() {
    let s = store();
    s.migrate().unwrap();
    s.record_play(day(6), "mlb", "daily", 2.0).unwrap();
    assert_eq!(s.stats(day(6), "mlb", "daily").unwrap().games_played, 1);
}
