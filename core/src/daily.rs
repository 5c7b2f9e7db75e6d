//! Daily puzzle identity: the date-derived seed and puzzle number.
//!
//! Both functions take the date as input. Deciding what "today" is
//! (local midnight, UTC, ...) belongs to the caller.

use chrono::NaiveDate;

/// Puzzle #1 is the first day of the 2024 NFL season.
pub const EPOCH: (i32, u32, u32) = (2024, 9, 4);

/// The seed every player shares on `date`: `YYYY-MM-DD`.
pub fn daily_seed(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Days elapsed since the epoch, never below 1.
pub fn game_number(date: NaiveDate) -> i64 {
    let (y, m, d) = EPOCH;
    let Some(epoch) = NaiveDate::from_ymd_opt(y, m, d) else {
        return 1;
    };
    (date - epoch).num_days().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn seed_is_zero_padded_iso_date() {
        assert_eq!(daily_seed(date(2025, 3, 7)), "2025-03-07");
    }

    #[test]
    fn game_number_counts_days_from_epoch() {
        assert_eq!(game_number(date(2024, 9, 14)), 10);
        assert_eq!(game_number(date(2025, 9, 4)), 365);
    }

    #[test]
    fn game_number_floors_at_one() {
        assert_eq!(game_number(date(2024, 9, 4)), 1);
        assert_eq!(game_number(date(2020, 1, 1)), 1);
    }
}
