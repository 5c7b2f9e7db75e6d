//! Delimited-text loaders.
//!
//! These turn CSV exports into Records. The generator never sees the
//! text; it relies only on the output shape: a field map of raw strings
//! plus name, group and period.

use crate::{
    config::{GolfConfig, PoolFile},
    error::PuzzleResult,
    golf::SCORE_FIELD,
    record::Record,
    types::{CategoryId, Period},
    weighted::RankTable,
};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

pub const PLAYER_COLUMN: &str = "Player";
pub const TEAM_COLUMN: &str = "Team";

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

/// One season of one position. Every column becomes a field; rows with
/// an empty `Player` cell are dropped.
pub fn load_position_csv<R: Read>(input: R, season: Period) -> PuzzleResult<Vec<Record>> {
    let mut rdr = reader(input);
    let headers = rdr.headers()?.clone();
    let mut records = Vec::new();

    for row in rdr.records() {
        let row = row?;
        let cell = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .and_then(|i| row.get(i))
                .unwrap_or("")
        };
        let name = cell(PLAYER_COLUMN);
        if name.is_empty() {
            continue;
        }
        let mut record = Record::new(name, cell(TEAM_COLUMN), season);
        for (i, header) in headers.iter().enumerate() {
            record = record.with_field(header, row.get(i).unwrap_or(""));
        }
        records.push(record);
    }
    Ok(records)
}

/// Load every configured stat file under `data_dir`, grouped by category.
pub fn load_pools(
    data_dir: &Path,
    files: &[PoolFile],
) -> PuzzleResult<BTreeMap<CategoryId, Vec<Record>>> {
    let mut pools: BTreeMap<CategoryId, Vec<Record>> = BTreeMap::new();
    for file in files {
        let path = data_dir.join(&file.path);
        let input = std::fs::File::open(&path)?;
        let records = load_position_csv(input, file.season)?;
        log::info!("{}: {} rows from {}", file.category, records.len(), path.display());
        pools.entry(file.category.clone()).or_default().extend(records);
    }
    Ok(pools)
}

/// Tournament results: `player_name, event_name, year, score_to_par,
/// position`. Keeps rows with a name, an integer score, a finish that is
/// not in `excluded_positions`, and a year inside the configured window.
pub fn load_golf_results<R: Read>(input: R, config: &GolfConfig) -> PuzzleResult<Vec<Record>> {
    let mut rdr = reader(input);
    let headers = rdr.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h == name);
    let (name_i, event_i, year_i, score_i, pos_i) = (
        col("player_name"),
        col("event_name"),
        col("year"),
        col(SCORE_FIELD),
        col("position"),
    );

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for row in rdr.records() {
        let row = row?;
        let get = |i: Option<usize>| i.and_then(|i| row.get(i)).unwrap_or("");

        let name = get(name_i);
        let score = get(score_i).parse::<i32>().ok();
        let finish = get(pos_i).to_lowercase();
        let year: Period = get(year_i).parse().unwrap_or(0);
        let excluded = config.excluded_positions.iter().any(|p| p.eq_ignore_ascii_case(&finish));

        let Some(score) = score else {
            dropped += 1;
            continue;
        };
        if name.is_empty() || excluded || year < config.min_year || year > config.max_year {
            dropped += 1;
            continue;
        }
        rows.push(
            Record::new(name, get(event_i), year)
                .with_field(SCORE_FIELD, score.to_string())
                .with_field("position", get(pos_i)),
        );
    }
    log::debug!("golf results: kept {}, dropped {dropped}", rows.len());
    Ok(rows)
}

/// World ranking export with `RANKING` and `NAME` columns (any case).
/// Missing columns yield an empty table; an unparseable rank falls back
/// to the row's 1-based position.
pub fn load_rankings<R: Read>(input: R) -> PuzzleResult<RankTable> {
    let mut rdr = reader(input);
    let headers = rdr.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let mut table = RankTable::new();
    let (Some(name_i), Some(rank_i)) = (col("NAME"), col("RANKING")) else {
        log::warn!("rankings file lacks NAME/RANKING columns");
        return Ok(table);
    };

    for (line, row) in rdr.records().enumerate() {
        let row = row?;
        let name = row.get(name_i).unwrap_or("");
        if name.is_empty() {
            continue;
        }
        let fallback = u32::try_from(line + 1).unwrap_or(u32::MAX);
        let rank = row
            .get(rank_i)
            .and_then(|r| r.parse::<u32>().ok())
            .unwrap_or(fallback);
        table.insert(name, rank);
    }
    Ok(table)
}
