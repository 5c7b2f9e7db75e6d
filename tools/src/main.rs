//! puzzle-runner: headless puzzle generator for Better Season.
//!
//! Usage:
//!   puzzle-runner --mode daily --date 2025-10-19
//!   puzzle-runner --mode unlimited --seed k3x9a0pq1z
//!   puzzle-runner --mode blitz --rounds 12
//!   puzzle-runner --mode guess --category WR
//!   puzzle-runner --mode golf --seed masters
//!   puzzle-runner --mode daily --record-score 7 --sport nfl --db counters.db

use anyhow::{anyhow, Result};
use betterseason_core::{
    config::GameConfig,
    daily::{daily_seed, game_number},
    golf::build_golf_puzzle,
    loader::{load_golf_results, load_pools, load_rankings},
    puzzle::PuzzleEngine,
    rng::{fresh_seed, PuzzleRng},
    store::{CounterStore, SqliteCounterStore},
};
use chrono::NaiveDate;
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mode = arg_str(&args, "--mode").unwrap_or("daily");
    let data_dir = arg_str(&args, "--data-dir").unwrap_or("./data");
    let rounds = parse_arg(&args, "--rounds", 10usize);
    let category = arg_str(&args, "--category").unwrap_or("QB");
    let sport = arg_str(&args, "--sport").unwrap_or("nfl");
    let db = arg_str(&args, "--db").unwrap_or("./betterseason.db");
    let date = match arg_str(&args, "--date") {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|e| anyhow!("Bad --date {d}: {e}"))?,
        None => chrono::Local::now().date_naive(),
    };
    let seed = match mode {
        "daily" => daily_seed(date),
        _ => arg_str(&args, "--seed")
            .map(str::to_string)
            .unwrap_or_else(|| fresh_seed(wall_clock_nanos())),
    };

    log::info!("mode={mode} seed={seed} data_dir={data_dir}");
    let config = GameConfig::load(data_dir)?;

    let output = match mode {
        "daily" | "unlimited" => {
            let engine = engine(config, data_dir)?;
            let descriptor = if mode == "daily" {
                engine.daily_pass(date)?
            } else {
                engine.unlimited_pass(&seed)?
            };
            serde_json::json!({
                "mode": mode,
                "game_number": (mode == "daily").then(|| game_number(date)),
                "max_score": descriptor.max_score(),
                "puzzle": descriptor,
            })
        }
        "blitz" => {
            let engine = engine(config, data_dir)?;
            let mut session = engine.blitz(&seed);
            let mut played = Vec::new();
            while session.attempts() < rounds {
                if let Some(round) = session.next_round()? {
                    played.push(round);
                }
            }
            serde_json::json!({ "mode": mode, "seed": seed, "rounds": played })
        }
        "guess" => {
            let engine = engine(config, data_dir)?;
            let puzzle = engine
                .guess_puzzle(category, &seed)?
                .ok_or_else(|| anyhow!("No players loaded for {category}"))?;
            serde_json::json!({ "mode": mode, "seed": seed, "puzzle": puzzle })
        }
        "golf" => {
            let results_path = format!("{data_dir}/golf/results.csv");
            let results = std::fs::File::open(&results_path)
                .map_err(|e| anyhow!("Cannot read {results_path}: {e}"))?;
            let rows = load_golf_results(results, &config.golf)?;

            let rankings_path = format!("{data_dir}/golf/rankings.csv");
            let ranks = match std::fs::File::open(&rankings_path) {
                Ok(f) => Some(load_rankings(f)?),
                Err(e) => {
                    log::warn!("No rankings at {rankings_path} ({e}); all golfers weighted equally");
                    None
                }
            };

            let mut rng = PuzzleRng::from_seed_str(&seed);
            let puzzle = build_golf_puzzle(&rows, &config.golf, ranks.as_ref(), &mut rng)?;
            serde_json::json!({
                "mode": mode,
                "seed": seed,
                "best_total": puzzle.best_total(),
                "puzzle": puzzle,
            })
        }
        other => return Err(anyhow!("Unknown --mode {other}")),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    if let Some(score) = arg_str(&args, "--record-score") {
        let score: f64 = score
            .parse()
            .map_err(|e| anyhow!("Bad --record-score {score}: {e}"))?;
        let store = SqliteCounterStore::open(db)?;
        store.migrate()?;
        store.record_play(date, sport, mode, score)?;
        let stats = store.stats(date, sport, mode)?;
        eprintln!(
            "{sport}/{mode} on {date}: {} played, average {}",
            stats.games_played,
            stats
                .average_score
                .map(|a| format!("{a:.1}"))
                .unwrap_or_else(|| "-".into())
        );
    }

    Ok(())
}

fn engine(config: GameConfig, data_dir: &str) -> Result<PuzzleEngine> {
    let pools = load_pools(Path::new(data_dir), &config.pool_files)?;
    Ok(PuzzleEngine::new(config, pools))
}

fn arg_str<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn wall_clock_nanos() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
