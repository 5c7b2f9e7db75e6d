use betterseason_core::{
    config::GolfConfig,
    error::PuzzleError,
    golf::build_golf_puzzle,
    loader::{load_golf_results, load_rankings},
    rng::PuzzleRng,
};
use std::collections::BTreeMap;

const RESULTS: &str = include_str!("../../data/golf/results.csv");
const RANKINGS: &str = include_str!("../../data/golf/rankings.csv");

#[test]
fn shipped_data_builds_a_full_puzzle() {
    let config = GolfConfig::default();
    let rows = load_golf_results(RESULTS.as_bytes(), &config).unwrap();
    let ranks = load_rankings(RANKINGS.as_bytes()).unwrap();
    let puzzle = build_golf_puzzle(&rows, &config, Some(&ranks), &mut PuzzleRng::from_seed_str("2025-04-10")).unwrap();

    assert_eq!(puzzle.golfers.len(), config.golfers_per_game);
    for g in &puzzle.golfers {
        assert_eq!(g.cards.len(), config.cards_per_golfer);
        for card in &g.cards {
            assert!((config.min_year..=config.max_year).contains(&card.year));
        }
    }
    let best: i32 = puzzle
        .golfers
        .iter()
        .map(|g| g.cards.iter().map(|c| c.score_to_par).min().unwrap())
        .sum();
    assert_eq!(puzzle.best_total(), best);
}

#[test]
fn top_ranked_golfers_appear_more_often() {
    let config = GolfConfig::default();
    let rows = load_golf_results(RESULTS.as_bytes(), &config).unwrap();
    let ranks = load_rankings(RANKINGS.as_bytes()).unwrap();

    let mut appearances: BTreeMap<String, u32> = BTreeMap::new();
    for seed in 0..600u64 {
        let puzzle = build_golf_puzzle(&rows, &config, Some(&ranks), &mut PuzzleRng::from_int(seed)).unwrap();
        for g in puzzle.golfers {
            *appearances.entry(g.player_name).or_default() += 1;
        }
    }
    let top = appearances.get("Scottie Scheffler").copied().unwrap_or(0);
    let unranked = appearances.get("Cameron Young").copied().unwrap_or(0);
    assert!(top > unranked * 2, "Scheffler {top}, Young {unranked}");
}

#[test]
fn too_few_golfers_is_an_error() {
    let config = GolfConfig { golfers_per_game: 40, ..GolfConfig::default() };
    let rows = load_golf_results(RESULTS.as_bytes(), &config).unwrap();
    let err = build_golf_puzzle(&rows, &config, None, &mut PuzzleRng::from_int(1)).unwrap_err();
    assert!(matches!(err, PuzzleError::InsufficientGolfers { needed: 40, .. }));
}
