use betterseason_core::{
    config::GameConfig,
    reveal::{build_reveal_order, RevealTiers},
    rng::PuzzleRng,
};
use std::collections::BTreeMap;

fn qb_tiers() -> RevealTiers {
    GameConfig::default_nfl()
        .category("QB")
        .unwrap()
        .reveal
        .clone()
        .unwrap()
}

#[test]
fn terminal_field_is_always_last_and_never_leads() {
    let tiers = qb_tiers();
    for seed in 0..300u64 {
        let order = build_reveal_order(&tiers, &mut PuzzleRng::from_int(seed));
        assert_eq!(order.last(), Some(&tiers.terminal));
        assert!(!order[..tiers.lead_count].contains(&tiers.terminal));
        assert!(order[..tiers.lead_count].iter().all(|f| tiers.lead_pool.contains(f)));
        assert_eq!(order.iter().filter(|f| **f == tiers.terminal).count(), 1);
    }
}

#[test]
fn every_configured_field_appears_once() {
    let tiers = qb_tiers();
    let order = build_reveal_order(&tiers, &mut PuzzleRng::from_seed_str("once"));
    let mut expected: Vec<_> = tiers
        .lead_pool
        .iter()
        .chain(&tiers.supplementary)
        .chain(std::iter::once(&tiers.terminal))
        .cloned()
        .collect();
    let mut got = order.clone();
    expected.sort();
    got.sort();
    assert_eq!(got, expected);
}

#[test]
fn first_clue_is_spread_across_the_lead_pool() {
    let tiers = qb_tiers();
    let mut firsts = BTreeMap::new();
    for seed in 0..2_000u64 {
        let order = build_reveal_order(&tiers, &mut PuzzleRng::from_int(seed));
        *firsts.entry(order[0].clone()).or_insert(0u32) += 1;
    }
    assert_eq!(firsts.len(), tiers.lead_pool.len());
    // 400 expected each.
    assert!(firsts.values().all(|&c| (300..500).contains(&c)), "{firsts:?}");
}

#[test]
fn empty_supplementary_tier_is_fine() {
    let tiers = RevealTiers {
        lead_pool: vec!["PTS".into(), "REB".into()],
        lead_count: 1,
        supplementary: vec![],
        terminal: "Team".into(),
        initial_reveal: 1,
    };
    let order = build_reveal_order(&tiers, &mut PuzzleRng::from_int(5));
    assert_eq!(order.len(), 3);
    assert_eq!(order[2], "Team");
}
