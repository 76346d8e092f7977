//! Progressive curriculum (SPEC_FULL §4.9 point 2): above level 40 the
//! optimizer works through six point-budget tiers (5%/10%/25%/50%/75%/100%
//! of the level's talent/attribute budget) rather than searching the full
//! budget from generation one.

use cifi_optimizer::config::{BuildConfig, HunterType};
use cifi_optimizer::optimizer::{optimize, OptimizeParams, OptimizerMode};
use std::collections::HashMap;

fn bare_config(kind: HunterType, level: i32) -> BuildConfig {
    BuildConfig {
        meta: None,
        hunter: Some(kind),
        level: Some(level),
        stats: HashMap::new(),
        talents: HashMap::new(),
        attributes: HashMap::new(),
        inscryptions: HashMap::new(),
        mods: HashMap::new(),
        relics: HashMap::new(),
        gems: HashMap::new(),
        gadgets: HashMap::new(),
        bonuses: HashMap::new(),
    }
}

#[test]
fn level_above_40_runs_six_progressive_tiers() {
    let level = 50;
    let params = OptimizeParams {
        kind: HunterType::Borge,
        level,
        base_config: bare_config(HunterType::Borge, level),
        num_sims: 2,
        builds_per_tier: 6,
        use_progressive: true,
        use_successive_halving: false,
        mode: OptimizerMode::Normal,
    };

    let report = optimize(params, None);

    assert_eq!(report.generation_history.len(), 6, "level 50 should sweep all six progressive tiers");

    // Talent/attribute budgets are non-decreasing across tiers and the last
    // tier uses the full level budget.
    let mut prev_talent_points = -1;
    for record in &report.generation_history {
        assert!(record.talent_points >= prev_talent_points);
        prev_talent_points = record.talent_points;
    }
    let last = report.generation_history.last().unwrap();
    assert_eq!(last.talent_points, level);
    assert_eq!(last.attribute_points, 3 * level);

    assert!(report.best_build.is_some(), "a completed run should surface a best build");
    assert_eq!(report.status, "complete");
}

#[test]
fn low_level_build_skips_progressive_tiering() {
    let level = 10;
    let params = OptimizeParams {
        kind: HunterType::Borge,
        level,
        base_config: bare_config(HunterType::Borge, level),
        num_sims: 2,
        builds_per_tier: 4,
        use_progressive: true,
        use_successive_halving: false,
        mode: OptimizerMode::Normal,
    };

    let report = optimize(params, None);
    assert_eq!(report.generation_history.len(), 1, "level 10 is within the single-tier band");
}
