//! Successive halving (SPEC_FULL §4.9 point 3): each round doubles the
//! per-candidate sim budget and keeps only `survival_rate` of the
//! population, with at least one survivor always kept. Ultra mode is the
//! most aggressive schedule (4 base sims, 6 rounds, 5% survival) and should
//! still complete without the population collapsing to zero.

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
fn ultra_mode_halving_schedule_is_the_most_aggressive() {
    let halving = OptimizerMode::Ultra.halving_params();
    assert_eq!(halving.base_sims, 4);
    assert_eq!(halving.rounds, 6);
    assert!((halving.survival_rate - 0.05).abs() < 1e-9);

    // Every other mode keeps a larger share of its population per round.
    for mode in [OptimizerMode::Normal, OptimizerMode::Fast, OptimizerMode::Massive] {
        assert!(mode.halving_params().survival_rate > halving.survival_rate);
    }
}

#[test]
fn ultra_mode_never_collapses_the_population_to_zero() {
    let level = 10;
    let builds_per_tier = 8;
    let params = OptimizeParams {
        kind: HunterType::Ozzy,
        level,
        base_config: bare_config(HunterType::Ozzy, level),
        num_sims: 2,
        builds_per_tier,
        use_progressive: false,
        use_successive_halving: true,
        mode: OptimizerMode::Ultra,
    };

    let report = optimize(params, None);

    assert_eq!(report.generation_history.len(), 1, "use_progressive=false is always a single tier");
    assert_eq!(report.timing.tested, builds_per_tier as i32);
    assert!(report.best_build.is_some());

    let survivors = report.top_10_by_max_stage.len();
    assert!(survivors >= 1, "successive halving's ceil().max(1.0) keeps at least one survivor every round");
    assert!(survivors <= builds_per_tier, "can never end up with more survivors than the tier started with");
}
