//! Impeccable Impacts (Borge) arms a stun on every successful proc. A build
//! that maxes the talent should suffer measurably less incoming damage than
//! an otherwise-identical build with the talent untouched, averaged over
//! enough seeds to wash out event-loop RNG noise.

use cifi_optimizer::config::{BuildConfig, HunterType};
use cifi_optimizer::simulation::run_simulation_with_rng;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn build(level: i32, impeccable_impacts: i32) -> BuildConfig {
    let mut talents = HashMap::new();
    if impeccable_impacts > 0 {
        talents.insert("impeccable_impacts".to_string(), impeccable_impacts);
    }
    BuildConfig {
        meta: None,
        hunter: Some(HunterType::Borge),
        level: Some(level),
        stats: HashMap::new(),
        talents,
        attributes: HashMap::new(),
        inscryptions: HashMap::new(),
        mods: HashMap::new(),
        relics: HashMap::new(),
        gems: HashMap::new(),
        gadgets: HashMap::new(),
        bonuses: HashMap::new(),
    }
}

const TRIALS: u64 = 40;

fn total_damage_taken(cfg: &BuildConfig) -> f64 {
    let mut total = 0.0;
    for seed in 0..TRIALS {
        let mut rng = SmallRng::seed_from_u64(1000 + seed);
        let result = run_simulation_with_rng(cfg, &mut rng);
        total += result.damage_taken;
    }
    total
}

#[test]
fn maxed_impeccable_impacts_reduces_incoming_damage() {
    let baseline_cfg = build(20, 0);
    let talented_cfg = build(20, 10);

    let baseline = total_damage_taken(&baseline_cfg);
    let talented = total_damage_taken(&talented_cfg);

    assert!(baseline > 0.0, "baseline build took no damage at all, test is not exercising combat");
    assert!(
        talented <= baseline * 0.95,
        "Impeccable Impacts should cut incoming damage by at least 5% (baseline={baseline}, talented={talented})"
    );
}

#[test]
fn impeccable_impacts_registers_effect_procs() {
    let cfg = build(20, 10);
    let mut rng = SmallRng::seed_from_u64(99);
    let result = run_simulation_with_rng(&cfg, &mut rng);
    assert!(result.effect_procs > 0, "a maxed stun talent should proc at least once over a full run");
    assert!(result.stun_duration_inflicted > 0.0);
}
