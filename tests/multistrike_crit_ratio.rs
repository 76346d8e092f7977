//! Multistrike (Ozzy) crit resolution: `special_chance` gates a crit roll on
//! every attack, and a hit crit for `special_damage` times base power. Over
//! enough attacks the observed crit rate should converge on the derived
//! `special_chance`, and crits should account for a non-trivial share of
//! total damage dealt.

use cifi_optimizer::config::{BuildConfig, HunterType};
use cifi_optimizer::simulation::run_simulation_with_rng;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn ozzy_build(level: i32, special_chance_stat: i32) -> BuildConfig {
    let mut stats = HashMap::new();
    stats.insert("special_chance".to_string(), special_chance_stat);
    BuildConfig {
        meta: None,
        hunter: Some(HunterType::Ozzy),
        level: Some(level),
        stats,
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

const TRIALS: u64 = 60;

#[test]
fn crit_rate_converges_on_derived_special_chance() {
    // special_chance = 0.05 + 50 * 0.0038 = 0.24 (hunter.rs create_ozzy)
    let expected_chance = 0.05 + 50.0 * 0.0038;
    let cfg = ozzy_build(30, 50);

    let mut total_attacks = 0i64;
    let mut total_crits = 0i64;
    let mut total_damage = 0.0;
    let mut total_crit_damage = 0.0;

    for seed in 0..TRIALS {
        let mut rng = SmallRng::seed_from_u64(5000 + seed);
        let result = run_simulation_with_rng(&cfg, &mut rng);
        total_attacks += result.attacks as i64;
        total_crits += result.crits as i64;
        total_damage += result.damage;
        total_crit_damage += result.extra_damage_from_crits;
    }

    assert!(total_attacks > 1000, "expected enough attacks across {TRIALS} runs to converge, got {total_attacks}");

    let observed_rate = total_crits as f64 / total_attacks as f64;
    assert!(
        (observed_rate - expected_chance).abs() < 0.05,
        "observed crit rate {observed_rate} should track derived special_chance {expected_chance}"
    );

    assert!(total_crit_damage > 0.0, "crits should contribute bonus damage");
    assert!(
        total_crit_damage / total_damage < 1.0,
        "crit bonus damage should never exceed total damage dealt"
    );
}
