//! Salvo (Knox) fires a fixed volley of projectiles per attack; Ghost
//! Bullets gives each volley a per-level chance at one extra projectile,
//! tracked through `result.multistrikes`. Maxed out (level 15, ~100% per
//! SPEC_FULL's 6.67%/level curve) it should proc on nearly every attack.

use cifi_optimizer::config::{BuildConfig, HunterType};
use cifi_optimizer::simulation::run_simulation_with_rng;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn knox_build(level: i32, ghost_bullets: i32) -> BuildConfig {
    let mut talents = HashMap::new();
    if ghost_bullets > 0 {
        talents.insert("ghost_bullets".to_string(), ghost_bullets);
    }
    BuildConfig {
        meta: None,
        hunter: Some(HunterType::Knox),
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

#[test]
fn maxed_ghost_bullets_procs_on_almost_every_attack() {
    let cfg = knox_build(20, 15);

    let mut total_attacks = 0i64;
    let mut total_ghost_procs = 0i64;
    for seed in 0..TRIALS {
        let mut rng = SmallRng::seed_from_u64(8000 + seed);
        let result = run_simulation_with_rng(&cfg, &mut rng);
        total_attacks += result.attacks as i64;
        total_ghost_procs += result.multistrikes as i64;
    }

    assert!(total_attacks > 500, "expected enough Salvo attacks to converge, got {total_attacks}");
    let proc_rate = total_ghost_procs as f64 / total_attacks as f64;
    // 15 * 0.0667 = 1.0005, clamped by the rng roll itself to <= 1.0 in practice.
    assert!(proc_rate > 0.9, "maxed Ghost Bullets should proc on nearly every attack, got rate {proc_rate}");
}

#[test]
fn ghost_bullets_untalented_never_procs() {
    let cfg = knox_build(20, 0);
    let mut rng = SmallRng::seed_from_u64(1);
    let result = run_simulation_with_rng(&cfg, &mut rng);
    assert_eq!(result.multistrikes, 0, "no Ghost Bullets talent means no extra-projectile procs");
}
