//! End-of-stage loot and XP composition (C7).
//!
//! Every hunter clears a stage with a loot multiplier built from dozens of
//! independent sources — inscryptions, relics, gems, gadgets, loop mods,
//! construction milestones, diamond cards. None of them compound with each
//! other in an interesting way; they're all just terms multiplied onto a
//! stage-scaled base. `compose_loot_multiplier` enumerates the sources,
//! `xp_mult` does the same for the (much shorter) XP side, and
//! `calculate_final_loot` turns a finished run's final stage into the three
//! rarity buckets plus XP.

use crate::config::{BuildConfig, HunterType};

const BASE_COMMON: f64 = 0.0237;
const BASE_UNCOMMON: f64 = 0.0463;
const BASE_RARE: f64 = 0.0750;

fn stage_mult(kind: HunterType) -> f64 {
    match kind {
        HunterType::Borge => 1.051,
        HunterType::Ozzy => 1.059,
        HunterType::Knox => 1.074,
    }
}

fn base_xp(kind: HunterType) -> f64 {
    match kind {
        HunterType::Borge => 26.3e12,
        HunterType::Ozzy => 779e9,
        HunterType::Knox => 786.0,
    }
}

/// `1.005^level * 1.02^(level/10)`, the shared gadget-loot curve used by
/// wrench/zaptron/trident/anchor style gadgets.
fn gadget_loot(level: i32) -> f64 {
    if level <= 0 {
        return 1.0;
    }
    1.005f64.powi(level) * 1.02f64.powi(level / 10)
}

fn bonus_num(cfg: &BuildConfig, key: &str) -> f64 {
    cfg.bonuses.get(key).and_then(|v| v.as_f64()).unwrap_or(0.0)
}

fn bonus_flag(cfg: &BuildConfig, key: &str) -> bool {
    cfg.bonuses.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

/// Research #81 gating from §4.7: the 1.10 tier and the 1.32 tier each
/// unlock at a different hunter level per kind.
fn research81_mult(kind: HunterType, level: i32, cfg: &BuildConfig) -> f64 {
    let tier = bonus_num(cfg, "research81") as i32;
    if tier <= 0 {
        return 1.0;
    }
    let (low_gate, high_gate) = match kind {
        HunterType::Borge => (1, 1),
        HunterType::Ozzy => (2, 5),
        HunterType::Knox => (3, 6),
    };
    if (1..=3).contains(&tier) && level >= low_gate {
        1.10
    } else if tier >= 4 && level >= high_gate {
        1.32
    } else {
        1.0
    }
}

/// Compose every multiplicative loot-rate contribution for a build.
///
/// `effect_chance` is the hunter's fully-derived effect chance (needed by
/// the Presence of God term below); callers already have it from building
/// the `Hunter` before a stage completes.
///
/// Grounded on `compute_loot_multiplier` (hunters.py): each term here is a
/// direct port of one of that function's independent multiplier sources.
pub fn compose_loot_multiplier(cfg: &BuildConfig, effect_chance: f64) -> f64 {
    let kind = cfg.get_hunter_type();
    let level = cfg.get_level();
    let mut mult = 1.0;

    // Timeless Mastery
    let timeless_rate = match kind {
        HunterType::Borge => 0.14,
        HunterType::Ozzy => 0.16,
        HunterType::Knox => 0.14,
    };
    mult *= 1.0 + timeless_rate * cfg.get_attr("timeless_mastery") as f64;

    // Shard milestone - uncapped exponential
    let shard_level = bonus_num(cfg, "shard_milestone") as i32;
    if shard_level > 0 {
        mult *= 1.02f64.powi(shard_level);
    }

    // Relic r7 - capped at level 100
    let r7 = cfg.get_relic("r7").min(100);
    if r7 > 0 {
        mult *= 1.05f64.powi(r7);
    }

    mult *= research81_mult(kind, level, cfg);

    match kind {
        HunterType::Borge => {
            mult *= 1.1f64.powi(cfg.get_inscr("i14").min(5));
            mult *= 1.08f64.powi(cfg.get_inscr("i44").min(10));
            mult *= 1.0 + cfg.get_inscr("i60") as f64 * 0.03;
            mult *= 1.1f64.powi(cfg.get_inscr("i80").min(10));
        }
        HunterType::Ozzy => {
            mult *= 1.5f64.powi(cfg.get_inscr("i32").min(8));
            mult *= 1.1f64.powi(cfg.get_inscr("i81").min(10));
            mult *= 1.0 + cfg.get_attr("blessings_of_the_scarab").min(20) as f64 * 0.05;
        }
        HunterType::Knox => {}
    }

    // Gadgets - shared curve, only the gadgets the build actually carries
    for gadget in ["wrench", "zaptron", "trident", "anchor"] {
        let level = cfg.gadgets.get(gadget).copied().unwrap_or(0);
        if level > 0 {
            mult *= gadget_loot(level);
        }
    }

    // Loop mods (Ouroboros) - leveled, live in the global bonuses map
    match kind {
        HunterType::Borge => {
            mult *= 1.03f64.powi(bonus_num(cfg, "lm_ouro1") as i32);
            mult *= 1.05f64.powi(bonus_num(cfg, "lm_ouro11") as i32);
            mult *= 1.05f64.powi((bonus_num(cfg, "scavenger") as i32).min(25));
        }
        HunterType::Ozzy => {
            mult *= 1.03f64.powi(bonus_num(cfg, "lm_ouro18") as i32);
            mult *= 1.05f64.powi((bonus_num(cfg, "scavenger2") as i32).min(25));
        }
        HunterType::Knox => {}
    }

    // Construction milestones - flat factors when enabled
    for (key, bonus) in [("cm46", 0.03), ("cm47", 0.02), ("cm48", 0.07), ("cm51", 0.05)] {
        if bonus_flag(cfg, key) {
            mult *= 1.0 + bonus;
        }
    }

    // Diamond cards
    if kind == HunterType::Borge && bonus_flag(cfg, "gaiden_card") {
        mult *= 1.05;
    }
    if kind == HunterType::Ozzy && bonus_flag(cfg, "iridian_card") {
        mult *= 1.05;
    }

    // Diamond loot booster - leveled
    mult *= 1.0 + 0.025 * bonus_num(cfg, "diamond_loot");

    // IAP Traversal Pack
    if bonus_flag(cfg, "iap_travpack") {
        mult *= 1.25;
    }

    // Ultima multiplier - direct scalar, only applied if > 0
    let ultima = bonus_num(cfg, "ultima_multiplier");
    if ultima > 0.0 {
        mult *= ultima;
    }

    // Gem nodes - per-kind attraction-loot gem plus the shared node #3
    let attraction_key = match kind {
        HunterType::Borge => "attraction_loot_borge",
        HunterType::Ozzy => "attraction_loot_ozzy",
        HunterType::Knox => "attraction_loot_knox",
    };
    let attraction_level = cfg.get_gem(attraction_key);
    if attraction_level > 0 {
        mult *= 1.07f64.powi(attraction_level);
    }
    let node3 = cfg.get_gem("attraction_node_#3");
    if node3 > 0 {
        mult *= 1.0 + 0.25 * node3 as f64;
    }

    // Presence of God - loot bump scales with the hunter's own effect chance
    let pog = cfg.get_talent("presence_of_god");
    if pog > 0 {
        mult *= 1.0 + 0.20 * pog as f64 * effect_chance;
    }

    mult *= 1.0 + bonus_num(cfg, "skill6_loot_bonus");
    mult *= 1.0 + 0.05 * cfg.get_relic("wastarian_relic") as f64;

    mult
}

/// Compose the XP multiplier. Shorter than loot: each kind has its own
/// flagship XP talent/relic plus a linear bonus-attribute scaler.
pub fn xp_mult(cfg: &BuildConfig) -> f64 {
    let kind = cfg.get_hunter_type();
    match kind {
        HunterType::Borge => {
            let r19 = cfg.get_relic("r19");
            let base = 2.0f64.powi(r19.min(8));
            base * (1.0 + 0.10 * bonus_num(cfg, "pom3"))
        }
        HunterType::Ozzy => {
            let i33 = cfg.get_inscr("i33");
            let base = 1.75f64.powi(i33.min(6));
            base * (1.0 + 0.15 * bonus_num(cfg, "poi3"))
        }
        HunterType::Knox => 1.0 + 0.15 * bonus_num(cfg, "pok3"),
    }
}

/// Final loot/xp for a run that ended at `final_stage`: returns
/// `(common, uncommon, rare, xp)`. `effect_chance` is the hunter's derived
/// effect chance, needed by the Presence of God loot term.
pub fn calculate_final_loot(final_stage: i32, cfg: &BuildConfig, effect_chance: f64) -> (f64, f64, f64, f64) {
    let kind = cfg.get_hunter_type();
    let stage = final_stage.max(0) as f64;
    let mult = stage_mult(kind);

    let geom_sum = if mult > 1.0 {
        (mult.powf(stage) - 1.0) / (mult - 1.0)
    } else {
        stage
    };
    let enemy_factor = geom_sum * 10.0;
    let loot_multiplier = compose_loot_multiplier(cfg, effect_chance);

    let common = BASE_COMMON * enemy_factor * loot_multiplier;
    let uncommon = BASE_UNCOMMON * enemy_factor * loot_multiplier;
    let rare = BASE_RARE * enemy_factor * loot_multiplier;
    let xp = base_xp(kind) * stage * xp_mult(cfg);

    (common, uncommon, rare, xp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn empty_build(kind: HunterType, level: i32) -> BuildConfig {
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
    fn bare_build_has_unit_multiplier() {
        let cfg = empty_build(HunterType::Borge, 10);
        assert!((compose_loot_multiplier(&cfg, 0.1) - 1.0).abs() < 1e-9);
        assert!((xp_mult(&cfg) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn loot_grows_with_stage() {
        let cfg = empty_build(HunterType::Ozzy, 10);
        let (c_low, _, _, _) = calculate_final_loot(5, &cfg, 0.1);
        let (c_high, _, _, _) = calculate_final_loot(50, &cfg, 0.1);
        assert!(c_high > c_low);
    }

    #[test]
    fn timeless_mastery_scales_with_kind() {
        let mut borge = empty_build(HunterType::Borge, 10);
        borge.attributes.insert("timeless_mastery".to_string(), 1);
        let mut ozzy = empty_build(HunterType::Ozzy, 10);
        ozzy.attributes.insert("timeless_mastery".to_string(), 1);
        assert!(compose_loot_multiplier(&ozzy, 0.1) > compose_loot_multiplier(&borge, 0.1));
    }

    #[test]
    fn research81_gated_by_level() {
        let mut low = empty_build(HunterType::Knox, 10);
        low.bonuses.insert("research81".to_string(), serde_json::json!(5));
        let mut high = empty_build(HunterType::Knox, 50);
        high.bonuses.insert("research81".to_string(), serde_json::json!(5));
        assert!((compose_loot_multiplier(&low, 0.1) - 1.0).abs() < 1e-9);
        assert!(compose_loot_multiplier(&high, 0.1) > 1.0);
    }

    #[test]
    fn geom_sum_matches_closed_form_for_single_stage() {
        let cfg = empty_build(HunterType::Borge, 10);
        let (common, _, _, _) = calculate_final_loot(1, &cfg, 0.1);
        // S=1: geom_sum = stage_mult^1 just-one-term = 1, enemy_factor = 10
        let expected = BASE_COMMON * 10.0;
        assert!((common - expected).abs() < 1e-9);
    }
}
