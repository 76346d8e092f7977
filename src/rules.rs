//! Per-kind ability rule tables: costs, maxes, dependencies, point gates,
//! exclusions and "requires-all-maxed" talents.
//!
//! Grounded in the reference implementation's `Borge`/`Ozzy`/`Knox` classes
//! (`costs`, `attribute_dependencies`, `attribute_point_gates`,
//! `talent_requires_all_maxed`). Ported as data rather than re-derived.

use crate::config::{BuildConfig, HunterType};
use crate::error::Violation;
use std::collections::HashMap;

/// `None` max means unlimited (the generator computes a dynamic effective cap).
#[derive(Debug, Clone, Copy)]
pub struct AttributeRule {
    pub key: &'static str,
    pub cost: i32,
    pub max: Option<i32>,
    /// unlock_level, point_gate — attributes in this corpus don't carry an
    /// unlock_level (only legacy_of_ultima, a talent, does), so this is
    /// point-gate only.
    pub point_gate: Option<i32>,
}

#[derive(Debug, Clone, Copy)]
pub struct TalentRule {
    pub key: &'static str,
    pub max: i32,
    pub requires_all_maxed: bool,
    pub unlock_level: Option<i32>,
}

pub struct KindRules {
    pub attributes: &'static [AttributeRule],
    pub talents: &'static [TalentRule],
    /// prerequisite edges: key -> (prereq_key, min_level)
    pub dependencies: &'static [(&'static str, &'static str, i32)],
    /// mutually exclusive attribute pairs. Empty for every kind in the
    /// reference implementation today (Knox documents some informally in
    /// comments but never wires them into `attribute_exclusions`), but the
    /// mechanism is real and validated regardless.
    pub exclusions: &'static [(&'static str, &'static str)],
}

macro_rules! attr {
    ($key:literal, $cost:expr, inf, $gate:expr) => {
        AttributeRule { key: $key, cost: $cost, max: None, point_gate: $gate }
    };
    ($key:literal, $cost:expr, $max:expr, $gate:expr) => {
        AttributeRule { key: $key, cost: $cost, max: Some($max), point_gate: $gate }
    };
}

macro_rules! talent {
    ($key:literal, $max:expr) => {
        TalentRule { key: $key, max: $max, requires_all_maxed: false, unlock_level: None }
    };
    ($key:literal, $max:expr, unlock = $lvl:expr) => {
        TalentRule { key: $key, max: $max, requires_all_maxed: false, unlock_level: Some($lvl) }
    };
    ($key:literal, $max:expr, all_maxed) => {
        TalentRule { key: $key, max: $max, requires_all_maxed: true, unlock_level: None }
    };
}

static BORGE_ATTRIBUTES: &[AttributeRule] = &[
    attr!("soul_of_ares", 1, inf, None),
    attr!("essence_of_ylith", 1, inf, None),
    attr!("spartan_lineage", 2, 6, None),
    attr!("timeless_mastery", 3, 5, None),
    attr!("helltouch_barrier", 2, 10, None),
    attr!("lifedrain_inhalers", 2, 10, None),
    attr!("explosive_punches", 3, 6, None),
    attr!("book_of_baal", 3, 6, None),
    attr!("superior_sensors", 2, 6, None),
    attr!("atlas_protocol", 3, 6, Some(75)),
    attr!("weakspot_analysis", 2, 6, Some(75)),
    attr!("born_for_battle", 5, 3, Some(75)),
    attr!("soul_of_athena", 15, 1, Some(180)),
    attr!("soul_of_hermes", 2, 20, Some(150)),
    attr!("soul_of_the_minotaur", 2, 20, Some(150)),
];

static BORGE_DEPENDENCIES: &[(&str, &str, i32)] = &[
    ("essence_of_ylith", "soul_of_ares", 1),
    ("spartan_lineage", "essence_of_ylith", 1),
    ("timeless_mastery", "spartan_lineage", 1),
    ("helltouch_barrier", "soul_of_ares", 1),
    ("lifedrain_inhalers", "helltouch_barrier", 1),
    ("explosive_punches", "helltouch_barrier", 1),
    ("book_of_baal", "soul_of_ares", 1),
    ("superior_sensors", "book_of_baal", 1),
    ("atlas_protocol", "superior_sensors", 1),
    ("weakspot_analysis", "explosive_punches", 1),
    ("born_for_battle", "spartan_lineage", 1),
    ("soul_of_athena", "born_for_battle", 1),
    ("soul_of_hermes", "weakspot_analysis", 1),
    ("soul_of_the_minotaur", "atlas_protocol", 1),
];

static BORGE_TALENTS: &[TalentRule] = &[
    talent!("death_is_my_companion", 2),
    talent!("life_of_the_hunt", 5),
    talent!("unfair_advantage", 5),
    talent!("impeccable_impacts", 10),
    talent!("omen_of_defeat", 10),
    talent!("call_me_lucky_loot", 12),
    talent!("presence_of_god", 15),
    talent!("fires_of_war", 15),
    talent!("legacy_of_ultima", 50, unlock = 75),
];

static OZZY_ATTRIBUTES: &[AttributeRule] = &[
    attr!("living_off_the_land", 1, inf, None),
    attr!("exo_piercers", 1, inf, None),
    attr!("timeless_mastery", 3, 5, None),
    attr!("shimmering_scorpion", 3, 5, None),
    attr!("wings_of_ibu", 2, 5, None),
    attr!("extermination_protocol", 2, 5, None),
    attr!("soul_of_snek", 3, 5, None),
    attr!("vectid_elixir", 2, 10, None),
    attr!("cycle_of_death", 3, 5, None),
    attr!("gift_of_medusa", 3, 5, Some(88)),
    attr!("deal_with_death", 5, 3, Some(88)),
    attr!("dance_of_dashes", 3, 4, Some(88)),
    attr!("blessings_of_the_cat", 2, 20, Some(148)),
    attr!("blessings_of_the_scarab", 2, 20, Some(148)),
    attr!("blessings_of_the_sisters", 15, 1, Some(178)),
];

static OZZY_DEPENDENCIES: &[(&str, &str, i32)] = &[
    ("exo_piercers", "living_off_the_land", 1),
    ("timeless_mastery", "exo_piercers", 1),
    ("shimmering_scorpion", "exo_piercers", 1),
    ("wings_of_ibu", "living_off_the_land", 1),
    ("extermination_protocol", "wings_of_ibu", 1),
    ("soul_of_snek", "extermination_protocol", 1),
    ("vectid_elixir", "extermination_protocol", 1),
    ("cycle_of_death", "soul_of_snek", 1),
    ("dance_of_dashes", "shimmering_scorpion", 1),
    ("blessings_of_the_cat", "dance_of_dashes", 1),
    ("blessings_of_the_scarab", "dance_of_dashes", 1),
    ("blessings_of_the_sisters", "cycle_of_death", 1),
];

static OZZY_TALENTS: &[TalentRule] = &[
    talent!("death_is_my_companion", 2),
    talent!("tricksters_boon", 1),
    talent!("unfair_advantage", 5),
    talent!("thousand_needles", 10),
    talent!("omen_of_decay", 10),
    talent!("call_me_lucky_loot", 10),
    talent!("crippling_shots", 15),
    talent!("echo_bullets", 20),
    talent!("legacy_of_ultima", 50, unlock = 75),
];

static KNOX_ATTRIBUTES: &[AttributeRule] = &[
    attr!("release_the_kraken", 1, inf, None),
    attr!("space_pirate_armory", 2, 50, None),
    attr!("soul_amplification", 1, 100, None),
    attr!("serious_efficiency", 2, 5, None),
    attr!("fortification_elixir", 2, 10, None),
    attr!("a_pirates_life_for_knox", 3, 10, None),
    attr!("dead_men_tell_no_tales", 2, 10, None),
    attr!("passive_charge_tank", 4, 10, None),
    attr!("shield_of_poseidon", 1, 10, None),
    attr!("timeless_mastery", 3, 5, None),
];

static KNOX_DEPENDENCIES: &[(&str, &str, i32)] = &[
    ("space_pirate_armory", "release_the_kraken", 1),
    ("soul_amplification", "release_the_kraken", 1),
    ("serious_efficiency", "release_the_kraken", 1),
    ("fortification_elixir", "release_the_kraken", 1),
    ("a_pirates_life_for_knox", "space_pirate_armory", 1),
    ("dead_men_tell_no_tales", "soul_amplification", 1),
    ("passive_charge_tank", "serious_efficiency", 1),
    ("shield_of_poseidon", "passive_charge_tank", 1),
    ("timeless_mastery", "fortification_elixir", 1),
];

static KNOX_TALENTS: &[TalentRule] = &[
    talent!("death_is_my_companion", 2),
    talent!("calypsos_advantage", 5),
    talent!("unfair_advantage", 5),
    talent!("ghost_bullets", 15),
    talent!("omen_of_defeat", 10),
    talent!("call_me_lucky_loot", 10),
    talent!("presence_of_god", 10),
    talent!("finishing_move", 15),
    talent!("legacy_of_ultima", 50, unlock = 75),
];

static NO_EXCLUSIONS: &[(&str, &str)] = &[];

pub fn rules_for(kind: HunterType) -> KindRules {
    match kind {
        HunterType::Borge => KindRules {
            attributes: BORGE_ATTRIBUTES,
            talents: BORGE_TALENTS,
            dependencies: BORGE_DEPENDENCIES,
            exclusions: NO_EXCLUSIONS,
        },
        HunterType::Ozzy => KindRules {
            attributes: OZZY_ATTRIBUTES,
            talents: OZZY_TALENTS,
            dependencies: OZZY_DEPENDENCIES,
            exclusions: NO_EXCLUSIONS,
        },
        HunterType::Knox => KindRules {
            attributes: KNOX_ATTRIBUTES,
            talents: KNOX_TALENTS,
            dependencies: KNOX_DEPENDENCIES,
            exclusions: NO_EXCLUSIONS,
        },
    }
}

impl KindRules {
    pub fn attribute(&self, key: &str) -> Option<&AttributeRule> {
        self.attributes.iter().find(|a| a.key == key)
    }

    pub fn talent(&self, key: &str) -> Option<&TalentRule> {
        self.talents.iter().find(|t| t.key == key)
    }

    pub fn prereqs_of<'a>(&'a self, key: &str) -> Vec<(&'a str, i32)> {
        self.dependencies
            .iter()
            .filter(|(k, _, _)| *k == key)
            .map(|(_, prereq, lvl)| (*prereq, *lvl))
            .collect()
    }
}

/// Re-check every invariant from the data model against a build config.
/// Does not attempt repair; returns the full list of violations found.
pub fn validate(cfg: &BuildConfig) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();
    let kind = cfg.get_hunter_type();
    let level = cfg.get_level();
    let rules = rules_for(kind);

    let talent_budget = level;
    let attr_budget = 3 * level;

    let talent_spent: i32 = cfg.talents.values().sum();
    if talent_spent > talent_budget {
        violations.push(Violation::TalentBudgetExceeded {
            spent: talent_spent,
            budget: talent_budget,
        });
    }

    let mut attr_spent = 0i32;
    for (key, &lvl) in cfg.attributes.iter() {
        match rules.attribute(key) {
            None => violations.push(Violation::UnknownKey {
                category: "attribute",
                key: key.clone(),
            }),
            Some(rule) => attr_spent += lvl * rule.cost,
        }
    }
    if attr_spent > attr_budget {
        violations.push(Violation::AttributeBudgetExceeded {
            spent: attr_spent,
            budget: attr_budget,
        });
    }

    for (key, &lvl) in cfg.talents.iter() {
        match rules.talent(key) {
            None => violations.push(Violation::UnknownKey {
                category: "talent",
                key: key.clone(),
            }),
            Some(rule) => {
                if lvl > rule.max {
                    violations.push(Violation::OverMax {
                        category: "talent",
                        key: key.clone(),
                        level: lvl,
                        max: rule.max,
                    });
                }
                if lvl > 0 && rule.requires_all_maxed {
                    let all_maxed = rules
                        .talents
                        .iter()
                        .filter(|t| !t.requires_all_maxed)
                        .all(|t| cfg.get_talent(t.key) >= t.max);
                    if !all_maxed {
                        violations.push(Violation::RequiresAllMaxedViolation { key: key.clone() });
                    }
                }
                if lvl > 0 {
                    if let Some(unlock) = rule.unlock_level {
                        if level < unlock {
                            violations.push(Violation::MissingPrerequisite {
                                key: key.clone(),
                                prereq: "level".to_string(),
                                required: unlock,
                            });
                        }
                    }
                }
            }
        }
    }

    for (key, &lvl) in cfg.attributes.iter() {
        let Some(rule) = rules.attribute(key) else { continue };
        if let Some(max) = rule.max {
            if lvl > max {
                violations.push(Violation::OverMax {
                    category: "attribute",
                    key: key.clone(),
                    level: lvl,
                    max,
                });
            }
        }
        if lvl > 0 {
            for (prereq, required) in rules.prereqs_of(key) {
                if cfg.get_attr(prereq) < required {
                    violations.push(Violation::MissingPrerequisite {
                        key: key.clone(),
                        prereq: prereq.to_string(),
                        required,
                    });
                }
            }
            if let Some(gate) = rule.point_gate {
                let spent_elsewhere = total_attr_points_spent(cfg, &rules) - lvl * rule.cost;
                if spent_elsewhere < gate {
                    violations.push(Violation::PointGateViolation {
                        key: key.clone(),
                        required: gate,
                        spent: spent_elsewhere,
                    });
                }
            }
        }
    }

    for (a, b) in rules.exclusions {
        if cfg.get_attr(a) > 0 && cfg.get_attr(b) > 0 {
            violations.push(Violation::ExclusionViolation {
                a: a.to_string(),
                b: b.to_string(),
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn total_attr_points_spent(cfg: &BuildConfig, rules: &KindRules) -> i32 {
    cfg.attributes
        .iter()
        .filter_map(|(k, &lvl)| rules.attribute(k).map(|r| lvl * r.cost))
        .sum()
}

/// Map of talent/attribute key -> level, used by the generator and the
/// elite-extension logic. Thin wrapper to avoid repeating HashMap<String,i32>
/// everywhere.
pub type LevelMap = HashMap<String, i32>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;

    fn empty_build(kind: HunterType, level: i32) -> BuildConfig {
        BuildConfig {
            meta: None,
            hunter: Some(kind),
            level: Some(level),
            stats: Default::default(),
            talents: Default::default(),
            attributes: Default::default(),
            inscryptions: Default::default(),
            mods: Default::default(),
            relics: Default::default(),
            gems: Default::default(),
            gadgets: Default::default(),
            bonuses: Default::default(),
        }
    }

    #[test]
    fn empty_build_is_valid() {
        assert!(validate(&empty_build(HunterType::Borge, 50)).is_ok());
        assert!(validate(&empty_build(HunterType::Ozzy, 50)).is_ok());
        assert!(validate(&empty_build(HunterType::Knox, 50)).is_ok());
    }

    #[test]
    fn missing_prereq_is_rejected() {
        let mut cfg = empty_build(HunterType::Borge, 50);
        cfg.attributes.insert("timeless_mastery".into(), 1);
        let err = validate(&cfg).unwrap_err();
        assert!(err
            .iter()
            .any(|v| matches!(v, Violation::MissingPrerequisite { .. })));
    }

    #[test]
    fn point_gate_is_enforced() {
        let mut cfg = empty_build(HunterType::Borge, 200);
        cfg.attributes.insert("soul_of_ares".into(), 1);
        cfg.attributes.insert("essence_of_ylith".into(), 1);
        cfg.attributes.insert("spartan_lineage".into(), 1);
        cfg.attributes.insert("born_for_battle".into(), 1);
        let err = validate(&cfg).unwrap_err();
        assert!(err
            .iter()
            .any(|v| matches!(v, Violation::PointGateViolation { .. })));
    }

    #[test]
    fn requires_all_maxed_is_enforced() {
        let mut cfg = empty_build(HunterType::Borge, 400);
        cfg.talents.insert("legacy_of_ultima".into(), 1);
        let err = validate(&cfg).unwrap_err();
        assert!(err
            .iter()
            .any(|v| matches!(v, Violation::RequiresAllMaxedViolation { .. })));
    }

    #[test]
    fn over_budget_is_rejected() {
        let mut cfg = empty_build(HunterType::Borge, 5);
        cfg.talents.insert("life_of_the_hunt".into(), 5);
        cfg.talents.insert("unfair_advantage".into(), 5);
        let err = validate(&cfg).unwrap_err();
        assert!(err
            .iter()
            .any(|v| matches!(v, Violation::TalentBudgetExceeded { .. })));
    }
}
