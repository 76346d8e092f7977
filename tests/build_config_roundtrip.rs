//! `BuildConfig` is the on-disk/over-the-wire representation for every
//! build the CLI and optimizer handle; it has to round-trip through JSON
//! losslessly and has to accept both the nested `meta` shape and the flat
//! GUI shape.

use cifi_optimizer::config::{BuildConfig, HunterType};
use std::collections::HashMap;

fn sample_build() -> BuildConfig {
    let mut stats = HashMap::new();
    stats.insert("power".to_string(), 12);
    let mut talents = HashMap::new();
    talents.insert("life_of_the_hunt".to_string(), 5);
    talents.insert("impeccable_impacts".to_string(), 10);
    let mut attributes = HashMap::new();
    attributes.insert("soul_of_the_minotaur".to_string(), 3);
    let mut inscryptions = HashMap::new();
    inscryptions.insert("i27".to_string(), 2);
    let mut mods = HashMap::new();
    mods.insert("trample".to_string(), true);
    let mut relics = HashMap::new();
    relics.insert("r7".to_string(), 50);
    let mut gems = HashMap::new();
    gems.insert("attraction_loot_borge".to_string(), 4);
    let mut gadgets = HashMap::new();
    gadgets.insert("wrench_of_gore".to_string(), 20);
    let mut bonuses = HashMap::new();
    bonuses.insert("research81".to_string(), serde_json::json!(3));

    BuildConfig {
        meta: None,
        hunter: Some(HunterType::Borge),
        level: Some(69),
        stats,
        talents,
        attributes,
        inscryptions,
        mods,
        relics,
        gems,
        gadgets,
        bonuses,
    }
}

fn assert_same_build(a: &BuildConfig, b: &BuildConfig) {
    assert_eq!(a.get_hunter_type(), b.get_hunter_type());
    assert_eq!(a.get_level(), b.get_level());
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.talents, b.talents);
    assert_eq!(a.attributes, b.attributes);
    assert_eq!(a.inscryptions, b.inscryptions);
    assert_eq!(a.mods, b.mods);
    assert_eq!(a.relics, b.relics);
    assert_eq!(a.gems, b.gems);
    assert_eq!(a.gadgets, b.gadgets);
    assert_eq!(a.bonuses, b.bonuses);
}

#[test]
fn flat_format_round_trips_through_json() {
    let original = sample_build();
    let json = serde_json::to_string(&original).expect("serialize flat build");
    let parsed = BuildConfig::from_json(&json).expect("deserialize flat build");
    assert_same_build(&original, &parsed);
}

#[test]
fn nested_meta_format_round_trips_through_json() {
    let mut original = sample_build();
    original.hunter = None;
    original.level = None;
    original.meta = Some(cifi_optimizer::config::Meta { hunter: HunterType::Ozzy, level: 42 });

    let json = serde_json::to_string(&original).expect("serialize nested build");
    let parsed = BuildConfig::from_json(&json).expect("deserialize nested build");
    assert_same_build(&original, &parsed);
    assert_eq!(parsed.get_hunter_type(), HunterType::Ozzy);
    assert_eq!(parsed.get_level(), 42);
}

#[test]
fn hunter_type_parses_case_insensitively() {
    let json = r#"{"hunter":"oZzY","level":10,"stats":{},"talents":{},"attributes":{}}"#;
    let parsed = BuildConfig::from_json(json).expect("deserialize case-insensitive hunter name");
    assert_eq!(parsed.get_hunter_type(), HunterType::Ozzy);
}

#[test]
fn unknown_fields_are_tolerated() {
    let json = r#"{
        "hunter": "Knox",
        "level": 5,
        "stats": {},
        "talents": {},
        "attributes": {},
        "some_future_gui_field": {"nested": true}
    }"#;
    let parsed = BuildConfig::from_json(json).expect("unknown keys should not fail parsing");
    assert_eq!(parsed.get_hunter_type(), HunterType::Knox);
}

#[test]
fn malformed_json_surfaces_a_config_parse_error() {
    let err = BuildConfig::from_json("{not valid json").unwrap_err();
    match err {
        cifi_optimizer::error::SimError::ConfigParse { .. } => {}
        other => panic!("expected ConfigParse, got {other:?}"),
    }
}
