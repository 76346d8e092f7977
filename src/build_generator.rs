use crate::config::HunterType;
use crate::rules::{self, LevelMap};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub cost: i32,
    pub max: f64,  // Use f64::INFINITY for unlimited
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalentInfo {
    pub cost: i32,
    pub max: i32,
}

#[derive(Debug, Clone)]
pub struct BuildGenerator {
    pub talent_points: i32,
    pub attribute_points: i32,
    pub level: i32,
    pub talents: HashMap<String, TalentInfo>,
    pub attributes: HashMap<String, AttributeInfo>,
    pub attribute_dependencies: HashMap<String, HashMap<String, i32>>,
    pub attribute_point_gates: HashMap<String, i32>,
    pub attribute_exclusions: Vec<(String, String)>,
    pub dynamic_attr_maxes: HashMap<String, i32>,
    /// Talents that cannot take a point until every other talent (excluding
    /// other requires-all-maxed talents) is maxed, e.g. `legacy_of_ultima`.
    pub requires_all_maxed_talents: Vec<String>,
    /// Talents gated behind a hunter level, independent of point spend.
    pub talent_unlock_levels: HashMap<String, i32>,
}

impl BuildGenerator {
    /// Build a generator straight from the grounded per-kind rule tables.
    pub fn for_kind(kind: HunterType, level: i32) -> Self {
        let rules = rules::rules_for(kind);

        let talents = rules
            .talents
            .iter()
            .map(|t| (t.key.to_string(), TalentInfo { cost: 1, max: t.max }))
            .collect();

        let attributes = rules
            .attributes
            .iter()
            .map(|a| {
                (
                    a.key.to_string(),
                    AttributeInfo {
                        cost: a.cost,
                        max: a.max.map(|m| m as f64).unwrap_or(f64::INFINITY),
                    },
                )
            })
            .collect();

        let mut attribute_dependencies: HashMap<String, HashMap<String, i32>> = HashMap::new();
        for (key, prereq, min_level) in rules.dependencies {
            attribute_dependencies
                .entry(key.to_string())
                .or_default()
                .insert(prereq.to_string(), *min_level);
        }

        let attribute_point_gates = rules
            .attributes
            .iter()
            .filter_map(|a| a.point_gate.map(|g| (a.key.to_string(), g)))
            .collect();

        let attribute_exclusions = rules
            .exclusions
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();

        let requires_all_maxed_talents = rules
            .talents
            .iter()
            .filter(|t| t.requires_all_maxed)
            .map(|t| t.key.to_string())
            .collect();

        let talent_unlock_levels = rules
            .talents
            .iter()
            .filter_map(|t| t.unlock_level.map(|u| (t.key.to_string(), u)))
            .collect();

        Self::new(
            level,
            talents,
            attributes,
            attribute_dependencies,
            attribute_point_gates,
            attribute_exclusions,
            requires_all_maxed_talents,
            talent_unlock_levels,
        )
    }

    pub fn new(
        level: i32,
        talents: HashMap<String, TalentInfo>,
        attributes: HashMap<String, AttributeInfo>,
        attribute_dependencies: HashMap<String, HashMap<String, i32>>,
        attribute_point_gates: HashMap<String, i32>,
        attribute_exclusions: Vec<(String, String)>,
        requires_all_maxed_talents: Vec<String>,
        talent_unlock_levels: HashMap<String, i32>,
    ) -> Self {
        let mut gen = Self {
            talent_points: level,
            attribute_points: level * 3,
            level,
            talents,
            attributes,
            attribute_dependencies,
            attribute_point_gates,
            attribute_exclusions,
            dynamic_attr_maxes: HashMap::new(),
            requires_all_maxed_talents,
            talent_unlock_levels,
        };

        gen.calculate_dynamic_attr_maxes();
        gen
    }
    
    fn calculate_dynamic_attr_maxes(&mut self) {
        // Find unlimited attributes
        let unlimited_attrs: Vec<String> = self.attributes.iter()
            .filter(|(_, info)| info.max.is_infinite())
            .map(|(name, _)| name.clone())
            .collect();
        
        // Calculate cost to max all limited attributes
        let limited_attr_cost: i32 = self.attributes.iter()
            .filter(|(_, info)| !info.max.is_infinite())
            .map(|(_, info)| info.cost * info.max as i32)
            .sum();
        
        // Share remaining budget among unlimited attributes
        if !unlimited_attrs.is_empty() {
            let remaining_budget = self.attribute_points - limited_attr_cost;
            let max_per_unlimited = (remaining_budget / unlimited_attrs.len() as i32).max(1);
            
            for attr in unlimited_attrs {
                self.dynamic_attr_maxes.insert(attr, max_per_unlimited);
            }
        }
    }
    
    /// Override the point budgets with a tier's fractional allocation
    /// (`floor(level * f)`, `floor(3 * level * f)`) while keeping every
    /// dependency/unlock rule derived from the hunter's real level.
    pub fn with_budgets(mut self, talent_points: i32, attribute_points: i32) -> Self {
        self.talent_points = talent_points;
        self.attribute_points = attribute_points;
        self.calculate_dynamic_attr_maxes();
        self
    }

    /// Canonical dedup key: `(sorted non-zero talents, sorted non-zero attributes)`.
    pub fn canonical_key(talents: &HashMap<String, i32>, attrs: &HashMap<String, i32>) -> String {
        let mut t: Vec<(&String, &i32)> = talents.iter().filter(|(_, &v)| v > 0).collect();
        t.sort_by(|a, b| a.0.cmp(b.0));
        let mut a: Vec<(&String, &i32)> = attrs.iter().filter(|(_, &v)| v > 0).collect();
        a.sort_by(|a, b| a.0.cmp(b.0));
        let mut key = String::new();
        for (k, v) in t {
            key.push_str(k);
            key.push(':');
            key.push_str(&v.to_string());
            key.push(',');
        }
        key.push('|');
        for (k, v) in a {
            key.push_str(k);
            key.push(':');
            key.push_str(&v.to_string());
            key.push(',');
        }
        key
    }

    fn get_attr_max(&self, attr: &str) -> i32 {
        if let Some(&dynamic_max) = self.dynamic_attr_maxes.get(attr) {
            return dynamic_max;
        }
        
        if let Some(info) = self.attributes.get(attr) {
            if info.max.is_infinite() {
                return 250; // Fallback
            }
            return info.max as i32;
        }
        
        0
    }
    
    pub fn generate_random_build(&self) -> (HashMap<String, i32>, HashMap<String, i32>) {
        let talents = self.random_walk_talent_allocation();
        let attrs = self.random_walk_attr_allocation();
        (talents, attrs)
    }
    
    pub fn generate_builds(&self, count: usize) -> Vec<(HashMap<String, i32>, HashMap<String, i32>)> {
        (0..count)
            .map(|_| self.generate_random_build())
            .collect()
    }
    
    fn random_walk_talent_allocation(&self) -> HashMap<String, i32> {
        let result: HashMap<String, i32> = self.talents.keys()
            .map(|k| (k.clone(), 0))
            .collect();
        self.extend_talents(result, self.talent_points)
    }

    /// Whether `talent` can currently accept another point, honoring its max,
    /// its level-unlock gate and the requires-all-maxed rule.
    fn talent_unlockable(&self, talent: &str, current: &HashMap<String, i32>) -> bool {
        let Some(info) = self.talents.get(talent) else { return false };
        if current.get(talent).copied().unwrap_or(0) >= info.max {
            return false;
        }
        if let Some(&unlock) = self.talent_unlock_levels.get(talent) {
            if self.level < unlock {
                return false;
            }
        }
        if self.requires_all_maxed_talents.iter().any(|t| t == talent) {
            let all_others_maxed = self.talents.iter().all(|(k, info)| {
                self.requires_all_maxed_talents.iter().any(|r| r == k)
                    || current.get(k).copied().unwrap_or(0) >= info.max
            });
            if !all_others_maxed {
                return false;
            }
        }
        true
    }

    /// Continue allocating talent points onto an existing partial
    /// allocation, e.g. an elite's prior build plus a newly-unlocked budget.
    pub fn extend_talents(&self, mut current: HashMap<String, i32>, extra_points: i32) -> HashMap<String, i32> {
        let mut rng = rand::thread_rng();
        let talent_names: Vec<String> = self.talents.keys().cloned().collect();
        let mut remaining = extra_points;

        while remaining > 0 {
            let valid_talents: Vec<&String> = talent_names
                .iter()
                .filter(|t| self.talent_unlockable(t, &current))
                .collect();

            if valid_talents.is_empty() {
                break;
            }

            let chosen = valid_talents[rng.gen_range(0..valid_talents.len())];
            *current.entry(chosen.clone()).or_insert(0) += 1;
            remaining -= 1;
        }

        current
    }
    
    fn can_unlock_attribute(&self, attr: &str, current: &HashMap<String, i32>) -> bool {
        // Check point gate
        if let Some(&required_points) = self.attribute_point_gates.get(attr) {
            // Calculate points spent in OTHER attributes
            let points_spent: i32 = current.iter()
                .filter(|(k, _)| k.as_str() != attr)
                .map(|(k, &v)| {
                    if let Some(info) = self.attributes.get(k) {
                        v * info.cost
                    } else {
                        0
                    }
                })
                .sum();
            
            if points_spent < required_points {
                return false;
            }
        }
        
        true
    }
    
    fn random_walk_attr_allocation(&self) -> HashMap<String, i32> {
        let result: HashMap<String, i32> = self.attributes.keys()
            .map(|k| (k.clone(), 0))
            .collect();
        self.extend_attrs(result, self.attribute_points)
    }

    /// Continue allocating attribute points onto an existing partial
    /// allocation. Used both for a fresh random build (starting from all
    /// zeros) and for extending an elite's prior attributes with a larger
    /// budget at the next curriculum tier.
    pub fn extend_attrs(&self, mut result: HashMap<String, i32>, extra_points: i32) -> HashMap<String, i32> {
        let mut rng = rand::thread_rng();
        let mut remaining = extra_points;
        let attr_names: Vec<String> = self.attributes.keys().cloned().collect();

        let max_iterations = 10000;
        let mut iteration = 0;
        let mut stuck_count = 0;
        
        while remaining > 0 && iteration < max_iterations {
            iteration += 1;
            
            // Find valid attributes
            let mut valid_attrs = Vec::new();
            
            for attr in &attr_names {
                let info = match self.attributes.get(attr) {
                    Some(i) => i,
                    None => continue,
                };
                
                // Check cost
                if info.cost > remaining {
                    continue;
                }
                
                // Check max level
                let max_lvl = self.get_attr_max(attr);
                if result[attr] >= max_lvl {
                    continue;
                }
                
                // Check dependencies
                if let Some(deps) = self.attribute_dependencies.get(attr) {
                    let can_use = deps.iter().all(|(req_attr, &req_level)| {
                        result.get(req_attr).copied().unwrap_or(0) >= req_level
                    });
                    
                    if !can_use {
                        continue;
                    }
                }
                
                // Check point gates
                if !self.can_unlock_attribute(attr, &result) {
                    continue;
                }
                
                // Check exclusions
                let mut excluded = false;
                for (a, b) in &self.attribute_exclusions {
                    if attr == a && result.get(b).copied().unwrap_or(0) > 0 {
                        excluded = true;
                        break;
                    }
                    if attr == b && result.get(a).copied().unwrap_or(0) > 0 {
                        excluded = true;
                        break;
                    }
                }
                
                if excluded {
                    continue;
                }
                
                valid_attrs.push(attr.clone());
            }
            
            if valid_attrs.is_empty() {
                stuck_count += 1;
                if stuck_count >= 3 {
                    break;
                }
            } else {
                stuck_count = 0;
                
                // Pick random and add 1 point
                let chosen = &valid_attrs[rng.gen_range(0..valid_attrs.len())];
                let cost = self.attributes[chosen].cost;
                *result.get_mut(chosen).unwrap() += 1;
                remaining -= cost;
            }
        }
        
        result
    }

    /// Extend an elite's prior (talents, attributes) allocation with a
    /// larger budget at the next curriculum tier, keeping everything it
    /// already has and randomly walking the remainder.
    pub fn extend_elite(
        &self,
        prior_talents: LevelMap,
        prior_attrs: LevelMap,
        new_talent_points: i32,
        new_attribute_points: i32,
    ) -> (LevelMap, LevelMap) {
        let spent_talents: i32 = prior_talents.values().sum();
        let spent_attrs: i32 = prior_attrs
            .iter()
            .map(|(k, &v)| self.attributes.get(k).map(|i| i.cost * v).unwrap_or(0))
            .sum();

        let extra_talent_points = (new_talent_points - spent_talents).max(0);
        let extra_attr_points = (new_attribute_points - spent_attrs).max(0);

        let talents = self.extend_talents(prior_talents, extra_talent_points);
        let attrs = self.extend_attrs(prior_attrs, extra_attr_points);
        (talents, attrs)
    }
}
