//! Progressive-curriculum evolutionary build optimizer (C9).
//!
//! Each tier samples a fraction of the target level's point budget, evolves
//! a population via elite promotion + fresh random sampling, evaluates it
//! (optionally via successive halving), and only the final tier's survivors
//! feed the top-K heaps that make up the report.

use crate::build_generator::BuildGenerator;
use crate::config::{BuildConfig, HunterType};
use crate::rules::LevelMap;
use crate::simulation;
use crate::stats::AggregatedStats;
use crate::progress::{ProgressRecord, ProgressSink};
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::Instant;

/// Successive-halving schedule: `(base_sims, rounds, survival_rate)`.
#[derive(Debug, Clone, Copy)]
pub struct HalvingParams {
    pub base_sims: usize,
    pub rounds: u32,
    pub survival_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerMode {
    Normal,
    Fast,
    Massive,
    Ultra,
}

impl OptimizerMode {
    pub fn halving_params(self) -> HalvingParams {
        match self {
            OptimizerMode::Normal => HalvingParams { base_sims: 64, rounds: 3, survival_rate: 0.50 },
            OptimizerMode::Fast => HalvingParams { base_sims: 16, rounds: 4, survival_rate: 0.25 },
            OptimizerMode::Massive => HalvingParams { base_sims: 8, rounds: 5, survival_rate: 0.10 },
            OptimizerMode::Ultra => HalvingParams { base_sims: 4, rounds: 6, survival_rate: 0.05 },
        }
    }
}

pub struct OptimizeParams {
    pub kind: HunterType,
    pub level: i32,
    /// Fixed fields (inscryptions/relics/gems/gadgets/mods/bonuses/stats)
    /// every candidate inherits; only talents/attributes are searched.
    pub base_config: BuildConfig,
    pub num_sims: usize,
    pub builds_per_tier: usize,
    pub use_progressive: bool,
    pub use_successive_halving: bool,
    pub mode: OptimizerMode,
}

/// `tier_schedule` from §4.9 point 2.
fn tier_schedule(level: i32, use_progressive: bool) -> Vec<f64> {
    if !use_progressive {
        return vec![1.0];
    }
    if level <= 10 {
        vec![1.0]
    } else if level <= 20 {
        vec![0.5, 1.0]
    } else if level <= 40 {
        vec![0.25, 0.5, 1.0]
    } else {
        vec![0.05, 0.10, 0.25, 0.50, 0.75, 1.00]
    }
}

fn candidate_from(
    base: &BuildConfig,
    kind: HunterType,
    level: i32,
    talents: LevelMap,
    attributes: LevelMap,
) -> BuildConfig {
    let mut cfg = base.clone();
    cfg.meta = None;
    cfg.hunter = Some(kind);
    cfg.level = Some(level);
    cfg.talents = talents;
    cfg.attributes = attributes;
    cfg
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub talents: LevelMap,
    pub attributes: LevelMap,
    pub avg_stage: f64,
    pub max_stage: i32,
    pub avg_loot_per_hour: f64,
    pub avg_damage: f64,
    pub avg_xp: f64,
}

impl BuildSummary {
    fn from_config(cfg: &BuildConfig, stats: &AggregatedStats) -> Self {
        Self {
            talents: cfg.talents.clone(),
            attributes: cfg.attributes.clone(),
            avg_stage: stats.avg_stage,
            max_stage: stats.max_stage,
            avg_loot_per_hour: stats.avg_loot_per_hour,
            avg_damage: stats.avg_damage,
            avg_xp: stats.avg_xp,
        }
    }
}

struct ScoredEntry {
    score: f64,
    summary: BuildSummary,
}

impl PartialEq for ScoredEntry {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
    }
}
impl Eq for ScoredEntry {}
impl PartialOrd for ScoredEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for ScoredEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.partial_cmp(&other.score).unwrap_or(Ordering::Equal)
    }
}

/// Bounded-size (default 10) min-heap keyed by an arbitrary metric; the
/// smallest-scoring entry is evicted first when the heap is full.
struct TopK {
    capacity: usize,
    heap: BinaryHeap<std::cmp::Reverse<ScoredEntry>>,
}

impl TopK {
    fn new(capacity: usize) -> Self {
        Self { capacity, heap: BinaryHeap::with_capacity(capacity) }
    }

    fn push(&mut self, score: f64, summary: BuildSummary) {
        if self.heap.len() < self.capacity {
            self.heap.push(std::cmp::Reverse(ScoredEntry { score, summary }));
            return;
        }
        if let Some(std::cmp::Reverse(min)) = self.heap.peek() {
            if score > min.score {
                self.heap.pop();
                self.heap.push(std::cmp::Reverse(ScoredEntry { score, summary }));
            }
        }
    }

    fn into_sorted(self) -> Vec<BuildSummary> {
        let mut entries: Vec<ScoredEntry> = self.heap.into_iter().map(|r| r.0).collect();
        entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        entries.into_iter().map(|e| e.summary).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationRecord {
    pub generation: i32,
    pub tier_name: String,
    pub talent_points: i32,
    pub attribute_points: i32,
    pub builds_tested: i32,
    pub best_max_stage: i32,
    pub best_avg_stage: f64,
    pub best_talents: LevelMap,
    pub best_attributes: LevelMap,
    pub elapsed: f64,
    pub duplicates_skipped: i32,
    pub unique_builds_total: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Timing {
    pub total_time: f64,
    pub sims_per_sec: f64,
    pub tested: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalReport {
    pub status: String,
    pub timing: Timing,
    pub irl_baseline: Option<AggregatedStats>,
    pub best_build: Option<BuildSummary>,
    pub top_10_by_max_stage: Vec<BuildSummary>,
    pub top_10_by_avg_stage: Vec<BuildSummary>,
    pub top_10_by_loot: Vec<BuildSummary>,
    pub top_10_by_damage: Vec<BuildSummary>,
    pub top_10_by_xp: Vec<BuildSummary>,
    pub generation_history: Vec<GenerationRecord>,
}

/// A population entry carries whether its last recorded score came from a
/// real simulation or the similarity cache — per the recorded open-question
/// decision, only real scores may enter the final top-K heaps.
struct Candidate {
    config: BuildConfig,
    stats: AggregatedStats,
    is_real: bool,
}

/// Canonical top-3-by-level key, used by the similarity cache.
fn similarity_key(cfg: &BuildConfig) -> String {
    fn top3(map: &LevelMap) -> Vec<(&String, &i32)> {
        let mut v: Vec<(&String, &i32)> = map.iter().filter(|(_, &lvl)| lvl > 0).collect();
        v.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        v.truncate(3);
        v
    }
    let mut key = String::new();
    for (k, v) in top3(&cfg.talents) {
        key.push_str(k);
        key.push(':');
        key.push_str(&v.to_string());
        key.push(',');
    }
    key.push('|');
    for (k, v) in top3(&cfg.attributes) {
        key.push_str(k);
        key.push(':');
        key.push_str(&v.to_string());
        key.push(',');
    }
    key
}

fn perturb(stats: &AggregatedStats, rng: &mut impl rand::Rng) -> AggregatedStats {
    let noise = 1.0 + rng.gen_range(-0.05..=0.05);
    let mut out = stats.clone();
    out.avg_stage *= noise;
    out.avg_loot_per_hour *= noise;
    out
}

/// Evaluate one tier's population, optionally via successive halving with a
/// similarity cache. Returns the surviving candidates at their final budget.
fn evaluate_tier(
    configs: Vec<BuildConfig>,
    params: &OptimizeParams,
    total_sims: &mut i64,
) -> Vec<Candidate> {
    if !params.use_successive_halving {
        return configs
            .into_iter()
            .map(|cfg| {
                let stats = simulation::run_and_aggregate(&cfg, params.num_sims, true);
                *total_sims += params.num_sims as i64;
                Candidate { config: cfg, stats, is_real: true }
            })
            .collect();
    }

    let halving = params.mode.halving_params();
    let mut population = configs;
    let mut budget = halving.base_sims;
    let mut cache: HashMap<String, AggregatedStats> = HashMap::new();
    let mut rng = rand::thread_rng();
    let mut best_score_so_far = f64::MIN;
    let mut final_round: Vec<Candidate> = Vec::new();

    for round in 0..halving.rounds {
        let mut scored: Vec<Candidate> = Vec::with_capacity(population.len());

        for cfg in population {
            let key = similarity_key(&cfg);
            let use_cache = round >= 2 && cache.contains_key(&key);
            let (stats, is_real) = if use_cache {
                let cached = cache.get(&key).unwrap();
                (perturb(cached, &mut rng), false)
            } else {
                let stats = simulation::run_and_aggregate(&cfg, budget, true);
                *total_sims += budget as i64;
                cache.insert(key, stats.clone());
                (stats, true)
            };

            let score = stats.composite_score();
            if round >= 2 && !is_real && score < 0.3 * best_score_so_far {
                // Early-terminate: cached score doesn't clear the bar, drop it.
                continue;
            }
            best_score_so_far = best_score_so_far.max(score);
            scored.push(Candidate { config: cfg, stats, is_real });
        }

        scored.sort_by(|a, b| {
            b.stats.composite_score().partial_cmp(&a.stats.composite_score()).unwrap_or(Ordering::Equal)
        });

        if round + 1 < halving.rounds {
            let keep = ((scored.len() as f64) * halving.survival_rate).ceil().max(1.0) as usize;
            population = scored.into_iter().take(keep).map(|c| c.config).collect();
            budget *= 2;
        } else {
            final_round = scored;
        }
    }

    // Any survivor whose last score was cached gets one real simulation
    // before it's eligible for the top-K heaps.
    for candidate in final_round.iter_mut() {
        if !candidate.is_real {
            candidate.stats = simulation::run_and_aggregate(&candidate.config, budget, true);
            *total_sims += budget as i64;
            candidate.is_real = true;
        }
    }

    final_round
}

/// Blocking optimizer entry point. `progress` is best-effort; dropping the
/// receiver end never stalls the search.
pub fn optimize(params: OptimizeParams, progress: Option<&ProgressSink>) -> FinalReport {
    let start = Instant::now();
    let kind = params.kind;
    let level = params.level;

    let irl_baseline = {
        let has_points = !params.base_config.talents.is_empty() || !params.base_config.attributes.is_empty();
        if has_points {
            Some(simulation::run_and_aggregate(&params.base_config, params.num_sims, true))
        } else {
            None
        }
    };

    let tiers = tier_schedule(level, params.use_progressive);
    let total_tiers = tiers.len() as i32;
    let mut history: Vec<GenerationRecord> = Vec::new();
    let mut total_sims: i64 = 0;
    let mut total_tested: i32 = 0;
    let mut prior_population: Vec<Candidate> = Vec::new();

    for (tier_idx, &fraction) in tiers.iter().enumerate() {
        let tier_start = Instant::now();
        let talent_budget = ((level as f64) * fraction).floor() as i32;
        let attr_budget = ((3.0 * level as f64) * fraction).floor() as i32;
        let tier_name = format!("tier{}_{:.2}x", tier_idx + 1, fraction);

        let generator = BuildGenerator::for_kind(kind, level).with_budgets(talent_budget, attr_budget);

        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut configs: Vec<BuildConfig> = Vec::new();
        let mut duplicates_skipped = 0i32;

        if tier_idx > 0 {
            let elite_count = (params.builds_per_tier / 10).max(100).min(prior_population.len());
            let mut ranked: Vec<&Candidate> = prior_population.iter().collect();
            ranked.sort_by(|a, b| b.stats.max_stage.cmp(&a.stats.max_stage));
            for candidate in ranked.into_iter().take(elite_count) {
                let (talents, attrs) = generator.extend_elite(
                    candidate.config.talents.clone(),
                    candidate.config.attributes.clone(),
                    talent_budget,
                    attr_budget,
                );
                let key = BuildGenerator::canonical_key(&talents, &attrs);
                if seen.insert(key) {
                    configs.push(candidate_from(&params.base_config, kind, level, talents, attrs));
                } else {
                    duplicates_skipped += 1;
                }
            }
        }

        let attempt_cap = params.builds_per_tier * 20;
        let mut attempts = 0usize;
        while configs.len() < params.builds_per_tier && attempts < attempt_cap {
            attempts += 1;
            let (talents, attrs) = generator.generate_random_build();
            let key = BuildGenerator::canonical_key(&talents, &attrs);
            if seen.insert(key) {
                configs.push(candidate_from(&params.base_config, kind, level, talents, attrs));
            } else {
                duplicates_skipped += 1;
            }
        }

        let builds_tested = configs.len() as i32;
        total_tested += builds_tested;

        let population = evaluate_tier(configs, &params, &mut total_sims);

        let best = population
            .iter()
            .max_by(|a, b| a.stats.max_stage.cmp(&b.stats.max_stage));

        history.push(GenerationRecord {
            generation: tier_idx as i32 + 1,
            tier_name: tier_name.clone(),
            talent_points: talent_budget,
            attribute_points: attr_budget,
            builds_tested,
            best_max_stage: best.map(|c| c.stats.max_stage).unwrap_or(0),
            best_avg_stage: best.map(|c| c.stats.avg_stage).unwrap_or(0.0),
            best_talents: best.map(|c| c.config.talents.clone()).unwrap_or_default(),
            best_attributes: best.map(|c| c.config.attributes.clone()).unwrap_or_default(),
            elapsed: tier_start.elapsed().as_secs_f64(),
            duplicates_skipped,
            unique_builds_total: seen.len() as i32,
        });

        if let Some(sink) = progress {
            sink.send(ProgressRecord {
                generation: tier_idx as i32 + 1,
                total_generations: total_tiers,
                progress: (tier_idx as f64 + 1.0) / total_tiers as f64 * 100.0,
                builds_tested: total_tested,
                builds_in_gen: builds_tested,
                builds_per_gen: params.builds_per_tier as i32,
                total_sims,
                elapsed: start.elapsed().as_secs_f64(),
                sims_per_sec: total_sims as f64 / start.elapsed().as_secs_f64().max(1e-6),
                tier_name,
                best_stage: best.map(|c| c.stats.max_stage).unwrap_or(0),
                generation_complete: Some(true),
            });
        }

        prior_population = population;
    }

    let mut by_avg_stage = TopK::new(10);
    let mut by_max_stage = TopK::new(10);
    let mut by_loot = TopK::new(10);
    let mut by_damage = TopK::new(10);
    let mut by_xp = TopK::new(10);
    let mut best_build: Option<BuildSummary> = None;
    let mut best_max_stage = i32::MIN;

    for candidate in &prior_population {
        if !candidate.is_real {
            continue;
        }
        let summary = BuildSummary::from_config(&candidate.config, &candidate.stats);
        by_avg_stage.push(candidate.stats.avg_stage, summary.clone());
        by_max_stage.push(candidate.stats.max_stage as f64, summary.clone());
        by_loot.push(candidate.stats.avg_loot_per_hour, summary.clone());
        by_damage.push(candidate.stats.avg_damage, summary.clone());
        by_xp.push(candidate.stats.avg_xp, summary.clone());

        if candidate.stats.max_stage > best_max_stage {
            best_max_stage = candidate.stats.max_stage;
            best_build = Some(summary);
        }
    }

    let total_time = start.elapsed().as_secs_f64();
    FinalReport {
        status: "complete".to_string(),
        timing: Timing {
            total_time,
            sims_per_sec: total_sims as f64 / total_time.max(1e-6),
            tested: total_tested,
        },
        irl_baseline,
        best_build,
        top_10_by_max_stage: by_max_stage.into_sorted(),
        top_10_by_avg_stage: by_avg_stage.into_sorted(),
        top_10_by_loot: by_loot.into_sorted(),
        top_10_by_damage: by_damage.into_sorted(),
        top_10_by_xp: by_xp.into_sorted(),
        generation_history: history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_schedule_matches_level_bands() {
        assert_eq!(tier_schedule(5, true), vec![1.0]);
        assert_eq!(tier_schedule(15, true), vec![0.5, 1.0]);
        assert_eq!(tier_schedule(30, true), vec![0.25, 0.5, 1.0]);
        assert_eq!(tier_schedule(100, true), vec![0.05, 0.10, 0.25, 0.50, 0.75, 1.00]);
        assert_eq!(tier_schedule(100, false), vec![1.0]);
    }

    #[test]
    fn halving_param_presets_match_spec() {
        let p = OptimizerMode::Ultra.halving_params();
        assert_eq!(p.base_sims, 4);
        assert_eq!(p.rounds, 6);
        assert!((p.survival_rate - 0.05).abs() < 1e-9);
    }

    #[test]
    fn top_k_keeps_highest_scores_bounded() {
        let mut heap = TopK::new(2);
        let summary = BuildSummary {
            talents: Default::default(),
            attributes: Default::default(),
            avg_stage: 0.0,
            max_stage: 0,
            avg_loot_per_hour: 0.0,
            avg_damage: 0.0,
            avg_xp: 0.0,
        };
        heap.push(1.0, summary.clone());
        heap.push(3.0, summary.clone());
        heap.push(2.0, summary.clone());
        let sorted = heap.into_sorted();
        assert_eq!(sorted.len(), 2);
    }
}
