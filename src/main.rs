//! CLI entry point: run single-build simulations or the evolutionary
//! optimizer over a curriculum of point budgets.

use clap::{Parser, Subcommand, ValueEnum};
use cifi_optimizer::config::BuildConfig;
use cifi_optimizer::optimizer::{optimize, OptimizeParams, OptimizerMode};
use cifi_optimizer::progress::ProgressSink;
use cifi_optimizer::simulation::run_and_aggregate;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, ValueEnum)]
enum ModeArg {
    Normal,
    Fast,
    Massive,
    Ultra,
}

impl From<ModeArg> for OptimizerMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Normal => OptimizerMode::Normal,
            ModeArg::Fast => OptimizerMode::Fast,
            ModeArg::Massive => OptimizerMode::Massive,
            ModeArg::Ultra => OptimizerMode::Ultra,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cifi-optimizer")]
#[command(version = "1.0")]
#[command(about = "Combat simulator and build optimizer for CIFI idle-RPG hunters", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run repeated simulations of a single build and report aggregate stats.
    Simulate {
        /// Path to the build configuration file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Number of simulations to run
        #[arg(short, long, default_value = "100")]
        num_sims: usize,

        /// Use parallel processing
        #[arg(short, long, default_value = "false")]
        parallel: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,

        /// Show timing information
        #[arg(short, long, default_value = "false")]
        timing: bool,
    },
    /// Search for high-performing talent/attribute allocations.
    Optimize {
        /// Path to the build configuration file (YAML or JSON); its
        /// talents/attributes are overwritten by the search, everything
        /// else (inscryptions, relics, gems, gadgets, mods, bonuses) is held
        /// fixed
        #[arg(short, long)]
        config: PathBuf,

        /// Simulations per evaluated build in fixed-N mode
        #[arg(long, default_value = "50")]
        num_sims: usize,

        /// Candidate builds evaluated per curriculum tier
        #[arg(long, default_value = "1000")]
        builds_per_tier: usize,

        #[arg(long, default_value = "true")]
        progressive: bool,

        #[arg(long, default_value = "false")]
        successive_halving: bool,

        #[arg(long, value_enum, default_value = "normal")]
        mode: ModeArg,

        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Simulate { config, num_sims, parallel, output, timing } => {
            run_simulate(config, num_sims, parallel, output, timing)
        }
        Command::Optimize {
            config,
            num_sims,
            builds_per_tier,
            progressive,
            successive_halving,
            mode,
            output,
        } => run_optimize(config, num_sims, builds_per_tier, progressive, successive_halving, mode, output),
    }
}

fn run_simulate(config: PathBuf, num_sims: usize, parallel: bool, output: OutputFormat, timing: bool) {
    let config = match BuildConfig::from_file(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    let stats = run_and_aggregate(&config, num_sims, parallel);
    let elapsed = start.elapsed();

    match output {
        OutputFormat::Text => {
            println!("=== Hunter Simulation Results ===");
            println!("Simulations: {}", num_sims);
            println!();
            println!("Average Final Stage: {:.2} ± {:.2}", stats.avg_stage, stats.std_stage);
            println!("Stage Range: {} - {}", stats.min_stage, stats.max_stage);
            println!();
            println!("Average Elapsed Time: {:.2}s", stats.avg_time);
            println!("Average Total Loot: {:.0}", stats.avg_loot);
            println!("Average Loot/hr: {:.0}", stats.avg_loot_per_hour);
            println!();
            println!("--- Combat Stats ---");
            println!("Avg Damage Dealt: {:.0}", stats.avg_damage);
            println!("Avg Damage Taken: {:.0}", stats.avg_damage_taken);
            println!("Avg Damage Mitigated: {:.0}", stats.avg_mitigated);
            println!("Avg Lifesteal: {:.0}", stats.avg_lifesteal);
            println!();
            println!("Avg Attacks: {:.0}", stats.avg_attacks);
            println!("Avg Crits: {:.0}", stats.avg_crits);
            println!("Avg Kills: {:.0}", stats.avg_kills);
            println!("Avg Evades: {:.0}", stats.avg_evades);
            println!("Avg Effect Procs: {:.0}", stats.avg_effect_procs);
            println!("Avg Stun Duration: {:.2}s", stats.avg_stun_duration);

            if timing {
                println!();
                println!("--- Performance ---");
                println!("Total time: {:.3}s", elapsed.as_secs_f64());
                println!("Per simulation: {:.3}ms", elapsed.as_secs_f64() * 1000.0 / num_sims as f64);
                println!("Simulations/sec: {:.0}", num_sims as f64 / elapsed.as_secs_f64());
            }
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "simulations": num_sims,
                "parallel": parallel,
                "elapsed_seconds": elapsed.as_secs_f64(),
                "stats": stats,
            });
            println!("{}", serde_json::to_string_pretty(&out).unwrap());
        }
    }
}

fn run_optimize(
    config_path: PathBuf,
    num_sims: usize,
    builds_per_tier: usize,
    progressive: bool,
    successive_halving: bool,
    mode: ModeArg,
    output: OutputFormat,
) {
    let base_config = match BuildConfig::from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let kind = base_config.get_hunter_type();
    let level = base_config.get_level();

    let (sink, receiver) = ProgressSink::channel();
    let handle = std::thread::spawn(move || {
        while let Ok(record) = receiver.recv() {
            eprintln!(
                "[{}] gen {}/{} ({:.1}%) best_stage={} builds_tested={} sims/sec={:.0}",
                record.tier_name,
                record.generation,
                record.total_generations,
                record.progress,
                record.best_stage,
                record.builds_tested,
                record.sims_per_sec,
            );
        }
    });

    let params = OptimizeParams {
        kind,
        level,
        base_config,
        num_sims,
        builds_per_tier,
        use_progressive: progressive,
        use_successive_halving: successive_halving,
        mode: mode.into(),
    };

    let report = optimize(params, Some(&sink));
    drop(sink);
    let _ = handle.join();

    match output {
        OutputFormat::Text => {
            println!("=== Optimization Complete ===");
            println!(
                "Tested {} builds in {:.2}s ({:.0} sims/sec)",
                report.timing.tested, report.timing.total_time, report.timing.sims_per_sec
            );
            if let Some(best) = &report.best_build {
                println!();
                println!("Best build: stage {} (avg {:.1})", best.max_stage, best.avg_stage);
                println!("Talents: {:?}", best.talents);
                println!("Attributes: {:?}", best.attributes);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
        }
    }
}
