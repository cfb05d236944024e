//! Grid delivery agent with foresight planning.
//!
//! Reads `foresight.toml` (or `--config`), generates a seeded world and either
//! prints the strategy's next targets (`plan`) or drives the agent until the
//! run stops (`run`). Command output is JSON on stdout; diagnostics go to
//! stderr through `RUST_LOG`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use foresight::exit_codes;
use foresight::io::config::{DEFAULT_CONFIG_FILE, SimConfig, load_config, write_config};
use foresight::logging;
use foresight::run::{plan_seeded, resolve_seed, run_seeded};
use foresight::select::StrategyKind;

#[derive(Parser)]
#[command(
    name = "foresight",
    version,
    about = "Grid delivery agent with depth-bounded foresight planning"
)]
struct Cli {
    /// Config file to read (missing file means defaults).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Load and validate the config file.
    Validate,
    /// Print the targets the strategy would choose first, as JSON.
    Plan(Overrides),
    /// Run the agent until it stops and print the run summary as JSON.
    Run(Overrides),
}

/// Per-invocation overrides of the config file.
#[derive(Args, Debug, Default)]
struct Overrides {
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    depth: Option<u32>,
    /// Replan after every reached target.
    #[arg(long, conflicts_with = "full_sequence")]
    replan: bool,
    /// Execute whole winning sequences before replanning.
    #[arg(long)]
    full_sequence: bool,
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,
}

impl Overrides {
    fn apply(&self, cfg: &mut SimConfig) -> Result<()> {
        if let Some(seed) = self.seed {
            cfg.run.seed = Some(seed);
        }
        if let Some(depth) = self.depth {
            cfg.planner.depth = depth;
        }
        if self.replan {
            cfg.planner.replan_per_target = true;
        }
        if self.full_sequence {
            cfg.planner.replan_per_target = false;
        }
        if let Some(strategy) = self.strategy {
            cfg.planner.strategy = strategy;
        }
        cfg.validate()
    }
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Validate => cmd_validate(&cli.config),
        Command::Plan(overrides) => cmd_plan(&cli.config, &overrides),
        Command::Run(overrides) => cmd_run(&cli.config, &overrides),
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        println!("init: kept {}", path.display());
        return Ok(exit_codes::OK);
    }
    write_config(path, &SimConfig::default())
        .with_context(|| format!("write {}", path.display()))?;
    println!("init: wrote {}", path.display());
    Ok(exit_codes::OK)
}

fn cmd_validate(path: &Path) -> Result<i32> {
    load_config(path)?;
    println!("validate: ok {}", path.display());
    Ok(exit_codes::OK)
}

fn cmd_plan(path: &Path, overrides: &Overrides) -> Result<i32> {
    let cfg = load_with_overrides(path, overrides)?;
    let report = plan_seeded(&cfg, resolve_seed(&cfg))?;
    print_json(&report)?;
    Ok(exit_codes::OK)
}

fn cmd_run(path: &Path, overrides: &Overrides) -> Result<i32> {
    let cfg = load_with_overrides(path, overrides)?;
    let summary = run_seeded(&cfg, resolve_seed(&cfg))?;
    print_json(&summary)?;
    if summary.all_delivered() {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::INCOMPLETE)
    }
}

fn load_with_overrides(path: &Path, overrides: &Overrides) -> Result<SimConfig> {
    let mut cfg = load_config(path)?;
    overrides.apply(&mut cfg).context("apply command-line overrides")?;
    Ok(cfg)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string(value).context("serialize json")?;
    println!("{payload}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["foresight", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn parse_run_overrides() {
        let cli = Cli::parse_from([
            "foresight",
            "run",
            "--seed",
            "7",
            "--depth",
            "2",
            "--full-sequence",
            "--strategy",
            "greedy",
            "--config",
            "alt.toml",
        ]);
        let Command::Run(overrides) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(overrides.seed, Some(7));
        assert_eq!(overrides.depth, Some(2));
        assert!(overrides.full_sequence);
        assert_eq!(overrides.strategy, Some(StrategyKind::Greedy));
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
    }

    #[test]
    fn replan_flags_conflict() {
        let result = Cli::try_parse_from(["foresight", "plan", "--replan", "--full-sequence"]);
        assert!(result.is_err());
    }

    #[test]
    fn negative_depth_fails_to_parse() {
        let result = Cli::try_parse_from(["foresight", "plan", "--depth", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut cfg = SimConfig::default();
        let overrides = Overrides {
            seed: Some(3),
            depth: Some(1),
            full_sequence: true,
            ..Overrides::default()
        };
        overrides.apply(&mut cfg).expect("apply");
        assert_eq!(cfg.run.seed, Some(3));
        assert_eq!(cfg.planner.depth, 1);
        assert!(!cfg.planner.replan_per_target);
    }
}
