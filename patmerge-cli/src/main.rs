//! patmerge CLI: merge a pattern bank file.
//!
//! Usage:
//!   patmerge merge bank.json --out merged.json [--window 500] [--target-coverage 0.9]
//!   patmerge show-config

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;

use patmerge_core::config::{CliOverrides, PatmergeConfig};
use patmerge_core::errors::{ErrorCode, PipelineError};
use patmerge_core::tracing::init_tracing;
use patmerge_engine::{InMemoryBank, JsonFileSink, MergePipeline};

#[derive(Parser, Debug)]
#[command(name = "patmerge", version, about = "Merge sibling patterns of a pattern bank into 8/4/2-way groups")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a merge pass over a JSON bank file
    Merge {
        /// Path to the bank file
        bank: PathBuf,
        /// Where to write the merge outcome (JSON)
        #[arg(short, long)]
        out: PathBuf,
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Directory searched for patmerge.toml
        #[arg(long, default_value = ".")]
        config_root: PathBuf,
    },
    /// Print the resolved configuration as TOML
    ShowConfig {
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Directory searched for patmerge.toml
        #[arg(long, default_value = ".")]
        config_root: PathBuf,
    },
}

#[derive(clap::Args, Debug, Default)]
struct OverrideArgs {
    /// Half-width of the value-ordered search window (0 = unrestricted)
    #[arg(long)]
    window: Option<usize>,
    /// Stop loading once this coverage fraction is reached
    #[arg(long)]
    target_coverage: Option<f64>,
    /// Maximum patterns to load (0 = unrestricted)
    #[arg(long)]
    max_patterns: Option<usize>,
    /// Maximum anchors to process (0 = all loaded)
    #[arg(long)]
    max_trials: Option<usize>,
    /// Layers per pattern key
    #[arg(long)]
    n_layers: Option<usize>,
    /// Adjacency distance across the cyclic boundary
    #[arg(long)]
    wrap_constant: Option<u32>,
    /// 0 = warnings only, 1 = info, 10 = debug, 100 = trace
    #[arg(short, long)]
    verbosity: Option<u32>,
}

impl From<&OverrideArgs> for CliOverrides {
    fn from(args: &OverrideArgs) -> Self {
        Self {
            window_half_width: args.window,
            target_coverage: args.target_coverage,
            max_patterns_to_load: args.max_patterns,
            max_trials_to_process: args.max_trials,
            n_layers: args.n_layers,
            wrap_constant: args.wrap_constant,
            verbosity: args.verbosity,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Merge {
            bank,
            out,
            overrides,
            config_root,
        } => cmd_merge(bank, out, overrides, config_root),
        Commands::ShowConfig {
            overrides,
            config_root,
        } => cmd_show_config(overrides, config_root),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.coded_string());
            ExitCode::FAILURE
        }
    }
}

fn cmd_merge(bank: &Path, out: &Path, overrides: &OverrideArgs, config_root: &Path) -> Result<(), PipelineError> {
    let cli_overrides = CliOverrides::from(overrides);
    let config = PatmergeConfig::load(config_root, Some(&cli_overrides))?;
    init_tracing(&config.observability);

    let source = InMemoryBank::from_json_file(bank)?;
    info!(bank = %bank.display(), entries = source.entries.len(), "read bank");

    let mut sink = JsonFileSink::new(out);
    let outcome = MergePipeline::new(config.merge).run_with_sink(&source, &mut sink)?;

    let summary = &outcome.summary;
    println!(
        "{} patterns -> {} groups (compression gain {:.4}, coverage {:.4}); written to {}",
        summary.loaded,
        summary.groups,
        summary.compression_gain,
        summary.loaded_coverage,
        out.display()
    );
    Ok(())
}

fn cmd_show_config(overrides: &OverrideArgs, config_root: &Path) -> Result<(), PipelineError> {
    let cli_overrides = CliOverrides::from(overrides);
    let config = PatmergeConfig::load(config_root, Some(&cli_overrides))?;
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_merge_with_overrides() {
        let cli = Cli::try_parse_from([
            "patmerge",
            "merge",
            "bank.json",
            "--out",
            "merged.json",
            "--window",
            "500",
            "--target-coverage",
            "0.9",
            "--max-trials",
            "1000",
        ])
        .unwrap();
        let Commands::Merge {
            bank,
            out,
            overrides,
            config_root,
        } = cli.command
        else {
            panic!("expected merge subcommand");
        };
        assert_eq!(bank, PathBuf::from("bank.json"));
        assert_eq!(out, PathBuf::from("merged.json"));
        assert_eq!(config_root, PathBuf::from("."));

        let cli_overrides = CliOverrides::from(&overrides);
        assert_eq!(cli_overrides.window_half_width, Some(500));
        assert_eq!(cli_overrides.target_coverage, Some(0.9));
        assert_eq!(cli_overrides.max_trials_to_process, Some(1000));
        assert_eq!(cli_overrides.max_patterns_to_load, None);
    }

    #[test]
    fn merge_requires_an_output_path() {
        assert!(Cli::try_parse_from(["patmerge", "merge", "bank.json"]).is_err());
    }

    #[test]
    fn parses_show_config() {
        let cli = Cli::try_parse_from(["patmerge", "show-config", "--n-layers", "8"]).unwrap();
        let Commands::ShowConfig { overrides, .. } = cli.command else {
            panic!("expected show-config subcommand");
        };
        assert_eq!(overrides.n_layers, Some(8));
    }
}
