use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;

use mixoverlay::config::{OverlayStrategy, PathSelectionStrategy};
use mixoverlay::config_loader::{self, CliOverrides};
use mixoverlay::orchestrator;

/// Mix network overlay construction and path enumeration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Directory searched recursively for underlay datasets
    #[arg(short, long)]
    data_dir: Option<String>,

    /// Root directory for result tables
    #[arg(short, long)]
    output: Option<String>,

    /// Seed for the run's random generator
    #[arg(long)]
    seed: Option<u64>,

    /// Overlay strategy (Random, Latency-aware)
    #[arg(long)]
    overlay_strategy: Option<OverlayStrategy>,

    /// Path selection strategy (Random, Latency-aware)
    #[arg(long)]
    path_strategy: Option<PathSelectionStrategy>,

    /// Number of parallel workers for path enumeration (0 = auto-detect)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    info!("Starting MixOverlay");
    info!("Configuration file: {:?}", args.config);

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .wrap_err("Failed to configure thread pool")?;
    }

    let mut config = config_loader::load_config(&args.config)?;
    let overrides = CliOverrides {
        data_path: args.data_dir,
        results_path: args.output,
        seed: args.seed,
        overlay_strategy: args.overlay_strategy,
        path_strategy: args.path_strategy,
    };
    config_loader::apply_overrides(&mut config, &overrides)?;

    let report = orchestrator::run_all(&config)?;

    if !report.is_success() {
        for (dataset, reason) in &report.failed {
            error!("{}: {}", dataset.display(), reason);
        }
        return Err(eyre!(
            "{} of {} datasets failed",
            report.failed.len(),
            report.failed.len() + report.processed.len()
        ));
    }

    info!("Overlay construction completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(&["mixoverlay", "--config", "overlay.yaml"]);

        assert_eq!(args.config, PathBuf::from("overlay.yaml"));
        assert_eq!(args.data_dir, None);
        assert_eq!(args.threads, 0);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_strategy_overrides() {
        let args = Args::parse_from(&[
            "mixoverlay",
            "--config", "overlay.yaml",
            "--overlay-strategy", "Latency-aware",
            "--path-strategy", "Random",
            "--seed", "42",
            "-j", "4",
        ]);

        assert_eq!(args.overlay_strategy, Some(OverlayStrategy::LatencyAware));
        assert_eq!(args.path_strategy, Some(PathSelectionStrategy::Random));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.threads, 4);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result = Args::try_parse_from(&[
            "mixoverlay",
            "--config", "overlay.yaml",
            "--overlay-strategy", "Ring",
        ]);
        assert!(result.is_err());
    }
}
