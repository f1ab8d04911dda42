//! Run orchestrator.
//!
//! This module coordinates one run per dataset: load the underlay, build
//! and balance the overlay, enumerate paths, then project the results.

use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::discovery::find_datasets;
use crate::output::{write_all, ResultLocation, ResultTables};
use crate::paths::{enumerate_paths, EnumerationReport, SelectionPolicy};
use crate::summary::{DegreeStats, RunSummary};
use crate::topology::{balance, BalanceReport, BuildReport, MixSet, TopologyBuilder};
use crate::underlay::{load_dataset, UnderlayModel};

const SUMMARY_FILE: &str = "summary.json";

/// Finished overlay of one underlay, before anything is written
#[derive(Debug, Clone)]
pub struct OverlayRun {
    pub mixes: MixSet,
    pub degree_cap: usize,
    pub build: BuildReport,
    pub balance: BalanceReport,
    pub paths: EnumerationReport,
}

/// Builds, balances and enumerates paths over one underlay.
///
/// Construction is sequential and consumes `rng`; only path enumeration
/// runs in parallel, after the graph is frozen.
pub fn construct_overlay<R: Rng>(model: UnderlayModel, config: &Config, rng: &mut R) -> OverlayRun {
    let mut mixes = MixSet::from_underlay(model, config.general.bandwidth_capacity);

    let builder = TopologyBuilder::from_config(&config.overlay, mixes.len());
    let build = builder.build(&mut mixes, rng);
    let balance = balance(&mut mixes, config.overlay.strategy, builder.degree_cap(), rng);

    let policy = SelectionPolicy::from_config(&config.paths);
    let paths = enumerate_paths(&mut mixes, &policy);

    OverlayRun {
        mixes,
        degree_cap: builder.degree_cap(),
        build,
        balance,
        paths,
    }
}

/// Processes one dataset file end to end and writes its result tables
pub fn run_dataset(config: &Config, dataset: &Path, seed: u64) -> Result<RunSummary> {
    info!("Processing dataset {}", dataset.display());

    let links = load_dataset(dataset)?;
    let model = UnderlayModel::from_links(&links)
        .wrap_err_with(|| format!("Invalid underlay in '{}'", dataset.display()))?;
    if !model.is_complete() {
        warn!(
            "Underlay of {} is incomplete; missing pairs are never linked",
            dataset.display()
        );
    }

    let location = ResultLocation::for_dataset(
        Path::new(&config.general.results_path),
        config.overlay.strategy,
        config.paths.strategy,
        dataset,
    )?;

    let mut rng = StdRng::seed_from_u64(seed);
    let run = construct_overlay(model, config, &mut rng);

    let summary = RunSummary {
        dataset: dataset.display().to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        seed,
        overlay_strategy: config.overlay.strategy,
        path_strategy: config.paths.strategy,
        mix_count: run.mixes.len(),
        degree_cap: run.degree_cap,
        edge_count: run.mixes.edge_count(),
        degrees: DegreeStats::from_mixes(&run.mixes),
        build: run.build,
        balance: run.balance.clone(),
        paths: run.paths,
    };

    let tables = ResultTables::from_mixes(&run.mixes);
    let summary_json = if config.general.write_summary {
        Some(summary.to_json()?)
    } else {
        None
    };
    let mut files = tables.named().to_vec();
    if let Some(json) = &summary_json {
        files.push((SUMMARY_FILE, json.as_str()));
    }
    // Tables and summary land together or not at all
    write_all(&location, &files)?;

    info!("{}", summary.headline());
    Ok(summary)
}

/// Configured seed, or a fresh one that is logged for replay
pub fn resolve_seed(config: &Config) -> u64 {
    match config.general.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::thread_rng().gen();
            info!("No seed configured, using {}", seed);
            seed
        }
    }
}

/// Outcome of processing every discovered dataset
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<RunSummary>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Discovers and processes all datasets.
///
/// A failing dataset is logged and skipped; it never leaves result tables
/// behind and never stops the remaining datasets.
pub fn run_all(config: &Config) -> Result<BatchReport> {
    let data_path = Path::new(&config.general.data_path);
    let datasets = find_datasets(data_path, &config.dataset)?;
    if datasets.is_empty() {
        warn!("No datasets found under {}", data_path.display());
    } else {
        info!("Found {} datasets under {}", datasets.len(), data_path.display());
    }

    let seed = resolve_seed(config);
    let mut report = BatchReport::default();

    for dataset in datasets {
        match run_dataset(config, &dataset, seed) {
            Ok(summary) => report.processed.push(summary),
            Err(e) => {
                error!("Failed to process {}: {:?}", dataset.display(), e);
                report.failed.push((dataset, format!("{:#}", e)));
            }
        }
    }

    info!(
        "Processed {} datasets, {} failed",
        report.processed.len(),
        report.failed.len()
    );
    Ok(report)
}
