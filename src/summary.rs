//! Run summary: degree distribution, balancing outcome and path totals.

use std::collections::BTreeMap;

use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{OverlayStrategy, PathSelectionStrategy};
use crate::paths::EnumerationReport;
use crate::topology::{BalanceReport, BuildReport, MixSet};

/// Statistical summary of mix degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// Degree -> number of mixes with that degree
    pub histogram: BTreeMap<usize, usize>,
}

impl DegreeStats {
    pub fn from_mixes(mixes: &MixSet) -> Self {
        let degrees: Vec<usize> = mixes.iter().map(|mix| mix.degree()).collect();
        calculate_stats(&degrees)
    }
}

fn calculate_stats(values: &[usize]) -> DegreeStats {
    let mut histogram = BTreeMap::new();
    for &value in values {
        *histogram.entry(value).or_insert(0) += 1;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let (min, max) = match (sorted.first(), sorted.last()) {
        (Some(&min), Some(&max)) => (min, max),
        _ => {
            return DegreeStats {
                min: 0,
                max: 0,
                mean: 0.0,
                median: 0.0,
                std_dev: 0.0,
                histogram,
            }
        }
    };

    let mean = sorted.iter().sum::<usize>() as f64 / sorted.len() as f64;
    let median = if sorted.len() % 2 == 0 {
        (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) as f64 / 2.0
    } else {
        sorted[sorted.len() / 2] as f64
    };
    let variance = sorted
        .iter()
        .map(|&v| {
            let diff = v as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / sorted.len() as f64;

    DegreeStats {
        min,
        max,
        mean,
        median,
        std_dev: variance.sqrt(),
        histogram,
    }
}

/// Everything worth knowing about one dataset run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub dataset: String,
    pub generated_at: String,
    pub seed: u64,
    pub overlay_strategy: OverlayStrategy,
    pub path_strategy: PathSelectionStrategy,
    pub mix_count: usize,
    pub degree_cap: usize,
    pub edge_count: usize,
    pub degrees: DegreeStats,
    pub build: BuildReport,
    pub balance: BalanceReport,
    pub paths: EnumerationReport,
}

impl RunSummary {
    /// One-line description for the log
    pub fn headline(&self) -> String {
        format!(
            "{}: {} mixes, {} edges, degree {}..{} (mean {:.2}, cap {}), {} under target, {} paths, {} unreachable pairs",
            self.dataset,
            self.mix_count,
            self.edge_count,
            self.degrees.min,
            self.degrees.max,
            self.degrees.mean,
            self.degree_cap,
            self.balance.residue.len(),
            self.paths.total_paths,
            self.paths.unreachable_pairs
        )
    }

    /// Pretty JSON rendering, written next to the result tables
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run summary to JSON")
    }
}
