//! Output directory and file naming.
//!
//! Results of a dataset named `group-size-run-edges.dat` produced with the
//! latency-aware overlay and random paths land in
//! `<results>/Latency-awareOverlay_RandomPaths/group/group-size-run-<table>`.

use std::path::{Path, PathBuf};

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::config::{OverlayStrategy, PathSelectionStrategy};

/// Directory and file prefix of one dataset's result tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLocation {
    pub directory: PathBuf,
    pub prefix: String,
}

impl ResultLocation {
    pub fn for_dataset(
        results_root: &Path,
        overlay: OverlayStrategy,
        paths: PathSelectionStrategy,
        dataset: &Path,
    ) -> Result<Self> {
        let file_name = dataset
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| eyre!("Dataset path '{}' has no usable file name", dataset.display()))?;

        let (group, prefix) = match (file_name.find('-'), file_name.rfind('-')) {
            (Some(first), Some(last)) => (&file_name[..first], file_name[..=last].to_string()),
            _ => {
                let stem = file_name.split('.').next().unwrap_or(file_name);
                (stem, format!("{}-", stem))
            }
        };

        let directory = results_root
            .join(format!("{}Overlay_{}Paths", overlay, paths))
            .join(group);

        Ok(Self { directory, prefix })
    }

    /// Full path of one table, e.g. `table_file("topo.dat")`
    pub fn table_file(&self, table: &str) -> PathBuf {
        self.directory.join(format!("{}{}", self.prefix, table))
    }
}
