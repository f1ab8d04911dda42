//! Flat result tables.
//!
//! All four tables are rendered in memory first. Writing goes through
//! temporary siblings that are renamed only once every file is on disk;
//! a failure removes whatever was staged or already moved.

use std::fs;
use std::path::PathBuf;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};

use crate::output::naming::ResultLocation;
use crate::topology::MixSet;

pub const TOPOLOGY_TABLE: &str = "topo.dat";
pub const ENTRIES_TABLE: &str = "entries.dat";
pub const RENDEZVOUS_TABLE: &str = "rendezvous.dat";
pub const PATHS_TABLE: &str = "paths.dat";

/// Tab-separated tables describing one finished overlay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTables {
    /// `a b latency/1000 link_capacity`, each undirected edge once
    pub topology: String,
    /// `id entry_probability bandwidth_capacity`
    pub entries: String,
    /// `id rendezvous_probability`
    pub rendezvous: String,
    /// `entry rendezvous first_relay [second_relay] probability`
    pub paths: String,
}

impl ResultTables {
    pub fn from_mixes(mixes: &MixSet) -> Self {
        let mut tables = Self::default();
        let uniform = if mixes.is_empty() {
            0.0
        } else {
            1.0 / mixes.len() as f64
        };

        for (a, b, latency) in mixes.edges() {
            let mix_a = mixes.get(a);
            let mix_b = mixes.get(b);
            // The link gets the smaller of the two per-link capacity shares
            let share_a = mix_a.bandwidth_capacity as f64 / mix_a.degree() as f64;
            let share_b = mix_b.bandwidth_capacity as f64 / mix_b.degree() as f64;
            tables.topology.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                a,
                b,
                latency as f64 / 1000.0,
                share_a.min(share_b)
            ));
        }

        for mix in mixes.iter() {
            tables
                .entries
                .push_str(&format!("{}\t{}\t{}\n", mix.id, uniform, mix.bandwidth_capacity));
            tables.rendezvous.push_str(&format!("{}\t{}\n", mix.id, uniform));

            for path in &mix.paths {
                let relays = match path.second_relay {
                    Some(second) => format!("{}\t{}", path.first_relay, second),
                    None => path.first_relay.to_string(),
                };
                tables.paths.push_str(&format!(
                    "{}\t{}\t{}\t{}\n",
                    mix.id, path.rendezvous, relays, path.probability
                ));
            }
        }

        tables
    }

    /// `(table name, contents)` of the four tables
    pub fn named(&self) -> [(&'static str, &str); 4] {
        [
            (TOPOLOGY_TABLE, self.topology.as_str()),
            (ENTRIES_TABLE, self.entries.as_str()),
            (RENDEZVOUS_TABLE, self.rendezvous.as_str()),
            (PATHS_TABLE, self.paths.as_str()),
        ]
    }
}

/// Writes every `(table name, contents)` file of one dataset, or none of them.
///
/// Files are staged as `.tmp` siblings first. If staging or any rename
/// fails, the staged files and the files already moved into place are
/// removed before the error is returned.
pub fn write_all(location: &ResultLocation, files: &[(&str, &str)]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&location.directory).wrap_err_with(|| {
        format!("Failed to create results directory '{}'", location.directory.display())
    })?;

    let mut staged = Vec::with_capacity(files.len());
    for &(table, contents) in files {
        let target = location.table_file(table);
        let temporary = location.table_file(&format!("{}.tmp", table));
        if let Err(e) = fs::write(&temporary, contents) {
            remove_files(staged.iter().map(|(temporary, _)| temporary));
            let _ = fs::remove_file(&temporary);
            return Err(e).wrap_err_with(|| format!("Failed to write '{}'", temporary.display()));
        }
        staged.push((temporary, target));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (index, (temporary, target)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(temporary, target) {
            remove_files(written.iter());
            remove_files(staged[index..].iter().map(|(temporary, _)| temporary));
            return Err(e).wrap_err_with(|| format!("Failed to move '{}' into place", target.display()));
        }
        written.push(target.clone());
    }

    info!("Result tables written to {}", location.directory.display());
    Ok(written)
}

// Best effort; the original error is what gets reported
fn remove_files<'a>(paths: impl Iterator<Item = &'a PathBuf>) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!("Failed to remove '{}': {}", path.display(), e);
        }
    }
}
