//! Enumeration of one- and two-hop forwarding paths.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::paths::selection::SelectionPolicy;
use crate::paths::types::ForwardingPath;
use crate::topology::{MixId, MixSet};

/// Totals of an enumeration run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationReport {
    pub total_paths: usize,
    pub one_hop_paths: usize,
    pub two_hop_paths: usize,
    /// (entry, rendezvous) pairs left without any selectable path
    pub unreachable_pairs: usize,
}

/// Acyclic candidate paths from `entry` to `rendezvous`, probabilities unset.
///
/// One-hop paths go through a common neighbor of both ends. Two-hop paths
/// are only built when there is no one-hop path or when the entry is its own
/// rendezvous.
pub fn candidate_paths(mixes: &MixSet, entry: MixId, rendezvous: MixId) -> Vec<ForwardingPath> {
    let entry_mix = mixes.get(entry);
    let rendezvous_mix = mixes.get(rendezvous);
    let mut paths = Vec::new();

    if rendezvous != entry {
        for relay in mixes.common_neighbors(entry, rendezvous) {
            let latency = entry_mix.neighbors()[&relay] + rendezvous_mix.neighbors()[&relay];
            paths.push(ForwardingPath::one_hop(rendezvous, relay, latency));
        }
    }

    if paths.is_empty() {
        for (&first_relay, &first_latency) in entry_mix.neighbors() {
            let first_mix = mixes.get(first_relay);
            for second_relay in mixes.common_neighbors(first_relay, rendezvous) {
                let latency = first_latency
                    + first_mix.neighbors()[&second_relay]
                    + rendezvous_mix.neighbors()[&second_relay];
                paths.push(ForwardingPath::two_hop(rendezvous, first_relay, second_relay, latency));
            }
        }
    }

    paths.retain(|path| !path.is_cyclic(entry));
    paths
}

/// Selected paths of one entry mix towards every rendezvous candidate,
/// plus the number of candidates left without a path.
fn collect_paths(mixes: &MixSet, entry: MixId, policy: &SelectionPolicy) -> (Vec<ForwardingPath>, usize) {
    let mut paths = Vec::new();
    let mut unreachable = 0;

    for &rendezvous in mixes.get(entry).underlay_distances().keys() {
        let selected = policy.assign(candidate_paths(mixes, entry, rendezvous));
        if selected.is_empty() {
            unreachable += 1;
        }
        paths.extend(selected);
    }

    (paths, unreachable)
}

/// Selected paths of one entry mix, in rendezvous id order
pub fn paths_for_mix(mixes: &MixSet, entry: MixId, policy: &SelectionPolicy) -> Vec<ForwardingPath> {
    collect_paths(mixes, entry, policy).0
}

/// Rebuilds the paths of every mix.
///
/// Mixes are processed in parallel against the frozen neighbor graph; each
/// worker only produces the path list of its own entry mix.
pub fn enumerate_paths(mixes: &mut MixSet, policy: &SelectionPolicy) -> EnumerationReport {
    let frozen: &MixSet = mixes;
    let results: Vec<(Vec<ForwardingPath>, usize)> = frozen
        .as_slice()
        .par_iter()
        .map(|mix| collect_paths(frozen, mix.id, policy))
        .collect();

    let mut report = EnumerationReport::default();
    let mut per_mix = Vec::with_capacity(results.len());
    for (paths, unreachable) in results {
        report.unreachable_pairs += unreachable;
        for path in &paths {
            match path.hop_count() {
                1 => report.one_hop_paths += 1,
                _ => report.two_hop_paths += 1,
            }
        }
        report.total_paths += paths.len();
        per_mix.push(paths);
    }
    mixes.attach_paths(per_mix);

    info!(
        "Enumerated {} paths ({} one-hop, {} two-hop) with {} policy, {} pairs unreachable",
        report.total_paths,
        report.one_hop_paths,
        report.two_hop_paths,
        policy.strategy,
        report.unreachable_pairs
    );

    report
}
