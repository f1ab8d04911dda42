//! Greedy overlay construction under a degree cap.
//!
//! Mixes are visited in id order. Every edge is symmetric and becomes
//! visible to later mixes immediately, so a mix that reaches the cap stops
//! being a candidate for everyone else in the same pass.

use std::collections::BTreeSet;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::OverlayConfig;
use crate::topology::degree::degree_cap;
use crate::topology::types::{MixId, MixSet, OverlayStrategy};

/// Outcome of one construction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Edges added to the nearest candidates
    pub latency_aware_edges: usize,
    /// Edges added to uniformly drawn candidates
    pub random_edges: usize,
    /// Mixes skipped because they were already capped when visited
    pub skipped_capped: usize,
}

impl BuildReport {
    pub fn total_edges(&self) -> usize {
        self.latency_aware_edges + self.random_edges
    }
}

/// Degree-capped neighbor graph builder
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    strategy: OverlayStrategy,
    neighbor_count: usize,
    latency_aware_count: usize,
    degree_cap: usize,
}

impl TopologyBuilder {
    pub fn new(
        strategy: OverlayStrategy,
        neighbor_count: usize,
        latency_aware_count: usize,
        degree_cap: usize,
    ) -> Self {
        Self {
            strategy,
            neighbor_count,
            latency_aware_count: latency_aware_count.min(neighbor_count),
            degree_cap: degree_cap.max(1),
        }
    }

    /// Builder for a network of `mix_count` mixes, cap derived from the config factor
    pub fn from_config(config: &OverlayConfig, mix_count: usize) -> Self {
        Self::new(
            config.strategy,
            config.initial_neighbor_count,
            config.latency_aware_neighbor_count,
            degree_cap(mix_count, config.degree_cap_factor),
        )
    }

    pub fn degree_cap(&self) -> usize {
        self.degree_cap
    }

    /// Adds neighbors to every mix of the set.
    ///
    /// The generator is only used for candidate draws; passing the same
    /// seeded generator reproduces the same graph.
    pub fn build<R: Rng>(&self, mixes: &mut MixSet, rng: &mut R) -> BuildReport {
        let mut report = BuildReport::default();

        for id in 0..mixes.len() {
            if mixes.is_degree_capped(id, self.degree_cap) {
                report.skipped_capped += 1;
                continue;
            }

            let mut chosen = BTreeSet::new();
            let mut added = 0;

            if self.strategy == OverlayStrategy::LatencyAware {
                added = self.add_nearest_neighbors(mixes, id, &mut chosen);
                report.latency_aware_edges += added;
            }

            let wanted = self.neighbor_count.saturating_sub(added);
            report.random_edges += self.add_random_neighbors(mixes, id, wanted, &mut chosen, rng);

            debug!("Mix {} now has {} neighbors", id, mixes.degree(id));
        }

        info!(
            "{} overlay built: {} edges ({} nearest, {} random), degree cap {}",
            self.strategy,
            mixes.edge_count(),
            report.latency_aware_edges,
            report.random_edges,
            self.degree_cap
        );

        report
    }

    /// Links `id` to its nearest eligible mixes until the quota or the cap is hit.
    ///
    /// Candidates are ordered by underlay latency, then by id.
    fn add_nearest_neighbors(&self, mixes: &mut MixSet, id: MixId, chosen: &mut BTreeSet<MixId>) -> usize {
        let mut nearest: Vec<(MixId, u64)> = mixes
            .get(id)
            .underlay_distances()
            .iter()
            .filter(|(&candidate, _)| candidate != id)
            .map(|(&candidate, &latency)| (candidate, latency))
            .collect();
        nearest.sort_by_key(|&(candidate, latency)| (latency, candidate));

        let mut added = 0;
        for (candidate, _) in nearest {
            if latency_quota_reached(added, self.latency_aware_count)
                || mixes.is_degree_capped(id, self.degree_cap)
            {
                break;
            }
            if mixes.get(id).is_neighbor(candidate) || mixes.is_degree_capped(candidate, self.degree_cap) {
                continue;
            }
            mixes.add_edge(id, candidate);
            chosen.insert(candidate);
            added += 1;
        }

        added
    }

    /// Links `id` to up to `wanted` uniformly drawn mixes.
    ///
    /// Self, current neighbors, capped mixes and ids already chosen this
    /// round are never drawn. Stops early when no candidate is left.
    fn add_random_neighbors<R: Rng>(
        &self,
        mixes: &mut MixSet,
        id: MixId,
        wanted: usize,
        chosen: &mut BTreeSet<MixId>,
        rng: &mut R,
    ) -> usize {
        let mut added = 0;

        while added < wanted && !mixes.is_degree_capped(id, self.degree_cap) {
            let mix = mixes.get(id);
            let candidates: Vec<MixId> = mix
                .underlay_distances()
                .keys()
                .copied()
                .filter(|&candidate| {
                    candidate != id
                        && !chosen.contains(&candidate)
                        && !mix.is_neighbor(candidate)
                        && !mixes.is_degree_capped(candidate, self.degree_cap)
                })
                .collect();

            let candidate = match candidates.choose(rng) {
                Some(&candidate) => candidate,
                None => {
                    debug!("Mix {} ran out of candidates after {} random edges", id, added);
                    break;
                }
            };

            chosen.insert(candidate);
            mixes.add_edge(id, candidate);
            added += 1;
        }

        added
    }
}

/// Whether `added` latency-aware edges exhaust a quota of `quota`
fn latency_quota_reached(added: usize, quota: usize) -> bool {
    added >= quota
}
