//! Post-construction degree balancing.
//!
//! The greedy builder can leave mixes below the target degree when their
//! would-be partners reached the cap first. The balancer pairs such mixes
//! with each other, one new edge per mix per round, until nobody is under
//! target or a whole round adds nothing.

use std::collections::BTreeSet;

use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::topology::types::{MixId, MixSet, OverlayStrategy};

/// Outcome of a balancing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub target_degree: usize,
    /// Rounds executed, including the final one that added nothing
    pub rounds: usize,
    pub edges_added: usize,
    /// Mixes still below the target degree when balancing stopped
    pub residue: Vec<MixId>,
}

impl BalanceReport {
    pub fn converged(&self) -> bool {
        self.residue.is_empty()
    }
}

/// Repairs degree deficits left by the builder.
///
/// The round count is bounded by the number of mixes.
pub fn balance<R: Rng>(
    mixes: &mut MixSet,
    strategy: OverlayStrategy,
    target_degree: usize,
    rng: &mut R,
) -> BalanceReport {
    let max_rounds = mixes.len().max(1);
    let mut report = BalanceReport {
        target_degree,
        ..BalanceReport::default()
    };

    let mut under_target = mixes.under_target(target_degree);
    let mut edge_count = mixes.edge_count();

    while !under_target.is_empty() && report.rounds < max_rounds {
        report.rounds += 1;

        if strategy == OverlayStrategy::Random {
            under_target.shuffle(rng);
        }

        let mut paired: BTreeSet<MixId> = BTreeSet::new();
        for &requester in &under_target {
            if paired.contains(&requester) || mixes.degree(requester) >= target_degree {
                continue;
            }

            let partner = match strategy {
                OverlayStrategy::Random => {
                    random_partner(mixes, requester, &under_target, &paired, target_degree, rng)
                }
                OverlayStrategy::LatencyAware => {
                    nearest_partner(mixes, requester, &under_target, &paired, target_degree)
                }
            };

            if let Some(partner) = partner {
                mixes.add_edge(requester, partner);
                paired.insert(requester);
                paired.insert(partner);
            }
        }

        let new_edge_count = mixes.edge_count();
        under_target = mixes.under_target(target_degree);
        debug!(
            "Balancing round {}: +{} edges, {} mixes under target",
            report.rounds,
            new_edge_count - edge_count,
            under_target.len()
        );

        if new_edge_count <= edge_count {
            break;
        }
        report.edges_added += new_edge_count - edge_count;
        edge_count = new_edge_count;
    }

    report.residue = under_target;

    if report.converged() {
        info!(
            "Balancing converged after {} rounds, {} edges added",
            report.rounds, report.edges_added
        );
    } else {
        warn!(
            "Balancing stopped after {} rounds with {} mixes under degree {}: {:?}",
            report.rounds,
            report.residue.len(),
            target_degree,
            report.residue
        );
    }

    report
}

fn is_eligible(
    mixes: &MixSet,
    requester: MixId,
    candidate: MixId,
    paired: &BTreeSet<MixId>,
    target_degree: usize,
) -> bool {
    let mix = mixes.get(requester);
    candidate != requester
        && !paired.contains(&candidate)
        && !mix.is_neighbor(candidate)
        && mix.underlay_distances().contains_key(&candidate)
        && mixes.degree(candidate) < target_degree
}

fn random_partner<R: Rng>(
    mixes: &MixSet,
    requester: MixId,
    under_target: &[MixId],
    paired: &BTreeSet<MixId>,
    target_degree: usize,
    rng: &mut R,
) -> Option<MixId> {
    let eligible: Vec<MixId> = under_target
        .iter()
        .copied()
        .filter(|&candidate| is_eligible(mixes, requester, candidate, paired, target_degree))
        .collect();
    eligible.choose(rng).copied()
}

/// Eligible partner with the lowest underlay latency, ties broken by id
fn nearest_partner(
    mixes: &MixSet,
    requester: MixId,
    under_target: &[MixId],
    paired: &BTreeSet<MixId>,
    target_degree: usize,
) -> Option<MixId> {
    let distances = mixes.get(requester).underlay_distances();
    under_target
        .iter()
        .copied()
        .filter(|&candidate| is_eligible(mixes, requester, candidate, paired, target_degree))
        .min_by_key(|candidate| (distances[candidate], *candidate))
}
