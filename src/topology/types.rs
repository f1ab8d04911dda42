//! Mix and mix set definitions.
//!
//! The mix set is an arena indexed by mix id. Builder, balancer and
//! enumerator all address mixes by id, never by reference identity.

use std::collections::BTreeMap;

use crate::paths::ForwardingPath;
use crate::underlay::{Latency, NodeId, UnderlayModel};

/// Re-export strategy types from config to keep them next to the builder
pub use crate::config::{OverlayStrategy, PathSelectionStrategy};

/// Mix identifier, identical to the underlay node id
pub type MixId = NodeId;

/// A participant of the overlay network
#[derive(Debug, Clone)]
pub struct Mix {
    pub id: MixId,
    underlay_distances: BTreeMap<MixId, Latency>,
    neighbors: BTreeMap<MixId, Latency>,
    pub bandwidth_capacity: u32,
    /// Forwarding paths owned by this mix as entry, filled by the enumerator
    pub paths: Vec<ForwardingPath>,
}

impl Mix {
    pub fn new(id: MixId, underlay_distances: BTreeMap<MixId, Latency>, bandwidth_capacity: u32) -> Self {
        Self {
            id,
            underlay_distances,
            neighbors: BTreeMap::new(),
            bandwidth_capacity,
            paths: Vec::new(),
        }
    }

    /// Underlay latency to every known node, self included
    pub fn underlay_distances(&self) -> &BTreeMap<MixId, Latency> {
        &self.underlay_distances
    }

    /// Overlay neighbors with their link latency
    pub fn neighbors(&self) -> &BTreeMap<MixId, Latency> {
        &self.neighbors
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_neighbor(&self, other: MixId) -> bool {
        self.neighbors.contains_key(&other)
    }

    /// Whether the mix holds `cap` neighbors or more
    pub fn is_degree_capped(&self, cap: usize) -> bool {
        self.neighbors.len() >= cap
    }

    pub fn neighbor_latency(&self, other: MixId) -> Option<Latency> {
        self.neighbors.get(&other).copied()
    }
}

/// Arena of all mixes of one run, indexed by id
#[derive(Debug, Clone, Default)]
pub struct MixSet {
    mixes: Vec<Mix>,
}

impl MixSet {
    /// One mix per underlay node, no neighbors yet
    pub fn from_underlay(model: UnderlayModel, bandwidth_capacity: u32) -> Self {
        let mixes = model
            .into_tables()
            .into_iter()
            .enumerate()
            .map(|(id, distances)| Mix::new(id, distances, bandwidth_capacity))
            .collect();
        Self { mixes }
    }

    pub fn len(&self) -> usize {
        self.mixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mixes.is_empty()
    }

    pub fn get(&self, id: MixId) -> &Mix {
        &self.mixes[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mix> {
        self.mixes.iter()
    }

    pub fn as_slice(&self) -> &[Mix] {
        &self.mixes
    }

    pub fn degree(&self, id: MixId) -> usize {
        self.mixes[id].degree()
    }

    pub fn is_degree_capped(&self, id: MixId, cap: usize) -> bool {
        self.mixes[id].is_degree_capped(cap)
    }

    /// Adds a symmetric overlay edge using the underlay latency.
    ///
    /// Panics on a self-edge, an unknown mix, a pair missing from the
    /// underlay, or an edge that already exists.
    pub fn add_edge(&mut self, a: MixId, b: MixId) -> Latency {
        assert_ne!(a, b, "mix {} cannot neighbor itself", a);
        assert!(a < self.mixes.len() && b < self.mixes.len(), "unknown mix in edge {}-{}", a, b);

        let latency = self.mixes[a]
            .underlay_distances
            .get(&b)
            .copied()
            .unwrap_or_else(|| panic!("no underlay latency between {} and {}", a, b));
        debug_assert_eq!(self.mixes[b].underlay_distances.get(&a), Some(&latency));

        let previous_ab = self.mixes[a].neighbors.insert(b, latency);
        let previous_ba = self.mixes[b].neighbors.insert(a, latency);
        assert!(
            previous_ab.is_none() && previous_ba.is_none(),
            "edge {}-{} added twice",
            a,
            b
        );

        latency
    }

    /// Number of undirected overlay edges
    pub fn edge_count(&self) -> usize {
        self.mixes.iter().map(Mix::degree).sum::<usize>() / 2
    }

    /// Ids of mixes holding fewer than `target` neighbors, in id order
    pub fn under_target(&self, target: usize) -> Vec<MixId> {
        self.mixes
            .iter()
            .filter(|mix| mix.degree() < target)
            .map(|mix| mix.id)
            .collect()
    }

    /// Ids shared by the neighbor sets of two mixes, in id order
    pub fn common_neighbors(&self, a: MixId, b: MixId) -> Vec<MixId> {
        let other = &self.mixes[b].neighbors;
        self.mixes[a]
            .neighbors
            .keys()
            .copied()
            .filter(|id| other.contains_key(id))
            .collect()
    }

    /// Replaces the path list of every mix, `paths[i]` going to mix `i`
    pub fn attach_paths(&mut self, paths: Vec<Vec<ForwardingPath>>) {
        assert_eq!(paths.len(), self.mixes.len(), "one path list per mix expected");
        for (mix, mix_paths) in self.mixes.iter_mut().zip(paths) {
            mix.paths = mix_paths;
        }
    }

    /// Every undirected edge once, as `(low id, high id, latency)`
    pub fn edges(&self) -> Vec<(MixId, MixId, Latency)> {
        self.mixes
            .iter()
            .flat_map(|mix| {
                mix.neighbors
                    .range(mix.id + 1..)
                    .map(move |(&other, &latency)| (mix.id, other, latency))
            })
            .collect()
    }
}
