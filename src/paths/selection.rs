//! Path probability assignment.

use crate::config::{PathsConfig, PathSelectionStrategy, DEFAULT_LATENCY_THRESHOLD};
use crate::paths::types::ForwardingPath;
use crate::underlay::Latency;

/// Assigns probabilities to the surviving paths of one (entry, rendezvous) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub strategy: PathSelectionStrategy,
    /// Paths at or above this latency are never selected by the latency-aware policy
    pub latency_threshold: Latency,
}

impl SelectionPolicy {
    pub fn new(strategy: PathSelectionStrategy, latency_threshold: Latency) -> Self {
        Self {
            strategy,
            latency_threshold,
        }
    }

    pub fn from_config(config: &PathsConfig) -> Self {
        Self::new(config.strategy, config.latency_threshold)
    }

    fn is_selectable(&self, path: &ForwardingPath) -> bool {
        match self.strategy {
            PathSelectionStrategy::Random => true,
            PathSelectionStrategy::LatencyAware => path.latency < self.latency_threshold,
        }
    }

    /// Sets probabilities and drops every path that would get zero.
    ///
    /// The returned paths share the probability mass equally, so they sum to
    /// one unless the result is empty.
    pub fn assign(&self, candidates: Vec<ForwardingPath>) -> Vec<ForwardingPath> {
        let mut selected: Vec<ForwardingPath> = candidates
            .into_iter()
            .filter(|path| self.is_selectable(path))
            .collect();

        if selected.is_empty() {
            return selected;
        }

        let probability = 1.0 / selected.len() as f64;
        for path in &mut selected {
            path.probability = probability;
        }
        selected
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::new(PathSelectionStrategy::Random, DEFAULT_LATENCY_THRESHOLD)
    }
}
