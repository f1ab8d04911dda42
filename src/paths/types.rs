//! Forwarding path definition.

use serde::{Deserialize, Serialize};

use crate::underlay::{Latency, NodeId};

/// A candidate route from the owning entry mix to a rendezvous mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardingPath {
    pub rendezvous: NodeId,
    pub first_relay: NodeId,
    /// Absent for one-hop paths
    pub second_relay: Option<NodeId>,
    /// Sum of the traversed overlay link latencies
    pub latency: Latency,
    pub probability: f64,
}

impl ForwardingPath {
    pub fn one_hop(rendezvous: NodeId, relay: NodeId, latency: Latency) -> Self {
        Self {
            rendezvous,
            first_relay: relay,
            second_relay: None,
            latency,
            probability: 0.0,
        }
    }

    pub fn two_hop(rendezvous: NodeId, first_relay: NodeId, second_relay: NodeId, latency: Latency) -> Self {
        Self {
            rendezvous,
            first_relay,
            second_relay: Some(second_relay),
            latency,
            probability: 0.0,
        }
    }

    pub fn hop_count(&self) -> usize {
        if self.second_relay.is_some() {
            2
        } else {
            1
        }
    }

    /// True when the path repeats a relay or passes through its entry or
    /// rendezvous as an intermediate hop.
    pub fn is_cyclic(&self, entry: NodeId) -> bool {
        if self.first_relay == self.rendezvous || self.first_relay == entry {
            return true;
        }
        match self.second_relay {
            Some(second) => second == self.first_relay || second == self.rendezvous || second == entry,
            None => false,
        }
    }
}
