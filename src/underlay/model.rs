//! In-memory pairwise latency tables.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use super::dataset::DatasetError;

/// Dense node identifier in `[0, N)`
pub type NodeId = usize;

/// Latency in dataset units
pub type Latency = u64;

/// One `(nodeA, nodeB, latency)` row of an underlay dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnderlayLink {
    pub first: NodeId,
    pub second: NodeId,
    pub latency: Latency,
}

impl UnderlayLink {
    pub fn new(first: NodeId, second: NodeId, latency: Latency) -> Self {
        Self { first, second, latency }
    }
}

/// Symmetric distance table for every node, self-distance included
#[derive(Debug, Clone, Default)]
pub struct UnderlayModel {
    distances: Vec<BTreeMap<NodeId, Latency>>,
}

impl UnderlayModel {
    /// Builds the model from dataset rows.
    ///
    /// Node ids must be dense: every id in `[0, max id]` has to appear in at
    /// least one row, so the node count `max id + 1` never exceeds the number
    /// of distinct ids. Each row contributes both directions, and every node
    /// gets a zero-latency entry for itself.
    pub fn from_links(links: &[UnderlayLink]) -> Result<Self, DatasetError> {
        let ids: BTreeSet<NodeId> = links
            .iter()
            .flat_map(|link| [link.first, link.second])
            .collect();
        let max_id = *ids.iter().next_back().ok_or(DatasetError::Empty)?;
        if max_id >= ids.len() {
            return Err(DatasetError::SparseNodeIds {
                max_id,
                distinct: ids.len(),
            });
        }
        let node_count = ids.len();

        let mut distances: Vec<BTreeMap<NodeId, Latency>> = (0..node_count)
            .map(|id| BTreeMap::from([(id, 0)]))
            .collect();

        for link in links {
            if link.first == link.second {
                return Err(DatasetError::SelfLink { node: link.first });
            }
            for (from, to) in [(link.first, link.second), (link.second, link.first)] {
                match distances[from].entry(to) {
                    Entry::Vacant(slot) => {
                        slot.insert(link.latency);
                    }
                    Entry::Occupied(_) => {
                        return Err(DatasetError::DuplicateLink {
                            first: link.first,
                            second: link.second,
                        });
                    }
                }
            }
        }

        Ok(Self { distances })
    }

    /// Number of nodes, `max id + 1`
    pub fn node_count(&self) -> usize {
        self.distances.len()
    }

    /// True when every node knows its distance to every other node
    pub fn is_complete(&self) -> bool {
        let n = self.node_count();
        self.distances.iter().all(|table| table.len() == n)
    }

    /// Consumes the model, yielding one distance table per node in id order
    pub fn into_tables(self) -> Vec<BTreeMap<NodeId, Latency>> {
        self.distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<UnderlayLink> {
        vec![
            UnderlayLink::new(0, 1, 10),
            UnderlayLink::new(1, 2, 20),
            UnderlayLink::new(0, 2, 15),
        ]
    }

    #[test]
    fn test_symmetric_tables_with_self_entry() {
        let model = UnderlayModel::from_links(&triangle()).unwrap();
        assert_eq!(model.node_count(), 3);
        assert!(model.is_complete());

        let tables = model.into_tables();
        for a in 0..3 {
            assert_eq!(tables[a].get(&a), Some(&0));
            for b in 0..3 {
                assert_eq!(tables[a].get(&b), tables[b].get(&a));
            }
        }
        assert_eq!(tables[0].get(&1), Some(&10));
        assert_eq!(tables[2].get(&1), Some(&20));
        assert_eq!(tables[0].get(&3), None);
    }

    #[test]
    fn test_missing_pairs_leave_model_incomplete() {
        let links = [UnderlayLink::new(0, 1, 7), UnderlayLink::new(1, 2, 9)];
        let model = UnderlayModel::from_links(&links).unwrap();
        assert_eq!(model.node_count(), 3);
        assert!(!model.is_complete());

        let tables = model.into_tables();
        assert_eq!(tables[0].len(), 2);
        assert_eq!(tables[1].len(), 3);
        assert_eq!(tables[2].get(&0), None);
    }

    #[test]
    fn test_rejects_oversized_node_id() {
        let result = UnderlayModel::from_links(&[UnderlayLink::new(0, usize::MAX, 5)]);
        assert!(matches!(
            result,
            Err(DatasetError::SparseNodeIds { max_id: usize::MAX, distinct: 2 })
        ));

        let result = UnderlayModel::from_links(&[UnderlayLink::new(0, 4_000_000_000, 1)]);
        assert!(matches!(result, Err(DatasetError::SparseNodeIds { .. })));

        // Ids 1 and 4 leave 0, 2 and 3 without any row
        let result = UnderlayModel::from_links(&[UnderlayLink::new(4, 1, 7)]);
        assert!(matches!(result, Err(DatasetError::SparseNodeIds { max_id: 4, distinct: 2 })));
    }

    #[test]
    fn test_rejects_invalid_links() {
        assert!(matches!(UnderlayModel::from_links(&[]), Err(DatasetError::Empty)));

        let result = UnderlayModel::from_links(&[UnderlayLink::new(0, 0, 1)]);
        assert!(matches!(result, Err(DatasetError::SelfLink { node: 0 })));

        let result = UnderlayModel::from_links(&[
            UnderlayLink::new(0, 1, 10),
            UnderlayLink::new(1, 0, 12),
        ]);
        assert!(matches!(result, Err(DatasetError::DuplicateLink { .. })));
    }
}
