//! Forwarding path enumeration.
//!
//! For every entry mix and every rendezvous candidate, one-hop paths are
//! preferred; two-hop paths are used when none exist or when the entry is
//! its own rendezvous. Probabilities come from the selection policy.

pub mod types;
pub mod selection;
pub mod enumerator;

pub use types::ForwardingPath;
pub use selection::SelectionPolicy;
pub use enumerator::{candidate_paths, enumerate_paths, paths_for_mix, EnumerationReport};
