//! Overlay topology module.
//!
//! This module holds the mix arena, the degree-capped builder and the
//! balancing pass that repairs under-degree mixes after construction.

pub mod types;
pub mod degree;
pub mod builder;
pub mod balancer;

// Re-export key types and functions for easier access
pub use types::{Mix, MixId, MixSet, OverlayStrategy};
pub use degree::degree_cap;
pub use builder::{BuildReport, TopologyBuilder};
pub use balancer::{balance, BalanceReport};
