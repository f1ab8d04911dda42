//! Underlay latency model.
//!
//! The underlay is the fully known latency graph between all nodes of a
//! dataset. It is loaded once per run and never mutated afterwards.

pub mod dataset;
pub mod model;

pub use dataset::{load_dataset, parse_dataset, DatasetError};
pub use model::{Latency, NodeId, UnderlayLink, UnderlayModel};
