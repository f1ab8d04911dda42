//! # MixOverlay - Mix network overlay construction for anonymity simulations
//!
//! This library derives a degree-bounded overlay ("mix network") from an
//! underlay latency graph and enumerates probabilistic forwarding paths
//! between every pair of mixes. The resulting tables feed a separate
//! anonymity network simulator.
//!
//! ## Overview
//!
//! One run processes one underlay dataset:
//!
//! 1. The dataset rows `nodeA nodeB latency` become an [`underlay::UnderlayModel`].
//! 2. The [`topology::TopologyBuilder`] links every mix to `k` neighbors,
//!    either uniformly at random or nearest-first, never exceeding a cap of
//!    `2 * log2(N)` neighbors.
//! 3. [`topology::balance`] pairs up mixes that are still under the cap
//!    until no pairing is possible.
//! 4. [`paths::enumerate_paths`] computes one- and two-hop paths from every
//!    mix to every rendezvous, in parallel, and assigns probabilities.
//! 5. [`output::ResultTables`] renders the topology, entry, rendezvous and
//!    path tables.
//!
//! ## Architecture
//!
//! - `config`: Type-safe configuration structures and YAML parsing
//! - `config_loader`: Configuration file loading and CLI overrides
//! - `underlay`: Dataset parsing and the pairwise latency model
//! - `topology`: Mix arena, overlay builder and degree balancer
//! - `paths`: Path enumeration and probability assignment
//! - `output`: Result table rendering and file naming
//! - `summary`: Degree statistics and per-run JSON summary
//! - `discovery`: Dataset file discovery
//! - `orchestrator`: Per-dataset and batch processing
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use mixoverlay::{config_loader, orchestrator};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("config.yaml"))?;
//! let report = orchestrator::run_all(&config)?;
//! println!("{} datasets processed", report.processed.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! general:
//!   data_path: "data"
//!   results_path: "results"
//!   seed: 42
//!
//! overlay:
//!   strategy: "Latency-aware"   # or Random
//!   initial_neighbor_count: 4
//!   latency_aware_neighbor_count: 2
//!
//! paths:
//!   strategy: "Random"          # or Latency-aware
//!   latency_threshold: 150000
//! ```
//!
//! ## Error Handling
//!
//! Module errors are `thiserror` enums; application-level functions return
//! `color_eyre::Result` with context attached.

pub mod config;
pub mod config_loader;
pub mod underlay;
pub mod topology;
pub mod paths;
pub mod output;
pub mod summary;
pub mod discovery;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod testing;
