//! Result projection.
//!
//! Renders the finished mix set into the flat tables consumed by the
//! anonymity network simulator and decides where they are stored.

pub mod naming;
pub mod tables;

pub use naming::ResultLocation;
pub use tables::{write_all, ResultTables};
