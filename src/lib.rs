//! Aggregation and core extraction for period snapshots of a co-authorship
//! network.
//!
//! Snapshots are loaded from a directory ([`loader`]), unioned into one
//! aggregate network ([`aggregate`]), reduced to the subgraph of its most
//! connected authors ([`core_extract`]) and examined around a single author
//! ([`ego`]). [`pipeline::run`] chains the stages.

pub mod aggregate;
pub mod config;
pub mod core_extract;
pub mod degree_table;
pub mod ego;
pub mod error;
pub mod export;
pub mod graph;
pub mod loader;
pub mod metrics;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::{NetworkError, Result};
pub use graph::Network;
pub use pipeline::{run, Analysis, PipelineReport};
