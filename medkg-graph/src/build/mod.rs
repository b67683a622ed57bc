//! Build pipeline for materializing a parsed corpus as a graph.
//!
//! Orchestrates:
//! 1. Creating one node per unique entity name
//! 2. Setting disease properties (background task)
//! 3. Merging relationship edges, alongside step 2

mod persist;
mod pipeline;
mod progress;
mod report;
mod task;

pub use persist::{persist_nodes, persist_properties, persist_relationships};
pub use pipeline::{BuildPipeline, BuildResult};
pub use progress::Progress;
pub use report::StageReport;
pub use task::PropertyTask;
