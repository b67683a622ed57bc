//! Storage layer for the knowledge graph.
//!
//! Provides:
//! - The [`GraphStore`] trait every backend implements
//! - [`KgBase`], the DuckDB-backed persistent store
//! - [`MemoryGraph`], an in-process store for dry runs and tests

use anyhow::Result;
use medkg_core::{EntityKind, PropertyMap, RelationKind};
use serde::Serialize;
use std::collections::BTreeMap;

mod edges;
mod kgbase;
mod memory;
mod nodes;
mod schema;

pub use edges::{Edge, EdgeOutcome, EdgeRef};
pub use kgbase::{AccessMode, KgBase};
pub use memory::MemoryGraph;
pub use nodes::Node;
pub use schema::{SCHEMA_SQL, SCHEMA_VERSION};

/// Typed write and lookup operations on a property graph.
///
/// Every write is idempotent: repeating it leaves the graph unchanged.
/// Names are expected to be normalized already (see
/// `medkg_core::normalize`).
pub trait GraphStore: Send + Sync {
    /// Create the node if absent. Returns `true` when it was created.
    fn upsert_node(&self, kind: EntityKind, name: &str) -> Result<bool>;

    /// Merge a directed edge between two existing nodes.
    fn upsert_edge(&self, edge: &EdgeRef<'_>) -> Result<EdgeOutcome>;

    /// Merge `props` into the node's properties, overwriting existing keys.
    /// Returns `false` when no node matched.
    fn set_properties(&self, kind: EntityKind, name: &str, props: &PropertyMap) -> Result<bool>;

    /// All `(name, text)` pairs of `kind` whose `key` property is non-empty
    /// text, ordered by name.
    fn nodes_with_property(&self, kind: EntityKind, key: &str) -> Result<Vec<(String, String)>>;

    fn get_node(&self, kind: EntityKind, name: &str) -> Result<Option<Node>>;

    /// Edges carrying `relation`, ordered by source then target.
    fn edges(&self, relation: RelationKind) -> Result<Vec<Edge>>;

    fn stats(&self) -> Result<GraphStats>;
}

/// Statistics about the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Node count per label
    pub label_counts: BTreeMap<String, usize>,
    /// Edge count per relation
    pub relation_counts: BTreeMap<String, usize>,
    pub last_build_at: Option<String>,
}
