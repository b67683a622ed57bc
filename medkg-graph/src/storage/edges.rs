//! Edge model and write references.

use medkg_core::{EntityKind, RelationKind};
use serde::{Deserialize, Serialize};

/// A directed edge between two nodes, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub relation: RelationKind,
    pub source: String,
    pub target: String,
}

/// An edge to merge. Endpoints are matched by name within their kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRef<'a> {
    pub relation: RelationKind,
    pub source_kind: EntityKind,
    pub source: &'a str,
    pub target_kind: EntityKind,
    pub target: &'a str,
}

impl<'a> EdgeRef<'a> {
    /// Edge whose endpoint kinds are the ones the relation declares.
    pub fn new(relation: RelationKind, source: &'a str, target: &'a str) -> Self {
        Self {
            relation,
            source_kind: relation.source_kind(),
            source,
            target_kind: relation.target_kind(),
            target,
        }
    }
}

/// What an edge upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// A new edge was written.
    Created,
    /// The edge was already present.
    Existing,
    /// Source or target node does not exist; nothing was written.
    MissingEndpoint,
}
