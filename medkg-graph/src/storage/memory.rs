//! In-memory graph store.

use anyhow::Result;
use medkg_core::{EntityKind, PropertyMap, RelationKind};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::edges::{Edge, EdgeOutcome, EdgeRef};
use super::nodes::Node;
use super::{GraphStats, GraphStore};

#[derive(Default)]
struct Inner {
    nodes: HashMap<(EntityKind, String), Node>,
    /// (relation, source kind, source, target kind, target)
    edges: BTreeSet<(RelationKind, EntityKind, String, EntityKind, String)>,
}

/// Graph store held entirely in process memory.
///
/// Same merge semantics as [`super::KgBase`]; nothing is persisted.
#[derive(Default)]
pub struct MemoryGraph {
    inner: RwLock<Inner>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.read().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.read().edges.len()
    }

    pub fn has_node(&self, kind: EntityKind, name: &str) -> bool {
        self.read().nodes.contains_key(&(kind, name.to_string()))
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| {
            tracing::warn!("Recovering from poisoned graph lock");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| {
            tracing::warn!("Recovering from poisoned graph lock");
            poisoned.into_inner()
        })
    }
}

impl GraphStore for MemoryGraph {
    fn upsert_node(&self, kind: EntityKind, name: &str) -> Result<bool> {
        let mut inner = self.write();
        let key = (kind, name.to_string());
        if inner.nodes.contains_key(&key) {
            return Ok(false);
        }
        inner.nodes.insert(key, Node::new(kind, name));
        Ok(true)
    }

    fn upsert_edge(&self, edge: &EdgeRef<'_>) -> Result<EdgeOutcome> {
        let mut inner = self.write();
        let has_source = inner
            .nodes
            .contains_key(&(edge.source_kind, edge.source.to_string()));
        let has_target = inner
            .nodes
            .contains_key(&(edge.target_kind, edge.target.to_string()));
        if !has_source || !has_target {
            return Ok(EdgeOutcome::MissingEndpoint);
        }

        let inserted = inner.edges.insert((
            edge.relation,
            edge.source_kind,
            edge.source.to_string(),
            edge.target_kind,
            edge.target.to_string(),
        ));
        Ok(if inserted {
            EdgeOutcome::Created
        } else {
            EdgeOutcome::Existing
        })
    }

    fn set_properties(&self, kind: EntityKind, name: &str, props: &PropertyMap) -> Result<bool> {
        let mut inner = self.write();
        match inner.nodes.get_mut(&(kind, name.to_string())) {
            Some(node) => {
                node.merge_properties(props);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn nodes_with_property(&self, kind: EntityKind, key: &str) -> Result<Vec<(String, String)>> {
        let inner = self.read();
        let mut out: Vec<(String, String)> = inner
            .nodes
            .values()
            .filter(|node| node.kind == kind)
            .filter_map(|node| {
                node.non_empty_text(key)
                    .map(|text| (node.name.clone(), text.to_string()))
            })
            .collect();
        out.sort();
        Ok(out)
    }

    fn get_node(&self, kind: EntityKind, name: &str) -> Result<Option<Node>> {
        Ok(self.read().nodes.get(&(kind, name.to_string())).cloned())
    }

    fn edges(&self, relation: RelationKind) -> Result<Vec<Edge>> {
        let inner = self.read();
        let mut edges: Vec<Edge> = inner
            .edges
            .iter()
            .filter(|(r, ..)| *r == relation)
            .map(|(_, _, source, _, target)| Edge {
                relation,
                source: source.clone(),
                target: target.clone(),
            })
            .collect();
        edges.sort();
        Ok(edges)
    }

    fn stats(&self) -> Result<GraphStats> {
        let inner = self.read();

        let mut label_counts = BTreeMap::new();
        for (kind, _) in inner.nodes.keys() {
            *label_counts.entry(kind.label().to_string()).or_insert(0) += 1;
        }
        let mut relation_counts = BTreeMap::new();
        for (relation, ..) in &inner.edges {
            *relation_counts
                .entry(relation.label().to_string())
                .or_insert(0) += 1;
        }

        Ok(GraphStats {
            node_count: inner.nodes.len(),
            edge_count: inner.edges.len(),
            label_counts,
            relation_counts,
            last_build_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medkg_core::PropertyValue;

    #[test]
    fn test_memory_graph_merge_semantics() {
        let graph = MemoryGraph::new();
        assert!(graph.upsert_node(EntityKind::Department, "内科").unwrap());
        assert!(graph.upsert_node(EntityKind::Department, "呼吸内科").unwrap());
        assert!(!graph.upsert_node(EntityKind::Department, "内科").unwrap());

        let edge = EdgeRef::new(RelationKind::BelongsTo, "呼吸内科", "内科");
        assert_eq!(graph.upsert_edge(&edge).unwrap(), EdgeOutcome::Created);
        assert_eq!(graph.upsert_edge(&edge).unwrap(), EdgeOutcome::Existing);
        let dangling = EdgeRef::new(RelationKind::CureDepartment, "流感", "内科");
        assert_eq!(graph.upsert_edge(&dangling).unwrap(), EdgeOutcome::MissingEndpoint);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_node(EntityKind::Department, "内科"));
        assert!(!graph.has_node(EntityKind::Disease, "内科"));

        let stats = graph.stats().unwrap();
        assert_eq!(stats.label_counts.get("Department"), Some(&2));
        assert_eq!(stats.relation_counts.get("belongs_to"), Some(&1));
    }

    #[test]
    fn test_memory_graph_properties() {
        let graph = MemoryGraph::new();
        graph.upsert_node(EntityKind::Disease, "流感").unwrap();

        let mut props = PropertyMap::new();
        props.insert("desc".into(), PropertyValue::Text("急性呼吸道感染".into()));
        assert!(graph.set_properties(EntityKind::Disease, "流感", &props).unwrap());
        assert!(!graph.set_properties(EntityKind::Disease, "感冒", &props).unwrap());

        assert_eq!(
            graph.nodes_with_property(EntityKind::Disease, "desc").unwrap(),
            vec![("流感".to_string(), "急性呼吸道感染".to_string())]
        );
        assert!(graph
            .nodes_with_property(EntityKind::Symptom, "desc")
            .unwrap()
            .is_empty());
    }
}
