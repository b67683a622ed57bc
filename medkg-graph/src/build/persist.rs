//! The three persistence phases: nodes, relationships, disease properties.
//!
//! Each phase keeps going after a failed write: the error is logged, counted
//! in the [`StageReport`] and the next item is processed.

use std::collections::BTreeSet;

use medkg_core::normalize::{normalize_name, normalize_text};
use medkg_core::{
    DiseaseRecord, EntityKind, EntityLists, PropertyMap, PropertyValue, RelationKind,
    RelationLists,
};
use tracing::{debug, info, warn};

use super::progress::Progress;
use super::report::StageReport;
use crate::storage::{EdgeOutcome, EdgeRef, GraphStore};

/// Create every entity as a node, one upsert per unique normalized name.
pub fn persist_nodes(
    store: &dyn GraphStore,
    entities: &EntityLists,
    progress: &Progress,
) -> StageReport {
    let mut report = StageReport::new("nodes");

    for kind in EntityKind::ALL {
        let names: BTreeSet<String> = entities
            .get(kind)
            .iter()
            .map(|name| normalize_name(name))
            .collect();
        if names.is_empty() {
            continue;
        }

        let bar = progress.stage(names.len(), format!("Creating {} nodes", kind));
        let mut stage = StageReport::new(kind.label());
        for name in &names {
            stage.attempted += 1;
            match store.upsert_node(kind, name) {
                Ok(true) => stage.written += 1,
                Ok(false) => stage.unchanged += 1,
                Err(e) => {
                    stage.failed += 1;
                    warn!(label = kind.label(), name = %name, "Failed to create node: {:#}", e);
                }
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        info!(
            label = kind.label(),
            unique = names.len(),
            created = stage.written,
            failed = stage.failed,
            "Created nodes"
        );
        report.absorb(&stage);
    }

    report
}

/// Merge every relationship triple as a directed edge.
pub fn persist_relationships(
    store: &dyn GraphStore,
    relations: &RelationLists,
    progress: &Progress,
) -> StageReport {
    let mut report = StageReport::new("relationships");

    for relation in RelationKind::ALL {
        let triples = relations.get(relation);
        if triples.is_empty() {
            continue;
        }

        let bar = progress.stage(triples.len(), format!("Creating {} edges", relation));
        let mut stage = StageReport::new(relation.label());
        for triple in triples {
            let source = normalize_name(&triple.source);
            let target = normalize_name(&triple.target);
            let edge = EdgeRef::new(relation, &source, &target);

            stage.attempted += 1;
            match store.upsert_edge(&edge) {
                Ok(EdgeOutcome::Created) => stage.written += 1,
                Ok(EdgeOutcome::Existing) => stage.unchanged += 1,
                Ok(EdgeOutcome::MissingEndpoint) => {
                    stage.skipped += 1;
                    debug!(
                        relation = relation.label(),
                        source = %source,
                        target = %target,
                        "Edge endpoint missing"
                    );
                }
                Err(e) => {
                    stage.failed += 1;
                    warn!(
                        relation = relation.label(),
                        source = %source,
                        target = %target,
                        "Failed to create relationship: {:#}",
                        e
                    );
                }
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        info!(
            relation = relation.label(),
            triples = triples.len(),
            created = stage.written,
            skipped = stage.skipped,
            failed = stage.failed,
            "Created relationships"
        );
        report.absorb(&stage);
    }

    report
}

/// Attach each disease record's properties to its node, in input order.
///
/// Later records for the same disease overwrite earlier ones key by key.
pub fn persist_properties(
    store: &dyn GraphStore,
    diseases: &[DiseaseRecord],
    progress: &Progress,
) -> StageReport {
    let mut report = StageReport::new("properties");
    let bar = progress.stage(diseases.len(), "Setting disease properties");

    for record in diseases {
        bar.inc(1);
        if record.properties.is_empty() {
            report.skipped += 1;
            continue;
        }

        let name = normalize_name(&record.name);
        let props = normalized_properties(&record.properties);
        report.attempted += 1;
        match store.set_properties(EntityKind::Disease, &name, &props) {
            Ok(true) => report.written += 1,
            Ok(false) => {
                report.skipped += 1;
                debug!(name = %name, "No disease node to attach properties to");
            }
            Err(e) => {
                report.failed += 1;
                warn!(label = "Disease", name = %name, "Failed to set properties: {:#}", e);
            }
        }
    }
    bar.finish_and_clear();

    info!(
        records = diseases.len(),
        written = report.written,
        skipped = report.skipped,
        failed = report.failed,
        "Set disease properties"
    );
    report
}

/// Text values lose `'` and newlines; list elements are kept as they are.
fn normalized_properties(props: &PropertyMap) -> PropertyMap {
    props
        .iter()
        .map(|(key, value)| {
            let value = match value {
                PropertyValue::Text(text) => PropertyValue::Text(normalize_text(text)),
                list @ PropertyValue::List(_) => list.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryGraph;
    use medkg_core::parser::parse_str;

    #[test]
    fn test_nodes_are_normalized_and_deduplicated() {
        let corpus =
            parse_str(r#"{"name":"流感","symptom":["发热","发热","头'痛","头痛"]}"#).unwrap();
        let graph = MemoryGraph::new();

        let report = persist_nodes(&graph, &corpus.entities, &Progress::hidden());
        assert_eq!(report.attempted, 3);
        assert_eq!(report.written, 3);
        assert!(graph.has_node(EntityKind::Symptom, "头痛"));
        assert!(!graph.has_node(EntityKind::Symptom, "头'痛"));
    }

    #[test]
    fn test_relationships_skip_missing_endpoints() {
        let corpus =
            parse_str(r#"{"name":"流感","symptom":["发热"],"acompany":["肺炎"]}"#).unwrap();
        let graph = MemoryGraph::new();
        graph.upsert_node(EntityKind::Disease, "流感").unwrap();
        graph.upsert_node(EntityKind::Symptom, "发热").unwrap();

        let report = persist_relationships(&graph, &corpus.relations, &Progress::hidden());
        assert_eq!(report.attempted, 2);
        assert_eq!(report.written, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_property_text_is_normalized() {
        let corpus =
            parse_str(r#"{"name":"流感","desc":"it's\nviral","cure_way":["休息'"]}"#).unwrap();
        let graph = MemoryGraph::new();
        graph.upsert_node(EntityKind::Disease, "流感").unwrap();

        let report = persist_properties(&graph, &corpus.diseases, &Progress::hidden());
        assert_eq!(report.written, 1);

        let node = graph.get_node(EntityKind::Disease, "流感").unwrap().unwrap();
        assert_eq!(node.text("desc"), Some("its viral"));
        assert_eq!(
            node.properties.get("cure_way"),
            Some(&PropertyValue::List(vec!["休息'".into()]))
        );
        assert_eq!(node.text("prevent"), Some(""));
    }

    #[test]
    fn test_empty_record_is_skipped() {
        let graph = MemoryGraph::new();
        graph.upsert_node(EntityKind::Disease, "流感").unwrap();
        let record = DiseaseRecord {
            name: "流感".into(),
            properties: PropertyMap::new(),
        };

        let report = persist_properties(&graph, &[record], &Progress::hidden());
        assert_eq!(report.attempted, 0);
        assert_eq!(report.skipped, 1);
    }
}
