//! Properties command - list nodes carrying a non-empty text property
//!
//! `medkg properties --kind Disease --key desc --format json` produces the
//! name/text pairs consumed by downstream embedding jobs.

use anyhow::Result;
use medkg_core::EntityKind;
use medkg_graph::GraphStore;
use serde::Serialize;
use std::path::Path;

use super::open_existing;
use crate::output::{truncate, Output, OutputConfig, OutputFormat, Outputter, TableOutput};

const PREVIEW_CHARS: usize = 60;

#[derive(Debug, Serialize)]
pub struct PropertyEntry {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct PropertyListing {
    pub kind: EntityKind,
    pub key: String,
    /// Matching nodes before `--limit` was applied
    pub total: usize,
    pub entries: Vec<PropertyEntry>,
}

impl Outputter for PropertyListing {
    fn to_table(&self, config: &OutputConfig) -> String {
        let rows = self
            .entries
            .iter()
            .map(|e| vec![e.name.clone(), truncate(&e.value, PREVIEW_CHARS)])
            .collect();
        let table = TableOutput::grid(&["Name", self.key.as_str()], rows, &[], config);
        format!(
            "{}\n{} of {} {} nodes with '{}'",
            table,
            self.entries.len(),
            self.total,
            self.kind,
            self.key
        )
    }
}

/// Query `store` for nodes of `kind` with a non-empty `key`, keeping at most `limit`.
pub fn collect(
    store: &dyn GraphStore,
    kind: EntityKind,
    key: &str,
    limit: Option<usize>,
) -> Result<PropertyListing> {
    let pairs = store.nodes_with_property(kind, key)?;
    let total = pairs.len();
    let entries = pairs
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|(name, value)| PropertyEntry { name, value })
        .collect();

    Ok(PropertyListing {
        kind,
        key: key.to_string(),
        total,
        entries,
    })
}

/// Run the properties command
pub async fn run(
    db: &Path,
    kind: EntityKind,
    key: &str,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let kgbase = open_existing(db)?;
    let listing = collect(&kgbase, kind, key, limit)?;
    Output::new(listing, format).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use medkg_core::PropertyMap;
    use medkg_core::PropertyValue;
    use medkg_graph::MemoryGraph;

    fn store() -> MemoryGraph {
        let graph = MemoryGraph::new();
        for (name, desc) in [("流感", "病毒感染"), ("肺炎", ""), ("感冒", "常见病")] {
            graph.upsert_node(EntityKind::Disease, name).unwrap();
            let mut props = PropertyMap::new();
            props.insert("desc".into(), PropertyValue::Text(desc.into()));
            graph.set_properties(EntityKind::Disease, name, &props).unwrap();
        }
        graph
    }

    #[test]
    fn test_collect_skips_empty_text() {
        let listing = collect(&store(), EntityKind::Disease, "desc", None).unwrap();
        assert_eq!(listing.total, 2);
        let names: Vec<_> = listing.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["感冒", "流感"]);
    }

    #[test]
    fn test_collect_limit() {
        let listing = collect(&store(), EntityKind::Disease, "desc", Some(1)).unwrap();
        assert_eq!(listing.total, 2);
        assert_eq!(listing.entries.len(), 1);
    }

    #[test]
    fn test_unknown_key() {
        let listing = collect(&store(), EntityKind::Disease, "cause", None).unwrap();
        assert_eq!(listing.total, 0);
        let config = OutputConfig {
            format: OutputFormat::Table,
            no_color: true,
        };
        assert!(listing.to_table(&config).starts_with("(no results)"));
    }
}
