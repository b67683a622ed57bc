//! Stats command - node and edge counts of a built graph

use anyhow::Result;
use medkg_graph::{GraphStats, GraphStore};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::open_existing;
use crate::output::{Output, OutputConfig, OutputFormat, Outputter, TableOutput};

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub database: PathBuf,
    #[serde(flatten)]
    pub stats: GraphStats,
}

fn count_rows(counts: &BTreeMap<String, usize>) -> Vec<Vec<String>> {
    counts
        .iter()
        .map(|(name, count)| vec![name.clone(), count.to_string()])
        .collect()
}

impl Outputter for StatsReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let summary = TableOutput::key_values(
            &[
                ("Database", self.database.display().to_string()),
                ("Nodes", self.stats.node_count.to_string()),
                ("Edges", self.stats.edge_count.to_string()),
                (
                    "Last build",
                    self.stats
                        .last_build_at
                        .clone()
                        .unwrap_or_else(|| "never".to_string()),
                ),
            ],
            config,
        );
        let labels = TableOutput::grid(
            &["Label", "Nodes"],
            count_rows(&self.stats.label_counts),
            &[1],
            config,
        );
        let relations = TableOutput::grid(
            &["Relation", "Edges"],
            count_rows(&self.stats.relation_counts),
            &[1],
            config,
        );
        format!("{}\n{}\n{}", summary, labels, relations)
    }
}

/// Run the stats command
pub async fn run(db: &Path, format: OutputFormat) -> Result<()> {
    let kgbase = open_existing(db)?;
    let report = StatsReport {
        database: db.to_path_buf(),
        stats: kgbase.stats()?,
    };
    Output::new(report, format).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_database() {
        let dir = tempdir().unwrap();
        let err = run(&dir.path().join("none.duckdb"), OutputFormat::Json)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("medkg build"));
    }

    #[test]
    fn test_table_lists_counts() {
        let mut stats = GraphStats {
            node_count: 3,
            edge_count: 1,
            ..Default::default()
        };
        stats.label_counts.insert("Disease".into(), 1);
        stats.label_counts.insert("Symptom".into(), 2);
        stats.relation_counts.insert("has_symptom".into(), 1);

        let report = StatsReport {
            database: PathBuf::from("graph.duckdb"),
            stats,
        };
        let config = OutputConfig {
            format: OutputFormat::Table,
            no_color: true,
        };
        let table = report.to_table(&config);
        assert!(table.contains("never"));
        assert!(table.contains("Symptom"));
        assert!(table.contains("has_symptom"));
    }
}
