//! Build command - parse the corpus, persist the graph and export a snapshot
//!
//! Order of work:
//! 1. Parse the whole corpus (fatal on any malformed line)
//! 2. Persist nodes, then relationships while disease properties are set
//! 3. Write the JSON snapshot
//! 4. Wait for the property task, record the build time and report

use anyhow::{Context, Result};
use colored::Colorize;
use medkg_core::exporter::{export_corpus, ExportSummary};
use medkg_core::parser;
use medkg_graph::{
    BuildPipeline, GraphStats, GraphStore, KgBase, MemoryGraph, Progress, StageReport,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::output::{Output, OutputConfig, OutputFormat, Outputter, TableOutput};

/// Resolved build settings.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub input: PathBuf,
    pub db: PathBuf,
    /// `None` skips the snapshot
    pub export_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub progress: bool,
}

/// Outcome of a build.
#[derive(Debug, Serialize)]
pub struct BuildReport {
    pub input: PathBuf,
    /// Database file, `None` for dry runs
    pub database: Option<PathBuf>,
    pub records: usize,
    pub nodes: StageReport,
    pub relationships: StageReport,
    pub properties: StageReport,
    pub export: Option<ExportSummary>,
    pub graph: GraphStats,
    pub duration_ms: u64,
}

impl BuildReport {
    fn stages(&self) -> [&StageReport; 3] {
        [&self.nodes, &self.relationships, &self.properties]
    }

    pub fn failed(&self) -> usize {
        self.stages().iter().map(|s| s.failed).sum()
    }
}

impl Outputter for BuildReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let database = match &self.database {
            Some(path) => path.display().to_string(),
            None => "(in-memory, dry run)".to_string(),
        };
        let export = match &self.export {
            Some(summary) => format!(
                "{} ({} files, {} items)",
                summary.dir.display(),
                summary.files.len(),
                summary.total_items()
            ),
            None => "skipped".to_string(),
        };

        let mut output = String::new();
        output.push_str(&TableOutput::key_values(
            &[
                ("Input", self.input.display().to_string()),
                ("Database", database),
                ("Records", self.records.to_string()),
                ("Snapshot", export),
                (
                    "Graph",
                    format!("{} nodes, {} edges", self.graph.node_count, self.graph.edge_count),
                ),
                ("Duration", format!("{} ms", self.duration_ms)),
            ],
            config,
        ));
        output.push('\n');

        let rows = self
            .stages()
            .iter()
            .map(|s| {
                vec![
                    s.label.clone(),
                    s.attempted.to_string(),
                    s.written.to_string(),
                    s.unchanged.to_string(),
                    s.skipped.to_string(),
                    s.failed.to_string(),
                ]
            })
            .collect();
        output.push_str(&TableOutput::grid(
            &["Stage", "Attempted", "Written", "Unchanged", "Skipped", "Failed"],
            rows,
            &[1, 2, 3, 4, 5],
            config,
        ));

        let failed = self.failed();
        if failed > 0 {
            let line = format!("{} writes failed; see warnings above", failed);
            output.push('\n');
            if config.use_colors() {
                output.push_str(&line.yellow().to_string());
            } else {
                output.push_str(&line);
            }
        }

        output
    }
}

/// Run the build command
pub async fn run(options: BuildOptions, format: OutputFormat) -> Result<()> {
    let start = Instant::now();

    let corpus = {
        let input = options.input.clone();
        tokio::task::spawn_blocking(move || parser::parse_file(&input))
            .await
            .context("Parser task panicked")?
            .with_context(|| format!("Failed to parse {}", options.input.display()))?
    };
    let corpus = Arc::new(corpus);

    let kgbase = if options.dry_run {
        None
    } else {
        Some(Arc::new(KgBase::open(&options.db)?))
    };
    let store: Arc<dyn GraphStore> = match &kgbase {
        Some(db) => db.clone(),
        None => {
            info!("Dry run: building into an in-memory graph");
            Arc::new(MemoryGraph::new())
        }
    };

    let pipeline = BuildPipeline::new(store).with_progress(Progress::new(options.progress));
    let result = pipeline.build(Arc::clone(&corpus)).await?;

    // The snapshot only needs the parsed corpus, so it is written while the
    // property task may still be running.
    let export = match &options.export_dir {
        Some(dir) => {
            let corpus = Arc::clone(&corpus);
            let dir = dir.clone();
            let summary = tokio::task::spawn_blocking(move || export_corpus(&corpus, &dir))
                .await
                .context("Export task panicked")??;
            info!(
                files = summary.files.len(),
                items = summary.total_items(),
                "Snapshot written to {}",
                summary.dir.display()
            );
            Some(summary)
        }
        None => None,
    };

    if !result.properties.is_finished() {
        info!("Waiting for disease properties");
    }
    let properties = result.properties.wait().await?;

    if let Some(db) = &kgbase {
        db.mark_build()?;
    }
    let graph = pipeline.store().stats()?;

    let report = BuildReport {
        input: options.input,
        database: kgbase.as_ref().map(|_| options.db),
        records: corpus.record_count,
        nodes: result.nodes,
        relationships: result.relationships,
        properties,
        export,
        graph,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    if report.failed() > 0 {
        warn!(failed = report.failed(), "Build finished with failed writes");
    }

    Output::new(report, format).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use tempfile::tempdir;

    const CORPUS: &str = r#"{"name":"流感","symptom":["发热","咳嗽"],"cure_department":["内科","呼吸内科"],"desc":"病毒感染"}
{"name":"感冒","drug_detail":["某药厂(感冒灵)"]}
"#;

    fn options(dir: &std::path::Path, dry_run: bool) -> BuildOptions {
        let input = dir.join("medical.json");
        std::fs::write(&input, CORPUS).unwrap();
        BuildOptions {
            input,
            db: dir.join("graph.duckdb"),
            export_dir: Some(dir.join("summary")),
            dry_run,
            progress: false,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_build_writes_database_and_snapshot() {
        let dir = tempdir().unwrap();
        let opts = options(dir.path(), false);
        run(opts.clone(), OutputFormat::Json).await.unwrap();

        assert!(opts.db.exists());
        assert!(dir.path().join("summary/diseases.json").exists());

        let db = KgBase::open_read_only(&opts.db).unwrap();
        let stats = db.stats().unwrap();
        // 2 diseases, 2 symptoms, 2 departments, 1 drug, 1 producer
        assert_eq!(stats.node_count, 8);
        assert_eq!(stats.edge_count, 5);
        assert!(stats.last_build_at.is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_dry_run_leaves_no_database() {
        let dir = tempdir().unwrap();
        let mut opts = options(dir.path(), true);
        opts.export_dir = None;
        run(opts.clone(), OutputFormat::Json).await.unwrap();

        assert!(!opts.db.exists());
        assert!(!dir.path().join("summary").exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_missing_input_fails() {
        let dir = tempdir().unwrap();
        let mut opts = options(dir.path(), true);
        opts.input = dir.path().join("absent.json");
        let err = run(opts, OutputFormat::Json).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_table_mentions_failures() {
        let report = BuildReport {
            input: PathBuf::from("medical.json"),
            database: None,
            records: 1,
            nodes: StageReport {
                failed: 2,
                ..StageReport::new("nodes")
            },
            relationships: StageReport::new("relationships"),
            properties: StageReport::new("properties"),
            export: None,
            graph: GraphStats::default(),
            duration_ms: 3,
        };
        let config = OutputConfig {
            format: OutputFormat::Table,
            no_color: true,
        };
        let table = report.to_table(&config);
        assert!(table.contains("dry run"));
        assert!(table.contains("2 writes failed"));
    }
}
