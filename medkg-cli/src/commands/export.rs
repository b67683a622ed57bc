//! Export command - parse the corpus and write the JSON snapshot only

use anyhow::{Context, Result};
use medkg_core::exporter::{export_corpus, ExportSummary};
use medkg_core::parser;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::output::{Output, OutputConfig, OutputFormat, Outputter, TableOutput};

/// Result of an export run
#[derive(Debug, Serialize)]
pub struct ExportReport {
    pub input: PathBuf,
    pub records: usize,
    #[serde(flatten)]
    pub summary: ExportSummary,
}

impl Outputter for ExportReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let rows = self
            .summary
            .files
            .iter()
            .map(|f| {
                let file = f
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                vec![f.name.clone(), file, f.items.to_string()]
            })
            .collect();

        format!(
            "{} records from {} -> {}\n{}",
            self.records,
            self.input.display(),
            self.summary.dir.display(),
            TableOutput::grid(&["Collection", "File", "Items"], rows, &[2], config)
        )
    }
}

/// Run the export command
pub async fn run(input: &Path, out: &Path, format: OutputFormat) -> Result<()> {
    let corpus = parser::parse_file(input)
        .with_context(|| format!("Failed to parse {}", input.display()))?;
    let summary = export_corpus(&corpus, out)
        .with_context(|| format!("Failed to export to {}", out.display()))?;

    let report = ExportReport {
        input: input.to_path_buf(),
        records: corpus.record_count,
        summary,
    };
    Output::new(report, format).render()
}
