//! Check command - health check for a graph database
//!
//! Verifies:
//! - Database existence
//! - Connectivity
//! - Schema version compatibility
//! - Presence of a completed build

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use medkg_graph::storage::SCHEMA_VERSION;
use medkg_graph::KgBase;
use serde::Serialize;

use crate::output::{Output, OutputConfig, OutputFormat, Outputter};

/// Status of a health check item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckStatus {
    fn icon(&self, config: &OutputConfig) -> String {
        let icon = match self {
            CheckStatus::Ok => "[OK]",
            CheckStatus::Warning | CheckStatus::Error => "[!!]",
        };
        if !config.use_colors() {
            return icon.to_string();
        }
        match self {
            CheckStatus::Ok => icon.green().to_string(),
            CheckStatus::Warning => icon.yellow().to_string(),
            CheckStatus::Error => icon.red().to_string(),
        }
    }
}

/// A single health check item
#[derive(Debug, Clone, Serialize)]
pub struct CheckItem {
    pub status: CheckStatus,
    pub label: String,
    pub value: String,
}

impl CheckItem {
    fn ok(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Ok,
            label: label.into(),
            value: value.into(),
        }
    }

    fn warning(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Warning,
            label: label.into(),
            value: value.into(),
        }
    }

    fn error(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Error,
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Result of a health check
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub healthy: bool,
    pub checks: Vec<CheckItem>,
    pub recommendations: Vec<String>,
}

impl Outputter for CheckResult {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = String::new();

        let title = "medkg Health Check";
        if config.use_colors() {
            output.push_str(&format!("{}\n", title.cyan().bold()));
        } else {
            output.push_str(&format!("{}\n", title));
        }
        output.push_str(&format!("{}\n", "\u{2500}".repeat(40)));

        for check in &self.checks {
            output.push_str(&format!(
                "{} {}: {}\n",
                check.status.icon(config),
                check.label,
                check.value
            ));
        }

        if !self.recommendations.is_empty() {
            output.push_str("\nRecommendations:\n");
            for rec in &self.recommendations {
                output.push_str(&format!("  - {}\n", rec));
            }
        }

        output
    }
}

/// Get file size in human-readable format
fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Collect the check items for the database at `db`.
pub fn inspect(db: &Path) -> CheckResult {
    let mut checks = Vec::new();
    let mut recommendations = Vec::new();

    if !db.exists() {
        checks.push(CheckItem::error("Database exists", "not found"));
        recommendations.push("Build the graph: medkg build".to_string());
        return CheckResult {
            healthy: false,
            checks,
            recommendations,
        };
    }

    let size = std::fs::metadata(db).map(|m| m.len()).unwrap_or(0);
    checks.push(CheckItem::ok(
        "Database exists",
        format!("{} ({})", db.display(), format_file_size(size)),
    ));

    match KgBase::open_read_only(db).and_then(|kg| kg.check().map(|_| kg)) {
        Ok(kg) => {
            checks.push(CheckItem::ok("Connectivity", "ok"));

            match kg.schema_version() {
                Ok(Some(version)) if version == SCHEMA_VERSION => {
                    checks.push(CheckItem::ok("Schema version", format!("{} (current)", version)));
                }
                Ok(Some(version)) => {
                    checks.push(CheckItem::error(
                        "Schema version",
                        format!("{} (expected {})", version, SCHEMA_VERSION),
                    ));
                    recommendations.push(
                        "Rebuild into a fresh database: medkg build --db <new path>".to_string(),
                    );
                }
                Ok(None) => {
                    checks.push(CheckItem::error("Schema version", "missing"));
                    recommendations.push("Rebuild the graph: medkg build".to_string());
                }
                Err(e) => {
                    checks.push(CheckItem::error("Schema version", format!("unreadable: {:#}", e)));
                }
            }

            match kg.last_build_at() {
                Ok(Some(at)) => checks.push(CheckItem::ok("Last build", at)),
                Ok(None) => {
                    checks.push(CheckItem::warning("Last build", "never completed"));
                    recommendations.push("Build the graph: medkg build".to_string());
                }
                Err(e) => checks.push(CheckItem::warning("Last build", format!("{:#}", e))),
            }
        }
        Err(e) => {
            checks.push(CheckItem::error("Connectivity", format!("{:#}", e)));
        }
    }

    let healthy = checks.iter().all(|c| c.status != CheckStatus::Error);
    CheckResult {
        healthy,
        checks,
        recommendations,
    }
}

/// Run the check command
pub async fn run(db: &Path, format: OutputFormat) -> Result<()> {
    let result = inspect(db);
    let healthy = result.healthy;
    Output::new(result, format).render()?;
    if !healthy {
        anyhow::bail!("Health check failed for {}", db.display());
    }
    Ok(())
}
