//! medkg configuration loading from `.medkgrc.toml`.
//!
//! Configuration is optional. Command-line flags and `MEDKG_*` environment
//! variables override anything set here, and built-in defaults fill the rest.
//!
//! # Example Configuration
//!
//! ```toml
//! [input]
//! path = "data/medical.json"
//!
//! [store]
//! path = "data/medkg.duckdb"
//!
//! [export]
//! dir = "data/summary"
//! enabled = true
//!
//! [build]
//! progress = true
//!
//! [output]
//! format = "table"
//! color = true
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".medkgrc.toml";

pub const DEFAULT_INPUT: &str = "data/medical.json";
pub const DEFAULT_DB: &str = "data/medkg.duckdb";
pub const DEFAULT_EXPORT_DIR: &str = "data/summary";

/// Root configuration structure loaded from `.medkgrc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct MedkgConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub build: BuildConfig,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Corpus location.
#[derive(Debug, Deserialize, Default)]
pub struct InputConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Graph database location.
#[derive(Debug, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// JSON snapshot settings.
#[derive(Debug, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Whether `medkg build` also writes the snapshot.
    ///
    /// Default: `true`
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: None,
            enabled: true,
        }
    }
}

/// Build settings.
#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    /// Show progress bars on stderr.
    ///
    /// Default: `true`
    #[serde(default = "default_true")]
    pub progress: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { progress: true }
    }
}

/// Output formatting preferences.
///
/// `--format` overrides `format`.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Valid values: `table`, `json`
    #[serde(default)]
    pub format: Option<String>,

    /// Defaults to auto-detection when unset.
    #[serde(default)]
    pub color: Option<bool>,
}

fn default_true() -> bool {
    true
}

impl MedkgConfig {
    /// Load configuration from `.medkgrc.toml` in the given directory.
    ///
    /// A missing file yields defaults. Read or parse errors are logged as
    /// warnings and also yield defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    /// Corpus path: flag/env value, then config, then the default.
    pub fn input_path(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.input.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT))
    }

    pub fn db_path(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.store.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB))
    }

    pub fn export_dir(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.export.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR))
    }

    pub fn export_enabled(&self) -> bool {
        self.export.enabled
    }

    pub fn progress_enabled(&self) -> bool {
        self.build.progress
    }

    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}
