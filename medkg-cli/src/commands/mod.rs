//! Command implementations for the medkg CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod build;
pub mod check;
pub mod export;
pub mod properties;
pub mod stats;

use anyhow::Result;
use medkg_graph::KgBase;
use std::path::Path;

/// Open an existing graph database for reading.
pub(crate) fn open_existing(db: &Path) -> Result<KgBase> {
    if !db.exists() {
        anyhow::bail!(
            "No knowledge graph found at {}. Run `medkg build` first.",
            db.display()
        );
    }
    KgBase::open_read_only(db)
}
