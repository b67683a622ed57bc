//! JSON snapshot export of a parsed corpus.
//!
//! Writes one file per entity kind (sorted, deduplicated names) and one per
//! relation kind (triples in input order, duplicates kept).

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ExportError;
use crate::normalize::strip_filler;
use crate::schema::{EntityKind, RelationKind};
use crate::types::ParsedCorpus;

pub mod json;

/// One written snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedFile {
    pub path: PathBuf,
    /// Entity or relation label
    pub name: String,
    pub items: usize,
}

/// Result of an export run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub dir: PathBuf,
    pub files: Vec<ExportedFile>,
}

impl ExportSummary {
    pub fn total_items(&self) -> usize {
        self.files.iter().map(|f| f.items).sum()
    }
}

/// Entity names as exported: filler stripped, empties dropped, unique, sorted.
pub fn clean_entity_names(names: &[String]) -> Vec<&str> {
    names
        .iter()
        .map(|name| strip_filler(name))
        .filter(|name| !name.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Write every collection of `corpus` under `dir`, creating it if needed.
pub fn export_corpus(
    corpus: &ParsedCorpus,
    dir: impl AsRef<Path>,
) -> Result<ExportSummary, ExportError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut summary = ExportSummary {
        dir: dir.to_path_buf(),
        files: Vec::with_capacity(EntityKind::ALL.len() + RelationKind::ALL.len()),
    };

    for kind in EntityKind::ALL {
        let names = clean_entity_names(corpus.entities.get(kind));
        let path = dir.join(kind.export_file());
        write_file(&path, &names)?;
        summary.files.push(ExportedFile {
            path,
            name: kind.label().to_string(),
            items: names.len(),
        });
    }

    for kind in RelationKind::ALL {
        let triples = corpus.relations.get(kind);
        let path = dir.join(kind.export_file());
        write_file(&path, triples)?;
        summary.files.push(ExportedFile {
            path,
            name: kind.label().to_string(),
            items: triples.len(),
        });
    }

    info!(
        dir = %dir.display(),
        files = summary.files.len(),
        items = summary.total_items(),
        "Exported corpus"
    );
    Ok(summary)
}

fn write_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    let bytes = json::to_pretty_bytes(value)?;
    fs::write(path, &bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "Wrote export file");
    Ok(())
}
