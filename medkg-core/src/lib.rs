//! medkg core - data model, record parsing and JSON snapshots.
//!
//! This crate turns a line-delimited JSON corpus of disease records into a
//! [`ParsedCorpus`]: typed entity lists, typed relationship triples and the
//! per-disease property records. It knows nothing about graph stores; the
//! `medkg-graph` crate persists what is parsed here.
//!
//! # Features
//!
//! - **Record parsing**: tolerant of missing optional fields, fatal on
//!   malformed lines or records without a disease name
//! - **Drug detail splitting**: `"producer(drug)"` strings become producer and
//!   drug entities plus a `production` relationship
//! - **Name normalization**: the identity rules shared by every store
//! - **JSON export**: one pretty-printed file per entity and relation type
//!
//! # Usage
//!
//! ```no_run
//! use medkg_core::{exporter, parser};
//!
//! let corpus = parser::parse_file("data/medical.json")?;
//! let summary = exporter::export_corpus(&corpus, "data/summary")?;
//! println!("wrote {} files", summary.files.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod exporter;
pub mod normalize;
pub mod parser;
pub mod schema;
pub mod types;

pub use error::{ExportError, ParseError};
pub use schema::{DiseaseProperty, EntityKind, RelationKind};
pub use types::{
    DiseaseRecord, EntityLists, ParsedCorpus, PropertyMap, PropertyValue, RelationLists, Triple,
};
