//! medkg graph - storage and build pipeline for the medical knowledge graph.
//!
//! This library provides:
//! - Storage layer: the [`storage::GraphStore`] trait, a DuckDB store and an
//!   in-memory store
//! - Build pipeline: persists a `medkg_core::ParsedCorpus` with merge
//!   semantics, so re-running a build is safe

pub mod build;
pub mod storage;

pub use build::{BuildPipeline, BuildResult, Progress, PropertyTask, StageReport};
pub use storage::{EdgeOutcome, EdgeRef, GraphStats, GraphStore, KgBase, MemoryGraph, Node};
