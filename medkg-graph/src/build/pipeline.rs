//! Build pipeline implementation.

use anyhow::{Context, Result};
use medkg_core::ParsedCorpus;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use super::persist::{persist_nodes, persist_properties, persist_relationships};
use super::progress::Progress;
use super::report::StageReport;
use super::task::PropertyTask;
use crate::storage::GraphStore;

/// Result of a build operation.
///
/// Node and relationship phases are complete when this is returned; disease
/// properties may still be in flight on `properties`.
pub struct BuildResult {
    pub nodes: StageReport,
    pub relationships: StageReport,
    pub properties: PropertyTask,
    /// Time spent in the node and relationship phases
    pub duration: Duration,
}

/// Pipeline for persisting a parsed corpus into a graph store.
#[derive(Clone)]
pub struct BuildPipeline {
    store: Arc<dyn GraphStore>,
    progress: Progress,
}

impl BuildPipeline {
    /// Create a new build pipeline.
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            store,
            progress: Progress::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    /// Persist `corpus`: nodes first, then relationships while the disease
    /// properties are set on a separate blocking task.
    pub async fn build(&self, corpus: Arc<ParsedCorpus>) -> Result<BuildResult> {
        let start = Instant::now();
        info!(
            records = corpus.record_count,
            entities = corpus.entities.total(),
            relations = corpus.relations.total(),
            "Starting build"
        );

        // 1. Nodes. Edges and properties both match on them.
        let nodes = {
            let store = Arc::clone(&self.store);
            let corpus = Arc::clone(&corpus);
            let progress = self.progress.clone();
            tokio::task::spawn_blocking(move || {
                persist_nodes(store.as_ref(), &corpus.entities, &progress)
            })
            .await
            .context("Node phase panicked")?
        };

        // 2. Properties touch only Disease nodes, edges touch only the edge
        // table, so the two phases run side by side.
        let properties = {
            let store = Arc::clone(&self.store);
            let corpus = Arc::clone(&corpus);
            let progress = self.progress.clone();
            PropertyTask::new(tokio::task::spawn_blocking(move || {
                persist_properties(store.as_ref(), &corpus.diseases, &progress)
            }))
        };

        // 3. Relationships
        let relationships = {
            let store = Arc::clone(&self.store);
            let corpus = Arc::clone(&corpus);
            let progress = self.progress.clone();
            tokio::task::spawn_blocking(move || {
                persist_relationships(store.as_ref(), &corpus.relations, &progress)
            })
            .await
            .context("Relationship phase panicked")?
        };

        let duration = start.elapsed();
        info!(
            nodes = nodes.written,
            edges = relationships.written,
            duration_ms = duration.as_millis() as u64,
            "Graph structure built"
        );

        Ok(BuildResult {
            nodes,
            relationships,
            properties,
            duration,
        })
    }
}
