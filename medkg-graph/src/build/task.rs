//! Handle to the background disease-property task.

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::debug;

use super::report::StageReport;

/// The property setter running on the blocking pool.
///
/// Dropping or [detaching](PropertyTask::detach) the handle does not stop the
/// task; its writes still land. Call [`PropertyTask::wait`] to know when they
/// have.
#[must_use = "wait() on the task or detach() it explicitly"]
pub struct PropertyTask {
    handle: JoinHandle<StageReport>,
}

impl PropertyTask {
    pub(crate) fn new(handle: JoinHandle<StageReport>) -> Self {
        Self { handle }
    }

    /// Wait for every property write to finish.
    pub async fn wait(self) -> Result<StageReport> {
        self.handle.await.context("Disease property task panicked")
    }

    /// Let the task finish on its own.
    pub fn detach(self) {
        debug!("Detached disease property task");
        drop(self.handle);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
