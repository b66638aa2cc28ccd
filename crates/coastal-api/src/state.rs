use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{watch, RwLock};

use coastal_core::error::{CoastalError, Result};
use coastal_core::models::{ExportId, ExportStatus, TaskState};
use coastal_engine::ImageryEngine;

/// Application session state, constructed once at startup.
///
/// Holds the authenticated engine handle and the export-job registry.
pub struct AppState {
    pub engine: Arc<dyn ImageryEngine>,
    pub poll_interval: Duration,
    exports: RwLock<HashMap<ExportId, ExportJob>>,
}

struct ExportJob {
    status: ExportStatus,
    cancel: watch::Sender<bool>,
}

impl AppState {
    pub fn new(engine: Arc<dyn ImageryEngine>, poll_interval: Duration) -> Self {
        Self {
            engine,
            poll_interval,
            exports: RwLock::new(HashMap::new()),
        }
    }

    /// Register a freshly submitted export job and return its cancel
    /// signal receiver for the polling task
    pub async fn register_export(&self, id: ExportId) -> watch::Receiver<bool> {
        let (cancel, cancel_rx) = watch::channel(false);
        let job = ExportJob {
            status: ExportStatus::submitted(id),
            cancel,
        };
        self.exports.write().await.insert(id, job);
        cancel_rx
    }

    /// Snapshot of an export job's status
    pub async fn export_status(&self, id: ExportId) -> Result<ExportStatus> {
        self.exports
            .read()
            .await
            .get(&id)
            .map(|job| job.status.clone())
            .ok_or_else(|| CoastalError::ExportNotFound { id: id.to_string() })
    }

    /// Record a status probe result for an export job
    pub async fn record_poll(&self, id: ExportId, state: TaskState, message: impl Into<String>) {
        if let Some(job) = self.exports.write().await.get_mut(&id) {
            job.status.state = state;
            job.status.message = message.into();
            job.status.polls += 1;
            job.status.updated_at = Utc::now();
        }
    }

    /// Overwrite an export job's state without counting a probe
    pub async fn set_export_state(&self, id: ExportId, state: TaskState, message: impl Into<String>) {
        if let Some(job) = self.exports.write().await.get_mut(&id) {
            job.status.state = state;
            job.status.message = message.into();
            job.status.updated_at = Utc::now();
        }
    }

    /// Flag an export job for cancellation.
    ///
    /// The polling task observes the flag, asks the engine to cancel the
    /// remote task, and records the terminal state.
    pub async fn request_cancel(&self, id: ExportId) -> Result<()> {
        let exports = self.exports.read().await;
        let job = exports
            .get(&id)
            .ok_or_else(|| CoastalError::ExportNotFound { id: id.to_string() })?;

        if job.status.state.is_terminal() {
            return Err(CoastalError::ExportAlreadyFinished { id: id.to_string() });
        }

        // Receiver is held by the polling task for the job's lifetime
        let _ = job.cancel.send(true);
        Ok(())
    }
}
