use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use coastal_core::models::export::{EXPORT_FILE_PREFIX, EXPORT_FOLDER};
use coastal_core::models::{ExportId, ExportRequest, ImageRef, TaskState};
use coastal_engine::RemoteTaskId;

use crate::dto::ExportStartRequest;
use crate::error::ApiError;
use crate::services::analyze::parse_drawn_geometry;
use crate::state::AppState;

/// Service managing export jobs and their background polling tasks
pub struct ExportService;

impl ExportService {
    /// Submit an export to the engine and spawn its polling task.
    ///
    /// Returns immediately; progress is tracked through the job registry
    /// and surfaced by the status endpoint.
    pub async fn start(
        state: Arc<AppState>,
        request: &ExportStartRequest,
    ) -> Result<ExportId, ApiError> {
        let region = parse_drawn_geometry(&request.region)?;
        region.validate_analysis_region()?;

        let export = ExportRequest::classified(ImageRef::new(request.image.clone()), region);

        let task = state.engine.submit_export(&export).await.map_err(|e| {
            tracing::error!(error = %e, "Export submission failed");
            ApiError::from(e)
        })?;

        let id = ExportId::new();
        let cancel_rx = state.register_export(id).await;

        tracing::info!(export_id = %id, remote_task = %task.0, "Export submitted");

        tokio::spawn(Self::poll_task(state.clone(), id, task, cancel_rx));

        Ok(id)
    }

    /// Poll the remote task once per interval until it reaches a terminal
    /// state or cancellation is requested.
    async fn poll_task(
        state: Arc<AppState>,
        id: ExportId,
        task: RemoteTaskId,
        mut cancel: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(state.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval's first tick fires immediately, so the first probe
        // lands right after submission and the rest one interval apart

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let remote = match state.engine.task_state(&task).await {
                        Ok(remote) => remote,
                        Err(e) => {
                            tracing::error!(export_id = %id, error = %e, "Status probe failed");
                            state.set_export_state(id, TaskState::Failed, e.to_string()).await;
                            return;
                        }
                    };

                    let message = match remote {
                        TaskState::Completed => format!(
                            "Export complete! Download {}.tif from the {} folder.",
                            EXPORT_FILE_PREFIX, EXPORT_FOLDER
                        ),
                        TaskState::Failed => "Export failed on the imagery engine".to_string(),
                        TaskState::Cancelled => "Export cancelled".to_string(),
                        TaskState::Submitted | TaskState::Active => {
                            format!("Task status: {:?}...", remote)
                        }
                    };

                    tracing::info!(export_id = %id, state = ?remote, "Export task status");
                    state.record_poll(id, remote, message).await;

                    if remote.is_terminal() {
                        return;
                    }
                }
                changed = cancel.changed() => {
                    match changed {
                        Ok(()) if *cancel.borrow() => {
                            if let Err(e) = state.engine.cancel_task(&task).await {
                                tracing::error!(export_id = %id, error = %e, "Remote cancellation failed");
                            }
                            state
                                .set_export_state(id, TaskState::Cancelled, "Export cancelled by user")
                                .await;
                            return;
                        }
                        Ok(()) => {}
                        // Sender dropped: the job registry entry is gone
                        Err(_) => return,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::services::stub::StubEngine;

    fn region_json() -> serde_json::Value {
        serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[-80.2, 25.1], [-79.8, 25.1], [-79.8, 25.4], [-80.2, 25.4], [-80.2, 25.1]]]
        })
    }

    fn start_request() -> ExportStartRequest {
        ExportStartRequest {
            image: "classified-1".to_string(),
            region: Some(region_json()),
        }
    }

    async fn wait_for_terminal(state: &AppState, id: ExportId) -> coastal_core::models::ExportStatus {
        for _ in 0..100 {
            let status = state.export_status(id).await.unwrap();
            if status.state.is_terminal() {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("export never reached a terminal state");
    }

    #[tokio::test]
    async fn export_polls_until_completed_then_stops() {
        let engine = Arc::new(StubEngine::with_states(
            vec![TaskState::Active, TaskState::Active, TaskState::Completed],
            TaskState::Completed,
        ));
        let state = Arc::new(AppState::new(engine, Duration::from_millis(10)));

        let id = ExportService::start(state.clone(), &start_request()).await.unwrap();

        let status = wait_for_terminal(&state, id).await;
        assert_eq!(status.state, TaskState::Completed);
        assert_eq!(status.polls, 3);
        assert!(status.message.contains("coastal_classified"));

        // Polling stopped exactly at the terminal state
        tokio::time::sleep(Duration::from_millis(50)).await;
        let after = state.export_status(id).await.unwrap();
        assert_eq!(after.polls, 3);
    }

    #[tokio::test]
    async fn first_status_probe_happens_right_after_submission() {
        let engine = Arc::new(StubEngine::new());
        let state = Arc::new(AppState::new(engine, Duration::from_millis(50)));

        let id = ExportService::start(state.clone(), &start_request()).await.unwrap();

        // Well before one full poll interval has elapsed
        tokio::time::sleep(Duration::from_millis(20)).await;
        let status = state.export_status(id).await.unwrap();
        assert_eq!(status.polls, 1);
        assert_eq!(status.state, TaskState::Active);
    }

    #[tokio::test]
    async fn failed_export_is_distinguished_from_success() {
        let engine = Arc::new(StubEngine::with_states(
            vec![TaskState::Active, TaskState::Failed],
            TaskState::Failed,
        ));
        let state = Arc::new(AppState::new(engine, Duration::from_millis(10)));

        let id = ExportService::start(state.clone(), &start_request()).await.unwrap();

        let status = wait_for_terminal(&state, id).await;
        assert_eq!(status.state, TaskState::Failed);
        assert!(status.message.contains("failed"));
    }

    #[tokio::test]
    async fn cancellation_reaches_the_remote_task() {
        // Task never finishes on its own
        let engine = Arc::new(StubEngine::new());
        let state = Arc::new(AppState::new(engine.clone(), Duration::from_millis(10)));

        let id = ExportService::start(state.clone(), &start_request()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(25)).await;
        state.request_cancel(id).await.unwrap();

        let status = wait_for_terminal(&state, id).await;
        assert_eq!(status.state, TaskState::Cancelled);
        assert!(engine.was_cancelled());

        // A second cancel on a finished job is rejected
        assert!(state.request_cancel(id).await.is_err());
    }

    #[tokio::test]
    async fn export_without_region_is_rejected_before_submission() {
        let engine = Arc::new(StubEngine::new());
        let state = Arc::new(AppState::new(engine.clone(), Duration::from_millis(10)));

        let request = ExportStartRequest {
            image: "classified-1".to_string(),
            region: None,
        };

        let err = ExportService::start(state, &request).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_export_status_is_not_found() {
        let state = AppState::new(Arc::new(StubEngine::new()), Duration::from_millis(10));
        assert!(state.export_status(ExportId::new()).await.is_err());
    }
}
