//! HTTP adapter for the remote imagery engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use coastal_core::error::{CoastalError, Result};
use coastal_core::models::{
    CollectionQuery, ExportRequest, ImageRef, TaskState, TrainingSpec, VisParams,
};

use crate::ports::{ImageryEngine, MapLayer, RemoteTaskId};

/// Engine client over the project-scoped REST API
pub struct EngineClient {
    /// Base URL for the engine API (e.g., "https://earthengine.example.com")
    base_url: String,

    /// Project identifier the session is scoped to
    project: String,

    /// HTTP client
    client: reqwest::Client,
}

impl EngineClient {
    pub fn new(base_url: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            project: project.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/projects/{}/{}", self.base_url, self.project, path)
    }

    fn unavailable(&self, err: reqwest::Error) -> CoastalError {
        CoastalError::EngineUnavailable {
            reason: format!("Failed to reach imagery engine: {}", err),
            remediation: format!(
                "Ensure the engine is reachable at {} and the project '{}' exists",
                self.base_url, self.project
            ),
        }
    }

    async fn fault(operation: &str, response: reqwest::Response) -> CoastalError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        CoastalError::RemoteFault {
            operation: operation.to_string(),
            message: format!("engine returned {}: {}", status, body),
        }
    }

    /// POST a JSON body and decode a JSON response, mapping transport,
    /// auth, and remote faults to typed errors.
    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(CoastalError::AuthenticationFailed {
                project: self.project.clone(),
                reason: format!("engine rejected credentials ({})", response.status()),
            });
        }

        if !response.status().is_success() {
            return Err(Self::fault(operation, response).await);
        }

        response
            .json()
            .await
            .map_err(|e| CoastalError::Serialization(format!("{} response: {}", operation, e)))
    }
}

#[async_trait]
impl ImageryEngine for EngineClient {
    async fn authenticate(&self) -> Result<()> {
        let response = self
            .client
            .get(self.url("session"))
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(CoastalError::AuthenticationFailed {
                project: self.project.clone(),
                reason: format!("engine returned {} for session check", status),
            });
        }

        Ok(())
    }

    async fn composite(&self, query: &CollectionQuery) -> Result<ImageRef> {
        let response: ImageResponse =
            self.post_json("composite", "images:composite", query).await?;
        Ok(ImageRef::new(response.image_id))
    }

    async fn classify(&self, image: &ImageRef, training: &TrainingSpec) -> Result<ImageRef> {
        let request = ClassifyRequest {
            image_id: image.0.clone(),
            training,
        };

        let response: ImageResponse = self
            .post_json("classify", "images:classify", &request)
            .await
            .map_err(|e| match e {
                // Train/apply failures abort the analysis with no partial result
                CoastalError::RemoteFault { message, .. } => {
                    CoastalError::ClassificationFailed { reason: message }
                }
                other => other,
            })?;

        Ok(ImageRef::new(response.image_id))
    }

    async fn map_layer(&self, image: &ImageRef, vis: &VisParams, name: &str) -> Result<MapLayer> {
        let request = RenderRequest {
            image_id: image.0.clone(),
            vis,
            name,
        };

        let response: RenderResponse = self.post_json("render", "maps", &request).await?;

        Ok(MapLayer {
            tile_url: response.tile_url,
            name: name.to_string(),
        })
    }

    async fn submit_export(&self, request: &ExportRequest) -> Result<RemoteTaskId> {
        let response: ExportSubmitResponse =
            self.post_json("export", "exports", request).await?;
        Ok(RemoteTaskId(response.task_id))
    }

    async fn task_state(&self, task: &RemoteTaskId) -> Result<TaskState> {
        let response = self
            .client
            .get(self.url(&format!("exports/{}", task.0)))
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        if !response.status().is_success() {
            return Err(Self::fault("task status", response).await);
        }

        let status: TaskStatusResponse = response
            .json()
            .await
            .map_err(|e| CoastalError::Serialization(format!("task status response: {}", e)))?;

        parse_task_state(&status.state)
    }

    async fn cancel_task(&self, task: &RemoteTaskId) -> Result<()> {
        let _: CancelResponse = self
            .post_json("cancel", &format!("exports/{}:cancel", task.0), &())
            .await?;
        Ok(())
    }
}

fn parse_task_state(state: &str) -> Result<TaskState> {
    match state.to_ascii_uppercase().as_str() {
        "SUBMITTED" | "READY" | "PENDING" => Ok(TaskState::Submitted),
        "ACTIVE" | "RUNNING" => Ok(TaskState::Active),
        "COMPLETED" | "SUCCEEDED" => Ok(TaskState::Completed),
        "FAILED" => Ok(TaskState::Failed),
        "CANCELLED" | "CANCELED" => Ok(TaskState::Cancelled),
        other => Err(CoastalError::RemoteFault {
            operation: "task status".to_string(),
            message: format!("unknown task state '{}'", other),
        }),
    }
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    image_id: String,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    image_id: String,
    training: &'a TrainingSpec,
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    image_id: String,
    vis: &'a VisParams,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct RenderResponse {
    tile_url: String,
}

#[derive(Debug, Deserialize)]
struct ExportSubmitResponse {
    task_id: String,
}

#[derive(Debug, Deserialize)]
struct TaskStatusResponse {
    state: String,
}

#[derive(Debug, Deserialize)]
struct CancelResponse {
    #[allow(dead_code)]
    cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_urls_are_project_scoped() {
        let client = EngineClient::new("https://engine.example.com", "coastal-analysis-2k25");
        assert_eq!(
            client.url("images:composite"),
            "https://engine.example.com/v1/projects/coastal-analysis-2k25/images:composite"
        );
    }

    #[test]
    fn test_parse_task_state_variants() {
        assert_eq!(parse_task_state("ACTIVE").unwrap(), TaskState::Active);
        assert_eq!(parse_task_state("running").unwrap(), TaskState::Active);
        assert_eq!(parse_task_state("COMPLETED").unwrap(), TaskState::Completed);
        assert_eq!(parse_task_state("FAILED").unwrap(), TaskState::Failed);
        assert_eq!(parse_task_state("CANCELLED").unwrap(), TaskState::Cancelled);
        assert!(parse_task_state("EXPLODED").is_err());
    }
}
