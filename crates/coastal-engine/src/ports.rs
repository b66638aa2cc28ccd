//! Imagery engine port definitions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use coastal_core::error::Result;
use coastal_core::models::{
    CollectionQuery, ExportRequest, ImageRef, TaskState, TrainingSpec, VisParams,
};

/// Identifier of a task on the remote engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteTaskId(pub String);

/// A rendered map layer served by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapLayer {
    /// XYZ tile URL template for the rendered image
    pub tile_url: String,
    pub name: String,
}

/// Port for the remote geospatial processing service.
///
/// All heavy computation (masking, compositing, training, classification,
/// rendering, export) happens behind this trait; nothing is materialized
/// locally.
#[async_trait]
pub trait ImageryEngine: Send + Sync {
    /// Verify project credentials. Callers are expected to fail closed
    /// when this errors at startup.
    async fn authenticate(&self) -> Result<()>;

    /// Evaluate a filtered, cloud-masked collection query into a single
    /// composited image
    async fn composite(&self, query: &CollectionQuery) -> Result<ImageRef>;

    /// Train the classifier described by `training` and apply it to the
    /// given composite
    async fn classify(&self, image: &ImageRef, training: &TrainingSpec) -> Result<ImageRef>;

    /// Render an image with visualization parameters into a tile layer
    async fn map_layer(&self, image: &ImageRef, vis: &VisParams, name: &str) -> Result<MapLayer>;

    /// Submit an export job for remote execution
    async fn submit_export(&self, request: &ExportRequest) -> Result<RemoteTaskId>;

    /// Probe the current state of a remote task
    async fn task_state(&self, task: &RemoteTaskId) -> Result<TaskState>;

    /// Request cancellation of a remote task
    async fn cancel_task(&self, task: &RemoteTaskId) -> Result<()>;
}
