pub mod analyze;
pub mod export;

pub use analyze::AnalyzeService;
pub use export::ExportService;

#[cfg(test)]
pub(crate) mod stub {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use coastal_core::error::Result;
    use coastal_core::models::{
        CollectionQuery, ExportRequest, ImageRef, TaskState, TrainingSpec, VisParams,
    };
    use coastal_engine::{ImageryEngine, MapLayer, RemoteTaskId};

    /// In-memory engine for service tests: counts calls and replays a
    /// scripted sequence of task states.
    pub struct StubEngine {
        calls: AtomicUsize,
        states: Mutex<VecDeque<TaskState>>,
        default_state: TaskState,
        cancelled: AtomicBool,
    }

    impl StubEngine {
        pub fn new() -> Self {
            Self::with_states(vec![], TaskState::Active)
        }

        pub fn with_states(states: Vec<TaskState>, default_state: TaskState) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                states: Mutex::new(states.into()),
                default_state,
                cancelled: AtomicBool::new(false),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn was_cancelled(&self) -> bool {
            self.cancelled.load(Ordering::SeqCst)
        }

        fn record_call(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ImageryEngine for StubEngine {
        async fn authenticate(&self) -> Result<()> {
            Ok(())
        }

        async fn composite(&self, _query: &CollectionQuery) -> Result<ImageRef> {
            self.record_call();
            Ok(ImageRef::new("composite-1"))
        }

        async fn classify(&self, _image: &ImageRef, _training: &TrainingSpec) -> Result<ImageRef> {
            self.record_call();
            Ok(ImageRef::new("classified-1"))
        }

        async fn map_layer(
            &self,
            _image: &ImageRef,
            _vis: &VisParams,
            name: &str,
        ) -> Result<MapLayer> {
            self.record_call();
            Ok(MapLayer {
                tile_url: "https://tiles.example.com/{z}/{x}/{y}".to_string(),
                name: name.to_string(),
            })
        }

        async fn submit_export(&self, _request: &ExportRequest) -> Result<RemoteTaskId> {
            self.record_call();
            Ok(RemoteTaskId("task-1".to_string()))
        }

        async fn task_state(&self, _task: &RemoteTaskId) -> Result<TaskState> {
            let mut states = self.states.lock().unwrap();
            Ok(states.pop_front().unwrap_or(self.default_state))
        }

        async fn cancel_task(&self, _task: &RemoteTaskId) -> Result<()> {
            self.cancelled.store(true, Ordering::SeqCst);
            Ok(())
        }
    }
}
