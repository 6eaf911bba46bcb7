use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;

use teacorner::{
    event::{EventBus, RoundSubscription},
    round::RoundCoordinator,
    scores::{InMemoryScoreRepository, JsonFileScoreRepository, ScoreRepository},
};

use super::mocks::RecordingRenderer;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub coordinator: RoundCoordinator,
    pub scores: Arc<dyn ScoreRepository>,
    pub renderer: RecordingRenderer,
    pub score_path: Option<PathBuf>,
    pub _subscription_handle: JoinHandle<()>,
}

impl Drop for TestSetup {
    fn drop(&mut self) {
        self.coordinator.shutdown();
        if let Some(dir) = self.score_path.as_ref().and_then(|p| p.parent()) {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

pub struct TestSetupBuilder {
    scores: Option<Arc<dyn ScoreRepository>>,
    file_backed: bool,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            scores: None,
            file_backed: false,
        }
    }

    pub fn with_scores(mut self, scores: Arc<dyn ScoreRepository>) -> Self {
        self.scores = Some(scores);
        self
    }

    /// Persist scores to a fresh JSON file under the temp dir
    pub fn with_score_file(mut self) -> Self {
        self.file_backed = true;
        self
    }

    pub async fn build(self) -> TestSetup {
        let mut score_path = None;
        let scores: Arc<dyn ScoreRepository> = match (self.scores, self.file_backed) {
            (Some(scores), _) => scores,
            (None, true) => {
                let path = std::env::temp_dir()
                    .join(format!("teacorner-it-{}", uuid::Uuid::new_v4()))
                    .join("scores.json");
                score_path = Some(path.clone());
                Arc::new(JsonFileScoreRepository::open(path).await.unwrap())
            }
            (None, false) => Arc::new(InMemoryScoreRepository::new()),
        };

        let event_bus = EventBus::new();
        let coordinator = RoundCoordinator::new(scores.clone(), event_bus.clone());

        let renderer = RecordingRenderer::new();
        let subscription_handle =
            RoundSubscription::new(Arc::new(renderer.clone()), event_bus).start();

        TestSetup {
            coordinator,
            scores,
            renderer,
            score_path,
            _subscription_handle: subscription_handle,
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
