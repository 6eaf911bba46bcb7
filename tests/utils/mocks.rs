use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{futures::Notified, Notify, RwLock};

use teacorner::{
    event::{RoundEvent, RoundEventError, RoundEventHandler},
    scores::{ScoreEntry, ScoreError, ScoreRepository},
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Stands in for the chat renderer: keeps every event it is handed
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    events: Arc<RwLock<Vec<RoundEvent>>>,
    notify: Arc<Notify>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<RoundEvent> {
        self.events.read().await.clone()
    }

    /// Resolves on the next event; registered as soon as it is created
    pub fn changed(&self) -> Notified<'_> {
        self.notify.notified()
    }
}

#[async_trait]
impl RoundEventHandler for RecordingRenderer {
    async fn handle_round_event(&self, event: RoundEvent) -> Result<(), RoundEventError> {
        self.events.write().await.push(event);
        self.notify.notify_waiters();
        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        "RecordingRenderer"
    }
}

/// Score store whose disk is always full
pub struct FailingScoreRepository;

#[async_trait]
impl ScoreRepository for FailingScoreRepository {
    async fn increment(&self, _user_id: &str) -> Result<u64, ScoreError> {
        Err(ScoreError::Persistence(std::io::Error::other("disk full")))
    }

    async fn read(&self, _user_id: &str) -> Result<u64, ScoreError> {
        Ok(0)
    }

    async fn top_n(&self, _n: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(Vec::new())
    }

    async fn entries(&self) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(Vec::new())
    }
}
