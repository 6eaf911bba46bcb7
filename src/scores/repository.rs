use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

use super::{
    models::{ScoreBoard, ScoreEntry, ScoreFile},
    ScoreError,
};

#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Adds one point to `user_id` and returns the new total
    async fn increment(&self, user_id: &str) -> Result<u64, ScoreError>;
    /// Current points, 0 when the user has never scored
    async fn read(&self, user_id: &str) -> Result<u64, ScoreError>;
    /// The `n` highest scores, descending; ties keep insertion order
    async fn top_n(&self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError>;
    async fn entries(&self) -> Result<Vec<ScoreEntry>, ScoreError>;
}

/// Score store without persistence, for tests and throwaway runs
#[derive(Debug, Default)]
pub struct InMemoryScoreRepository {
    board: Mutex<ScoreBoard>,
}

impl InMemoryScoreRepository {
    pub fn new() -> Self {
        Self {
            board: Mutex::new(ScoreBoard::new()),
        }
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    async fn increment(&self, user_id: &str) -> Result<u64, ScoreError> {
        let mut board = self.board.lock().await;
        Ok(board.increment(user_id))
    }

    async fn read(&self, user_id: &str) -> Result<u64, ScoreError> {
        Ok(self.board.lock().await.read(user_id))
    }

    async fn top_n(&self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(self.board.lock().await.top_n(n))
    }

    async fn entries(&self) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(self.board.lock().await.entries().to_vec())
    }
}

/// Score store backed by a JSON file.
///
/// The file is read once at start and rewritten in full after every
/// mutation. Mutations hold the board lock across the write, so credits are
/// applied and persisted one at a time and never lose each other's updates.
#[derive(Debug)]
pub struct JsonFileScoreRepository {
    path: PathBuf,
    board: Mutex<ScoreBoard>,
}

impl JsonFileScoreRepository {
    /// Loads the store from `path`; a missing file starts an empty store
    #[instrument]
    pub async fn open(path: impl Into<PathBuf> + std::fmt::Debug) -> Result<Self, ScoreError> {
        let path = path.into();
        let board = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => ScoreBoard::new(),
            Ok(contents) => {
                let file: ScoreFile = serde_json::from_str(&contents)?;
                ScoreBoard::from(file)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No score file yet, starting empty");
                ScoreBoard::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), users = board.len(), "Score store loaded");

        Ok(Self {
            path,
            board: Mutex::new(board),
        })
    }

    async fn persist(&self, board: &ScoreBoard) -> Result<(), ScoreError> {
        let contents = serde_json::to_string_pretty(&ScoreFile::from(board))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, contents).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!(path = %self.path.display(), users = board.len(), "Score store persisted");
        Ok(())
    }
}

#[async_trait]
impl ScoreRepository for JsonFileScoreRepository {
    #[instrument(skip(self))]
    async fn increment(&self, user_id: &str) -> Result<u64, ScoreError> {
        let mut board = self.board.lock().await;
        let points = board.increment(user_id);

        // The in-memory point stays even if the write fails; the next
        // successful write carries it.
        if let Err(e) = self.persist(&board).await {
            error!(user_id = %user_id, error = %e, "Failed to persist score");
            return Err(e);
        }

        Ok(points)
    }

    async fn read(&self, user_id: &str) -> Result<u64, ScoreError> {
        Ok(self.board.lock().await.read(user_id))
    }

    async fn top_n(&self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(self.board.lock().await.top_n(n))
    }

    async fn entries(&self) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(self.board.lock().await.entries().to_vec())
    }
}
