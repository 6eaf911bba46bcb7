use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Persistence error: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
