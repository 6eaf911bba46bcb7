mod errors;
pub mod models;
pub mod repository;

pub use errors::ScoreError;
pub use models::{ScoreBoard, ScoreEntry};
pub use repository::{InMemoryScoreRepository, JsonFileScoreRepository, ScoreRepository};
