use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    /// Another open round already owns this id; signals a caller bug
    #[error("Round already exists: {0}")]
    DuplicateRoundId(String),

    #[error("Prompt has no expected answer")]
    InvalidPrompt,

    #[error("Round duration must be greater than zero")]
    InvalidDuration,
}
