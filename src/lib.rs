// Library crate for the teacorner mini-game bot
// This file exposes the public API for integration tests

pub mod api;
pub mod config;
pub mod content;
pub mod discord;
pub mod event;
pub mod round;
pub mod scores;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use config::{Config, ConfigError};
pub use content::{ContentProvider, FallbackBank, HttpContentProvider, PromptSource};
pub use event::{EventBus, RoundEvent, RoundEventHandler, RoundSubscription};
pub use round::{
    GameKind, MatchOutcome, MatchPolicy, Prompt, ResolutionReason, RoundCoordinator, RoundError,
    RoundMode, RoundResolved,
};
pub use scores::{InMemoryScoreRepository, JsonFileScoreRepository, ScoreRepository};
pub use shared::{AppError, AppState};
