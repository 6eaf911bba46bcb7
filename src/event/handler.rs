use async_trait::async_trait;
use thiserror::Error;

use super::events::RoundEvent;

/// Errors that can occur when handling round events
#[derive(Debug, Error)]
pub enum RoundEventError {
    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Handler error: {0}")]
    Handler(String),
}

/// Trait for components that react to round events
///
/// This keeps rendering (chat messages, reactions, logs) out of the
/// coordinator. Handlers should tolerate seeing an event more than once.
#[async_trait]
pub trait RoundEventHandler: Send + Sync {
    async fn handle_round_event(&self, event: RoundEvent) -> Result<(), RoundEventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn handler_name(&self) -> &'static str;
}
