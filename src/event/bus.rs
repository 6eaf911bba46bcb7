use tokio::sync::broadcast;
use tracing::debug;

use super::events::RoundEvent;

const DEFAULT_CAPACITY: usize = 256;

/// Event bus for distributing round events to renderers
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RoundEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emits an event to every current subscriber
    pub fn emit(&self, event: RoundEvent) {
        let event_type = event.event_type();
        let round_id = event.round_id().to_string();

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(
                    round_id = %round_id,
                    event_type,
                    receivers = receiver_count,
                    "Round event emitted"
                );
            }
            Err(_) => {
                debug!(round_id = %round_id, event_type, "Round event emitted with no receivers");
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RoundEvent> {
        self.sender.subscribe()
    }
}
