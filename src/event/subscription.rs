use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{bus::EventBus, handler::RoundEventHandler};

/// Routes round events from the bus to one handler
pub struct RoundSubscription {
    handler: Arc<dyn RoundEventHandler>,
    event_bus: EventBus,
}

impl RoundSubscription {
    pub fn new(handler: Arc<dyn RoundEventHandler>, event_bus: EventBus) -> Self {
        Self { handler, event_bus }
    }

    /// Start the subscription - spawns a background task that listens to round
    /// events and routes them to the handler
    pub fn start(self) -> JoinHandle<()> {
        let handler_name = self.handler.handler_name();
        let mut receiver = self.event_bus.subscribe();

        info!(handler = handler_name, "Starting round subscription");

        tokio::spawn(async move {
            loop {
                let event = match receiver.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(handler = handler_name, skipped, "Round subscription lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                let round_id = event.round_id().to_string();
                let event_type = event.event_type();

                if let Err(e) = self.handler.handle_round_event(event).await {
                    warn!(
                        round_id = %round_id,
                        handler = handler_name,
                        event_type,
                        error = %e,
                        "Round event handler failed"
                    );
                }
            }

            warn!(handler = handler_name, "Round subscription ended - no more events");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{RoundEvent, RoundEventError};
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct ForwardingHandler(mpsc::UnboundedSender<RoundEvent>);

    #[async_trait]
    impl RoundEventHandler for ForwardingHandler {
        async fn handle_round_event(&self, event: RoundEvent) -> Result<(), RoundEventError> {
            self.0
                .send(event)
                .map_err(|e| RoundEventError::Delivery(e.to_string()))
        }

        fn handler_name(&self) -> &'static str {
            "ForwardingHandler"
        }
    }

    #[tokio::test]
    async fn delivers_events_to_handler() {
        let bus = EventBus::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = RoundSubscription::new(Arc::new(ForwardingHandler(tx)), bus.clone()).start();

        bus.emit(RoundEvent::Cancelled {
            round_id: "r1".to_string(),
            channel_scope: "c1".to_string(),
        });

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.round_id(), "r1");

        handle.abort();
    }
}
