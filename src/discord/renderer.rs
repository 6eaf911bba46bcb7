use async_trait::async_trait;
use serenity::all::{ChannelId, Http};
use std::sync::Arc;
use tracing::debug;

use super::render::resolution_message;
use crate::event::{RoundEvent, RoundEventError, RoundEventHandler};

/// Posts round results back into the channel the round ran in
pub struct DiscordRenderer {
    http: Arc<Http>,
}

impl DiscordRenderer {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

/// Chat text for an event, if the event is shown at all
pub fn event_text(event: &RoundEvent) -> Option<String> {
    match event {
        // The announcement itself already told everyone
        RoundEvent::Opened { .. } => None,
        RoundEvent::Resolved(resolved) => Some(resolution_message(resolved)),
        RoundEvent::Cancelled { .. } => Some("🛑 This round was cancelled.".to_string()),
    }
}

pub fn channel_for(channel_scope: &str) -> Option<ChannelId> {
    channel_scope
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(ChannelId::new)
}

#[async_trait]
impl RoundEventHandler for DiscordRenderer {
    async fn handle_round_event(&self, event: RoundEvent) -> Result<(), RoundEventError> {
        let Some(text) = event_text(&event) else {
            return Ok(());
        };

        let channel_id = channel_for(event.channel_scope()).ok_or_else(|| {
            RoundEventError::Handler(format!("not a channel id: {}", event.channel_scope()))
        })?;

        channel_id
            .say(&self.http, text)
            .await
            .map_err(|e| RoundEventError::Delivery(e.to_string()))?;

        debug!(round_id = %event.round_id(), event_type = event.event_type(), "Round event posted");
        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        "DiscordRenderer"
    }
}
