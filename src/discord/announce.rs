use serenity::all::{ChannelId, CreateMessage, Http};
use std::time::Duration;
use tracing::{info, instrument, warn};

use super::render::announcement_embed;
use crate::round::{GameKind, RoundId};
use crate::shared::{AppError, AppState};

/// What happened when a round was requested for a channel
#[derive(Debug, PartialEq, Eq)]
pub enum AnnounceOutcome {
    Opened(RoundId),
    /// The channel already has a round running
    Busy,
}

/// Fetches a prompt, posts the announcement and opens the round under the
/// announcement's message id.
///
/// The channel stays reserved from the busy check until the round is open,
/// so concurrent requests for one channel post at most one announcement.
#[instrument(skip(http, state))]
pub async fn announce_round(
    http: &Http,
    state: &AppState,
    channel_id: ChannelId,
    kind: GameKind,
    duration: Duration,
) -> Result<AnnounceOutcome, AppError> {
    let channel_scope = channel_id.to_string();
    let Some(_reservation) = state.coordinator.reserve_channel(&channel_scope) else {
        info!(channel = %channel_scope, "Round already running, not announcing another");
        return Ok(AnnounceOutcome::Busy);
    };

    let prompt = state.prompts.next_prompt(kind).await;
    let mode = prompt.kind.mode();

    let message = CreateMessage::new().embed(announcement_embed(&prompt, mode, duration));
    let announcement = channel_id.send_message(http, message).await?;

    match state.coordinator.open_round_at(
        announcement.id.to_string(),
        prompt,
        &channel_scope,
        mode,
        announcement.timestamp.to_utc(),
        duration,
    ) {
        Ok(round_id) => Ok(AnnounceOutcome::Opened(round_id)),
        Err(e) => {
            warn!(channel = %channel_scope, error = %e, "Announced round could not be opened");
            if let Err(delete_error) = announcement.delete(http).await {
                warn!(error = %delete_error, "Failed to remove orphaned announcement");
            }
            Err(AppError::Round(e))
        }
    }
}
