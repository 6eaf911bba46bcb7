use serenity::all::{ChannelId, Http};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, instrument};

use super::announce::{announce_round, AnnounceOutcome};
use crate::config::TriviaSchedule;
use crate::round::GameKind;
use crate::shared::AppState;

/// Posts a trivia round into the configured channel on every tick.
///
/// The first round goes out one interval after start. Ticks that find a
/// round still running in the channel are skipped. Runs until aborted.
#[instrument(skip(http, state))]
pub async fn start_trivia_schedule(
    http: Arc<Http>,
    state: AppState,
    schedule: TriviaSchedule,
    round_duration: Duration,
) {
    info!(
        channel_id = schedule.channel_id,
        interval_secs = schedule.interval.as_secs(),
        "Starting scheduled trivia"
    );

    let Some(channel_id) = Some(schedule.channel_id)
        .filter(|id| *id != 0)
        .map(ChannelId::new)
    else {
        error!("Scheduled trivia channel id is zero, not starting");
        return;
    };

    let Some(first_tick) = Instant::now().checked_add(schedule.interval) else {
        error!("Scheduled trivia interval is out of range, not starting");
        return;
    };
    let mut ticker = interval_at(first_tick, schedule.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        match announce_round(&http, &state, channel_id, GameKind::Trivia, round_duration).await {
            Ok(AnnounceOutcome::Opened(round_id)) => {
                info!(round_id = %round_id, "Scheduled trivia posted");
            }
            Ok(AnnounceOutcome::Busy) => {
                info!("Round still running, skipping scheduled trivia");
            }
            Err(e) => {
                error!(error = %e, "Scheduled trivia failed");
            }
        }
    }
}
