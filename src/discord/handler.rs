use serenity::all::{ActivityData, Context, EventHandler, Message, Ready};
use serenity::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::{
    announce::{announce_round, AnnounceOutcome},
    commands::Command,
    render::{leaderboard_message, score_message},
};
use crate::config::Config;
use crate::round::GameKind;
use crate::shared::AppState;

/// Gateway event handler: commands start rounds, every other message is an answer
pub struct Handler {
    state: AppState,
    config: Arc<Config>,
}

impl Handler {
    pub fn new(state: AppState, config: Arc<Config>) -> Self {
        Self { state, config }
    }

    #[instrument(skip(self, ctx, message), fields(channel = %message.channel_id))]
    async fn run_command(&self, ctx: &Context, message: &Message, command: Command) {
        let reply = match command {
            Command::Play(kind) => self.start_round(ctx, message, kind).await,
            Command::Leaderboard(size) => {
                match self.state.coordinator.scores().top_n(size).await {
                    Ok(entries) => Some(leaderboard_message(&entries)),
                    Err(e) => {
                        error!(error = %e, "Failed to read leaderboard");
                        Some("Couldn't load the leaderboard right now.".to_string())
                    }
                }
            }
            Command::Score => {
                let user_id = message.author.id.to_string();
                match self.state.coordinator.scores().read(&user_id).await {
                    Ok(points) => Some(score_message(&user_id, points)),
                    Err(e) => {
                        error!(user_id = %user_id, error = %e, "Failed to read score");
                        Some("Couldn't load your score right now.".to_string())
                    }
                }
            }
        };

        if let Some(reply) = reply {
            if let Err(e) = message.channel_id.say(&ctx.http, reply).await {
                warn!(error = %e, "Failed to reply to command");
            }
        }
    }

    async fn start_round(&self, ctx: &Context, message: &Message, kind: GameKind) -> Option<String> {
        let duration = self.config.round_duration(kind);
        match announce_round(&ctx.http, &self.state, message.channel_id, kind, duration).await {
            Ok(AnnounceOutcome::Opened(round_id)) => {
                info!(round_id = %round_id, kind = %kind, requested_by = %message.author.id, "Round started");
                None
            }
            Ok(AnnounceOutcome::Busy) => {
                Some("A round is already running here. Answer that one first!".to_string())
            }
            Err(e) => {
                error!(kind = %kind, error = %e, "Failed to start round");
                Some("Couldn't start a round right now, try again shortly.".to_string())
            }
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected to Discord!", ready.user.name);

        ctx.set_activity(Some(ActivityData::custom(format!(
            "{}trivia · {}riddle",
            self.config.command_prefix, self.config.command_prefix
        ))));
    }

    async fn message(&self, ctx: Context, message: Message) {
        if message.author.bot {
            return;
        }

        if let Some(command) = Command::parse(&self.config.command_prefix, &message.content) {
            self.run_command(&ctx, &message, command).await;
            return;
        }

        let outcome = self
            .state
            .coordinator
            .record_attempt(
                &message.channel_id.to_string(),
                &message.author.id.to_string(),
                &message.content,
                message.timestamp.to_utc(),
            )
            .await;

        if outcome.caused_resolution() {
            if let Err(e) = message.react(&ctx, '✅').await {
                debug!(error = %e, "Failed to react to winning answer");
            }
        }
    }
}
