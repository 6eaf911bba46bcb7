use serenity::all::{Client, GatewayIntents};
use std::sync::Arc;
use tracing::info;

use super::{handler::Handler, renderer::DiscordRenderer, scheduler::start_trivia_schedule};
use crate::config::Config;
use crate::event::RoundSubscription;
use crate::round::GameKind;
use crate::shared::{AppError, AppState};

/// Connects the bot and runs it until the gateway connection ends.
///
/// Also wires the result renderer onto the event bus and, when configured,
/// the scheduled trivia task. Both stop when the bot stops.
pub async fn start_bot(config: Arc<Config>, state: AppState) -> Result<(), AppError> {
    // MESSAGE_CONTENT is privileged; it must be enabled in the Developer Portal
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler::new(state.clone(), config.clone());

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await?;

    let renderer = Arc::new(DiscordRenderer::new(client.http.clone()));
    let subscription =
        RoundSubscription::new(renderer, state.coordinator.event_bus().clone()).start();

    let schedule = config.trivia_schedule.clone().map(|schedule| {
        let duration = config.round_duration(GameKind::Trivia);
        tokio::spawn(start_trivia_schedule(
            client.http.clone(),
            state.clone(),
            schedule,
            duration,
        ))
    });

    info!("Starting Discord bot...");
    let result = client.start().await;

    if let Some(schedule) = schedule {
        schedule.abort();
    }
    subscription.abort();

    result.map_err(AppError::from)
}
