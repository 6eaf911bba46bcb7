use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teacorner::{
    api,
    config::Config,
    content::{FallbackBank, HttpContentProvider, PromptSource},
    discord::start_bot,
    event::EventBus,
    round::RoundCoordinator,
    scores::JsonFileScoreRepository,
    AppError, AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teacorner=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "teacorner stopped with an error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    info!("Starting teacorner");

    let scores = Arc::new(JsonFileScoreRepository::open(config.scores_path.clone()).await?);
    let coordinator = RoundCoordinator::new(scores, EventBus::new());

    let provider = HttpContentProvider::new(config.content_timeout, config.riddle_api_key.clone())?;
    let prompts = PromptSource::new(Arc::new(provider), Arc::new(FallbackBank::default()));

    let app_state = AppState::new(coordinator.clone(), prompts);

    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    info!("Status API running on http://{}", config.http_addr);
    let app = api::router(app_state.clone());
    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Status API stopped");
        }
    });

    let result = tokio::select! {
        result = start_bot(config.clone(), app_state) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
    };

    let cancelled = coordinator.shutdown();
    info!(cancelled, "Open rounds cancelled");
    server.abort();

    result
}
