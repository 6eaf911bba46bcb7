use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

use crate::config::ConfigError;
use crate::content::{PromptSource, ProviderError};
use crate::round::{RoundCoordinator, RoundError};
use crate::scores::ScoreError;

/// Shared application state handed to the bot and the status API
#[derive(Clone)]
pub struct AppState {
    pub coordinator: RoundCoordinator,
    pub prompts: PromptSource,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(coordinator: RoundCoordinator, prompts: PromptSource) -> Self {
        Self {
            coordinator,
            prompts,
            started_at: Utc::now(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Round error: {0}")]
    Round(#[from] RoundError),

    #[error("Score store error: {0}")]
    Scores(#[from] ScoreError),

    #[error("Content client error: {0}")]
    Content(#[from] ProviderError),

    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Scores(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Score store error: {}", e),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
