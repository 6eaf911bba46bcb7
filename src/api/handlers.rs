use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use tracing::{debug, instrument};

use super::types::{
    HealthResponse, LeaderboardEntry, LeaderboardQuery, RoundResponse, DEFAULT_LEADERBOARD_LIMIT,
    MAX_LEADERBOARD_LIMIT,
};
use crate::shared::{AppError, AppState};

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
        open_rounds: state.coordinator.open_rounds().len(),
    })
}

/// GET /leaderboard?limit=n
///
/// Highest scores first, `limit` defaults to 10 and is capped at 100
#[instrument(name = "leaderboard", skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let limit = match query.limit {
        Some(0) => return Err(AppError::BadRequest("limit must be positive".to_string())),
        Some(limit) => limit.min(MAX_LEADERBOARD_LIMIT),
        None => DEFAULT_LEADERBOARD_LIMIT,
    };

    let entries = state.coordinator.scores().top_n(limit).await?;
    debug!(limit, returned = entries.len(), "Leaderboard served");

    Ok(Json(
        entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| LeaderboardEntry {
                rank: i + 1,
                user_id: entry.user_id,
                points: entry.points,
            })
            .collect(),
    ))
}

/// GET /rounds
///
/// Currently open rounds, oldest first
pub async fn list_rounds(State(state): State<AppState>) -> Json<Vec<RoundResponse>> {
    let rounds = state
        .coordinator
        .open_rounds()
        .into_iter()
        .map(|snapshot| RoundResponse {
            id: snapshot.id,
            kind: snapshot.kind,
            question: snapshot.text,
            channel_scope: snapshot.channel_scope,
            mode: snapshot.mode,
            opened_at: snapshot.opened_at,
            closes_at: snapshot.closes_at,
            response_count: snapshot.response_count,
        })
        .collect();

    Json(rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::{GameKind, Prompt, RoundMode};
    use crate::scores::{InMemoryScoreRepository, ScoreRepository};
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        crate::api::router(state)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn health_reports_open_rounds() {
        let state = AppStateBuilder::new().build();
        state
            .coordinator
            .open_round(
                Prompt::new(GameKind::Riddle, "What has keys?", "keyboard"),
                "general",
                RoundMode::FirstCorrectWins,
                Duration::from_secs(60),
            )
            .unwrap();

        let (status, body) = get(app(state.clone()), "/health").await;
        assert_eq!(status, StatusCode::OK);

        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.open_rounds, 1);
        state.coordinator.shutdown();
    }

    #[tokio::test]
    async fn leaderboard_ranks_by_points() {
        let scores = Arc::new(InMemoryScoreRepository::new());
        for user in ["alice", "bob", "bob", "carol", "carol", "carol"] {
            scores.increment(user).await.unwrap();
        }
        let state = AppStateBuilder::new().with_scores(scores).build();

        let (status, body) = get(app(state), "/leaderboard?limit=2").await;
        assert_eq!(status, StatusCode::OK);

        let entries: Vec<LeaderboardEntry> = serde_json::from_slice(&body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user_id, "carol");
        assert_eq!(entries[0].points, 3);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[1].user_id, "bob");
    }

    #[tokio::test]
    async fn leaderboard_rejects_zero_limit() {
        let state = AppStateBuilder::new().build();
        let (status, body) = get(app(state), "/leaderboard?limit=0").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(error["error"], "limit must be positive");
    }

    #[tokio::test]
    async fn rounds_hide_the_answer() {
        let state = AppStateBuilder::new().build();
        state
            .coordinator
            .open_round(
                Prompt::new(GameKind::Trivia, "Capital of Pakistan?", "Islamabad"),
                "general",
                RoundMode::CollectAll,
                Duration::from_secs(60),
            )
            .unwrap();

        let (status, body) = get(app(state.clone()), "/rounds").await;
        assert_eq!(status, StatusCode::OK);

        let rounds: Vec<RoundResponse> = serde_json::from_slice(&body).unwrap();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].question, "Capital of Pakistan?");
        assert!(!String::from_utf8_lossy(&body).contains("Islamabad"));
        state.coordinator.shutdown();
    }
}
