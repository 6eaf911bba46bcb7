use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::round::{GameKind, RoundId, RoundMode};

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
pub const MAX_LEADERBOARD_LIMIT: usize = 100;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: i64,
    pub open_rounds: usize,
}

/// Query string for GET /leaderboard
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub points: u64,
}

/// An open round as operators see it. The answer is never exposed.
#[derive(Debug, Serialize, Deserialize)]
pub struct RoundResponse {
    pub id: RoundId,
    pub kind: GameKind,
    pub question: String,
    pub channel_scope: String,
    pub mode: RoundMode,
    pub opened_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    pub response_count: usize,
}
