use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::{Display, EnumIter, EnumString};
use tokio::task::JoinHandle;

use super::matching::MatchPolicy;

pub type RoundId = String;

/// Kind of mini-game a prompt belongs to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GameKind {
    Trivia,
    Riddle,
    Song,
    #[strum(to_string = "typing", serialize = "type")]
    Typing,
}

impl GameKind {
    /// How a round of this kind is won
    pub fn mode(&self) -> RoundMode {
        match self {
            GameKind::Trivia => RoundMode::CollectAll,
            GameKind::Riddle | GameKind::Song | GameKind::Typing => RoundMode::FirstCorrectWins,
        }
    }

    /// How answers to this kind of prompt are compared
    pub fn match_policy(&self) -> MatchPolicy {
        match self {
            GameKind::Trivia => MatchPolicy::Exact,
            GameKind::Riddle | GameKind::Song | GameKind::Typing => MatchPolicy::Contains,
        }
    }

    pub fn default_duration(&self) -> Duration {
        match self {
            GameKind::Trivia => Duration::from_secs(120),
            GameKind::Riddle => Duration::from_secs(300),
            GameKind::Song => Duration::from_secs(60),
            GameKind::Typing => Duration::from_secs(30),
        }
    }
}

/// A question plus its expected answer. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub kind: GameKind,
    pub text: String,
    pub expected_answer: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub match_policy: MatchPolicy,
}

impl Prompt {
    /// Builds a prompt using the match policy of its game kind
    pub fn new(kind: GameKind, text: impl Into<String>, expected_answer: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            expected_answer: expected_answer.into(),
            options: Vec::new(),
            match_policy: kind.match_policy(),
        }
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn with_match_policy(mut self, match_policy: MatchPolicy) -> Self {
        self.match_policy = match_policy;
        self
    }

    pub fn is_correct(&self, raw_text: &str) -> bool {
        self.match_policy.matches(raw_text, &self.expected_answer)
    }

    /// Whether the text names one of the multiple-choice options
    pub fn names_option(&self, raw_text: &str) -> bool {
        self.options
            .iter()
            .any(|option| MatchPolicy::Exact.matches(raw_text, option))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundMode {
    /// Round closes the instant anyone answers correctly
    FirstCorrectWins,
    /// Round stays open for its full duration; every correct respondent wins
    CollectAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStatus {
    Open,
    Resolved,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionReason {
    Solved,
    TimeUp,
}

/// A respondent's latest submission in a collect-all round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub respondent_id: String,
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}

/// One open question instance
#[derive(Debug)]
pub struct Round {
    pub id: RoundId,
    pub prompt: Prompt,
    pub channel_scope: String,
    pub mode: RoundMode,
    pub opened_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    pub status: RoundStatus,
    /// Submission order is preserved; a respondent's later answer replaces the earlier one
    pub responses: Vec<Response>,
    pub winner: Option<String>,
    pub(crate) timer: Option<JoinHandle<()>>,
}

impl Round {
    pub fn new(
        id: RoundId,
        prompt: Prompt,
        channel_scope: String,
        mode: RoundMode,
        opened_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        let closes_at = ChronoDuration::from_std(duration)
            .ok()
            .and_then(|d| opened_at.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            id,
            prompt,
            channel_scope,
            mode,
            opened_at,
            closes_at,
            status: RoundStatus::Open,
            responses: Vec::new(),
            winner: None,
            timer: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == RoundStatus::Open
    }

    /// Whether an attempt submitted at `timestamp` falls inside the answer
    /// window `[opened_at, closes_at)`
    pub fn accepts_at(&self, timestamp: DateTime<Utc>) -> bool {
        self.is_open() && self.opened_at <= timestamp && timestamp < self.closes_at
    }

    /// Stores a respondent's answer, replacing any earlier one
    pub fn store_response(&mut self, respondent_id: &str, text: &str, submitted_at: DateTime<Utc>) {
        self.responses.retain(|r| r.respondent_id != respondent_id);
        self.responses.push(Response {
            respondent_id: respondent_id.to_string(),
            text: text.to_string(),
            submitted_at,
        });
    }

    /// Respondents whose stored answer exactly matches the expected answer
    pub fn collect_winners(&self) -> Vec<String> {
        self.responses
            .iter()
            .filter(|r| MatchPolicy::Exact.matches(&r.text, &self.prompt.expected_answer))
            .map(|r| r.respondent_id.clone())
            .collect()
    }

    /// Detaches the pending resolution task from the round
    pub(crate) fn take_timer(&mut self) -> Option<JoinHandle<()>> {
        self.timer.take()
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            id: self.id.clone(),
            kind: self.prompt.kind,
            text: self.prompt.text.clone(),
            channel_scope: self.channel_scope.clone(),
            mode: self.mode,
            status: self.status,
            opened_at: self.opened_at,
            closes_at: self.closes_at,
            response_count: self.responses.len(),
        }
    }
}

/// Read-only view of a round, safe to hand out of the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub id: RoundId,
    pub kind: GameKind,
    pub text: String,
    pub channel_scope: String,
    pub mode: RoundMode,
    pub status: RoundStatus,
    pub opened_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    pub response_count: usize,
}

/// Outcome of a round, rendered by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResolved {
    pub round_id: RoundId,
    pub channel_scope: String,
    pub kind: GameKind,
    pub answer: String,
    pub winners: Vec<String>,
    pub reason: ResolutionReason,
    /// Winners whose point could not be persisted
    #[serde(default)]
    pub score_failures: Vec<String>,
}

/// What a single chat message did to the open rounds of its channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Rounds this attempt won outright
    pub solved: Vec<RoundResolved>,
    /// Collect-all rounds that stored this attempt
    pub recorded: Vec<RoundId>,
}

impl MatchOutcome {
    pub fn is_ignored(&self) -> bool {
        self.solved.is_empty() && self.recorded.is_empty()
    }

    pub fn caused_resolution(&self) -> bool {
        !self.solved.is_empty()
    }
}
