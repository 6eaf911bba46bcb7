use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use super::{
    errors::RoundError,
    models::{
        MatchOutcome, Prompt, ResolutionReason, Round, RoundId, RoundMode, RoundResolved,
        RoundSnapshot, RoundStatus,
    },
    registry::RoundRegistry,
};
use crate::event::{EventBus, RoundEvent};
use crate::scores::ScoreRepository;

/// Owns the lifecycle of every round: open, collect answers, resolve, close.
///
/// Cloning is cheap; clones share the same registry, score store and bus.
#[derive(Clone)]
pub struct RoundCoordinator {
    registry: Arc<RoundRegistry>,
    scores: Arc<dyn ScoreRepository>,
    event_bus: EventBus,
}

impl RoundCoordinator {
    pub fn new(scores: Arc<dyn ScoreRepository>, event_bus: EventBus) -> Self {
        Self {
            registry: Arc::new(RoundRegistry::new()),
            scores,
            event_bus,
        }
    }

    pub fn scores(&self) -> &Arc<dyn ScoreRepository> {
        &self.scores
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Opens a round under a freshly generated id
    pub fn open_round(
        &self,
        prompt: Prompt,
        channel_scope: &str,
        mode: RoundMode,
        duration: Duration,
    ) -> Result<RoundId, RoundError> {
        self.open_round_with_id(Uuid::new_v4().to_string(), prompt, channel_scope, mode, duration)
    }

    /// Opens a round under a caller-chosen id, usually the announcement
    /// message id. Returns immediately; resolution runs on its own task.
    pub fn open_round_with_id(
        &self,
        round_id: impl Into<RoundId>,
        prompt: Prompt,
        channel_scope: &str,
        mode: RoundMode,
        duration: Duration,
    ) -> Result<RoundId, RoundError> {
        self.open_round_at(round_id, prompt, channel_scope, mode, Utc::now(), duration)
    }

    /// Opens a round whose answer window starts at `opened_at`.
    ///
    /// Chat timestamps are compared against this window, so callers pass the
    /// announcement's own timestamp when they have one. The timer still runs
    /// on the local clock for `duration` from now.
    #[instrument(skip(self, round_id, prompt))]
    pub fn open_round_at(
        &self,
        round_id: impl Into<RoundId>,
        prompt: Prompt,
        channel_scope: &str,
        mode: RoundMode,
        opened_at: DateTime<Utc>,
        duration: Duration,
    ) -> Result<RoundId, RoundError> {
        let round_id = round_id.into();

        if prompt.expected_answer.trim().is_empty() {
            return Err(RoundError::InvalidPrompt);
        }
        if duration.is_zero() {
            return Err(RoundError::InvalidDuration);
        }

        let kind = prompt.kind;
        let round = Round::new(
            round_id.clone(),
            prompt,
            channel_scope.to_string(),
            mode,
            opened_at,
            duration,
        );
        self.registry.insert(round)?;

        let timer = self.schedule_resolution(round_id.clone(), duration);
        self.registry.attach_timer(&round_id, timer);

        info!(
            round_id = %round_id,
            channel = %channel_scope,
            kind = %kind,
            ?mode,
            duration_secs = duration.as_secs(),
            "Round opened"
        );

        self.event_bus.emit(RoundEvent::Opened {
            round_id: round_id.clone(),
            channel_scope: channel_scope.to_string(),
            kind,
        });

        Ok(round_id)
    }

    /// Matches one chat message against the open rounds of its channel.
    ///
    /// The match-and-close step runs before anything is awaited, so attempts
    /// are decided strictly in the order they are delivered.
    pub async fn record_attempt(
        &self,
        channel_scope: &str,
        respondent_id: &str,
        raw_text: &str,
        timestamp: DateTime<Utc>,
    ) -> MatchOutcome {
        let effects = self
            .registry
            .attempt(channel_scope, respondent_id, raw_text, timestamp);

        let mut outcome = MatchOutcome {
            solved: Vec::with_capacity(effects.solved.len()),
            recorded: effects.recorded,
        };

        for mut round in effects.solved {
            if let Some(timer) = round.take_timer() {
                timer.abort();
            }
            let resolved = self.settle(round, ResolutionReason::Solved).await;
            outcome.solved.push(resolved);
        }

        outcome
    }

    /// Resolves a round now. Unknown or already closed rounds are a no-op.
    pub async fn resolve(&self, round_id: &str) -> Option<RoundResolved> {
        self.finish(round_id, true).await
    }

    /// Closes an open round without scoring. Returns whether anything was
    /// cancelled.
    #[instrument(skip(self))]
    pub fn cancel_round(&self, round_id: &str) -> bool {
        let Some(mut round) = self.registry.close(round_id, RoundStatus::Cancelled) else {
            debug!(round_id = %round_id, "Cancel ignored, round not open");
            return false;
        };

        if let Some(timer) = round.take_timer() {
            timer.abort();
        }

        info!(round_id = %round_id, channel = %round.channel_scope, "Round cancelled");
        self.event_bus.emit(RoundEvent::Cancelled {
            round_id: round.id,
            channel_scope: round.channel_scope,
        });
        true
    }

    /// Cancels every open round. Called on process shutdown.
    pub fn shutdown(&self) -> usize {
        let rounds = self.registry.close_all(RoundStatus::Cancelled);
        let count = rounds.len();

        for mut round in rounds {
            if let Some(timer) = round.take_timer() {
                timer.abort();
            }
            self.event_bus.emit(RoundEvent::Cancelled {
                round_id: round.id,
                channel_scope: round.channel_scope,
            });
        }

        info!(cancelled = count, "Round coordinator shut down");
        count
    }

    pub fn round(&self, round_id: &str) -> Option<RoundSnapshot> {
        self.registry.snapshot(round_id)
    }

    pub fn open_rounds(&self) -> Vec<RoundSnapshot> {
        self.registry.snapshots()
    }

    /// Claims a channel while a round for it is being prepared. `None` when
    /// the channel already has an open round or another pending claim.
    pub fn reserve_channel(&self, channel_scope: &str) -> Option<ChannelReservation> {
        if !self.registry.try_reserve(channel_scope) {
            debug!(channel = %channel_scope, "Channel busy, reservation refused");
            return None;
        }
        Some(ChannelReservation {
            registry: Arc::clone(&self.registry),
            channel_scope: channel_scope.to_string(),
        })
    }

    pub fn has_open_round(&self, channel_scope: &str) -> bool {
        self.registry.has_open_round(channel_scope)
    }

    fn schedule_resolution(&self, round_id: RoundId, duration: Duration) -> JoinHandle<()> {
        let coordinator = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            debug!(round_id = %round_id, "Round timer fired");
            // Never abort our own task: it is the one doing the resolving.
            coordinator.finish(&round_id, false).await;
        })
    }

    async fn finish(&self, round_id: &str, abort_timer: bool) -> Option<RoundResolved> {
        let Some(mut round) = self.registry.close(round_id, RoundStatus::Resolved) else {
            debug!(round_id = %round_id, "Resolve ignored, round not open");
            return None;
        };

        if let Some(timer) = round.take_timer() {
            if abort_timer {
                timer.abort();
            }
        }

        Some(self.settle(round, ResolutionReason::TimeUp).await)
    }

    /// Credits the winners of a closed round and announces the result
    async fn settle(&self, round: Round, reason: ResolutionReason) -> RoundResolved {
        let winners = match round.mode {
            RoundMode::FirstCorrectWins => round.winner.iter().cloned().collect(),
            RoundMode::CollectAll => round.collect_winners(),
        };

        let mut score_failures = Vec::new();
        for winner in &winners {
            if let Err(e) = self.scores.increment(winner).await {
                error!(
                    round_id = %round.id,
                    user_id = %winner,
                    error = %e,
                    "Failed to credit winner"
                );
                score_failures.push(winner.clone());
            }
        }

        let resolved = RoundResolved {
            round_id: round.id,
            channel_scope: round.channel_scope,
            kind: round.prompt.kind,
            answer: round.prompt.expected_answer,
            winners,
            reason,
            score_failures,
        };

        info!(
            round_id = %resolved.round_id,
            ?reason,
            winners = resolved.winners.len(),
            "Round resolved"
        );

        self.event_bus.emit(RoundEvent::Resolved(resolved.clone()));
        resolved
    }
}

/// Pending claim on a channel, released when dropped
#[derive(Debug)]
pub struct ChannelReservation {
    registry: Arc<RoundRegistry>,
    channel_scope: String,
}

impl ChannelReservation {
    pub fn channel_scope(&self) -> &str {
        &self.channel_scope
    }
}

impl Drop for ChannelReservation {
    fn drop(&mut self) {
        self.registry.release(&self.channel_scope);
    }
}
