use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{
    errors::RoundError,
    models::{Round, RoundId, RoundMode, RoundSnapshot, RoundStatus},
};

/// Rounds changed by one chat message
#[derive(Debug, Default)]
pub struct AttemptEffects {
    /// First-correct-wins rounds this attempt won; already removed from the registry
    pub solved: Vec<Round>,
    /// Collect-all rounds that stored the attempt
    pub recorded: Vec<RoundId>,
}

impl AttemptEffects {
    pub fn is_empty(&self) -> bool {
        self.solved.is_empty() && self.recorded.is_empty()
    }
}

/// In-memory table of currently open rounds, keyed by round id.
///
/// Every status change happens inside one synchronous critical section that
/// also removes the round, so a round leaves the table the instant it stops
/// being open and no two callers can both observe it open and close it.
///
/// Channels can also be reserved while a round is being prepared for them.
/// Locks are always taken rounds first, then reservations.
#[derive(Debug, Default)]
pub struct RoundRegistry {
    rounds: Mutex<HashMap<RoundId, Round>>,
    reservations: Mutex<HashSet<String>>,
}

impl RoundRegistry {
    pub fn new() -> Self {
        Self {
            rounds: Mutex::new(HashMap::new()),
            reservations: Mutex::new(HashSet::new()),
        }
    }

    fn rounds(&self) -> MutexGuard<'_, HashMap<RoundId, Round>> {
        self.rounds.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reservations(&self) -> MutexGuard<'_, HashSet<String>> {
        self.reservations.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims a channel for one pending round. Refused while the channel has
    /// an open round or is already claimed.
    pub fn try_reserve(&self, channel_scope: &str) -> bool {
        let rounds = self.rounds();
        let mut reservations = self.reservations();

        if rounds
            .values()
            .any(|r| r.channel_scope == channel_scope && r.is_open())
        {
            return false;
        }
        reservations.insert(channel_scope.to_string())
    }

    pub fn release(&self, channel_scope: &str) {
        if self.reservations().remove(channel_scope) {
            debug!(channel = %channel_scope, "Channel reservation released");
        }
    }

    /// Registers an open round; a colliding id is rejected
    pub fn insert(&self, round: Round) -> Result<(), RoundError> {
        let mut rounds = self.rounds();
        if rounds.contains_key(&round.id) {
            warn!(round_id = %round.id, "Round id already registered");
            return Err(RoundError::DuplicateRoundId(round.id));
        }

        debug!(round_id = %round.id, channel = %round.channel_scope, "Round registered");
        rounds.insert(round.id.clone(), round);
        Ok(())
    }

    /// Stores the pending resolution task on its round.
    ///
    /// If the round already closed in the meantime the handle is dropped,
    /// which detaches the task; its resolution then finds nothing to do.
    pub fn attach_timer(&self, round_id: &str, timer: JoinHandle<()>) {
        if let Some(round) = self.rounds().get_mut(round_id).filter(|r| r.is_open()) {
            round.timer = Some(timer);
        } else {
            debug!(round_id = %round_id, "Round closed before its timer was attached");
        }
    }

    /// Matches one attempt against every open round of the channel.
    ///
    /// The match and the status flip happen under the same lock, so among
    /// simultaneous correct answers exactly one wins a first-correct-wins round.
    pub fn attempt(
        &self,
        channel_scope: &str,
        respondent_id: &str,
        raw_text: &str,
        timestamp: DateTime<Utc>,
    ) -> AttemptEffects {
        let mut rounds = self.rounds();
        let mut effects = AttemptEffects::default();

        let mut candidates: Vec<(DateTime<Utc>, RoundId)> = rounds
            .values()
            .filter(|r| r.channel_scope == channel_scope && r.accepts_at(timestamp))
            .map(|r| (r.opened_at, r.id.clone()))
            .collect();
        candidates.sort();

        for (_, round_id) in candidates {
            let Some(round) = rounds.get_mut(&round_id) else {
                continue;
            };

            match round.mode {
                RoundMode::FirstCorrectWins => {
                    if !round.prompt.is_correct(raw_text) {
                        continue;
                    }
                    if let Some(mut solved) = rounds.remove(&round_id) {
                        solved.status = RoundStatus::Resolved;
                        solved.winner = Some(respondent_id.to_string());
                        debug!(round_id = %round_id, winner = %respondent_id, "Round solved");
                        effects.solved.push(solved);
                    }
                }
                RoundMode::CollectAll => {
                    if round.prompt.is_correct(raw_text) || round.prompt.names_option(raw_text) {
                        round.store_response(respondent_id, raw_text, timestamp);
                        debug!(round_id = %round_id, respondent = %respondent_id, "Response stored");
                        effects.recorded.push(round_id);
                    }
                }
            }
        }

        effects
    }

    /// Flips an open round to `status` and removes it. Returns `None` when the
    /// round is unknown, which covers rounds that already closed.
    pub fn close(&self, round_id: &str, status: RoundStatus) -> Option<Round> {
        let mut rounds = self.rounds();
        if !rounds.get(round_id).is_some_and(Round::is_open) {
            debug!(round_id = %round_id, "Round not open, nothing to close");
            return None;
        }

        let mut round = rounds.remove(round_id)?;
        round.status = status;
        Some(round)
    }

    /// Closes every open round with `status`
    pub fn close_all(&self, status: RoundStatus) -> Vec<Round> {
        let mut rounds = self.rounds();
        rounds
            .drain()
            .map(|(_, mut round)| {
                round.status = status;
                round
            })
            .collect()
    }

    pub fn snapshot(&self, round_id: &str) -> Option<RoundSnapshot> {
        self.rounds().get(round_id).map(Round::snapshot)
    }

    /// Snapshots of all open rounds, oldest first
    pub fn snapshots(&self) -> Vec<RoundSnapshot> {
        let mut snapshots: Vec<RoundSnapshot> = self.rounds().values().map(Round::snapshot).collect();
        snapshots.sort_by_key(|s| s.opened_at);
        snapshots
    }

    pub fn has_open_round(&self, channel_scope: &str) -> bool {
        self.rounds()
            .values()
            .any(|r| r.channel_scope == channel_scope && r.is_open())
    }

    pub fn len(&self) -> usize {
        self.rounds().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::models::{GameKind, Prompt};
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    mod helpers {
        use super::*;

        pub fn riddle_round(id: &str, channel: &str) -> Round {
            Round::new(
                id.to_string(),
                Prompt::new(GameKind::Riddle, "What has keys but can't open locks?", "keyboard"),
                channel.to_string(),
                RoundMode::FirstCorrectWins,
                Utc::now(),
                Duration::from_secs(300),
            )
        }

        pub fn trivia_round(id: &str, channel: &str) -> Round {
            Round::new(
                id.to_string(),
                Prompt::new(GameKind::Trivia, "Capital of Pakistan?", "Islamabad").with_options(
                    vec!["Karachi".into(), "Lahore".into(), "Islamabad".into(), "Quetta".into()],
                ),
                channel.to_string(),
                RoundMode::CollectAll,
                Utc::now(),
                Duration::from_secs(120),
            )
        }
    }

    use helpers::*;

    #[test]
    fn rejects_duplicate_round_id() {
        let registry = RoundRegistry::new();
        registry.insert(riddle_round("r1", "c1")).unwrap();

        let result = registry.insert(riddle_round("r1", "c2"));
        assert_eq!(result, Err(RoundError::DuplicateRoundId("r1".to_string())));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn first_correct_attempt_removes_round() {
        let registry = RoundRegistry::new();
        registry.insert(riddle_round("r1", "c1")).unwrap();

        let effects = registry.attempt("c1", "u1", "it's a keyboard", Utc::now());
        assert_eq!(effects.solved.len(), 1);
        assert_eq!(effects.solved[0].winner.as_deref(), Some("u1"));
        assert_eq!(effects.solved[0].status, RoundStatus::Resolved);
        assert!(registry.is_empty());

        let again = registry.attempt("c1", "u2", "keyboard", Utc::now());
        assert!(again.solved.is_empty());
    }

    #[test]
    fn ignores_other_channels() {
        let registry = RoundRegistry::new();
        registry.insert(riddle_round("r1", "c1")).unwrap();

        let effects = registry.attempt("c2", "u1", "keyboard", Utc::now());
        assert!(effects.solved.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn ignores_late_attempts() {
        let registry = RoundRegistry::new();
        registry.insert(riddle_round("r1", "c1")).unwrap();
        let closes_at = registry.snapshot("r1").unwrap().closes_at;

        let effects = registry.attempt("c1", "u1", "keyboard", closes_at);
        assert!(effects.solved.is_empty());

        let effects = registry.attempt(
            "c1",
            "u1",
            "keyboard",
            closes_at - ChronoDuration::milliseconds(1),
        );
        assert_eq!(effects.solved.len(), 1);
    }

    #[test]
    fn collect_all_stores_answers_and_options_only() {
        let registry = RoundRegistry::new();
        registry.insert(trivia_round("t1", "c1")).unwrap();

        assert_eq!(registry.attempt("c1", "u1", "islamabad", Utc::now()).recorded, vec!["t1"]);
        assert_eq!(registry.attempt("c1", "u2", "Lahore", Utc::now()).recorded, vec!["t1"]);
        assert!(registry.attempt("c1", "u3", "good morning all", Utc::now()).is_empty());

        let snapshot = registry.snapshot("t1").unwrap();
        assert_eq!(snapshot.response_count, 2);
        assert_eq!(snapshot.status, RoundStatus::Open);
    }

    #[test]
    fn close_is_idempotent() {
        let registry = RoundRegistry::new();
        registry.insert(riddle_round("r1", "c1")).unwrap();

        let closed = registry.close("r1", RoundStatus::Cancelled).unwrap();
        assert_eq!(closed.status, RoundStatus::Cancelled);
        assert!(registry.close("r1", RoundStatus::Resolved).is_none());
        assert!(registry.close("missing", RoundStatus::Resolved).is_none());
    }

    #[test]
    fn channel_can_be_reserved_once() {
        let registry = RoundRegistry::new();

        assert!(registry.try_reserve("c1"));
        assert!(!registry.try_reserve("c1"));
        assert!(registry.try_reserve("c2"));

        registry.release("c1");
        assert!(registry.try_reserve("c1"));
    }

    #[test]
    fn channel_with_open_round_cannot_be_reserved() {
        let registry = RoundRegistry::new();
        registry.insert(riddle_round("r1", "c1")).unwrap();
        assert!(!registry.try_reserve("c1"));

        registry.close("r1", RoundStatus::Cancelled);
        assert!(registry.try_reserve("c1"));
    }

    #[test]
    fn reserved_channel_still_accepts_its_round() {
        let registry = RoundRegistry::new();
        assert!(registry.try_reserve("c1"));

        registry.insert(riddle_round("r1", "c1")).unwrap();
        registry.release("c1");

        assert!(registry.has_open_round("c1"));
        assert!(!registry.try_reserve("c1"));
    }

    #[test]
    fn ignores_attempts_sent_before_opening() {
        let registry = RoundRegistry::new();
        let opened_at = Utc::now() - ChronoDuration::seconds(10);
        registry
            .insert(Round::new(
                "r1".to_string(),
                Prompt::new(GameKind::Riddle, "What has keys but can't open locks?", "keyboard"),
                "c1".to_string(),
                RoundMode::FirstCorrectWins,
                opened_at,
                Duration::from_secs(300),
            ))
            .unwrap();

        let early = registry.attempt("c1", "u1", "keyboard", opened_at - ChronoDuration::seconds(1));
        assert!(early.is_empty());
        assert!(registry.has_open_round("c1"));

        let on_time = registry.attempt("c1", "u2", "keyboard", opened_at);
        assert_eq!(on_time.solved[0].winner.as_deref(), Some("u2"));
    }

    #[test]
    fn close_all_drains_registry() {
        let registry = RoundRegistry::new();
        registry.insert(riddle_round("r1", "c1")).unwrap();
        registry.insert(trivia_round("t1", "c2")).unwrap();

        let closed = registry.close_all(RoundStatus::Cancelled);
        assert_eq!(closed.len(), 2);
        assert!(closed.iter().all(|r| r.status == RoundStatus::Cancelled));
        assert!(registry.is_empty());
        assert!(!registry.has_open_round("c1"));
    }
}
