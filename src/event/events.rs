use serde::{Deserialize, Serialize};

use crate::round::{GameKind, RoundId, RoundResolved};

/// Events emitted by the round coordinator
///
/// Events represent facts about rounds that have already happened. The
/// dispatcher subscribes to them to render announcements and results without
/// the coordinator knowing anything about the chat platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoundEvent {
    /// A round was registered and its timer scheduled
    Opened {
        round_id: RoundId,
        channel_scope: String,
        kind: GameKind,
    },

    /// A round was solved or ran out of time
    Resolved(RoundResolved),

    /// A round was closed administratively; nobody scores
    Cancelled {
        round_id: RoundId,
        channel_scope: String,
    },
}

impl RoundEvent {
    pub fn round_id(&self) -> &str {
        match self {
            RoundEvent::Opened { round_id, .. } => round_id,
            RoundEvent::Resolved(resolved) => &resolved.round_id,
            RoundEvent::Cancelled { round_id, .. } => round_id,
        }
    }

    pub fn channel_scope(&self) -> &str {
        match self {
            RoundEvent::Opened { channel_scope, .. } => channel_scope,
            RoundEvent::Resolved(resolved) => &resolved.channel_scope,
            RoundEvent::Cancelled { channel_scope, .. } => channel_scope,
        }
    }

    /// Get a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            RoundEvent::Opened { .. } => "round_opened",
            RoundEvent::Resolved(_) => "round_resolved",
            RoundEvent::Cancelled { .. } => "round_cancelled",
        }
    }
}
