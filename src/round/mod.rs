pub mod coordinator;
mod errors;
pub mod matching;
pub mod models;
pub mod registry;

pub use coordinator::{ChannelReservation, RoundCoordinator};
pub use errors::RoundError;
pub use matching::MatchPolicy;
pub use models::{
    GameKind, MatchOutcome, Prompt, ResolutionReason, Response, Round, RoundId, RoundMode,
    RoundResolved, RoundSnapshot, RoundStatus,
};
pub use registry::RoundRegistry;
