// Event-driven plumbing between the round coordinator and its renderers

// Public API - what other modules can use
pub use bus::EventBus;
pub use events::RoundEvent;
pub use handler::{RoundEventError, RoundEventHandler};
pub use subscription::RoundSubscription;

// Internal modules
mod bus;
mod events;
mod handler;
mod subscription;
