pub mod announce;
pub mod commands;
pub mod handler;
pub mod render;
pub mod renderer;
pub mod scheduler;
mod start;

pub use commands::Command;
pub use handler::Handler;
pub use renderer::DiscordRenderer;
pub use start::start_bot;
