use std::str::FromStr;

use crate::round::GameKind;

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;
pub const MAX_LEADERBOARD_SIZE: usize = 25;

/// A chat command addressed to the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a round of the given kind in the current channel
    Play(GameKind),
    Leaderboard(usize),
    Score,
}

impl Command {
    /// Parses `content` as a prefixed command. Anything else, including
    /// unknown commands, is `None` and should be treated as an answer.
    pub fn parse(prefix: &str, content: &str) -> Option<Self> {
        let body = content.trim().strip_prefix(prefix)?;
        let mut words = body.split_whitespace();
        let name = words.next()?.to_lowercase();

        match name.as_str() {
            "leaderboard" | "lb" | "top" => {
                let size = words
                    .next()
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|n| *n > 0)
                    .unwrap_or(DEFAULT_LEADERBOARD_SIZE)
                    .min(MAX_LEADERBOARD_SIZE);
                Some(Command::Leaderboard(size))
            }
            "score" | "points" => Some(Command::Score),
            other => GameKind::from_str(other).ok().map(Command::Play),
        }
    }
}
