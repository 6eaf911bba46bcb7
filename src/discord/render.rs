use serenity::all::{Colour, CreateEmbed, CreateEmbedFooter};
use std::time::Duration;

use crate::round::{GameKind, Prompt, ResolutionReason, RoundMode, RoundResolved};
use crate::scores::ScoreEntry;

const OPTION_LABELS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

pub fn mention(user_id: &str) -> String {
    format!("<@{}>", user_id)
}

fn title(kind: GameKind) -> &'static str {
    match kind {
        GameKind::Trivia => "🧠 Trivia Time!",
        GameKind::Riddle => "🧩 Riddle Me This",
        GameKind::Song => "🎵 Guess the Song",
        GameKind::Typing => "⌨️ Typing Race",
    }
}

fn colour(kind: GameKind) -> Colour {
    match kind {
        GameKind::Trivia => Colour::BLUE,
        GameKind::Riddle => Colour::PURPLE,
        GameKind::Song => Colour::MAGENTA,
        GameKind::Typing => Colour::ORANGE,
    }
}

/// Body of the announcement; never contains the answer
pub fn announcement_body(prompt: &Prompt) -> String {
    let mut body = match prompt.kind {
        GameKind::Song => format!("Which song are these lyrics from?\n\n*{}*", prompt.text),
        GameKind::Typing => format!("Type this exactly, as fast as you can:\n\n`{}`", prompt.text),
        GameKind::Trivia | GameKind::Riddle => prompt.text.clone(),
    };

    if !prompt.options.is_empty() {
        body.push('\n');
        for (label, option) in OPTION_LABELS.iter().zip(&prompt.options) {
            body.push_str(&format!("\n**{}.** {}", label, option));
        }
    }

    body
}

pub fn announcement_footer(mode: RoundMode, duration: Duration) -> String {
    let secs = duration.as_secs();
    match mode {
        RoundMode::FirstCorrectWins => {
            format!("First correct answer wins. You have {} seconds!", secs)
        }
        RoundMode::CollectAll => format!(
            "Type the answer text in chat. Everyone who is right after {} seconds scores!",
            secs
        ),
    }
}

pub fn announcement_embed(prompt: &Prompt, mode: RoundMode, duration: Duration) -> CreateEmbed {
    CreateEmbed::new()
        .title(title(prompt.kind))
        .description(announcement_body(prompt))
        .colour(colour(prompt.kind))
        .footer(CreateEmbedFooter::new(announcement_footer(mode, duration)))
}

/// Result message posted when a round resolves
pub fn resolution_message(resolved: &RoundResolved) -> String {
    let mut message = match (resolved.reason, resolved.winners.as_slice()) {
        (ResolutionReason::Solved, winners) => format!(
            "🎉 {} got it! The answer was **{}**.",
            join_mentions(winners),
            resolved.answer
        ),
        (ResolutionReason::TimeUp, []) => format!(
            "⏰ Time's up! Nobody got it. The answer was **{}**.",
            resolved.answer
        ),
        (ResolutionReason::TimeUp, winners) => format!(
            "⏰ Time's up! The answer was **{}**.\n🏆 Winners: {}",
            resolved.answer,
            join_mentions(winners)
        ),
    };

    if !resolved.score_failures.is_empty() {
        message.push_str(&format!(
            "\n⚠️ Could not save points for {}.",
            join_mentions(&resolved.score_failures)
        ));
    }

    message
}

pub fn leaderboard_message(entries: &[ScoreEntry]) -> String {
    if entries.is_empty() {
        return "No scores yet. Start a round to get on the board!".to_string();
    }

    let lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let medal = match i {
                0 => "🥇",
                1 => "🥈",
                2 => "🥉",
                _ => "▫️",
            };
            format!(
                "{} **{}.** {}: {} {}",
                medal,
                i + 1,
                mention(&entry.user_id),
                entry.points,
                plural(entry.points)
            )
        })
        .collect();

    format!("🏆 **Leaderboard**\n{}", lines.join("\n"))
}

pub fn score_message(user_id: &str, points: u64) -> String {
    format!("{}, you have **{}** {}.", mention(user_id), points, plural(points))
}

fn plural(points: u64) -> &'static str {
    if points == 1 {
        "point"
    } else {
        "points"
    }
}

fn join_mentions(user_ids: &[String]) -> String {
    user_ids
        .iter()
        .map(|id| mention(id))
        .collect::<Vec<_>>()
        .join(", ")
}
