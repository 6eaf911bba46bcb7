use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub user_id: String,
    pub points: u64,
}

/// User scores in first-credited order.
///
/// The insertion order is what breaks ties on the leaderboard, so it is kept
/// both in memory and in the persisted file.
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    scores: Vec<ScoreEntry>,
    index: HashMap<String, usize>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a board from persisted entries, merging repeated user ids
    pub fn from_entries(entries: Vec<ScoreEntry>) -> Self {
        let mut board = Self::new();
        for entry in entries {
            match board.index.get(&entry.user_id) {
                Some(&position) => board.scores[position].points += entry.points,
                None => {
                    board.index.insert(entry.user_id.clone(), board.scores.len());
                    board.scores.push(entry);
                }
            }
        }
        board
    }

    /// Adds one point and returns the new total
    pub fn increment(&mut self, user_id: &str) -> u64 {
        match self.index.get(user_id) {
            Some(&position) => {
                let entry = &mut self.scores[position];
                entry.points += 1;
                entry.points
            }
            None => {
                self.index.insert(user_id.to_string(), self.scores.len());
                self.scores.push(ScoreEntry {
                    user_id: user_id.to_string(),
                    points: 1,
                });
                1
            }
        }
    }

    pub fn read(&self, user_id: &str) -> u64 {
        self.index
            .get(user_id)
            .map(|&position| self.scores[position].points)
            .unwrap_or(0)
    }

    /// Highest scores first; equal scores keep insertion order
    pub fn top_n(&self, n: usize) -> Vec<ScoreEntry> {
        let mut ranked = self.scores.clone();
        ranked.sort_by(|a, b| b.points.cmp(&a.points));
        ranked.truncate(n);
        ranked
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Serialized form: `{"scores":[{"user_id":"..","points":N}]}`
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ScoreFile {
    pub scores: Vec<ScoreEntry>,
}

impl From<&ScoreBoard> for ScoreFile {
    fn from(board: &ScoreBoard) -> Self {
        Self {
            scores: board.scores.clone(),
        }
    }
}

impl From<ScoreFile> for ScoreBoard {
    fn from(file: ScoreFile) -> Self {
        ScoreBoard::from_entries(file.scores)
    }
}
