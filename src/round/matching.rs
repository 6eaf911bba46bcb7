use serde::{Deserialize, Serialize};

/// How a chat message is compared against an expected answer.
///
/// Both policies ignore case, surrounding whitespace and repeated inner
/// whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// The whole message must equal the answer (multiple-choice option text)
    Exact,
    /// The answer may appear anywhere in the message (riddles, songs, typing)
    Contains,
}

impl MatchPolicy {
    pub fn matches(&self, raw_text: &str, expected: &str) -> bool {
        let expected = normalize(expected);
        if expected.is_empty() {
            return false;
        }
        let text = normalize(raw_text);

        match self {
            MatchPolicy::Exact => text == expected,
            MatchPolicy::Contains => text.contains(&expected),
        }
    }
}

/// Lowercases and collapses whitespace
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
