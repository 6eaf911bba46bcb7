use std::sync::Arc;
use tracing::{info, instrument};

use super::{fallback::FallbackBank, provider::ContentProvider};
use crate::round::{GameKind, Prompt};

const LAST_RESORT: (&str, &str) = ("What has keys but can't open locks?", "keyboard");

/// Hands out prompts: remote provider first, static bank otherwise
#[derive(Clone)]
pub struct PromptSource {
    provider: Arc<dyn ContentProvider>,
    fallback: Arc<FallbackBank>,
}

impl PromptSource {
    pub fn new(provider: Arc<dyn ContentProvider>, fallback: Arc<FallbackBank>) -> Self {
        Self { provider, fallback }
    }

    /// Always yields a prompt with a non-empty answer
    #[instrument(skip(self))]
    pub async fn next_prompt(&self, kind: GameKind) -> Prompt {
        if let Some(prompt) = self
            .provider
            .fetch(kind)
            .await
            .filter(|p| !p.expected_answer.trim().is_empty())
        {
            return prompt;
        }

        if let Some(prompt) = self.fallback.pick(kind) {
            info!(kind = %kind, "Using fallback prompt");
            return prompt;
        }

        info!(kind = %kind, "Fallback bank empty, using built-in riddle");
        Prompt::new(GameKind::Riddle, LAST_RESORT.0, LAST_RESORT.1)
    }
}
