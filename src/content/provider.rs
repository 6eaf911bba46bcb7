use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::errors::ProviderError;
use crate::round::{GameKind, Prompt};

const TRIVIA_URL: &str = "https://opentdb.com/api.php?amount=1&type=multiple";
const RIDDLE_URL: &str = "https://api.api-ninjas.com/v1/riddles";

/// Source of fresh prompts. Best effort: a failed fetch is `None`, never an error.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn fetch(&self, kind: GameKind) -> Option<Prompt>;
}

#[derive(Debug, Deserialize)]
struct TriviaResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<TriviaResult>,
}

#[derive(Debug, Deserialize)]
struct TriviaResult {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Riddle {
    question: String,
    answer: String,
}

/// Fetches trivia from Open Trivia DB and riddles from API Ninjas
#[derive(Debug, Clone)]
pub struct HttpContentProvider {
    client: reqwest::Client,
    riddle_api_key: Option<String>,
}

impl HttpContentProvider {
    pub fn new(timeout: Duration, riddle_api_key: Option<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            riddle_api_key: riddle_api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    async fn fetch_trivia(&self) -> Result<Prompt, ProviderError> {
        let response: TriviaResponse = self
            .client
            .get(TRIVIA_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.response_code != 0 {
            return Err(ProviderError::ResponseCode(response.response_code));
        }

        let result = response
            .results
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyPayload)?;

        Ok(trivia_prompt(result))
    }

    async fn fetch_riddle(&self, api_key: &str) -> Result<Prompt, ProviderError> {
        let riddles: Vec<Riddle> = self
            .client
            .get(RIDDLE_URL)
            .header("X-Api-Key", api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let riddle = riddles
            .into_iter()
            .find(|r| !r.answer.trim().is_empty())
            .ok_or(ProviderError::EmptyPayload)?;

        Ok(Prompt::new(GameKind::Riddle, riddle.question, riddle.answer))
    }
}

/// Decodes the HTML entities Open Trivia DB puts in every text field.
/// Soft hyphens are dropped since nobody types them.
fn decode_html(text: &str) -> String {
    html_escape::decode_html_entities(text).replace('\u{ad}', "")
}

fn trivia_prompt(result: TriviaResult) -> Prompt {
    let answer = decode_html(&result.correct_answer);
    let mut options: Vec<String> = result
        .incorrect_answers
        .iter()
        .map(|a| decode_html(a))
        .collect();
    options.push(answer.clone());
    options.shuffle(&mut rand::rng());

    Prompt::new(GameKind::Trivia, decode_html(&result.question), answer).with_options(options)
}

#[async_trait]
impl ContentProvider for HttpContentProvider {
    #[instrument(skip(self))]
    async fn fetch(&self, kind: GameKind) -> Option<Prompt> {
        let result = match kind {
            GameKind::Trivia => self.fetch_trivia().await,
            GameKind::Riddle => match self.riddle_api_key.as_deref() {
                Some(key) => self.fetch_riddle(key).await,
                None => {
                    debug!("No riddle API key configured, skipping remote fetch");
                    return None;
                }
            },
            GameKind::Song | GameKind::Typing => return None,
        };

        match result {
            Ok(prompt) => {
                debug!(kind = %kind, "Fetched remote prompt");
                Some(prompt)
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "Remote prompt fetch failed");
                None
            }
        }
    }
}
