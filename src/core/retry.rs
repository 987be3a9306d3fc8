use crate::domain::model::{RawCompletion, RenderedPrompt};
use crate::domain::ports::{Backoff, ChatClient};
use crate::utils::error::{CompletionError, OrchestratorError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_BACKOFF_DELAY_MS),
        }
    }
}

/// Waits the same interval before every retry.
#[derive(Debug, Clone, Copy)]
pub struct FixedBackoff {
    delay: Duration,
}

impl FixedBackoff {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Backoff for FixedBackoff {
    async fn wait(&self, retry: u32) {
        tracing::debug!("Backing off {:?} before retry {}", self.delay, retry);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Per-call state of the orchestrator.
#[derive(Debug)]
enum RetryState {
    Attempting(u32),
    Backoff {
        attempt: u32,
        error: CompletionError,
    },
    Succeeded(String),
    Failed {
        attempts: u32,
        error: CompletionError,
    },
}

/// Wraps a [`ChatClient`] with bounded retries and completion-shape checks.
pub struct RetryOrchestrator<C: ChatClient, B: Backoff = FixedBackoff> {
    client: C,
    backoff: B,
    max_attempts: u32,
}

impl<C: ChatClient> RetryOrchestrator<C, FixedBackoff> {
    pub fn new(client: C, policy: RetryPolicy) -> Self {
        Self::with_backoff(client, FixedBackoff::new(policy.delay), policy.max_attempts)
    }
}

impl<C: ChatClient, B: Backoff> RetryOrchestrator<C, B> {
    pub fn with_backoff(client: C, backoff: B, max_attempts: u32) -> Self {
        Self {
            client,
            backoff,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Call the chat endpoint until a usable completion comes back or the
    /// attempt budget is spent. Non-retryable transport failures abort at once.
    pub async fn call_with_retry(&self, prompt: &RenderedPrompt) -> Result<String, OrchestratorError> {
        let mut state = RetryState::Attempting(1);

        loop {
            state = match state {
                RetryState::Attempting(attempt) => {
                    tracing::debug!("Chat completion attempt {}/{}", attempt, self.max_attempts);
                    match self.attempt(prompt).await {
                        Ok(text) => RetryState::Succeeded(text),
                        Err(error) if !error.is_retryable() => {
                            tracing::error!(
                                "Chat completion aborted on attempt {} ({:?}): {}",
                                attempt,
                                error.kind(),
                                error
                            );
                            return Err(match error {
                                CompletionError::Transport(e) => OrchestratorError::Aborted(e),
                                shape => OrchestratorError::Exhausted {
                                    attempts: attempt,
                                    last_error: shape,
                                },
                            });
                        }
                        Err(error) if attempt < self.max_attempts => {
                            RetryState::Backoff { attempt, error }
                        }
                        Err(error) => RetryState::Failed {
                            attempts: attempt,
                            error,
                        },
                    }
                }
                RetryState::Backoff { attempt, error } => {
                    tracing::warn!(
                        "Chat completion attempt {}/{} failed: {}",
                        attempt,
                        self.max_attempts,
                        error
                    );
                    self.backoff.wait(attempt).await;
                    RetryState::Attempting(attempt + 1)
                }
                RetryState::Succeeded(text) => {
                    tracing::info!("Chat completion received ({} chars)", text.chars().count());
                    return Ok(text);
                }
                RetryState::Failed { attempts, error } => {
                    tracing::error!(
                        "Chat completion failed after {} attempt(s): {}",
                        attempts,
                        error
                    );
                    return Err(OrchestratorError::Exhausted {
                        attempts,
                        last_error: error,
                    });
                }
            };
        }
    }

    async fn attempt(&self, prompt: &RenderedPrompt) -> Result<String, CompletionError> {
        let raw = self.client.complete(prompt).await?;
        extract_completion_text(&raw)
    }
}

#[derive(Debug, Deserialize)]
struct CompletionBody {
    choices: Option<Vec<CompletionChoice>>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Pull the first choice's message content out of a chat-completion body.
pub fn extract_completion_text(raw: &RawCompletion) -> Result<String, CompletionError> {
    let body: CompletionBody = serde_json::from_str(&raw.body).map_err(|e| {
        CompletionError::invalid_shape(format!("response body is not a completion object: {}", e))
    })?;

    let choice = body
        .choices
        .and_then(|choices| choices.into_iter().next())
        .ok_or_else(|| CompletionError::invalid_shape("response has no choices"))?;

    let message = choice
        .message
        .ok_or_else(|| CompletionError::invalid_shape("choice has no message"))?;

    let content = message
        .content
        .ok_or_else(|| CompletionError::invalid_shape("message has no content"))?;

    let content = content.trim();
    if content.is_empty() {
        return Err(CompletionError::invalid_shape("message content is empty"));
    }

    Ok(content.to_string())
}
