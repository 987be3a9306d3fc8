use crate::domain::model::{RawCompletion, RenderedPrompt};
use crate::utils::error::TransportError;
use async_trait::async_trait;

/// One call to an LLM chat-completion endpoint. Implementations do transport
/// only: no retries and no inspection of the answer's content.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, prompt: &RenderedPrompt) -> Result<RawCompletion, TransportError>;
}

/// Delay inserted before a retry. `retry` is the 1-based number of the retry
/// about to happen.
#[async_trait]
pub trait Backoff: Send + Sync {
    async fn wait(&self, retry: u32);
}
