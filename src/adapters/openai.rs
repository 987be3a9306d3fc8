use crate::domain::model::{RawCompletion, RenderedPrompt};
use crate::domain::ports::ChatClient;
use crate::utils::error::TransportError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Model parameters and connection settings for the chat endpoint.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiChatClient {
    client: Client,
    settings: ChatSettings,
}

impl OpenAiChatClient {
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(&self, prompt: &RenderedPrompt) -> Result<RawCompletion, TransportError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| TransportError::Misconfigured {
                message: "OpenAI API key is not set".to_string(),
            })?;

        let body = ChatRequest {
            model: &self.settings.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt.as_str(),
            }],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let endpoint = self.endpoint();
        tracing::debug!("POST {} (model: {})", endpoint, self.settings.model);

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(api_key)
            .timeout(self.settings.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("Chat endpoint responded with {}", status);

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(RawCompletion {
            status: status.as_u16(),
            body: text,
        })
    }
}
