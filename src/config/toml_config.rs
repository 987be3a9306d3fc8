use crate::adapters::openai::{
    ChatSettings, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::response::ResponseFormat;
use crate::core::retry::{RetryPolicy, DEFAULT_BACKOFF_DELAY_MS, DEFAULT_MAX_ATTEMPTS};
use crate::utils::error::{FortuneError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_SAJU_TEMPLATE: &str = "prompts/saju-prompt.txt";
pub const MAX_RETRY_ATTEMPTS: u32 = 10;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FortuneConfig {
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub response: ResponseConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: Option<u32>,
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    pub saju_template: Option<String>,
    pub daily_template: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseConfig {
    pub format: Option<ResponseFormat>,
}

impl FortuneConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            tracing::error!("Cannot read config file {}: {}", path.display(), e);
            if e.kind() == std::io::ErrorKind::NotFound {
                FortuneError::MissingConfigError {
                    field: "config_file".to_string(),
                }
            } else {
                FortuneError::ConfigValidationError {
                    field: "config_file".to_string(),
                    message: format!("cannot read {}: {}", path.display(), e),
                }
            }
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text, expanding `${VAR}` references first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("openai.base_url", self.base_url())?;
        validation::validate_non_empty_string("openai.model", self.model())?;
        validation::validate_positive_number("openai.max_tokens", self.max_tokens() as usize, 1)?;
        validation::validate_range("openai.temperature", self.temperature(), 0.0, 2.0)?;
        validation::validate_positive_number("openai.timeout_seconds", self.timeout_seconds() as usize, 1)?;
        validation::validate_range("retry.max_attempts", self.max_attempts(), 1, MAX_RETRY_ATTEMPTS)?;
        validation::validate_path("prompt.saju_template", self.saju_template_path())?;
        if let Some(daily) = self.daily_template_path() {
            validation::validate_path("prompt.daily_template", daily)?;
        }
        Ok(())
    }

    /// Configured key, or `OPENAI_API_KEY` when the file leaves it out or
    /// references an unset variable.
    pub fn api_key(&self) -> Option<String> {
        self.configured_api_key()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Key written in the file itself, ignoring blanks and unresolved `${...}` references.
    pub fn configured_api_key(&self) -> Option<String> {
        self.openai
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty() && !ENV_VAR.is_match(key))
    }

    pub fn base_url(&self) -> &str {
        self.openai.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn model(&self) -> &str {
        self.openai.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn max_tokens(&self) -> u32 {
        self.openai.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn temperature(&self) -> f32 {
        self.openai.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.openai.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn max_attempts(&self) -> u32 {
        self.retry.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry.delay_ms.unwrap_or(DEFAULT_BACKOFF_DELAY_MS))
    }

    pub fn saju_template_path(&self) -> &str {
        self.prompt
            .saju_template
            .as_deref()
            .unwrap_or(DEFAULT_SAJU_TEMPLATE)
    }

    pub fn daily_template_path(&self) -> Option<&str> {
        self.prompt.daily_template.as_deref()
    }

    pub fn response_format(&self) -> ResponseFormat {
        self.response.format.unwrap_or_default()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts(),
            delay: self.retry_delay(),
        }
    }

    pub fn chat_settings(&self) -> ChatSettings {
        ChatSettings {
            base_url: self.base_url().to_string(),
            api_key: self.api_key(),
            model: self.model().to_string(),
            max_tokens: self.max_tokens(),
            temperature: self.temperature(),
            timeout: Duration::from_secs(self.timeout_seconds()),
        }
    }
}

impl Validate for FortuneConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
