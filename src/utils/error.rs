use crate::domain::model::FortuneType;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

/// Birth-info validation failures. Each variant carries the offending raw value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Malformed birth date '{value}': expected YYYY-MM-DD")]
    MalformedDate { value: String },

    #[error("Birth date '{value}' is in the future")]
    FutureDate { value: String },

    #[error("Birth date '{value}' is before 1900")]
    TooEarly { value: String },

    #[error("Malformed birth time '{value}': expected HH:mm")]
    MalformedTime { value: String },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::MalformedDate { .. } => ErrorKind::MalformedDate,
            ValidationError::FutureDate { .. } => ErrorKind::FutureDate,
            ValidationError::TooEarly { .. } => ErrorKind::TooEarly,
            ValidationError::MalformedTime { .. } => ErrorKind::MalformedTime,
        }
    }
}

/// Failure of a single call to the chat completion endpoint.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Chat client misconfigured: {message}")]
    Misconfigured { message: String },
}

impl TransportError {
    /// Network, timeout and non-success responses are transient; a broken
    /// client setup is not.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TransportError::Misconfigured { .. })
    }
}

/// The retry orchestrator's own failure kind for one attempt.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("invalid completion: {reason}")]
    InvalidShape { reason: String },
}

impl CompletionError {
    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        CompletionError::InvalidShape {
            reason: reason.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            CompletionError::Transport(e) => e.is_retryable(),
            CompletionError::InvalidShape { .. } => true,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CompletionError::Transport(_) => ErrorKind::Transport,
            CompletionError::InvalidShape { .. } => ErrorKind::InvalidCompletionShape,
        }
    }
}

/// Terminal outcome of a retry-orchestrated call.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("chat completion failed after {attempts} attempt(s): {last_error}")]
    Exhausted {
        attempts: u32,
        #[source]
        last_error: CompletionError,
    },

    #[error("chat completion aborted: {0}")]
    Aborted(#[source] TransportError),
}

#[derive(Error, Debug)]
pub enum FortuneError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to load prompt template '{path}': {reason}")]
    TemplateLoad {
        path: String,
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Fortune service error: {0}")]
    Orchestrator(#[from] OrchestratorError),

    #[error("Unsupported fortune type: {fortune_type}")]
    UnsupportedFortuneType { fortune_type: FortuneType },

    #[error("Unknown fortune type: {value}")]
    UnknownFortuneType { value: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type Result<T> = std::result::Result<T, FortuneError>;

/// Every classified failure the core can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    MalformedDate,
    FutureDate,
    TooEarly,
    MalformedTime,
    TemplateLoad,
    Configuration,
    Transport,
    InvalidCompletionShape,
    OrchestratorExhausted,
    UnsupportedFortuneType,
    UnknownFortuneType,
    UnclassifiedInternal,
}

impl ErrorKind {
    /// HTTP status the boundary layer answers with.
    pub fn status(self) -> u16 {
        match self {
            ErrorKind::MalformedDate
            | ErrorKind::FutureDate
            | ErrorKind::TooEarly
            | ErrorKind::MalformedTime
            | ErrorKind::UnknownFortuneType => 400,
            ErrorKind::UnsupportedFortuneType => 501,
            ErrorKind::OrchestratorExhausted => 503,
            ErrorKind::TemplateLoad
            | ErrorKind::Configuration
            | ErrorKind::Transport
            | ErrorKind::InvalidCompletionShape
            | ErrorKind::UnclassifiedInternal => 500,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::MalformedDate
            | ErrorKind::FutureDate
            | ErrorKind::TooEarly
            | ErrorKind::MalformedTime => "Validation Failed",
            ErrorKind::UnknownFortuneType => "Invalid Argument",
            ErrorKind::UnsupportedFortuneType => "Not Implemented",
            ErrorKind::OrchestratorExhausted => "Fortune Service Error",
            ErrorKind::TemplateLoad | ErrorKind::Configuration => "Startup Error",
            ErrorKind::Transport
            | ErrorKind::InvalidCompletionShape
            | ErrorKind::UnclassifiedInternal => "Internal Server Error",
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::Transport | ErrorKind::InvalidCompletionShape
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    ExternalService,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

/// Uniform error body handed to the boundary layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status: u16,
    pub error: String,
    pub kind: ErrorKind,
    pub message: String,
    pub timestamp: NaiveDateTime,
}

impl FortuneError {
    pub fn template_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        FortuneError::TemplateLoad {
            path: path.into(),
            reason: reason.into(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FortuneError::Validation(e) => e.kind(),
            FortuneError::TemplateLoad { .. } => ErrorKind::TemplateLoad,
            FortuneError::Orchestrator(OrchestratorError::Exhausted { .. }) => {
                ErrorKind::OrchestratorExhausted
            }
            FortuneError::Orchestrator(OrchestratorError::Aborted(_)) => {
                ErrorKind::UnclassifiedInternal
            }
            FortuneError::UnsupportedFortuneType { .. } => ErrorKind::UnsupportedFortuneType,
            FortuneError::UnknownFortuneType { .. } => ErrorKind::UnknownFortuneType,
            FortuneError::ConfigValidationError { .. }
            | FortuneError::InvalidConfigValueError { .. }
            | FortuneError::MissingConfigError { .. } => ErrorKind::Configuration,
            FortuneError::IoError(_)
            | FortuneError::SerializationError(_)
            | FortuneError::Internal { .. } => ErrorKind::UnclassifiedInternal,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.kind() {
            ErrorKind::MalformedDate
            | ErrorKind::FutureDate
            | ErrorKind::TooEarly
            | ErrorKind::MalformedTime
            | ErrorKind::UnsupportedFortuneType
            | ErrorKind::UnknownFortuneType => ErrorCategory::Input,
            ErrorKind::TemplateLoad | ErrorKind::Configuration => ErrorCategory::Configuration,
            ErrorKind::Transport
            | ErrorKind::InvalidCompletionShape
            | ErrorKind::OrchestratorExhausted => ErrorCategory::ExternalService,
            ErrorKind::UnclassifiedInternal => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::ExternalService => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// Message safe to show to the person who asked for the reading.
    pub fn user_friendly_message(&self) -> String {
        match self {
            FortuneError::Validation(ValidationError::MalformedDate { .. }) => {
                "생년월일 형식이 올바르지 않습니다. YYYY-MM-DD 형식으로 입력해주세요.".to_string()
            }
            FortuneError::Validation(ValidationError::FutureDate { .. }) => {
                "생년월일이 미래 날짜일 수 없습니다.".to_string()
            }
            FortuneError::Validation(ValidationError::TooEarly { .. }) => {
                "1900년 이후 출생자만 해석 가능합니다.".to_string()
            }
            FortuneError::Validation(ValidationError::MalformedTime { .. }) => {
                "생시 형식이 올바르지 않습니다. HH:mm 형식으로 입력해주세요.".to_string()
            }
            FortuneError::UnsupportedFortuneType { fortune_type } => {
                format!("{} 서비스는 준비 중입니다.", fortune_type.label())
            }
            FortuneError::UnknownFortuneType { value } => {
                format!("지원하지 않는 운세 타입입니다: {}", value)
            }
            FortuneError::Orchestrator(OrchestratorError::Exhausted { .. }) => {
                "사주 해석 서비스에 일시적인 문제가 발생했습니다. 잠시 후 다시 시도해주세요."
                    .to_string()
            }
            FortuneError::TemplateLoad { .. } => "프롬프트 템플릿을 로드할 수 없습니다.".to_string(),
            FortuneError::ConfigValidationError { field, .. }
            | FortuneError::InvalidConfigValueError { field, .. }
            | FortuneError::MissingConfigError { field } => {
                format!("설정값이 올바르지 않습니다: {}", field)
            }
            FortuneError::Orchestrator(OrchestratorError::Aborted(_))
            | FortuneError::IoError(_)
            | FortuneError::SerializationError(_)
            | FortuneError::Internal { .. } => "서버 내부 오류가 발생했습니다.".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::MalformedDate => "Use a real calendar date in YYYY-MM-DD form",
            ErrorKind::FutureDate => "Use a birth date no later than today",
            ErrorKind::TooEarly => "Only birth dates from 1900-01-01 onwards are supported",
            ErrorKind::MalformedTime => "Use HH:mm (00:00-23:59) or omit the birth time",
            ErrorKind::UnsupportedFortuneType => "Request SAJU or DAILY instead",
            ErrorKind::UnknownFortuneType => "Valid fortune types are SAJU, DAILY and TAROT",
            ErrorKind::OrchestratorExhausted | ErrorKind::Transport => {
                "The chat endpoint is degraded; try again later"
            }
            ErrorKind::InvalidCompletionShape => {
                "The chat endpoint returned an empty answer; try again later"
            }
            ErrorKind::TemplateLoad => "Check the [prompt] template paths in the configuration",
            ErrorKind::Configuration => "Fix the configuration file and restart",
            ErrorKind::UnclassifiedInternal => "Check the logs for the underlying cause",
        }
    }

    pub fn to_envelope(&self) -> ErrorEnvelope {
        let kind = self.kind();
        ErrorEnvelope {
            status: kind.status(),
            error: kind.title().to_string(),
            kind,
            message: self.user_friendly_message(),
            timestamp: Local::now().naive_local(),
        }
    }
}

impl From<toml::de::Error> for FortuneError {
    fn from(e: toml::de::Error) -> Self {
        FortuneError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}
