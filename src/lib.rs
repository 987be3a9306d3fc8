pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::openai::{ChatSettings, OpenAiChatClient};
pub use app::bootstrap::{build_service, FortuneService};
pub use config::FortuneConfig;
pub use core::prompt::{PromptTemplate, PromptTemplates};
pub use core::response::{FortuneResponse, ResponseFormat};
pub use core::retry::{FixedBackoff, RetryOrchestrator, RetryPolicy};
pub use core::service::InterpretationService;
pub use domain::model::{BirthRecord, FortuneType, Gender, InterpretationRequest, InterpretationResult};
pub use utils::error::{ErrorEnvelope, ErrorKind, FortuneError, Result};
