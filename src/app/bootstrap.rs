use crate::adapters::openai::OpenAiChatClient;
use crate::config::FortuneConfig;
use crate::core::prompt::{PromptTemplate, PromptTemplates};
use crate::core::service::InterpretationService;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

pub type FortuneService = InterpretationService<OpenAiChatClient>;

/// Load every configured template once. Any failure here is fatal at startup.
pub fn load_templates(config: &FortuneConfig) -> Result<PromptTemplates> {
    let saju = PromptTemplate::load(config.saju_template_path())?;
    let mut templates = PromptTemplates::new(saju);

    if let Some(path) = config.daily_template_path() {
        templates = templates.with_daily(PromptTemplate::load(path)?);
    }

    Ok(templates)
}

/// Wire configuration, templates, chat client and retry policy into a service.
pub fn build_service(config: &FortuneConfig) -> Result<FortuneService> {
    config.validate()?;

    let templates = load_templates(config)?;
    let settings = config.chat_settings();
    if settings.api_key.is_none() {
        tracing::warn!("No OpenAI API key configured; every interpretation will fail");
    }

    tracing::info!(
        "Fortune service ready (model: {}, max attempts: {}, backoff: {:?})",
        settings.model,
        config.max_attempts(),
        config.retry_delay()
    );

    Ok(InterpretationService::new(
        templates,
        OpenAiChatClient::new(settings),
        config.retry_policy(),
    ))
}
