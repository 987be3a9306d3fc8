use crate::core::prompt::{prompt_variables, PromptTemplates};
use crate::core::response::assemble;
use crate::core::retry::{FixedBackoff, RetryOrchestrator, RetryPolicy};
use crate::core::validator::validate_birth_record;
use crate::domain::model::{FortuneType, InterpretationRequest, InterpretationResult};
use crate::domain::ports::{Backoff, ChatClient};
use crate::utils::error::{FortuneError, Result};

/// Entry point of the interpretation pipeline: validate, render, call, assemble.
pub struct InterpretationService<C: ChatClient, B: Backoff = FixedBackoff> {
    templates: PromptTemplates,
    orchestrator: RetryOrchestrator<C, B>,
}

impl<C: ChatClient> InterpretationService<C, FixedBackoff> {
    pub fn new(templates: PromptTemplates, client: C, policy: RetryPolicy) -> Self {
        Self::with_orchestrator(templates, RetryOrchestrator::new(client, policy))
    }
}

impl<C: ChatClient, B: Backoff> InterpretationService<C, B> {
    pub fn with_orchestrator(templates: PromptTemplates, orchestrator: RetryOrchestrator<C, B>) -> Self {
        Self {
            templates,
            orchestrator,
        }
    }

    pub async fn interpret(&self, request: &InterpretationRequest) -> Result<InterpretationResult> {
        tracing::info!(
            "Interpretation requested - type: {}, birth date: {}",
            request.fortune_type,
            request.birth.birth_date
        );

        validate_birth_record(&request.birth)?;

        let fortune_type: FortuneType = request.fortune_type.parse()?;
        let template = match fortune_type {
            FortuneType::Tarot => {
                tracing::warn!("Rejected request for unsupported fortune type {}", fortune_type);
                return Err(FortuneError::UnsupportedFortuneType { fortune_type });
            }
            servable => self.templates.for_type(servable).ok_or_else(|| FortuneError::Internal {
                message: format!("no prompt template registered for {}", servable),
            })?,
        };

        let prompt = template.render(&prompt_variables(&request.birth, fortune_type));
        tracing::debug!(
            "Rendered prompt from '{}' ({} chars)",
            template.name(),
            prompt.as_str().chars().count()
        );

        let text = self.orchestrator.call_with_retry(&prompt).await?;

        let result = assemble(fortune_type, text, &request.birth);
        tracing::info!(
            "Interpretation completed - type: {}, length: {} chars",
            fortune_type,
            result.result_text.chars().count()
        );
        Ok(result)
    }
}
