use crate::domain::model::{BirthRecord, FortuneType, RenderedPrompt};
use crate::utils::error::{FortuneError, Result};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Rendered in place of the birth time when none was given.
pub const BIRTH_TIME_UNKNOWN: &str = "시간 미상";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder pattern")
});

/// Immutable prompt text with `{name}` placeholders, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    text: String,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a template artifact from disk. Missing, unreadable or blank files
    /// are startup errors.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let text = std::fs::read_to_string(path).map_err(|e| FortuneError::TemplateLoad {
            path: shown.clone(),
            reason: e.to_string(),
            source: Some(e),
        })?;

        if text.trim().is_empty() {
            return Err(FortuneError::template_load(shown, "template is empty"));
        }

        tracing::debug!("Loaded prompt template '{}' ({} bytes)", shown, text.len());
        Ok(Self::new(shown, text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placeholder names present in the template, in order of first appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.text) {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Single-pass substitution. Placeholders without a variable stay verbatim
    /// and substituted values are never scanned again.
    pub fn render(&self, variables: &HashMap<&str, String>) -> RenderedPrompt {
        let rendered = PLACEHOLDER.replace_all(&self.text, |caps: &Captures| {
            match variables.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        });
        RenderedPrompt::new(rendered.into_owned())
    }
}

/// Templates for the servable fortune types. DAILY falls back to the SAJU
/// template when no dedicated one is configured.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    saju: Arc<PromptTemplate>,
    daily: Option<Arc<PromptTemplate>>,
}

impl PromptTemplates {
    pub fn new(saju: PromptTemplate) -> Self {
        Self {
            saju: Arc::new(saju),
            daily: None,
        }
    }

    pub fn with_daily(mut self, daily: PromptTemplate) -> Self {
        self.daily = Some(Arc::new(daily));
        self
    }

    pub fn for_type(&self, fortune_type: FortuneType) -> Option<&PromptTemplate> {
        match fortune_type {
            FortuneType::Saju => Some(self.saju.as_ref()),
            FortuneType::Daily => Some(self.daily.as_deref().unwrap_or(self.saju.as_ref())),
            FortuneType::Tarot => None,
        }
    }
}

/// Format `HH:mm` as `HH시 MM분`. Absent times become the unknown marker and
/// anything that will not parse is echoed back unchanged.
pub fn format_birth_time(birth_time: Option<&str>) -> String {
    let raw = match birth_time.map(str::trim) {
        Some(t) if !t.is_empty() && !t.eq_ignore_ascii_case("unknown") => t,
        _ => return BIRTH_TIME_UNKNOWN.to_string(),
    };

    let parsed = match raw.split_once(':') {
        Some((hour, minute)) => hour
            .trim()
            .parse::<u32>()
            .and_then(|h| minute.trim().parse::<u32>().map(|m| (h, m))),
        None => raw.parse::<u32>().map(|h| (h, 0)),
    };

    match parsed {
        Ok((hour, minute)) => format!("{:02}시 {:02}분", hour, minute),
        Err(_) => {
            tracing::warn!("Could not format birth time '{}', using it as-is", raw);
            raw.to_string()
        }
    }
}

/// Variables every fortune prompt can reference.
pub fn prompt_variables(
    birth: &BirthRecord,
    fortune_type: FortuneType,
) -> HashMap<&'static str, String> {
    HashMap::from([
        ("gender", birth.gender.description().to_string()),
        ("birthDate", birth.birth_date.clone()),
        ("birthTime", format_birth_time(birth.birth_time.as_deref())),
        ("fortuneType", fortune_type.label().to_string()),
    ])
}
