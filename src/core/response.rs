use crate::core::prompt::format_birth_time;
use crate::domain::model::{BirthInfoSummary, BirthRecord, FortuneType, InterpretationResult};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Which JSON shape the boundary layer serializes results into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Minimal,
    Extended,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FortuneResponse {
    pub fortune_type: String,
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_info: Option<BirthInfoSummary>,
    pub created_at: NaiveDateTime,
}

impl FortuneResponse {
    pub fn from_result(result: &InterpretationResult, format: ResponseFormat) -> Self {
        Self {
            fortune_type: result.fortune_type.clone(),
            result: result.result_text.clone(),
            birth_info: match format {
                ResponseFormat::Minimal => None,
                ResponseFormat::Extended => Some(result.birth_info.clone()),
            },
            created_at: result.created_at,
        }
    }
}

pub fn summarize_birth_info(birth: &BirthRecord) -> BirthInfoSummary {
    BirthInfoSummary {
        birth_date: birth.birth_date.clone(),
        birth_time: format_birth_time(birth.birth_time.as_deref()),
        gender: birth.gender.description().to_string(),
    }
}

/// Build the immutable result, stamping it with the current local time.
pub fn assemble(
    fortune_type: FortuneType,
    result_text: String,
    birth: &BirthRecord,
) -> InterpretationResult {
    InterpretationResult {
        fortune_type: fortune_type.label().to_string(),
        result_text,
        created_at: Local::now().naive_local(),
        birth_info: summarize_birth_info(birth),
    }
}
