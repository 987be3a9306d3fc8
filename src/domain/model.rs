use crate::utils::error::FortuneError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Wording used inside prompts and echoed birth info.
    pub fn description(self) -> &'static str {
        match self {
            Gender::Male => "남성",
            Gender::Female => "여성",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MALE" | "M" => Ok(Gender::Male),
            "FEMALE" | "F" => Ok(Gender::Female),
            _ => Err(format!("unknown gender '{}', expected MALE or FEMALE", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FortuneType {
    Saju,
    Daily,
    Tarot,
}

impl FortuneType {
    pub fn label(self) -> &'static str {
        match self {
            FortuneType::Saju => "사주",
            FortuneType::Daily => "오늘의 운세",
            FortuneType::Tarot => "타로",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            FortuneType::Saju => "SAJU",
            FortuneType::Daily => "DAILY",
            FortuneType::Tarot => "TAROT",
        }
    }
}

impl fmt::Display for FortuneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FortuneType {
    type Err = FortuneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SAJU" => Ok(FortuneType::Saju),
            "DAILY" => Ok(FortuneType::Daily),
            "TAROT" => Ok(FortuneType::Tarot),
            _ => Err(FortuneError::UnknownFortuneType {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthRecord {
    pub birth_date: String,
    #[serde(default)]
    pub birth_time: Option<String>,
    pub gender: Gender,
}

impl BirthRecord {
    pub fn new(birth_date: impl Into<String>, birth_time: Option<String>, gender: Gender) -> Self {
        Self {
            birth_date: birth_date.into(),
            birth_time,
            gender,
        }
    }

    /// The birth time when one was actually given; blank and `unknown` count as absent.
    pub fn known_birth_time(&self) -> Option<&str> {
        self.birth_time
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("unknown"))
    }
}

/// An inbound request as parsed by the boundary layer. The fortune type stays
/// as received so that unrecognized values can be reported by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationRequest {
    #[serde(flatten)]
    pub birth: BirthRecord,
    pub fortune_type: String,
}

impl InterpretationRequest {
    pub fn new(birth: BirthRecord, fortune_type: impl Into<String>) -> Self {
        Self {
            birth,
            fortune_type: fortune_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    text: String,
}

impl RenderedPrompt {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Unparsed answer from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompletion {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthInfoSummary {
    pub birth_date: String,
    pub birth_time: String,
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretationResult {
    pub fortune_type: String,
    pub result_text: String,
    pub created_at: NaiveDateTime,
    pub birth_info: BirthInfoSummary,
}
