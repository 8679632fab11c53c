//! Generation settings for the Gemini client.
//!
//! `candidateCount` is always 1 and is not configurable. Temperature, safety
//! thresholds and the request layout come from `Config`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("unknown harm category '{0}'")]
    UnknownCategory(String),

    #[error("unknown block threshold '{0}'")]
    UnknownThreshold(String),

    #[error("expected CATEGORY=THRESHOLD, got '{0}'")]
    MalformedEntry(String),

    #[error("harm category '{0}' listed more than once")]
    DuplicateCategory(String),

    #[error("unknown request layout '{0}'")]
    UnknownLayout(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

impl HarmCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarmCategory::Harassment => "HARM_CATEGORY_HARASSMENT",
            HarmCategory::HateSpeech => "HARM_CATEGORY_HATE_SPEECH",
            HarmCategory::SexuallyExplicit => "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            HarmCategory::DangerousContent => "HARM_CATEGORY_DANGEROUS_CONTENT",
        }
    }
}

impl FromStr for HarmCategory {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let short = normalized
            .strip_prefix("HARM_CATEGORY_")
            .unwrap_or(normalized.as_str());
        match short {
            "HARASSMENT" => Ok(HarmCategory::Harassment),
            "HATE_SPEECH" => Ok(HarmCategory::HateSpeech),
            "SEXUALLY_EXPLICIT" => Ok(HarmCategory::SexuallyExplicit),
            "DANGEROUS_CONTENT" => Ok(HarmCategory::DangerousContent),
            _ => Err(SettingsError::UnknownCategory(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

impl FromStr for HarmBlockThreshold {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BLOCK_LOW_AND_ABOVE" => Ok(HarmBlockThreshold::BlockLowAndAbove),
            "BLOCK_MEDIUM_AND_ABOVE" => Ok(HarmBlockThreshold::BlockMediumAndAbove),
            "BLOCK_ONLY_HIGH" => Ok(HarmBlockThreshold::BlockOnlyHigh),
            "BLOCK_NONE" => Ok(HarmBlockThreshold::BlockNone),
            _ => Err(SettingsError::UnknownThreshold(s.trim().to_string())),
        }
    }
}

/// One `safetySettings` entry of a generateContent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// How a prompt is laid out in the request's `parts` array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestLayout {
    /// A single part holding the rendered instruction.
    #[default]
    Combined,
    /// Three parts: job description, resume text, rendered instruction.
    Segmented,
}

impl FromStr for RequestLayout {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" => Ok(RequestLayout::Combined),
            "segmented" => Ok(RequestLayout::Segmented),
            other => Err(SettingsError::UnknownLayout(other.to_string())),
        }
    }
}

impl fmt::Display for RequestLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestLayout::Combined => f.write_str("combined"),
            RequestLayout::Segmented => f.write_str("segmented"),
        }
    }
}

/// Everything the Gemini client needs. Built from `Config`, never from the
/// process environment directly.
#[derive(Clone)]
pub struct GenerationSettings {
    pub api_key: String,
    pub api_base: String,
    pub temperature: f32,
    pub safety_settings: Vec<SafetySetting>,
    pub request_layout: RequestLayout,
    pub timeout: Duration,
}

/// Parses `CATEGORY=THRESHOLD[,CATEGORY=THRESHOLD...]`.
/// An empty string or `none` yields no safety settings.
pub fn parse_safety_settings(raw: &str) -> Result<Vec<SafetySetting>, SettingsError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }

    let mut settings: Vec<SafetySetting> = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (category, threshold) = entry
            .split_once('=')
            .ok_or_else(|| SettingsError::MalformedEntry(entry.to_string()))?;
        let category: HarmCategory = category.parse()?;
        let threshold: HarmBlockThreshold = threshold.parse()?;

        if settings.iter().any(|s| s.category == category) {
            return Err(SettingsError::DuplicateCategory(
                category.as_str().to_string(),
            ));
        }
        settings.push(SafetySetting {
            category,
            threshold,
        });
    }
    Ok(settings)
}
