//! Renders the two evaluation prompts from a job description and resume text.
//!
//! Rendering is single-pass: `{name}` placeholders are only recognised in the fixed
//! template, so user text that happens to contain `{resume_text}` is passed through verbatim.

use std::fmt;

use serde::Serialize;

use crate::evaluation::prompts::{MATCH_EVALUATION_TEMPLATE, MISSING_KEYWORDS_TEMPLATE};
use crate::llm_client::settings::RequestLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    MatchEvaluation,
    MissingKeywords,
}

impl PromptKind {
    fn template(&self) -> &'static str {
        match self {
            PromptKind::MatchEvaluation => MATCH_EVALUATION_TEMPLATE,
            PromptKind::MissingKeywords => MISSING_KEYWORDS_TEMPLATE,
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptKind::MatchEvaluation => f.write_str("match_evaluation"),
            PromptKind::MissingKeywords => f.write_str("missing_keywords"),
        }
    }
}

/// A rendered prompt. Keeps the raw inputs so the client can send them as
/// separate parts when the segmented layout is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub job_description: String,
    pub resume_text: String,
    pub instruction: String,
}

impl Prompt {
    pub fn render(kind: PromptKind, job_description: &str, resume_text: &str) -> Self {
        let instruction = fill_template(
            kind.template(),
            &[
                ("job_description", job_description),
                ("resume_text", resume_text),
            ],
        );
        Self {
            kind,
            job_description: job_description.to_string(),
            resume_text: resume_text.to_string(),
            instruction,
        }
    }

    pub fn parts(&self, layout: RequestLayout) -> Vec<&str> {
        match layout {
            RequestLayout::Combined => vec![self.instruction.as_str()],
            RequestLayout::Segmented => vec![
                self.job_description.as_str(),
                self.resume_text.as_str(),
                self.instruction.as_str(),
            ],
        }
    }
}

/// The pair of prompts sent for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationPrompts {
    pub match_evaluation: Prompt,
    pub missing_keywords: Prompt,
}

pub fn build_prompts(job_description: &str, resume_text: &str) -> EvaluationPrompts {
    EvaluationPrompts {
        match_evaluation: Prompt::render(PromptKind::MatchEvaluation, job_description, resume_text),
        missing_keywords: Prompt::render(PromptKind::MissingKeywords, job_description, resume_text),
    }
}

/// Replaces `{key}` occurrences in `template` with the matching value.
/// Unknown `{...}` sequences are copied as-is. Values are never re-scanned.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
