//! Report Synthesis — turns a profile into a canonical `ReportModel`.
//!
//! Flow: grade instruction → prompt → one LLM call → clean (fences, reasoning, brace
//! slice) → parse → validate/repair → `ReportModel`.
//!
//! Never fails outward. Any error along the way yields the Fallback Report with a
//! `degraded` status so callers and operators can tell an outage from a real report.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{extract_json_object, CompletionBackend, LlmError};
use crate::models::profile::{GradeLevel, SchoolRecord, StudentProfile};
use crate::models::report::ReportModel;
use crate::synthesis::fallback::{fallback_cases, fallback_report};
use crate::synthesis::prompts::{
    FRESHMAN_INSTRUCTION, MISSING_DATA_NOT_REQUESTED, MISSING_DATA_REQUESTED,
    MISSING_DATA_RULE_NOT_REQUESTED, MISSING_DATA_RULE_REQUESTED, RATE_KNOWN_NOTE,
    RATE_MISSING_NOTE, REPORT_PROMPT_TEMPLATE, SENIOR_INSTRUCTION, SOPHOMORE_INSTRUCTION,
};
use crate::synthesis::repair::{validate_report, Repair, ShapeError};

const NOT_FILLED: &str = "未填写";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisStatus {
    /// Generator output was valid as returned.
    Generated,
    /// Generator output was valid after shape repair.
    Repaired,
    /// Generator failed; the report is the Fallback Report.
    Degraded,
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisOutcome {
    pub report: ReportModel,
    pub status: SynthesisStatus,
    pub repairs: Vec<Repair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
}

/// Internal failure taxonomy. Never leaves this module as an error.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("generation endpoint failed: {0}")]
    Endpoint(#[from] LlmError),

    #[error("completion contained no JSON object")]
    NoJsonObject,

    #[error("completion is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("completion has unusable shape: {0}")]
    Shape(#[from] ShapeError),
}

// ────────────────────────────────────────────────────────────────────────────
// Synthesis pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Synthesizes a report for one submission. Exactly one outbound call, no retries.
pub async fn synthesize(
    backend: &dyn CompletionBackend,
    profile: &StudentProfile,
    school: &SchoolRecord,
) -> SynthesisOutcome {
    match try_synthesize(backend, profile, school).await {
        Ok((report, repairs)) => {
            let status = if repairs.is_empty() {
                SynthesisStatus::Generated
            } else {
                SynthesisStatus::Repaired
            };
            info!(
                "Synthesized report for {} ({:?}, {} repairs)",
                profile.school,
                status,
                repairs.len()
            );
            SynthesisOutcome {
                report,
                status,
                repairs,
                degraded_reason: None,
            }
        }
        Err(e) => {
            warn!("Report synthesis degraded to fallback: {e}");
            SynthesisOutcome {
                report: fallback_report(profile),
                status: SynthesisStatus::Degraded,
                repairs: Vec::new(),
                degraded_reason: Some(e.to_string()),
            }
        }
    }
}

async fn try_synthesize(
    backend: &dyn CompletionBackend,
    profile: &StudentProfile,
    school: &SchoolRecord,
) -> Result<(ReportModel, Vec<Repair>), SynthesisError> {
    let prompt = build_report_prompt(profile, school);
    let raw = backend.complete(&prompt, JSON_ONLY_SYSTEM).await?;
    parse_completion(&raw, profile, school)
}

/// Cleans, parses and validates one raw completion.
pub fn parse_completion(
    raw: &str,
    profile: &StudentProfile,
    school: &SchoolRecord,
) -> Result<(ReportModel, Vec<Repair>), SynthesisError> {
    let payload = extract_json_object(raw).ok_or(SynthesisError::NoJsonObject)?;
    let value: serde_json::Value = serde_json::from_str(&payload)?;
    let validated = validate_report(&value, &fallback_cases(profile), school.needs_backfill())?;
    Ok(validated)
}

/// Picks the planning/strategy block for the student's stage.
pub fn grade_instruction(grade: GradeLevel) -> &'static str {
    match grade {
        GradeLevel::Freshman => FRESHMAN_INSTRUCTION,
        GradeLevel::Sophomore => SOPHOMORE_INSTRUCTION,
        GradeLevel::Junior | GradeLevel::Senior => SENIOR_INSTRUCTION,
    }
}

/// Builds the synthesis prompt by filling the template with the profile and school record.
pub fn build_report_prompt(profile: &StudentProfile, school: &SchoolRecord) -> String {
    let (rate_note, missing_schema, missing_rule) = match school.rate {
        Some(rate) => (
            RATE_KNOWN_NOTE.replace("{rate}", &rate.to_string()),
            MISSING_DATA_NOT_REQUESTED,
            MISSING_DATA_RULE_NOT_REQUESTED,
        ),
        None => (
            RATE_MISSING_NOTE.to_string(),
            MISSING_DATA_REQUESTED,
            MISSING_DATA_RULE_REQUESTED,
        ),
    };

    fill_template(
        REPORT_PROMPT_TEMPLATE,
        &[
            ("grade_instruction", grade_instruction(profile.grade)),
            ("missing_data_schema", missing_schema),
            ("missing_data_rule", missing_rule),
            ("rate_note", &rate_note),
            ("destinations", or_not_filled(&school.destinations)),
            ("policy", or_not_filled(&school.policy)),
            ("grade", profile.grade.label()),
            ("rank", &profile.rank),
            ("english", &profile.english),
            ("competition", or_not_filled(&profile.competition)),
            ("research", or_not_filled(&profile.research)),
            ("focus", &profile.consultation_focus),
            ("school", &profile.school),
            ("major", &profile.major),
        ],
    )
}

/// Replaces each `{name}` in `template` with its value in one pass. Substituted text is
/// never rescanned, so user answers containing `{school}` and the like stay literal.
/// Braces that do not name a placeholder (the JSON schema) are copied through.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            values
                .iter()
                .find(|(name, _)| *name == &after[..close])
                .map(|(_, value)| (close, *value))
        });
        match value {
            Some((close, value)) => {
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

fn or_not_filled(text: &str) -> &str {
    if text.trim().is_empty() {
        NOT_FILLED
    } else {
        text
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod stub {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{CompletionBackend, LlmError};

    /// Canned backend: returns the configured completion or an API error, and records prompts.
    pub struct StubBackend {
        reply: Result<String, u16>,
        pub calls: AtomicUsize,
        pub prompts: Mutex<Vec<String>>,
    }

    impl StubBackend {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for StubBackend {
        async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "upstream unavailable".to_string(),
                }),
            }
        }
    }
}
