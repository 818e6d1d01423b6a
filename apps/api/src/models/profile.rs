use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// The four undergraduate stages a student can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GradeLevel {
    #[serde(rename = "大一")]
    Freshman,
    #[serde(rename = "大二")]
    Sophomore,
    #[serde(rename = "大三")]
    Junior,
    #[serde(rename = "大四")]
    Senior,
}

impl GradeLevel {
    pub fn label(&self) -> &'static str {
        match self {
            GradeLevel::Freshman => "大一",
            GradeLevel::Sophomore => "大二",
            GradeLevel::Junior => "大三",
            GradeLevel::Senior => "大四",
        }
    }
}

/// A student's self-reported academic profile, as submitted by the intake form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub name: String,
    /// Phone number or other contact handle.
    pub contact: String,
    pub school: String,
    pub major: String,
    pub grade: GradeLevel,
    /// Rank bracket such as `前5%`, `前20%` or `暂未排名/不知道`.
    pub rank: String,
    pub english: String,
    #[serde(default)]
    pub competition: String,
    #[serde(default)]
    pub research: String,
    pub consultation_focus: String,
}

impl StudentProfile {
    /// Rejects profiles missing any field synthesis depends on.
    /// Competition and research are optional and may be blank.
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("name", &self.name),
            ("contact", &self.contact),
            ("school", &self.school),
            ("major", &self.major),
            ("rank", &self.rank),
            ("english", &self.english),
            ("consultationFocus", &self.consultation_focus),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// School metadata matched to the profile by the lookup table.
///
/// `rate == None` means the table has no admission rate for this school and the
/// generator is asked to backfill it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    pub name: String,
    /// Percentage of the graduating class admitted by recommendation, e.g. `15.5`.
    pub rate: Option<f64>,
    #[serde(default)]
    pub destinations: String,
    #[serde(default)]
    pub policy: String,
}

impl SchoolRecord {
    /// Record for a school the lookup table does not know.
    pub fn unknown(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rate: None,
            destinations: String::new(),
            policy: String::new(),
        }
    }

    pub fn needs_backfill(&self) -> bool {
        self.rate.is_none()
    }
}
