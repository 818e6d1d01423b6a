//! Canonical report model produced by synthesis (or its fallback) and consumed by both exporters.
//!
//! Every list field deserializes to an empty list when absent so consumers never need
//! null checks. Untrusted generator output does NOT go through these derives directly;
//! it is validated and repaired field-by-field in `synthesis::repair` first.

use serde::{Deserialize, Serialize};

/// Number of admission cases every report carries.
pub const ADMISSION_CASE_COUNT: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportModel {
    #[serde(default)]
    pub swot: Swot,
    #[serde(default, alias = "bonusScheme")]
    pub bonus_schemes: Vec<BonusScheme>,
    #[serde(default)]
    pub planning: Vec<TimelineStage>,
    #[serde(default)]
    pub research_advice: String,
    #[serde(default)]
    pub competitions: String,
    #[serde(default)]
    pub target_schools: TargetSchools,
    #[serde(default)]
    pub admission_cases: Vec<AdmissionCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_data: Option<MissingData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Swot {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub threats: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusScheme {
    pub category: String,
    #[serde(default)]
    pub items: Vec<BonusItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusItem {
    pub item: String,
    /// Score text such as `加 1-2分`; kept verbatim.
    pub score: String,
    #[serde(rename = "desc", alias = "description")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStage {
    pub stage: String,
    #[serde(default)]
    pub category_content: StageContent,
}

/// The four advice tracks of one planning stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageContent {
    #[serde(default)]
    pub gpa: String,
    #[serde(default)]
    pub english: String,
    #[serde(default)]
    pub research: String,
    #[serde(default)]
    pub contest: String,
}

/// School recommendation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Sprint,
    Stable,
    Safety,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Sprint, Tier::Stable, Tier::Safety];

    /// Key used in the generator contract.
    pub fn key(&self) -> &'static str {
        match self {
            Tier::Sprint => "冲刺院校",
            Tier::Stable => "稳妥院校",
            Tier::Safety => "保底院校",
        }
    }

    /// Every key spelling accepted from the generator for this tier.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Tier::Sprint => &["冲刺院校", "冲刺", "sprint"],
            Tier::Stable => &["稳妥院校", "稳妥", "stable"],
            Tier::Safety => &["保底院校", "保底", "safety"],
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Tier::Sprint => "冲刺 (Sprint)",
            Tier::Stable => "稳妥 (Stable)",
            Tier::Safety => "保底 (Safety)",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetSchools {
    #[serde(default, rename = "冲刺院校", alias = "sprint")]
    pub sprint: String,
    #[serde(default, rename = "稳妥院校", alias = "stable")]
    pub stable: String,
    #[serde(default, rename = "保底院校", alias = "safety")]
    pub safety: String,
}

impl TargetSchools {
    pub fn get(&self, tier: Tier) -> &str {
        match tier {
            Tier::Sprint => &self.sprint,
            Tier::Stable => &self.stable,
            Tier::Safety => &self.safety,
        }
    }

    pub fn set(&mut self, tier: Tier, text: String) {
        match tier {
            Tier::Sprint => self.sprint = text,
            Tier::Stable => self.stable = text,
            Tier::Safety => self.safety = text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmissionCase {
    /// Anonymised label such as `王同学`.
    pub student: String,
    /// Undergraduate school of the case.
    pub school: String,
    pub major: String,
    pub gpa: String,
    pub english: String,
    pub offer: String,
}

/// School facts estimated by the generator when the lookup table has no rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingData {
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub policy: Option<String>,
    #[serde(default)]
    pub destinations: Vec<String>,
}
