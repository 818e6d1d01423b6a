//! Report View — the one layout-agnostic projection of a finished report.
//!
//! Built once per render from the profile, school record, report model and score vector.
//! The on-screen document, the rasterized PDF and the native deck all read from this
//! model, so a fact (rate, destinations, policy, tiers) can only be resolved in one place.

use serde::Serialize;

use crate::models::profile::{SchoolRecord, StudentProfile};
use crate::models::report::{AdmissionCase, BonusScheme, ReportModel, StageContent, Tier};
use crate::scoring::{CompetitivenessVector, Dimension};

/// Rate shown when neither the generator nor the school table has one.
pub const DEFAULT_RATE: f64 = 15.0;
pub const REPORT_TITLE: &str = "保研定位与发展规划";

#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub title: String,
    pub identity: String,
    pub facts: DisplayFacts,
    pub policy_segments: Vec<String>,
    pub swot: Vec<SwotQuadrant>,
    pub radar: Vec<RadarAxis>,
    pub bonus_schemes: Vec<BonusScheme>,
    pub tiers: Vec<TierView>,
    pub timeline: Vec<StageView>,
    pub research_advice: String,
    pub competitions: String,
    pub admission_cases: Vec<AdmissionCase>,
}

/// Where a displayed school fact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactSource {
    Generated,
    SchoolTable,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayFacts {
    pub rate: f64,
    pub rate_source: FactSource,
    pub destinations: Vec<String>,
    pub policy: String,
}

impl DisplayFacts {
    /// Resolves school facts. Generator backfill is read only when the lookup table has
    /// no rate for the school; a known record always wins.
    pub fn resolve(school: &SchoolRecord, report: &ReportModel) -> Self {
        let missing = report
            .missing_data
            .as_ref()
            .filter(|_| school.needs_backfill());

        let (rate, rate_source) = match (missing.and_then(|m| m.rate), school.rate) {
            (Some(r), _) if r > 0.0 => (r, FactSource::Generated),
            (_, Some(r)) if r > 0.0 => (r, FactSource::SchoolTable),
            _ => (DEFAULT_RATE, FactSource::Default),
        };

        let policy = missing
            .and_then(|m| m.policy.clone())
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| school.policy.clone());

        let destinations = match missing.map(|m| &m.destinations) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => split_destinations(&school.destinations),
        };

        Self {
            rate,
            rate_source,
            destinations,
            policy,
        }
    }

    /// `18.5` → `"18.5"`, `15.0` → `"15"`.
    pub fn rate_label(&self) -> String {
        if self.rate.fract() == 0.0 {
            format!("{}", self.rate as i64)
        } else {
            format!("{:.1}", self.rate)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwotKind {
    Strengths,
    Weaknesses,
    Opportunities,
    Threats,
}

impl SwotKind {
    pub fn label(&self) -> &'static str {
        match self {
            SwotKind::Strengths => "核心优势",
            SwotKind::Weaknesses => "劣势短板",
            SwotKind::Opportunities => "外部机会",
            SwotKind::Threats => "潜在威胁",
        }
    }

    /// Accent colour as `RRGGBB`.
    pub fn accent(&self) -> &'static str {
        match self {
            SwotKind::Strengths => "00B36B",
            SwotKind::Weaknesses => "FF4D4F",
            SwotKind::Opportunities => "1890FF",
            SwotKind::Threats => "FFA500",
        }
    }

    /// Quadrant tint as `RRGGBB`.
    pub fn tint(&self) -> &'static str {
        match self {
            SwotKind::Strengths => "F0FDF4",
            SwotKind::Weaknesses => "FEF2F2",
            SwotKind::Opportunities => "EFF6FF",
            SwotKind::Threats => "FFF7ED",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SwotQuadrant {
    pub kind: SwotKind,
    pub label: &'static str,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadarAxis {
    pub dimension: Dimension,
    pub label: &'static str,
    pub score: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierView {
    pub tier: Tier,
    pub heading: &'static str,
    pub text: String,
}

impl TierView {
    /// Column accent colour as `RRGGBB`.
    pub fn accent(&self) -> &'static str {
        match self.tier {
            Tier::Sprint => "FF4D4F",
            Tier::Stable => "1890FF",
            Tier::Safety => "52C41A",
        }
    }
}

/// One advice track of a planning stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Gpa,
    English,
    Research,
    Contest,
}

impl Track {
    pub fn label(&self) -> &'static str {
        match self {
            Track::Gpa => "成绩",
            Track::English => "英语",
            Track::Research => "科研",
            Track::Contest => "竞赛",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackLine {
    pub track: Track,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageView {
    pub stage: String,
    pub lines: Vec<TrackLine>,
}

impl StageView {
    fn from_content(stage: &str, content: &StageContent) -> Self {
        let lines = [
            (Track::Gpa, &content.gpa),
            (Track::English, &content.english),
            (Track::Research, &content.research),
            (Track::Contest, &content.contest),
        ]
        .into_iter()
        .map(|(track, text)| TrackLine {
            track,
            text: text.clone(),
        })
        .collect();

        Self {
            stage: stage.to_string(),
            lines,
        }
    }

    pub fn line(&self, track: Track) -> Option<&str> {
        self.lines
            .iter()
            .find(|l| l.track == track)
            .map(|l| l.text.as_str())
    }
}

impl ReportView {
    pub fn build(
        profile: &StudentProfile,
        school: &SchoolRecord,
        report: &ReportModel,
        vector: &CompetitivenessVector,
    ) -> Self {
        let facts = DisplayFacts::resolve(school, report);
        let policy_segments = split_policy(&facts.policy);

        let swot = [
            (SwotKind::Strengths, &report.swot.strengths),
            (SwotKind::Weaknesses, &report.swot.weaknesses),
            (SwotKind::Opportunities, &report.swot.opportunities),
            (SwotKind::Threats, &report.swot.threats),
        ]
        .into_iter()
        .map(|(kind, items)| SwotQuadrant {
            kind,
            label: kind.label(),
            items: items.clone(),
        })
        .collect();

        let radar = Dimension::ALL
            .into_iter()
            .map(|dimension| RadarAxis {
                dimension,
                label: dimension.label(),
                score: vector.get(dimension),
            })
            .collect();

        let tiers = Tier::ALL
            .into_iter()
            .map(|tier| TierView {
                tier,
                heading: tier.heading(),
                text: report.target_schools.get(tier).to_string(),
            })
            .collect();

        let timeline = report
            .planning
            .iter()
            .map(|s| StageView::from_content(&s.stage, &s.category_content))
            .collect();

        Self {
            title: REPORT_TITLE.to_string(),
            identity: format!(
                "申请人：{} | 本科：{} | 专业：{}",
                profile.name, profile.school, profile.major
            ),
            facts,
            policy_segments,
            swot,
            radar,
            bonus_schemes: report.bonus_schemes.clone(),
            tiers,
            timeline,
            research_advice: report.research_advice.clone(),
            competitions: report.competitions.clone(),
            admission_cases: report.admission_cases.clone(),
        }
    }
}

/// Splits a destination list on ASCII/full-width commas and `、`, dropping one-char fragments.
pub fn split_destinations(text: &str) -> Vec<String> {
    text.split([',', '，', '、'])
        .map(str::trim)
        .filter(|s| s.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

/// Splits policy prose after each `。` or `；`, dropping fragments of five chars or fewer.
fn split_policy(policy: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    for c in policy.chars() {
        current.push(c);
        if c == '。' || c == '；' {
            segments.push(std::mem::take(&mut current));
        }
    }
    segments.push(current);

    segments
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| s.chars().count() > 5)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::fixtures;
    use crate::models::report::{MissingData, TimelineStage};
    use crate::scoring::{HeuristicScorer, ScoringStrategy};

    fn build(school: &SchoolRecord, report: &ReportModel) -> ReportView {
        let profile = fixtures::profile();
        let vector = HeuristicScorer.vector(&profile);
        ReportView::build(&profile, school, report, &vector)
    }

    #[test]
    fn test_school_table_facts_used_without_backfill() {
        let view = build(&fixtures::school(), &ReportModel::default());
        assert_eq!(view.facts.rate, 18.5);
        assert_eq!(view.facts.rate_source, FactSource::SchoolTable);
        assert_eq!(
            view.facts.destinations,
            vec!["清华大学", "北京大学", "南京大学", "东南大学"]
        );
        assert_eq!(view.facts.rate_label(), "18.5");
    }

    #[test]
    fn test_backfilled_facts_override_null_rate() {
        let school = SchoolRecord::unknown("某理工学院");
        let report = ReportModel {
            missing_data: Some(MissingData {
                rate: Some(12.0),
                policy: Some("综合成绩排名前列者获推免资格。".to_string()),
                destinations: vec!["浙江大学".to_string()],
            }),
            ..ReportModel::default()
        };

        let view = build(&school, &report);
        assert_eq!(view.facts.rate, 12.0);
        assert_eq!(view.facts.rate_source, FactSource::Generated);
        assert_eq!(view.facts.rate_label(), "12");
        assert_eq!(view.facts.destinations, vec!["浙江大学"]);
        assert_eq!(view.policy_segments.len(), 1);
    }

    #[test]
    fn test_known_school_ignores_stale_backfill() {
        let report = ReportModel {
            missing_data: Some(MissingData {
                rate: Some(9.5),
                policy: Some("生成的政策说明，不应出现。".to_string()),
                destinations: vec!["浙江大学".to_string()],
            }),
            ..ReportModel::default()
        };

        let view = build(&fixtures::school(), &report);
        assert_eq!(view.facts.rate, 18.5);
        assert_eq!(view.facts.rate_source, FactSource::SchoolTable);
        assert_eq!(view.facts.policy, fixtures::school().policy);
        assert_eq!(view.facts.destinations.len(), 4);
    }

    #[test]
    fn test_default_rate_when_nothing_known() {
        let view = build(&SchoolRecord::unknown("某学院"), &ReportModel::default());
        assert_eq!(view.facts.rate, DEFAULT_RATE);
        assert_eq!(view.facts.rate_source, FactSource::Default);
        assert!(view.facts.destinations.is_empty());
        assert!(view.policy_segments.is_empty());
    }

    #[test]
    fn test_policy_split_on_sentence_marks() {
        let segments = split_policy("第一条规定内容较长。短句。第三条：竞赛加分上限为三分；其余略");
        assert_eq!(
            segments,
            vec!["第一条规定内容较长。", "第三条：竞赛加分上限为三分；"]
        );
    }

    #[test]
    fn test_view_keeps_section_order_and_tracks() {
        let report = ReportModel {
            planning: vec![TimelineStage {
                stage: "大二下学期".to_string(),
                category_content: StageContent {
                    gpa: "保持前10%".to_string(),
                    english: "六级刷分".to_string(),
                    research: "进组".to_string(),
                    contest: "数模".to_string(),
                },
            }],
            ..ReportModel::default()
        };
        let view = build(&fixtures::school(), &report);

        assert_eq!(view.swot.len(), 4);
        assert_eq!(view.swot[0].kind, SwotKind::Strengths);
        assert_eq!(view.radar.len(), 5);
        assert_eq!(view.tiers[0].tier, Tier::Sprint);
        assert_eq!(view.tiers[2].tier, Tier::Safety);
        assert_eq!(view.timeline[0].line(Track::English), Some("六级刷分"));
        assert!(view.identity.contains("张三"));
    }
}
