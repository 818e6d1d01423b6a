//! Competitiveness scoring — pluggable strategy mapping free-text profile answers to
//! a five-axis score vector for the radar chart.
//!
//! Default: `HeuristicScorer` (keyword and length buckets, pure, deterministic).
//! `AppState` holds an `Arc<dyn ScoringStrategy>` so a calibrated model can replace it
//! without touching the renderers.

use serde::{Deserialize, Serialize};

use crate::models::profile::StudentProfile;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// The five radar axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Rank,
    Research,
    English,
    Competition,
    School,
}

impl Dimension {
    /// Radar axis order, clockwise from the top.
    pub const ALL: [Dimension; 5] = [
        Dimension::Rank,
        Dimension::Research,
        Dimension::English,
        Dimension::Competition,
        Dimension::School,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Rank => "绩点排名",
            Dimension::Research => "科研能力",
            Dimension::English => "英语水平",
            Dimension::Competition => "竞赛奖项",
            Dimension::School => "院校背景",
        }
    }
}

/// Normalized 0–100 scores, one per dimension. Derived per render, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitivenessVector {
    pub rank: u8,
    pub research: u8,
    pub english: u8,
    pub competition: u8,
    pub school: u8,
}

impl CompetitivenessVector {
    pub fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Rank => self.rank,
            Dimension::Research => self.research,
            Dimension::English => self.english,
            Dimension::Competition => self.competition,
            Dimension::School => self.school,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends.
pub trait ScoringStrategy: Send + Sync {
    /// Scores one free-text answer on one dimension. Must return a value in `0..=100`.
    fn score(&self, text: &str, dimension: Dimension) -> u8;

    fn vector(&self, profile: &StudentProfile) -> CompetitivenessVector {
        CompetitivenessVector {
            rank: self.score(&profile.rank, Dimension::Rank),
            research: self.score(&profile.research, Dimension::Research),
            english: self.score(&profile.english, Dimension::English),
            competition: self.score(&profile.competition, Dimension::Competition),
            school: self.score(&profile.school, Dimension::School),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicScorer — default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Blank or "none" answers. Low but non-zero so the radar shape stays legible.
pub const EMPTY_SCORE: u8 = 30;
pub const BASELINE_SCORE: u8 = 60;

const TOP_RANK_SCORE: u8 = 95;

const NONE_MARKERS: &[&str] = &["无", "暂无", "没有", "none", "n/a", "-"];
const LEVEL_SIX_MARKERS: &[&str] = &["6级", "六级", "cet-6", "cet6", "cet 6"];
const LEVEL_FOUR_MARKERS: &[&str] = &["4级", "四级", "cet-4", "cet4", "cet 4"];

/// Keyword and length buckets.
///
/// The research/competition length rule (> 8 chars) and the school-name length rule
/// (> 4 chars) are placeholder heuristics awaiting product clarification; they are
/// kept as-is so existing reports stay comparable.
pub struct HeuristicScorer;

impl ScoringStrategy for HeuristicScorer {
    fn score(&self, text: &str, dimension: Dimension) -> u8 {
        if is_blank_answer(text) {
            return EMPTY_SCORE;
        }
        let text = text.trim();

        match dimension {
            Dimension::Rank => score_rank(text),
            Dimension::English => score_english(text),
            Dimension::Research | Dimension::Competition => {
                if text.chars().count() > 8 {
                    90
                } else {
                    BASELINE_SCORE
                }
            }
            // Shorter names score higher: a crude stand-in for well-known short-named schools.
            Dimension::School => {
                if text.chars().count() > 4 {
                    80
                } else {
                    90
                }
            }
        }
    }
}

fn is_blank_answer(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.contains("未填写") {
        return true;
    }
    let lower = trimmed.to_lowercase();
    NONE_MARKERS.iter().any(|m| lower == *m)
}

/// Top 1%/5% → 95, 10% → 85, 20% → 75, anything else (50%, unranked) → 60.
fn score_rank(text: &str) -> u8 {
    match first_percentage(text) {
        Some(p) if p <= 5.0 => TOP_RANK_SCORE,
        Some(p) if p <= 10.0 => 85,
        Some(p) if p <= 20.0 => 75,
        _ => BASELINE_SCORE,
    }
}

fn score_english(text: &str) -> u8 {
    let lower = text.to_lowercase();
    if LEVEL_SIX_MARKERS.iter().any(|m| lower.contains(m))
        || numeric_tokens(&lower).any(|n| n > 500)
    {
        85
    } else if LEVEL_FOUR_MARKERS.iter().any(|m| lower.contains(m)) {
        70
    } else {
        BASELINE_SCORE
    }
}

/// Parses the number immediately preceding the first `%` (ASCII or full-width).
fn first_percentage(text: &str) -> Option<f64> {
    let chars: Vec<char> = text.chars().collect();
    let pct = chars.iter().position(|c| *c == '%' || *c == '％')?;

    let start = chars[..pct]
        .iter()
        .rposition(|c| !(c.is_ascii_digit() || *c == '.'))
        .map(|i| i + 1)
        .unwrap_or(0);

    chars[start..pct].iter().collect::<String>().parse().ok()
}

/// Runs of ASCII digits, parsed as integers.
fn numeric_tokens(text: &str) -> impl Iterator<Item = u32> + '_ {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse().ok())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{fixtures, GradeLevel};

    fn score(text: &str, dimension: Dimension) -> u8 {
        HeuristicScorer.score(text, dimension)
    }

    #[test]
    fn test_blank_and_none_markers_score_30_on_every_dimension() {
        for dimension in Dimension::ALL {
            for text in ["", "   ", "无", "未填写", "暂无", "None"] {
                assert_eq!(score(text, dimension), EMPTY_SCORE, "{text:?} on {dimension:?}");
            }
        }
    }

    #[test]
    fn test_rank_brackets() {
        assert_eq!(score("前1%", Dimension::Rank), 95);
        assert_eq!(score("前5%", Dimension::Rank), 95);
        assert_eq!(score("前10%", Dimension::Rank), 85);
        assert_eq!(score("前20%", Dimension::Rank), 75);
        assert_eq!(score("前50%", Dimension::Rank), 60);
        assert_eq!(score("其他", Dimension::Rank), 60);
        assert_eq!(score("暂未排名/不知道", Dimension::Rank), 60);
    }

    #[test]
    fn test_rank_fifteen_percent_is_not_top_five() {
        assert_eq!(score("前15%", Dimension::Rank), 75);
    }

    #[test]
    fn test_rank_full_width_percent() {
        assert_eq!(score("专业前10％", Dimension::Rank), 85);
    }

    #[test]
    fn test_english_levels() {
        assert_eq!(score("六级 480", Dimension::English), 85);
        assert_eq!(score("CET-6", Dimension::English), 85);
        assert_eq!(score("四级", Dimension::English), 70);
        assert_eq!(score("四级 560", Dimension::English), 85);
        assert_eq!(score("雅思7.0", Dimension::English), 60);
        assert_eq!(score("托福 100", Dimension::English), 60);
    }

    #[test]
    fn test_research_and_competition_length_proxy() {
        assert_eq!(score("大创项目", Dimension::Research), 60);
        assert_eq!(score("国家级大创项目负责人一项", Dimension::Research), 90);
        assert_eq!(score("数模国一", Dimension::Competition), 60);
        assert_eq!(score("exactly8", Dimension::Competition), 60);
        assert_eq!(score("nine char", Dimension::Competition), 90);
    }

    #[test]
    fn test_school_name_length_proxy() {
        assert_eq!(score("清华大学", Dimension::School), 90);
        assert_eq!(score("南京航空航天大学", Dimension::School), 80);
    }

    #[test]
    fn test_scores_are_always_fixed_buckets() {
        // Scores are bucketed, never interpolated.
        let buckets = [30, 60, 70, 75, 80, 85, 90, TOP_RANK_SCORE];
        let samples = [
            "", "前3%", "前12%", "六级600", "四级", "IELTS 6.5", "一篇EI会议论文在投", "x",
            "前100%", "ＡＢＣ", "无",
        ];
        for dimension in Dimension::ALL {
            for text in samples {
                let s = score(text, dimension);
                assert!(buckets.contains(&s), "{s} from {text:?} is not a bucket");
            }
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let profile = fixtures::profile();
        let a = HeuristicScorer.vector(&profile);
        let b = HeuristicScorer.vector(&profile);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_freshman_with_blank_answers() {
        let mut profile = fixtures::profile();
        profile.grade = GradeLevel::Freshman;
        profile.rank = "前5%".to_string();
        profile.english = String::new();
        profile.research = String::new();
        profile.competition = String::new();

        let vector = HeuristicScorer.vector(&profile);
        assert_eq!(vector.rank, 95);
        assert_eq!(vector.research, 30);
        assert_eq!(vector.english, 30);
        assert_eq!(vector.competition, 30);
        assert_eq!(vector.school, score(&profile.school, Dimension::School));
    }

    #[test]
    fn test_vector_get_matches_fields() {
        let vector = HeuristicScorer.vector(&fixtures::profile());
        assert_eq!(vector.get(Dimension::Rank), vector.rank);
        assert_eq!(vector.get(Dimension::School), vector.school);
    }
}
