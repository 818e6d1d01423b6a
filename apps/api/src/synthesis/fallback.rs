//! Fallback Report — fixed content returned whenever synthesis cannot produce a valid report.
//!
//! Depends only on the profile's school and major, so repeated calls for the same
//! profile are byte-identical.

use crate::models::profile::StudentProfile;
use crate::models::report::{AdmissionCase, ReportModel, Swot, TargetSchools};

const UNAVAILABLE: &str = "数据获取失败";

pub fn fallback_report(profile: &StudentProfile) -> ReportModel {
    ReportModel {
        swot: Swot {
            strengths: strings(&["院校背景尚可", "有明确的规划意识"]),
            weaknesses: strings(&["暂无核心竞赛成果", "科研经历空白"]),
            opportunities: strings(&["本校推免名额可能增加", "交叉学科方向红利"]),
            threats: strings(&["保研竞争持续加剧", "外校优质生源增多"]),
        },
        bonus_schemes: Vec::new(),
        planning: Vec::new(),
        research_advice: "1. 推荐方向：结合本专业热点选择。\n2. 推荐期刊：从校级期刊起步。\n3. 寻找导师：主动发邮件联系。"
            .to_string(),
        competitions: "建议参加中国国际大学生创新大赛（原互联网+）。".to_string(),
        target_schools: TargetSchools {
            sprint: UNAVAILABLE.to_string(),
            stable: UNAVAILABLE.to_string(),
            safety: UNAVAILABLE.to_string(),
        },
        admission_cases: fallback_cases(profile),
        missing_data: None,
    }
}

/// Three generic same-school cases; also used to pad a short generated case list.
pub fn fallback_cases(profile: &StudentProfile) -> Vec<AdmissionCase> {
    [
        ("张同学", "Rank 5%", "六级 550", "浙江大学"),
        ("李同学", "Rank 15%", "六级 500", "厦门大学"),
        ("王同学", "Rank 10%", "六级 520", "武汉大学"),
    ]
    .into_iter()
    .map(|(student, gpa, english, offer)| AdmissionCase {
        student: student.to_string(),
        school: profile.school.clone(),
        major: profile.major.clone(),
        gpa: gpa.to_string(),
        english: english.to_string(),
        offer: offer.to_string(),
    })
    .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
