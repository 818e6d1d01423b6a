//! Schema validation and shape repair for untrusted generator output.
//!
//! The parsed JSON is read field-by-field against the canonical `ReportModel`. Known
//! divergences are repaired in place and recorded as a `Repair`; anything else is a
//! `ShapeError`, which the synthesizer treats exactly like a parse failure.
//!
//! Repair rules:
//! - `string_to_list`      list field holds a bare string → one-element list (blank → empty)
//! - `object_to_list`      list-of-objects field holds a single object → one-element list
//! - `null_to_empty`       field is null or absent below the top level → empty value
//! - `object_to_text`      text field holds an object/array → flattened to lines of text
//! - `scalar_to_text`      text field holds a number/bool → its literal text
//! - `text_to_stage_content` a stage's `categoryContent` is a string → becomes the GPA track
//! - `text_to_tiers`       `targetSchools` is a string → becomes the stable tier
//! - `parsed_rate`         `missingData.rate` is a string such as `"12.5%"` → number
//! - `padded_cases` / `truncated_cases` `admissionCases` resized to exactly three

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::report::{
    AdmissionCase, BonusItem, BonusScheme, MissingData, ReportModel, StageContent, Swot,
    TargetSchools, Tier, TimelineStage, ADMISSION_CASE_COUNT,
};
use crate::view::split_destinations;

/// Top-level fields the generator must return. `missingData` is optional.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "swot",
    "bonusScheme",
    "planning",
    "researchAdvice",
    "competitions",
    "targetSchools",
    "admissionCases",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairRule {
    StringToList,
    ObjectToList,
    NullToEmpty,
    ObjectToText,
    ScalarToText,
    TextToStageContent,
    TextToTiers,
    ParsedRate,
    PaddedCases,
    TruncatedCases,
}

/// One repair applied to one field path, e.g. `swot.threats` / `string_to_list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Repair {
    pub field: String,
    pub rule: RepairRule,
}

#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("top-level value is {0}, expected an object")]
    NotAnObject(&'static str),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` expected {expected}, found {found}")]
    Violation {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Validates and repairs a parsed completion into a `ReportModel`.
///
/// `fallback_cases` pads a short `admissionCases` list. `missingData` is only read when
/// `backfill_requested`; otherwise it is forced to `None` whatever the generator sent.
pub fn validate_report(
    value: &Value,
    fallback_cases: &[AdmissionCase],
    backfill_requested: bool,
) -> Result<(ReportModel, Vec<Repair>), ShapeError> {
    let root = value
        .as_object()
        .ok_or_else(|| ShapeError::NotAnObject(kind(value)))?;

    for field in REQUIRED_FIELDS {
        let present = root.contains_key(field)
            || (field == "bonusScheme" && root.contains_key("bonusSchemes"));
        if !present {
            return Err(ShapeError::MissingField(field));
        }
    }

    let mut r = Repairer::default();

    let swot = r.swot(root.get("swot"))?;
    let bonus_schemes = r.bonus_schemes(
        root.get("bonusScheme").or_else(|| root.get("bonusSchemes")),
    )?;
    let planning = r.planning(root.get("planning"))?;
    let research_advice = r.text(root.get("researchAdvice"), "researchAdvice");
    let competitions = r.text(root.get("competitions"), "competitions");
    let target_schools = r.target_schools(root.get("targetSchools"))?;
    let admission_cases = r.admission_cases(root.get("admissionCases"), fallback_cases)?;
    let missing_data = if backfill_requested {
        r.missing_data(root.get("missingData"))?
    } else {
        None
    };

    let report = ReportModel {
        swot,
        bonus_schemes,
        planning,
        research_advice,
        competitions,
        target_schools,
        admission_cases,
        missing_data,
    };
    Ok((report, r.repairs))
}

#[derive(Default)]
struct Repairer {
    repairs: Vec<Repair>,
}

impl Repairer {
    fn record(&mut self, field: &str, rule: RepairRule) {
        self.repairs.push(Repair {
            field: field.to_string(),
            rule,
        });
    }

    fn text(&mut self, value: Option<&Value>, field: &str) -> String {
        match value {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => {
                self.record(field, RepairRule::NullToEmpty);
                String::new()
            }
            Some(v @ (Value::Number(_) | Value::Bool(_))) => {
                self.record(field, RepairRule::ScalarToText);
                v.to_string()
            }
            Some(v) => {
                self.record(field, RepairRule::ObjectToText);
                flatten_text(v)
            }
        }
    }

    fn string_list(&mut self, value: Option<&Value>, field: &str) -> Result<Vec<String>, ShapeError> {
        match value {
            Some(Value::Array(items)) => Ok(items
                .iter()
                .enumerate()
                .filter(|(_, item)| !item.is_null())
                .map(|(i, item)| self.text(Some(item), &format!("{field}[{i}]")))
                .collect()),
            Some(Value::String(s)) => {
                self.record(field, RepairRule::StringToList);
                Ok(if s.trim().is_empty() {
                    vec![]
                } else {
                    vec![s.clone()]
                })
            }
            None | Some(Value::Null) => {
                self.record(field, RepairRule::NullToEmpty);
                Ok(vec![])
            }
            Some(other) => Err(violation(field, "a list of strings", other)),
        }
    }

    /// A list of objects; a lone object becomes a one-element list.
    fn object_list<'a>(
        &mut self,
        value: Option<&'a Value>,
        field: &str,
    ) -> Result<Vec<&'a Map<String, Value>>, ShapeError> {
        let items: Vec<&Value> = match value {
            Some(Value::Array(items)) => items.iter().filter(|v| !v.is_null()).collect(),
            Some(v @ Value::Object(_)) => {
                self.record(field, RepairRule::ObjectToList);
                vec![v]
            }
            None | Some(Value::Null) => {
                self.record(field, RepairRule::NullToEmpty);
                vec![]
            }
            Some(other) => return Err(violation(field, "a list of objects", other)),
        };

        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_object()
                    .ok_or_else(|| violation(&format!("{field}[{i}]"), "an object", item))
            })
            .collect()
    }

    fn swot(&mut self, value: Option<&Value>) -> Result<Swot, ShapeError> {
        let obj = match value {
            Some(Value::Object(obj)) => obj,
            None | Some(Value::Null) => {
                self.record("swot", RepairRule::NullToEmpty);
                return Ok(Swot::default());
            }
            Some(other) => return Err(violation("swot", "an object", other)),
        };

        Ok(Swot {
            strengths: self.string_list(obj.get("strengths"), "swot.strengths")?,
            weaknesses: self.string_list(obj.get("weaknesses"), "swot.weaknesses")?,
            opportunities: self.string_list(obj.get("opportunities"), "swot.opportunities")?,
            threats: self.string_list(obj.get("threats"), "swot.threats")?,
        })
    }

    fn bonus_schemes(&mut self, value: Option<&Value>) -> Result<Vec<BonusScheme>, ShapeError> {
        let schemes = self.object_list(value, "bonusScheme")?;
        let mut out = Vec::with_capacity(schemes.len());

        for (i, scheme) in schemes.into_iter().enumerate() {
            let path = format!("bonusScheme[{i}]");
            let category = self.text(scheme.get("category"), &format!("{path}.category"));

            let items_path = format!("{path}.items");
            let items = self
                .object_list(scheme.get("items"), &items_path)?
                .into_iter()
                .enumerate()
                .map(|(j, item)| {
                    let item_path = format!("{items_path}[{j}]");
                    BonusItem {
                        item: self.text(item.get("item"), &format!("{item_path}.item")),
                        score: self.text(item.get("score"), &format!("{item_path}.score")),
                        description: self.text(
                            item.get("desc").or_else(|| item.get("description")),
                            &format!("{item_path}.desc"),
                        ),
                    }
                })
                .collect();

            out.push(BonusScheme { category, items });
        }
        Ok(out)
    }

    fn planning(&mut self, value: Option<&Value>) -> Result<Vec<TimelineStage>, ShapeError> {
        let stages = self.object_list(value, "planning")?;
        let mut out = Vec::with_capacity(stages.len());

        for (i, stage) in stages.into_iter().enumerate() {
            let path = format!("planning[{i}]");
            let name = self.text(stage.get("stage"), &format!("{path}.stage"));

            let content_path = format!("{path}.categoryContent");
            let category_content = match stage.get("categoryContent") {
                Some(Value::Object(content)) => StageContent {
                    gpa: self.text(content.get("gpa"), &format!("{content_path}.gpa")),
                    english: self.text(content.get("english"), &format!("{content_path}.english")),
                    research: self
                        .text(content.get("research"), &format!("{content_path}.research")),
                    contest: self.text(content.get("contest"), &format!("{content_path}.contest")),
                },
                Some(Value::String(s)) => {
                    self.record(&content_path, RepairRule::TextToStageContent);
                    StageContent {
                        gpa: s.clone(),
                        ..StageContent::default()
                    }
                }
                None | Some(Value::Null) => {
                    self.record(&content_path, RepairRule::NullToEmpty);
                    StageContent::default()
                }
                Some(other) => return Err(violation(&content_path, "an object", other)),
            };

            out.push(TimelineStage {
                stage: name,
                category_content,
            });
        }
        Ok(out)
    }

    fn target_schools(&mut self, value: Option<&Value>) -> Result<TargetSchools, ShapeError> {
        let mut schools = TargetSchools::default();
        match value {
            Some(Value::Object(obj)) => {
                for tier in Tier::ALL {
                    let found = tier.aliases().iter().find_map(|key| obj.get(*key));
                    let field = format!("targetSchools.{}", tier.key());
                    schools.set(tier, self.text(found, &field));
                }
            }
            Some(Value::String(s)) => {
                self.record("targetSchools", RepairRule::TextToTiers);
                schools.stable = s.clone();
            }
            None | Some(Value::Null) => self.record("targetSchools", RepairRule::NullToEmpty),
            Some(other) => return Err(violation("targetSchools", "an object", other)),
        }
        Ok(schools)
    }

    fn admission_cases(
        &mut self,
        value: Option<&Value>,
        fallback_cases: &[AdmissionCase],
    ) -> Result<Vec<AdmissionCase>, ShapeError> {
        let mut cases: Vec<AdmissionCase> = self
            .object_list(value, "admissionCases")?
            .into_iter()
            .enumerate()
            .map(|(i, case)| {
                let path = format!("admissionCases[{i}]");
                AdmissionCase {
                    student: self.text(case.get("student"), &format!("{path}.student")),
                    school: self.text(case.get("school"), &format!("{path}.school")),
                    major: self.text(case.get("major"), &format!("{path}.major")),
                    gpa: self.text(case.get("gpa"), &format!("{path}.gpa")),
                    english: self.text(case.get("english"), &format!("{path}.english")),
                    offer: self.text(case.get("offer"), &format!("{path}.offer")),
                }
            })
            .collect();

        if cases.len() > ADMISSION_CASE_COUNT {
            self.record("admissionCases", RepairRule::TruncatedCases);
            cases.truncate(ADMISSION_CASE_COUNT);
        } else if cases.len() < ADMISSION_CASE_COUNT {
            self.record("admissionCases", RepairRule::PaddedCases);
            let have = cases.len();
            cases.extend(
                fallback_cases
                    .iter()
                    .skip(have)
                    .take(ADMISSION_CASE_COUNT - have)
                    .cloned(),
            );
        }
        Ok(cases)
    }

    fn missing_data(&mut self, value: Option<&Value>) -> Result<Option<MissingData>, ShapeError> {
        let obj = match value {
            Some(Value::Object(obj)) => obj,
            None | Some(Value::Null) => return Ok(None),
            Some(other) => return Err(violation("missingData", "an object", other)),
        };

        let rate = match obj.get("rate") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => {
                self.record("missingData.rate", RepairRule::ParsedRate);
                s.trim().trim_end_matches(['%', '％']).trim().parse::<f64>().ok()
            }
            _ => None,
        }
        .filter(|r| r.is_finite() && *r > 0.0 && *r <= 100.0);

        let policy = Some(self.text(obj.get("policy"), "missingData.policy"))
            .filter(|p| !p.trim().is_empty());

        let destinations = match obj.get("destinations") {
            Some(Value::String(s)) => {
                self.record("missingData.destinations", RepairRule::StringToList);
                split_destinations(s)
            }
            other => self.string_list(other, "missingData.destinations")?,
        };

        Ok(Some(MissingData {
            rate,
            policy,
            destinations,
        }))
    }
}

/// Renders nested JSON as plain lines: objects become `key：value`, arrays one line per item.
pub fn flatten_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(_) | Value::Bool(_) => value.to_string(),
        Value::Array(items) => items
            .iter()
            .map(flatten_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(obj) => obj
            .iter()
            .map(|(k, v)| match v {
                Value::Object(_) | Value::Array(_) => format!("{k}：\n{}", flatten_text(v)),
                _ => format!("{k}：{}", flatten_text(v)),
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn violation(field: &str, expected: &'static str, found: &Value) -> ShapeError {
    ShapeError::Violation {
        field: field.to_string(),
        expected,
        found: kind(found),
    }
}
