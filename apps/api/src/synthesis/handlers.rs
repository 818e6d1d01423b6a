//! Axum route handlers for the Report API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{SchoolRecord, StudentProfile};
use crate::models::report::ReportModel;
use crate::scoring::CompetitivenessVector;
use crate::state::AppState;
use crate::synthesis::repair::Repair;
use crate::synthesis::synthesizer::{synthesize, SynthesisStatus};
use crate::view::ReportView;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub profile: StudentProfile,
    /// Lookup-table match for the profile's school. Omitted means the table had no entry.
    #[serde(default)]
    pub school: Option<SchoolRecord>,
}

#[derive(Debug, Serialize)]
pub struct CreateReportResponse {
    pub report_id: Uuid,
    pub status: SynthesisStatus,
    pub repairs: Vec<Repair>,
    pub report: ReportModel,
    pub vector: CompetitivenessVector,
    pub view: ReportView,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reports
///
/// Validate → notify (detached) → synthesize → score → project.
/// Synthesis failures never surface here; they come back as `status: "degraded"`.
pub async fn handle_create_report(
    State(state): State<AppState>,
    Json(request): Json<CreateReportRequest>,
) -> Result<Json<CreateReportResponse>, AppError> {
    let CreateReportRequest { profile, school } = request;
    profile.validate()?;

    let school = school.unwrap_or_else(|| SchoolRecord::unknown(&profile.school));

    state.notifier.dispatch(&profile);

    let outcome = synthesize(state.generator.as_ref(), &profile, &school).await;
    let vector = state.scorer.vector(&profile);
    let view = ReportView::build(&profile, &school, &outcome.report, &vector);

    Ok(Json(CreateReportResponse {
        report_id: Uuid::new_v4(),
        status: outcome.status,
        repairs: outcome.repairs,
        report: outcome.report,
        vector,
        view,
    }))
}
