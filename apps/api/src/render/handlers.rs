//! Axum route handlers for the Export API.

use axum::{extract::State, Json};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::{SchoolRecord, StudentProfile};
use crate::models::report::ReportModel;
use crate::render::artifact::{artifact_name, ExportArtifact, ExportKind};
use crate::render::pdf::paginate;
use crate::render::pptx::build_deck;
use crate::render::{RasterOptions, RenderError};
use crate::state::AppState;
use crate::view::ReportView;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// The report snapshot to export. Nothing is retained server-side between requests.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub profile: StudentProfile,
    #[serde(default)]
    pub school: Option<SchoolRecord>,
    pub report: ReportModel,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/exports/pdf
///
/// Rasterizes the report at a fixed width and paginates it onto A4 pages.
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<ExportArtifact, AppError> {
    export(&state, request, ExportKind::Pdf).await
}

/// POST /api/v1/exports/pptx
///
/// Builds the five-slide deck with the radar chart embedded as PNG.
pub async fn handle_export_pptx(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<ExportArtifact, AppError> {
    export(&state, request, ExportKind::Pptx).await
}

async fn export(
    state: &AppState,
    request: ExportRequest,
    kind: ExportKind,
) -> Result<ExportArtifact, AppError> {
    let ExportRequest {
        profile,
        school,
        report,
    } = request;
    profile.validate()?;

    let file_name = artifact_name(&state.config.export_brand, &profile.name, kind);
    let _guard = state
        .export_gate
        .try_acquire(kind, &file_name)
        .ok_or_else(|| AppError::ExportInProgress(file_name.clone()))?;

    let school = school.unwrap_or_else(|| SchoolRecord::unknown(&profile.school));
    let vector = state.scorer.vector(&profile);
    let view = ReportView::build(&profile, &school, &report, &vector);

    // CPU-bound — spawn_blocking to avoid blocking the async executor.
    let rasterizer = state.rasterizer.clone();
    let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, RenderError> {
        match kind {
            ExportKind::Pdf => {
                let bitmap = rasterizer.rasterize(&view, &RasterOptions::default())?;
                paginate(&bitmap)
            }
            ExportKind::Pptx => {
                let chart = rasterizer.chart_png(&view.radar)?;
                build_deck(&view, &chart)
            }
        }
    })
    .await
    .map_err(RenderError::from)??;

    info!("Exported {file_name} ({} bytes)", bytes.len());

    Ok(ExportArtifact {
        kind,
        file_name,
        bytes: Bytes::from(bytes),
    })
}
