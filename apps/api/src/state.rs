use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;
use crate::notify::WebhookNotifier;
use crate::render::gate::ExportGate;
use crate::render::Rasterizer;
use crate::scoring::ScoringStrategy;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Generation endpoint. Default: `LlmClient`; tests substitute canned completions.
    pub generator: Arc<dyn CompletionBackend>,
    /// Pluggable scorer. Default: HeuristicScorer.
    pub scorer: Arc<dyn ScoringStrategy>,
    /// Pluggable rasterizer. Default: CanvasRasterizer (font from REPORT_FONT_PATH when set).
    pub rasterizer: Arc<dyn Rasterizer>,
    pub notifier: WebhookNotifier,
    /// In-flight export flags, shared across requests.
    pub export_gate: ExportGate,
}
