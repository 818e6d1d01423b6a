mod config;
mod errors;
mod llm_client;
mod models;
mod notify;
mod render;
mod routes;
mod scoring;
mod state;
mod synthesis;
mod view;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::notify::WebhookNotifier;
use crate::render::gate::ExportGate;
use crate::render::CanvasRasterizer;
use crate::routes::{build_router, cors_layer};
use crate::scoring::HeuristicScorer;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting admit-api v{}", env!("CARGO_PKG_VERSION"));

    // Initialize generation client (one call per report, no retries)
    let generator = LlmClient::new(
        config.generation_api_url.clone(),
        config.generation_api_key.clone(),
        Duration::from_secs(config.generation_timeout_secs),
    )?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm_client::MODEL,
        config.generation_timeout_secs
    );

    // Initialize rasterizer (greeked glyphs unless a font is configured)
    let rasterizer = match &config.report_font_path {
        Some(path) => CanvasRasterizer::with_font_file(path)?,
        None => {
            info!("REPORT_FONT_PATH not set; glyphs will be painted as blocks");
            CanvasRasterizer::new()
        }
    };

    let notifier = WebhookNotifier::new(config.notify_webhook_url.clone())?;
    if !notifier.is_enabled() {
        info!("NOTIFY_WEBHOOK_URL not set; submission webhook disabled");
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        generator: Arc::new(generator),
        scorer: Arc::new(HeuristicScorer),
        rasterizer: Arc::new(rasterizer),
        notifier,
        export_gate: ExportGate::new(),
    };

    if config.cors_allowed_origin.is_none() {
        info!("CORS_ALLOWED_ORIGIN not set; accepting requests from any origin");
    }
    let cors = cors_layer(config.cors_allowed_origin.as_deref())?;

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
