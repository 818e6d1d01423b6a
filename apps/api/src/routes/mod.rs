pub mod health;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::render::handlers as exports;
use crate::state::AppState;
use crate::synthesis::handlers as reports;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Report API
        .route("/api/v1/reports", post(reports::handle_create_report))
        // Export API
        .route("/api/v1/exports/pdf", post(exports::handle_export_pdf))
        .route("/api/v1/exports/pptx", post(exports::handle_export_pptx))
        .with_state(state)
}

/// Restricts browsers to the intake form's origin when one is configured.
pub fn cors_layer(allowed_origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let Some(origin) = allowed_origin else {
        return Ok(CorsLayer::permissive());
    };
    let origin = HeaderValue::from_str(origin.trim())
        .with_context(|| format!("CORS_ALLOWED_ORIGIN is not a valid origin: {origin}"))?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_DISPOSITION]))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::models::profile::fixtures;
    use crate::notify::WebhookNotifier;
    use crate::render::artifact::{artifact_name, ExportKind};
    use crate::render::gate::ExportGate;
    use crate::render::{CanvasRasterizer, RasterOptions, Rasterizer, RenderError};
    use crate::scoring::HeuristicScorer;
    use crate::synthesis::fallback::fallback_report;
    use crate::synthesis::synthesizer::stub::StubBackend;
    use crate::view::{RadarAxis, ReportView};

    const BRAND: &str = "测试品牌";

    /// Rasterizer whose every pass fails.
    struct BrokenRasterizer;

    impl Rasterizer for BrokenRasterizer {
        fn rasterize(&self, _: &ReportView, _: &RasterOptions) -> Result<image::RgbaImage, RenderError> {
            Err(RenderError::EmptyDocument)
        }

        fn chart_png(&self, _: &[RadarAxis]) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::EmptyDocument)
        }
    }

    fn test_state(backend: StubBackend) -> AppState {
        AppState {
            config: Config {
                generation_api_key: "test-key".to_string(),
                generation_api_url: "http://127.0.0.1:9/unused".to_string(),
                generation_timeout_secs: 1,
                notify_webhook_url: None,
                export_brand: BRAND.to_string(),
                report_font_path: None,
                cors_allowed_origin: None,
                port: 0,
                rust_log: "info".to_string(),
            },
            generator: Arc::new(backend),
            scorer: Arc::new(HeuristicScorer),
            rasterizer: Arc::new(CanvasRasterizer::new()),
            notifier: WebhookNotifier::new(None).unwrap(),
            export_gate: ExportGate::new(),
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn export_body() -> Value {
        let profile = fixtures::profile();
        json!({
            "profile": profile,
            "school": fixtures::school(),
            "report": fallback_report(&profile),
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state(StubBackend::failing(500)));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "admit-api");
    }

    #[tokio::test]
    async fn test_create_report_degrades_on_endpoint_failure() {
        let app = build_router(test_state(StubBackend::failing(502)));
        let request = post_json(
            "/api/v1/reports",
            json!({ "profile": fixtures::profile(), "school": fixtures::school() }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["report"]["targetSchools"]["冲刺院校"], "数据获取失败");
        assert_eq!(body["report"]["admissionCases"].as_array().unwrap().len(), 3);
        assert_eq!(body["vector"]["rank"], 85);
        assert_eq!(body["view"]["facts"]["rate"], 18.5);
        assert!(body["report_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_create_report_without_school_requests_backfill() {
        let completion = json!({
            "swot": { "strengths": ["a"], "weaknesses": ["b"], "opportunities": ["c"], "threats": ["d"] },
            "bonusScheme": [],
            "planning": [],
            "researchAdvice": "r",
            "competitions": "c",
            "targetSchools": { "冲刺院校": "x", "稳妥院校": "y", "保底院校": "z" },
            "admissionCases": [],
            "missingData": { "rate": 7.5, "policy": "p", "destinations": ["甲大学", "乙大学"] }
        });
        let app = build_router(test_state(StubBackend::replying(&completion.to_string())));
        let request = post_json("/api/v1/reports", json!({ "profile": fixtures::profile() }));

        let body = body_json(app.oneshot(request).await.unwrap()).await;
        assert_eq!(body["status"], "repaired");
        assert_eq!(body["view"]["facts"]["rate"], 7.5);
        assert_eq!(body["view"]["facts"]["rate_source"], "generated");
        assert_eq!(body["report"]["admissionCases"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_report_rejects_incomplete_profile() {
        let app = build_router(test_state(StubBackend::failing(500)));
        let mut profile = serde_json::to_value(fixtures::profile()).unwrap();
        profile["contact"] = json!("");

        let response = app
            .oneshot(post_json("/api/v1/reports", json!({ "profile": profile })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_export_pdf_returns_attachment() {
        let app = build_router(test_state(StubBackend::failing(500)));
        let response = app
            .oneshot(post_json("/api/v1/exports/pdf", export_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert!(!doc.get_pages().is_empty());
    }

    #[tokio::test]
    async fn test_export_pptx_returns_deck() {
        let app = build_router(test_state(StubBackend::failing(500)));
        let response = app
            .oneshot(post_json("/api/v1/exports/pptx", export_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.ends_with(".pptx"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_export_in_progress_is_refused() {
        let state = test_state(StubBackend::failing(500));
        let file_name = artifact_name(BRAND, &fixtures::profile().name, ExportKind::Pdf);
        let _held = state.export_gate.try_acquire(ExportKind::Pdf, &file_name).unwrap();

        let response = build_router(state.clone())
            .oneshot(post_json("/api/v1/exports/pdf", export_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "EXPORT_IN_PROGRESS");

        // The other exporter is not blocked.
        let response = build_router(state)
            .oneshot(post_json("/api/v1/exports/pptx", export_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_export_flag_released_after_success() {
        let state = test_state(StubBackend::failing(500));
        for _ in 0..2 {
            let response = build_router(state.clone())
                .oneshot(post_json("/api/v1/exports/pptx", export_body()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        let file_name = artifact_name(BRAND, &fixtures::profile().name, ExportKind::Pptx);
        assert!(!state.export_gate.is_busy(ExportKind::Pptx, &file_name));
    }

    #[tokio::test]
    async fn test_create_report_ignores_unreachable_webhook() {
        let mut state = test_state(StubBackend::failing(503));
        state.notifier = WebhookNotifier::new(Some("http://127.0.0.1:1/hook".to_string())).unwrap();

        let request = post_json(
            "/api/v1/reports",
            json!({ "profile": fixtures::profile(), "school": fixtures::school() }),
        );
        let response = build_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "degraded");
        assert!(body["report"]["swot"].is_object());
    }

    #[tokio::test]
    async fn test_failed_export_is_generic_and_releases_flag() {
        let mut state = test_state(StubBackend::failing(500));
        state.rasterizer = Arc::new(BrokenRasterizer);
        let file_name = artifact_name(BRAND, &fixtures::profile().name, ExportKind::Pdf);

        for _ in 0..2 {
            let response = build_router(state.clone())
                .oneshot(post_json("/api/v1/exports/pdf", export_body()))
                .await
                .unwrap();
            // A second attempt fails the same way instead of being refused as in progress.
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = body_json(response).await;
            assert_eq!(body["error"]["code"], "EXPORT_FAILED");
            assert_eq!(
                body["error"]["message"],
                "The file could not be generated, please try again"
            );
            assert!(!state.export_gate.is_busy(ExportKind::Pdf, &file_name));
        }

        let response = build_router(state.clone())
            .oneshot(post_json("/api/v1/exports/pptx", export_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let file_name = artifact_name(BRAND, &fixtures::profile().name, ExportKind::Pptx);
        assert!(!state.export_gate.is_busy(ExportKind::Pptx, &file_name));
    }

    #[tokio::test]
    async fn test_oversized_pdf_export_is_refused() {
        let state = test_state(StubBackend::failing(500));
        let mut body = export_body();
        body["report"]["researchAdvice"] = json!("a".repeat(200_000));

        let response = build_router(state.clone())
            .oneshot(post_json("/api/v1/exports/pdf", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "DOCUMENT_TOO_LARGE");

        let file_name = artifact_name(BRAND, &fixtures::profile().name, ExportKind::Pdf);
        assert!(!state.export_gate.is_busy(ExportKind::Pdf, &file_name));
    }

    #[tokio::test]
    async fn test_cors_layer_allows_only_configured_origin() {
        assert!(cors_layer(Some("bad\norigin")).is_err());

        let app = build_router(test_state(StubBackend::failing(500)))
            .layer(cors_layer(Some("https://form.example.com")).unwrap());
        let request = |origin: &str| {
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, origin)
                .body(Body::empty())
                .unwrap()
        };

        let allowed = app.clone().oneshot(request("https://form.example.com")).await.unwrap();
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://form.example.com"
        );
        let other = app.oneshot(request("https://elsewhere.example.com")).await.unwrap();
        assert!(other.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
