use anyhow::{Context, Result};

const DEFAULT_GENERATION_URL: &str = "https://api.deepseek.com/chat/completions";
const DEFAULT_EXPORT_BRAND: &str = "高顿去保研_规划报告";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub generation_api_key: String,
    pub generation_api_url: String,
    pub generation_timeout_secs: u64,
    /// Unset disables the submission webhook.
    pub notify_webhook_url: Option<String>,
    /// Prefix of every exported file name.
    pub export_brand: String,
    /// Font used to paint glyphs in the rasterized document.
    pub report_font_path: Option<String>,
    /// Origin of the intake form. Unset allows any origin.
    pub cors_allowed_origin: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            generation_api_key: require_env("GENERATION_API_KEY")?,
            generation_api_url: std::env::var("GENERATION_API_URL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_URL.to_string()),
            generation_timeout_secs: std::env::var("GENERATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?,
            notify_webhook_url: optional_env("NOTIFY_WEBHOOK_URL"),
            export_brand: std::env::var("EXPORT_BRAND")
                .unwrap_or_else(|_| DEFAULT_EXPORT_BRAND.to_string()),
            report_font_path: optional_env("REPORT_FONT_PATH"),
            cors_allowed_origin: optional_env("CORS_ALLOWED_ORIGIN"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats unset and blank values the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
