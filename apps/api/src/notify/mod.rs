// Submission webhook. Fire-and-forget: the caller never waits on it and never sees its errors.

use std::time::Duration;

use chrono::Local;
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::profile::StudentProfile;

#[derive(Debug, Serialize)]
struct WebhookMessage {
    msg_type: &'static str,
    content: WebhookContent,
}

#[derive(Debug, Serialize)]
struct WebhookContent {
    text: String,
}

/// Whole-request limit for one delivery; a stalled webhook must not pin its task.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(WEBHOOK_TIMEOUT).build()?,
            url,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Posts the submission summary on a detached task. No-op when no URL is configured.
    pub fn dispatch(&self, profile: &StudentProfile) {
        let Some(url) = self.url.clone() else {
            return;
        };
        let client = self.client.clone();
        let submitted_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let message = WebhookMessage {
            msg_type: "text",
            content: WebhookContent {
                text: submission_summary(profile, &submitted_at),
            },
        };

        tokio::spawn(async move {
            match client.post(&url).json(&message).send().await {
                Ok(response) => debug!("Webhook responded with {}", response.status()),
                Err(e) => warn!("Webhook delivery failed: {e}"),
            }
        });
    }
}

/// Plain-text summary of one submission, one field per line.
pub fn submission_summary(profile: &StudentProfile, submitted_at: &str) -> String {
    let blank_as_none = |s: &str| if s.trim().is_empty() { "无".to_string() } else { s.to_string() };

    format!(
        "【新保研测评提交】\n\
         姓名：{}\n\
         联系方式：{}\n\
         本科院校：{}\n\
         专业：{}\n\
         年级：{}\n\
         排名：{}\n\
         英语：{}\n\
         竞赛：{}\n\
         科研：{}\n\
         咨询重点：{}\n\
         提交时间：{}",
        profile.name,
        profile.contact,
        profile.school,
        profile.major,
        profile.grade.label(),
        profile.rank,
        profile.english,
        blank_as_none(&profile.competition),
        blank_as_none(&profile.research),
        profile.consultation_focus,
        submitted_at,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::fixtures;

    #[test]
    fn test_summary_lists_every_field() {
        let profile = fixtures::profile();
        let text = submission_summary(&profile, "2026-01-01 09:30:00");

        for value in [
            &profile.name,
            &profile.contact,
            &profile.school,
            &profile.major,
            &profile.rank,
            &profile.english,
            &profile.competition,
            &profile.research,
            &profile.consultation_focus,
        ] {
            assert!(text.contains(value.as_str()), "missing {value}");
        }
        assert!(text.contains("年级：大二"));
        assert!(text.ends_with("提交时间：2026-01-01 09:30:00"));
    }

    #[test]
    fn test_blank_optional_fields_read_as_none() {
        let mut profile = fixtures::profile();
        profile.research = String::new();
        let text = submission_summary(&profile, "t");
        assert!(text.contains("科研：无"));
    }

    #[test]
    fn test_message_shape() {
        let message = WebhookMessage {
            msg_type: "text",
            content: WebhookContent {
                text: "hello".to_string(),
            },
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["msg_type"], "text");
        assert_eq!(value["content"]["text"], "hello");
    }

    #[tokio::test]
    async fn test_dispatch_without_url_is_noop() {
        let notifier = WebhookNotifier::new(None).unwrap();
        assert!(!notifier.is_enabled());
        notifier.dispatch(&fixtures::profile());
    }

    #[tokio::test]
    async fn test_dispatch_to_unreachable_url_returns_immediately() {
        let notifier = WebhookNotifier::new(Some("http://127.0.0.1:1/hook".to_string())).unwrap();
        assert!(notifier.is_enabled());
        // Delivery runs detached; the failure is only logged.
        notifier.dispatch(&fixtures::profile());
    }
}
