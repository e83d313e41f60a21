//! Relay of support messages to a chat webhook.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use super::SupportMessage;
use crate::config::OUTBOUND_TIMEOUT_SECS;

const COLOR_NORMAL: u32 = 0xea580c;
const COLOR_SPAM: u32 = 0xff0000;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook rejected the message with HTTP {0}")]
    Rejected(u16),
}

/// Where validated support messages go.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, message: &SupportMessage) -> Result<(), NotifyError>;
}

#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub timestamp: String,
    pub footer: EmbedFooter,
}

#[derive(Debug, Serialize)]
pub struct EmbedField {
    pub name: &'static str,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

impl WebhookPayload {
    pub fn from_message(message: &SupportMessage, sent_at: DateTime<Utc>) -> Self {
        let spam = message.spam.is_spam();
        let field = |name, value: &str, inline| EmbedField {
            name,
            value: value.to_string(),
            inline,
        };

        let mut fields = vec![
            field("📝 Subject", &message.subject, false),
            field("👤 Name", &message.name, true),
            field("📧 Email", &message.email, true),
            field("🔍 Type", message.kind.as_str(), true),
            field("💬 Message", &message.message, false),
        ];
        if spam {
            fields.push(field(
                "⚠️ Spam Detection",
                "This message was flagged as potential spam",
                false,
            ));
        }

        let embed = Embed {
            title: format!(
                "{}🎓 Certiswift Support: {}",
                if spam { "(SPAM) " } else { "" },
                message.kind.as_str()
            ),
            color: if spam { COLOR_SPAM } else { COLOR_NORMAL },
            fields,
            timestamp: sent_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            footer: EmbedFooter {
                text: if spam {
                    "Certiswift Support System | SPAM DETECTED".to_string()
                } else {
                    "Certiswift Support System".to_string()
                },
            },
        };

        Self { embeds: vec![embed] }
    }
}

/// POSTs an embed payload to the configured webhook URL
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: &str) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(OUTBOUND_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn deliver(&self, message: &SupportMessage) -> Result<(), NotifyError> {
        let payload = WebhookPayload::from_message(message, Utc::now());
        let response = self.client.post(&self.url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Used when no webhook is configured: the message only reaches the log.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, message: &SupportMessage) -> Result<(), NotifyError> {
        tracing::info!(
            kind = message.kind.as_str(),
            email = %message.email,
            spam = message.spam.is_spam(),
            "Support request: {}",
            message.subject
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::spam::SpamReport;
    use crate::support::SupportKind;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    fn message(spam: bool) -> SupportMessage {
        SupportMessage {
            name: "Ana Lima".to_string(),
            email: "ana@gmail.com".to_string(),
            kind: SupportKind::CourseIssue,
            subject: "Broken link".to_string(),
            message: "The link is broken on the page".to_string(),
            spam: SpamReport {
                has_links: spam,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_payload_for_normal_message() {
        let sent_at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let payload = WebhookPayload::from_message(&message(false), sent_at);
        let json = serde_json::to_value(&payload).unwrap();
        let embed = &json["embeds"][0];

        assert_eq!(embed["title"], "🎓 Certiswift Support: Course Issue");
        assert_eq!(embed["color"], 0xea580c);
        assert_eq!(embed["fields"].as_array().unwrap().len(), 5);
        assert_eq!(embed["fields"][0]["value"], "Broken link");
        assert_eq!(embed["timestamp"], "2024-05-01T10:00:00.000Z");
        assert_eq!(embed["footer"]["text"], "Certiswift Support System");
    }

    #[test]
    fn test_payload_for_spam_message() {
        let payload = WebhookPayload::from_message(&message(true), Utc::now());
        let embed = &payload.embeds[0];
        assert!(embed.title.starts_with("(SPAM) "));
        assert_eq!(embed.color, 0xff0000);
        assert_eq!(embed.fields.len(), 6);
        assert!(embed.footer.text.ends_with("| SPAM DETECTED"));
    }

    #[tokio::test]
    async fn test_webhook_sink_posts_payload() {
        let received = Arc::new(Mutex::new(Vec::<serde_json::Value>::new()));
        let captured = received.clone();
        let router = Router::new()
            .route(
                "/hook",
                post(move |Json(body): Json<serde_json::Value>| {
                    let captured = captured.clone();
                    async move {
                        captured.lock().unwrap().push(body);
                        StatusCode::NO_CONTENT
                    }
                }),
            )
            .route("/down", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let sink = WebhookSink::new(&format!("http://{}/hook", addr)).unwrap();
        sink.deliver(&message(false)).await.unwrap();
        assert_eq!(received.lock().unwrap().len(), 1);

        let failing = WebhookSink::new(&format!("http://{}/down", addr)).unwrap();
        assert!(matches!(
            failing.deliver(&message(false)).await,
            Err(NotifyError::Rejected(500))
        ));
    }
}
