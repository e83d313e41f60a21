//! Mail domain verification through DNS-over-HTTPS.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::OUTBOUND_TIMEOUT_SECS;

pub const GOOGLE_DOH_URL: &str = "https://dns.google/resolve";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("DNS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("DNS resolver returned HTTP {0}")]
    Status(u16),
}

/// Answers whether a domain can receive mail.
#[async_trait]
pub trait DomainResolver: Send + Sync {
    async fn has_mx(&self, domain: &str) -> Result<bool, ResolveError>;
}

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Status")]
    status: i32,
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[allow(dead_code)]
    data: String,
}

/// JSON DNS-over-HTTPS resolver (Google's `/resolve` API shape)
pub struct DohResolver {
    client: Client,
    endpoint: String,
}

impl DohResolver {
    pub fn new(endpoint: &str) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(OUTBOUND_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn google() -> Result<Self, ResolveError> {
        Self::new(GOOGLE_DOH_URL)
    }
}

#[async_trait]
impl DomainResolver for DohResolver {
    async fn has_mx(&self, domain: &str) -> Result<bool, ResolveError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("name", domain), ("type", "MX")])
            .header("Accept", "application/dns-json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolveError::Status(response.status().as_u16()));
        }

        let body: DohResponse = response.json().await?;
        // Status 0 is NOERROR
        Ok(body.status == 0 && !body.answer.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;

    async fn resolve(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
        match params.get("name").map(String::as_str) {
            Some("mail.example.org") => Json(serde_json::json!({
                "Status": 0,
                "Answer": [{"name": "mail.example.org.", "type": 15, "TTL": 300, "data": "10 mx.example.org."}]
            })),
            Some("empty.example.org") => Json(serde_json::json!({"Status": 0})),
            _ => Json(serde_json::json!({"Status": 3})),
        }
    }

    #[tokio::test]
    async fn test_has_mx() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new().route("/resolve", get(resolve)))
                .await
                .unwrap();
        });

        let resolver = DohResolver::new(&format!("http://{}/resolve", addr)).unwrap();
        assert!(resolver.has_mx("mail.example.org").await.unwrap());
        assert!(!resolver.has_mx("empty.example.org").await.unwrap());
        assert!(!resolver.has_mx("nxdomain.example.org").await.unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_resolver_is_an_error() {
        // Port 9 (discard) on localhost is not listening
        let resolver = DohResolver::new("http://127.0.0.1:9/resolve").unwrap();
        assert!(resolver.has_mx("example.org").await.is_err());
    }
}
