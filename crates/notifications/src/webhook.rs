//! Outbound webhook transport.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Endpoint notifications are POSTed to unless configured otherwise.
pub const DEFAULT_WEBHOOK_URL: &str = "https://webhook.site/263d24fd-e9c9-485f-a981-9a6d0f5c95ec";

/// Where and how long to wait when posting notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout: Duration,
}

impl WebhookConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WEBHOOK_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

/// Raw answer of the webhook endpoint, whatever its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebhookError {
    #[error("failed to build webhook client: {0}")]
    Client(String),

    /// Connection refused, timeout, unreadable body, ...
    #[error("webhook request failed: {0}")]
    Transport(String),
}

/// Posts a JSON document to a URL.
pub trait WebhookClient: Send + Sync {
    fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<WebhookResponse, WebhookError>;
}

impl<C> WebhookClient for Arc<C>
where
    C: WebhookClient + ?Sized,
{
    fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<WebhookResponse, WebhookError> {
        (**self).post_json(url, payload)
    }
}

/// Blocking `reqwest` client with a bounded request timeout.
///
/// Must not be called from inside an async runtime.
#[derive(Debug, Clone)]
pub struct ReqwestWebhookClient {
    http: reqwest::blocking::Client,
}

impl ReqwestWebhookClient {
    pub fn new(timeout: Duration) -> Result<Self, WebhookError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WebhookError::Client(e.to_string()))?;
        Ok(Self { http })
    }

    pub fn from_config(config: &WebhookConfig) -> Result<Self, WebhookError> {
        Self::new(config.timeout)
    }
}

impl WebhookClient for ReqwestWebhookClient {
    fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<WebhookResponse, WebhookError> {
        let response = self
            .http
            .post(url)
            .json(payload)
            .send()
            .map_err(|e| WebhookError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| WebhookError::Transport(e.to_string()))?;

        Ok(WebhookResponse { status, body })
    }
}
