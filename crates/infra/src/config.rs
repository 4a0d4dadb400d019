//! Configuration loading from environment variables.

use std::time::Duration;

use orderflow_notifications::WebhookConfig;

pub const WEBHOOK_URL_VAR: &str = "ORDERFLOW_WEBHOOK_URL";
pub const WEBHOOK_TIMEOUT_VAR: &str = "ORDERFLOW_WEBHOOK_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub webhook: WebhookConfig,
}

impl AppConfig {
    /// Read the process environment. Missing or invalid values fall back to
    /// defaults with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = WebhookConfig::default();

        let url = match lookup(WEBHOOK_URL_VAR) {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            Some(_) => {
                tracing::warn!("{WEBHOOK_URL_VAR} is empty; using default webhook endpoint");
                defaults.url
            }
            None => defaults.url,
        };

        let timeout = match lookup(WEBHOOK_TIMEOUT_VAR) {
            None => defaults.timeout,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "{WEBHOOK_TIMEOUT_VAR} is not a positive number of seconds; using default"
                    );
                    defaults.timeout
                }
            },
        };

        Self {
            webhook: WebhookConfig { url, timeout },
        }
    }
}
