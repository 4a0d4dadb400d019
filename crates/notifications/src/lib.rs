//! `orderflow-notifications`: post-transition customer notifications.
//!
//! One strategy per customer tier: regular customers are only logged,
//! premium and VIP customers get a JSON webhook (email and WhatsApp channel
//! respectively).

pub mod dispatcher;
pub mod strategy;
pub mod webhook;

pub use dispatcher::NotificationDispatcher;
pub use strategy::{
    Channel, NotificationOutcome, NotificationPayload, NotificationStrategy, RegularNotification,
    WebhookNotification,
};
pub use webhook::{
    DEFAULT_WEBHOOK_URL, ReqwestWebhookClient, WebhookClient, WebhookConfig, WebhookError,
    WebhookResponse,
};

#[cfg(test)]
pub(crate) mod testing;
