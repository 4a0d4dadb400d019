use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderflow_core::{CustomerId, OrderId};
use orderflow_parties::Customer;
use orderflow_sales::{Order, OrderStatus};

use crate::webhook::WebhookClient;

/// What a strategy did for one order. Never an error: notifications are
/// best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Nothing was sent.
    Skipped,
    /// The endpoint answered (any status code).
    Delivered { status: u16, body: String },
    Failed { reason: String },
}

/// Notifies a customer about an order's new status.
pub trait NotificationStrategy: Send + Sync {
    /// `customer` is `None` when the order's owner could not be found.
    fn notify(&self, order: &Order, customer: Option<&Customer>) -> NotificationOutcome;
}

impl<S> NotificationStrategy for Box<S>
where
    S: NotificationStrategy + ?Sized,
{
    fn notify(&self, order: &Order, customer: Option<&Customer>) -> NotificationOutcome {
        (**self).notify(order, customer)
    }
}

/// Regular customers get no notification; the decision is logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegularNotification;

impl NotificationStrategy for RegularNotification {
    fn notify(&self, order: &Order, _customer: Option<&Customer>) -> NotificationOutcome {
        tracing::info!(
            user_id = %order.customer_id(),
            order_id = %order.id_typed(),
            "notification not sent to regular customer"
        );
        NotificationOutcome::Skipped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Whatsapp,
}

/// JSON document posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(rename = "type")]
    pub channel: Channel,
    pub user_id: CustomerId,
    pub user_email: String,
    pub user_name: String,
    /// Raw tier tag as stored on the customer.
    pub user_type: Option<String>,
    pub order_id: OrderId,
    pub order_status: OrderStatus,
    pub total_amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl NotificationPayload {
    pub fn new(channel: Channel, order: &Order, customer: &Customer, timestamp: DateTime<Utc>) -> Self {
        Self {
            channel,
            user_id: order.customer_id(),
            user_email: customer.email.clone(),
            user_name: customer.name.clone(),
            user_type: customer.tier_tag.clone(),
            order_id: order.id_typed(),
            order_status: order.status(),
            total_amount: order.total_amount(),
            timestamp,
        }
    }
}

/// Posts a [`NotificationPayload`] to a fixed endpoint.
///
/// Premium customers use [`Channel::Email`], VIP customers [`Channel::Whatsapp`].
pub struct WebhookNotification {
    channel: Channel,
    url: String,
    client: Arc<dyn WebhookClient>,
}

impl core::fmt::Debug for WebhookNotification {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebhookNotification")
            .field("channel", &self.channel)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl WebhookNotification {
    pub fn new(channel: Channel, url: impl Into<String>, client: Arc<dyn WebhookClient>) -> Self {
        Self {
            channel,
            url: url.into(),
            client,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }
}

impl NotificationStrategy for WebhookNotification {
    fn notify(&self, order: &Order, customer: Option<&Customer>) -> NotificationOutcome {
        let Some(customer) = customer else {
            tracing::warn!(
                user_id = %order.customer_id(),
                order_id = %order.id_typed(),
                "customer not found, webhook notification dropped"
            );
            return NotificationOutcome::Failed {
                reason: "customer not found".to_string(),
            };
        };

        let payload = NotificationPayload::new(self.channel, order, customer, Utc::now());
        let document = match serde_json::to_value(&payload) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(order_id = %order.id_typed(), error = %e, "failed to encode notification");
                return NotificationOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        match self.client.post_json(&self.url, &document) {
            Ok(response) => {
                tracing::info!(
                    user_id = %order.customer_id(),
                    order_id = %order.id_typed(),
                    channel = ?self.channel,
                    payload = %document,
                    status = response.status,
                    response = %response.body,
                    "notification sent"
                );
                NotificationOutcome::Delivered {
                    status: response.status,
                    body: response.body,
                }
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %order.customer_id(),
                    order_id = %order.id_typed(),
                    channel = ?self.channel,
                    payload = %document,
                    error = %e,
                    "notification failed"
                );
                NotificationOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
