//! Test doubles shared by the strategy and dispatcher tests.

use std::io;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use orderflow_core::{CustomerId, OrderId};
use orderflow_parties::{Customer, CustomerDirectory};
use orderflow_pricing::{DiscountService, PricingContext};
use orderflow_sales::{Order, OrderLine, base_amount};

use crate::webhook::{WebhookClient, WebhookError, WebhookResponse};

/// Records every call and answers with a canned result.
pub(crate) struct RecordingWebhookClient {
    calls: Mutex<Vec<(String, serde_json::Value)>>,
    answer: Result<WebhookResponse, WebhookError>,
}

impl RecordingWebhookClient {
    pub(crate) fn ok() -> Self {
        Self::answering(Ok(WebhookResponse {
            status: 200,
            body: "ok".to_string(),
        }))
    }

    pub(crate) fn failing() -> Self {
        Self::answering(Err(WebhookError::Transport("connection refused".to_string())))
    }

    fn answering(answer: Result<WebhookResponse, WebhookError>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            answer,
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, serde_json::Value)> {
        self.calls.lock().unwrap().clone()
    }
}

impl WebhookClient for RecordingWebhookClient {
    fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<WebhookResponse, WebhookError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        self.answer.clone()
    }
}

#[derive(Default)]
pub(crate) struct StaticDirectory {
    customers: Vec<Customer>,
}

impl StaticDirectory {
    pub(crate) fn with(customers: impl IntoIterator<Item = Customer>) -> Self {
        Self {
            customers: customers.into_iter().collect(),
        }
    }
}

impl CustomerDirectory for StaticDirectory {
    fn find(&self, id: CustomerId) -> Option<Customer> {
        self.customers.iter().find(|c| c.id == id).cloned()
    }
}

pub(crate) fn customer(tag: Option<&str>) -> Customer {
    let customer = Customer::new(CustomerId::new(), "John Doe", "john@example.com");
    match tag {
        Some(tag) => customer.with_tier_tag(tag),
        None => customer,
    }
}

/// A pending, undiscounted 45.50 order owned by `customer_id`.
pub(crate) fn order_for(customer_id: CustomerId) -> Order {
    let lines = vec![
        OrderLine::new("Keyboard", 1, Decimal::new(30_00, 2)),
        OrderLine::new("Cable", 2, Decimal::new(7_75, 2)),
    ];
    let friday = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
    let pricing = DiscountService::seeded(1)
        .calculate_final_amount(base_amount(&lines).unwrap(), PricingContext::new(friday));
    Order::place(OrderId::new(), customer_id, lines, pricing, Utc::now()).unwrap()
}

/// In-memory log sink for a scoped `tracing` subscriber.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber writing plain text into the returned buffer.
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, CapturedLogs) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    (value, logs)
}
