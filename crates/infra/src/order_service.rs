//! Order application service.
//!
//! Wires the two flows an order goes through:
//!
//! ```text
//! create:  lines ─► base amount ─► DiscountService ─► Order::place ─► save
//! update:  status string ─► parse ─► load ─► OrderStateMachine::transition
//!                                            (save, then notify once)
//! ```

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use orderflow_core::{CustomerId, DomainError, OrderId};
use orderflow_notifications::{NotificationDispatcher, ReqwestWebhookClient, WebhookError};
use orderflow_parties::CustomerDirectory;
use orderflow_pricing::{DiscountService, PricingContext};
use orderflow_sales::{
    Order, OrderLine, OrderRepository, OrderStateMachine, OrderStatus, RepositoryError,
    TransitionError, TransitionNotifier, base_amount,
};

use crate::config::AppConfig;

/// Input of [`OrderService::create_order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrder {
    pub customer_id: CustomerId,
    pub lines: Vec<OrderLine>,
    /// Date the discount rules are evaluated against.
    pub order_date: NaiveDate,
}

impl CreateOrder {
    pub fn new(customer_id: CustomerId, lines: Vec<OrderLine>, order_date: NaiveDate) -> Self {
        Self {
            customer_id,
            lines,
            order_date,
        }
    }

    /// Same as [`CreateOrder::new`] with a `YYYY-MM-DD` or RFC 3339 date.
    pub fn with_raw_date(
        customer_id: CustomerId,
        lines: Vec<OrderLine>,
        order_date: &str,
    ) -> Result<Self, OrderServiceError> {
        let order_date = PricingContext::parse_order_date(order_date)?;
        Ok(Self::new(customer_id, lines, order_date))
    }

    /// Order dated today (UTC).
    pub fn today(customer_id: CustomerId, lines: Vec<OrderLine>) -> Self {
        Self::new(customer_id, lines, Utc::now().date_naive())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderServiceError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The requested status is not reachable from the current one.
    #[error("cannot change status from '{current}' to '{requested}'")]
    InvalidTransition {
        current: OrderStatus,
        requested: OrderStatus,
        available: Vec<OrderStatus>,
    },

    /// Optimistic concurrency failure (stale order version).
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("repository failure: {0}")]
    Repository(String),

    /// The service could not be assembled from its configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<DomainError> for OrderServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => OrderServiceError::Validation(msg),
            DomainError::InvalidId(msg) => OrderServiceError::Validation(msg),
            DomainError::InvariantViolation(msg) => OrderServiceError::InvariantViolation(msg),
            DomainError::Conflict(msg) => OrderServiceError::Conflict(msg),
        }
    }
}

impl From<RepositoryError> for OrderServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict(msg) => OrderServiceError::Conflict(msg),
            RepositoryError::NotFound(id) => OrderServiceError::NotFound(format!("order {id}")),
            RepositoryError::Storage(msg) => OrderServiceError::Repository(msg),
        }
    }
}

impl From<WebhookError> for OrderServiceError {
    fn from(value: WebhookError) -> Self {
        OrderServiceError::Configuration(value.to_string())
    }
}

impl From<TransitionError> for OrderServiceError {
    fn from(value: TransitionError) -> Self {
        match value {
            TransitionError::InvalidTransition(e) => OrderServiceError::InvalidTransition {
                current: e.current,
                requested: e.requested,
                available: e.available,
            },
            TransitionError::Repository(e) => e.into(),
        }
    }
}

/// Application service for orders.
///
/// Generic over the repository and the post-transition notifier so tests
/// run against in-memory implementations.
#[derive(Debug)]
pub struct OrderService<R, N> {
    repository: R,
    notifier: N,
    pricing: DiscountService,
}

impl<R, N> OrderService<R, N>
where
    R: OrderRepository,
    N: TransitionNotifier,
{
    pub fn new(repository: R, notifier: N, pricing: DiscountService) -> Self {
        Self {
            repository,
            notifier,
            pricing,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Price and persist a new `pending` order.
    pub fn create_order(&self, request: CreateOrder) -> Result<Order, OrderServiceError> {
        if request.lines.is_empty() {
            return Err(OrderServiceError::Validation(
                "order must have at least one line".to_string(),
            ));
        }
        for line in &request.lines {
            line.validate()?;
        }

        let base = base_amount(&request.lines)?;
        let context = PricingContext::for_customer(request.order_date, request.customer_id);
        let pricing = self.pricing.calculate_final_amount(base, context);

        let order = Order::place(
            OrderId::new(),
            request.customer_id,
            request.lines,
            pricing,
            Utc::now(),
        )?;
        let saved = self.repository.save(&order)?;

        tracing::info!(
            order_id = %saved.id_typed(),
            user_id = %saved.customer_id(),
            original_amount = %saved.original_amount(),
            discount_amount = %saved.discount_amount(),
            total_amount = %saved.total_amount(),
            discounts = saved.discount_details().len(),
            "order created"
        );

        Ok(saved)
    }

    pub fn get_order(&self, order_id: OrderId) -> Result<Order, OrderServiceError> {
        self.repository
            .get(order_id)?
            .ok_or_else(|| OrderServiceError::NotFound(format!("order {order_id}")))
    }

    /// Move an order to `requested`, validated against the transition table.
    pub fn update_status(
        &self,
        order_id: OrderId,
        requested: &str,
    ) -> Result<Order, OrderServiceError> {
        let new_status: OrderStatus = requested.parse()?;
        let order = self.get_order(order_id)?;
        let updated =
            OrderStateMachine::transition(order, new_status, &self.repository, &self.notifier)?;
        Ok(updated)
    }
}

impl<R> OrderService<R, NotificationDispatcher>
where
    R: OrderRepository,
{
    /// Production wiring: blocking reqwest webhook client, standard tier
    /// strategies and an entropy-seeded discount chain.
    pub fn from_config(
        config: &AppConfig,
        repository: R,
        customers: Arc<dyn CustomerDirectory>,
    ) -> Result<Self, OrderServiceError> {
        let client = ReqwestWebhookClient::from_config(&config.webhook)?;
        let dispatcher =
            NotificationDispatcher::standard(customers, Arc::new(client), &config.webhook);

        tracing::info!(
            webhook_url = %config.webhook.url,
            webhook_timeout_secs = config.webhook.timeout.as_secs(),
            "order service configured"
        );

        Ok(Self::new(repository, dispatcher, DiscountService::new()))
    }

    /// [`OrderService::from_config`] with [`AppConfig::from_env`].
    pub fn from_env(
        repository: R,
        customers: Arc<dyn CustomerDirectory>,
    ) -> Result<Self, OrderServiceError> {
        Self::from_config(&AppConfig::from_env(), repository, customers)
    }
}
