//! Order status state machine.
//!
//! ```text
//! pending ──► processing ──► shipped ──► delivered
//!    │            │             │            │
//!    └────────────┴──────┬──────┴────────────┘
//!                        ▼
//!                    cancelled (terminal)
//! ```
//!
//! Transitions never skip a step and never go backwards; every non-terminal
//! status may be cancelled.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use orderflow_core::AggregateRoot;

use crate::order::{Order, OrderStatus};
use crate::repository::{OrderRepository, RepositoryError};

/// Receives every order whose status changed successfully.
///
/// Called after the new status is persisted. Implementations own their
/// failure handling: nothing they do can undo the transition.
pub trait TransitionNotifier: Send + Sync {
    fn order_transitioned(&self, order: &Order);
}

impl<N> TransitionNotifier for Arc<N>
where
    N: TransitionNotifier + ?Sized,
{
    fn order_transitioned(&self, order: &Order) {
        (**self).order_transitioned(order)
    }
}

/// A requested status change that is not in the transition table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "cannot change status from '{current}' to '{requested}'. Available states: {}",
    describe_available(.available)
)]
pub struct InvalidTransition {
    pub current: OrderStatus,
    pub requested: OrderStatus,
    /// Legal next states from `current`, in lifecycle order.
    pub available: Vec<OrderStatus>,
}

fn describe_available(available: &[OrderStatus]) -> String {
    if available.is_empty() {
        return "none".to_string();
    }
    available
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("failed to persist order: {0}")]
    Repository(#[from] RepositoryError),
}

/// Fixed transition table for [`OrderStatus`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Legal next states from `from`, in lifecycle order.
    pub fn available_transitions(from: OrderStatus) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match from {
            Pending => &[Processing, Cancelled],
            Processing => &[Shipped, Cancelled],
            Shipped => &[Delivered, Cancelled],
            Delivered => &[Cancelled],
            Cancelled => &[],
        }
    }

    /// Same as [`Self::available_transitions`] for a raw status string;
    /// unknown strings have no transitions.
    pub fn available_transitions_for(from: &str) -> &'static [OrderStatus] {
        from.parse::<OrderStatus>()
            .map(Self::available_transitions)
            .unwrap_or(&[])
    }

    pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
        Self::available_transitions(from).contains(&to)
    }

    pub fn all_statuses() -> &'static [OrderStatus] {
        &OrderStatus::ALL
    }

    pub fn is_valid_status(status: &str) -> bool {
        status.parse::<OrderStatus>().is_ok()
    }

    /// Human-readable label of a transition.
    pub fn transition_description(from: OrderStatus, to: OrderStatus) -> &'static str {
        use OrderStatus::*;
        match (from, to) {
            (Pending, Processing) => "Confirm the order",
            (Pending, Cancelled) => "Cancel pending order",
            (Processing, Shipped) => "Ship the order",
            (Processing, Cancelled) => "Cancel order in processing",
            (Shipped, Delivered) => "Confirm delivery",
            (Shipped, Cancelled) => "Cancel shipped order",
            (Delivered, Cancelled) => "Cancel delivered order",
            _ => "Undefined transition",
        }
    }

    /// Move `order` to `new_status`, persist it, then notify.
    ///
    /// Persistence happens first; the notifier only ever sees committed
    /// orders and cannot fail the transition.
    pub fn transition<R, N>(
        mut order: Order,
        new_status: OrderStatus,
        repository: &R,
        notifier: &N,
    ) -> Result<Order, TransitionError>
    where
        R: OrderRepository + ?Sized,
        N: TransitionNotifier + ?Sized,
    {
        let current = order.status();
        if !Self::can_transition(current, new_status) {
            tracing::warn!(
                order_id = %order.id_typed(),
                current = %current,
                requested = %new_status,
                "rejected order status transition"
            );
            return Err(InvalidTransition {
                current,
                requested: new_status,
                available: Self::available_transitions(current).to_vec(),
            }
            .into());
        }

        order.set_status(new_status, Utc::now());
        let saved = repository.save(&order)?;

        tracing::info!(
            order_id = %saved.id_typed(),
            from = %current,
            to = %new_status,
            version = saved.version(),
            "order status changed"
        );

        notifier.order_transitioned(&saved);
        Ok(saved)
    }
}
