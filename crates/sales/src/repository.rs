use std::sync::Arc;

use thiserror::Error;

use orderflow_core::OrderId;

use crate::order::Order;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The stored order moved on since it was loaded.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("order {0} not found")]
    NotFound(OrderId),

    /// Backend failure (connection, lock poisoning, ...).
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Order persistence (storage itself is external).
///
/// Implementations must not lose a read-modify-write under concurrent
/// access: `save` is expected to reject a write whose `order.version()` no
/// longer matches what is stored.
pub trait OrderRepository: Send + Sync {
    /// Persist `order` and return the stored copy with its new version.
    ///
    /// Version 0 means "insert"; any other version must match the stored one.
    fn save(&self, order: &Order) -> Result<Order, RepositoryError>;

    fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;
}

impl<R> OrderRepository for Arc<R>
where
    R: OrderRepository + ?Sized,
{
    fn save(&self, order: &Order) -> Result<Order, RepositoryError> {
        (**self).save(order)
    }

    fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        (**self).get(id)
    }
}
