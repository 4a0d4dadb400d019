use std::collections::HashMap;
use std::sync::RwLock;

use orderflow_core::{AggregateRoot, DomainError, ExpectedVersion, OrderId};
use orderflow_sales::{Order, OrderRepository, RepositoryError};

/// In-memory order store with optimistic concurrency.
///
/// Intended for tests/dev. Each successful `save` bumps the version by one.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored orders, oldest id first.
    pub fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by_key(|o| o.id_typed());
        Ok(all)
    }

    fn expected_version(order: &Order) -> ExpectedVersion {
        match order.version() {
            0 => ExpectedVersion::New,
            v => ExpectedVersion::Exact(v),
        }
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn save(&self, order: &Order) -> Result<Order, RepositoryError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;

        let id = order.id_typed();
        let current = orders.get(&id).map(|o| o.version());
        let expected = Self::expected_version(order);

        expected.check(current).map_err(|e| match e {
            DomainError::Conflict(msg) => RepositoryError::Conflict(format!("order {id}: {msg}")),
            other => RepositoryError::Storage(other.to_string()),
        })?;

        let mut stored = order.clone();
        stored.mark_persisted(order.version() + 1);
        orders.insert(id, stored.clone());
        Ok(stored)
    }

    fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;
        Ok(orders.get(&id).cloned())
    }
}
