use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use orderflow_core::CustomerId;
use orderflow_parties::{Customer, CustomerDirectory};

/// In-memory customer directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCustomerDirectory {
    inner: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, customer: Customer) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(customer.id, customer);
    }
}

impl CustomerDirectory for InMemoryCustomerDirectory {
    fn find(&self, id: CustomerId) -> Option<Customer> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}
