//! Parties domain module (customers).
//!
//! Customers own orders; their tier decides how they are notified about
//! order status changes.

pub mod customer;

pub use customer::{Customer, CustomerDirectory, CustomerTier};
