//! `orderflow-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod error;
pub mod id;
pub mod money;

pub use aggregate::{AggregateRoot, ExpectedVersion};
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, OrderId};
pub use money::{percent_of, ratio_percent, round_money};

pub use rust_decimal::Decimal;
