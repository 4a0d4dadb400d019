//! Sales orders: the order model and its status state machine.
//!
//! Storage and notification delivery are collaborators reached through the
//! [`OrderRepository`] and [`TransitionNotifier`] traits.

pub mod order;
pub mod repository;
pub mod state_machine;

pub use order::{base_amount, Order, OrderLine, OrderStatus, MAX_UNIT_PRICE};
pub use repository::{OrderRepository, RepositoryError};
pub use state_machine::{InvalidTransition, OrderStateMachine, TransitionError, TransitionNotifier};
