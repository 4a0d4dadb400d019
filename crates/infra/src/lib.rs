//! Infrastructure layer: in-memory storage, configuration and the
//! application service wiring pricing, the state machine and notifications.

pub mod config;
pub mod customers;
pub mod order_service;
pub mod repository;

pub use config::AppConfig;
pub use customers::InMemoryCustomerDirectory;
pub use order_service::{CreateOrder, OrderService, OrderServiceError};
pub use repository::InMemoryOrderRepository;
