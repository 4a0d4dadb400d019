//! Process-wide tracing setup shared by every orderflow binary and test.

pub mod tracing;

pub use crate::tracing::{DEFAULT_FILTER, init, init_for_tests};
