//! Aggregate root trait and optimistic concurrency expectations.

use crate::error::{DomainError, DomainResult};

/// Aggregate root marker + minimal interface.
///
/// Kept small so domain modules decide how they model state changes without
/// pulling in storage concerns.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's persisted state.
    ///
    /// Zero means "never persisted".
    fn version(&self) -> u64;
}

/// Optimistic concurrency expectation for an aggregate write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// The aggregate must not exist yet.
    New,
    /// Require the stored aggregate to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: Option<u64>) -> bool {
        match (self, actual) {
            (ExpectedVersion::New, None) => true,
            (ExpectedVersion::New, Some(_)) => false,
            (ExpectedVersion::Exact(v), Some(a)) => v == a,
            (ExpectedVersion::Exact(_), None) => false,
        }
    }

    pub fn check(self, actual: Option<u64>) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual:?})"
            )))
        }
    }
}
