//! Order pricing: a decorator chain of discount stages.
//!
//! Each stage wraps an inner [`PriceCalculator`], asks it for the upstream
//! amount first and then applies its own adjustment, so discounts compound on
//! the already-discounted amount. Stages record what they applied in the
//! per-calculation [`PricingContext`].

pub mod calculator;
pub mod context;
pub mod discount_service;
pub mod monday;
pub mod random;

pub use calculator::{BasePriceCalculator, PriceCalculator};
pub use context::{DiscountKind, DiscountRecord, PricingContext};
pub use discount_service::{has_available_discounts, DiscountService, DiscountSummary};
pub use monday::MondayDiscount;
pub use random::RandomDiscount;
