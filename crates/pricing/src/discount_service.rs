use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderflow_core::{ratio_percent, round_money};

use crate::calculator::{BasePriceCalculator, PriceCalculator};
use crate::context::{DiscountRecord, PricingContext};
use crate::monday::MondayDiscount;
use crate::random::{RANDOM_DISCOUNT_DAYS, RandomDiscount};

/// Outcome of pricing one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountSummary {
    pub original_amount: Decimal,
    pub final_amount: Decimal,
    /// Sum of all applied discount amounts, rounded to cents.
    pub total_discount: Decimal,
    pub discounts_applied: Vec<DiscountRecord>,
    /// `total_discount / original_amount * 100`, zero for a zero original amount.
    pub savings_percentage: Decimal,
}

/// Whether any discount stage can fire on `date` (Monday through Thursday).
pub fn has_available_discounts(date: NaiveDate) -> bool {
    RANDOM_DISCOUNT_DAYS.contains(&date.weekday())
}

/// Prices orders through the fixed discount chain:
/// base → Monday discount → random discount.
pub struct DiscountService {
    calculator: Box<dyn PriceCalculator>,
}

impl core::fmt::Debug for DiscountService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DiscountService").finish_non_exhaustive()
    }
}

impl Default for DiscountService {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscountService {
    pub fn new() -> Self {
        Self::from_calculator(RandomDiscount::new(MondayDiscount::new(BasePriceCalculator)))
    }

    /// Same chain with an injected generator for the random stage.
    pub fn with_rng(rng: StdRng) -> Self {
        Self::from_calculator(RandomDiscount::with_rng(
            MondayDiscount::new(BasePriceCalculator),
            rng,
        ))
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_calculator(RandomDiscount::seeded(
            MondayDiscount::new(BasePriceCalculator),
            seed,
        ))
    }

    pub fn from_calculator(calculator: impl PriceCalculator + 'static) -> Self {
        Self {
            calculator: Box::new(calculator),
        }
    }

    /// Run the chain once over `base_amount` and summarize what it applied.
    pub fn calculate_final_amount(
        &self,
        base_amount: Decimal,
        mut context: PricingContext,
    ) -> DiscountSummary {
        let final_amount = self.calculator.calculate(base_amount, &mut context);
        let discounts_applied = context.into_discounts();

        let raw_total: Decimal = discounts_applied.iter().map(|d| d.amount).sum();
        let summary = DiscountSummary {
            original_amount: base_amount,
            final_amount,
            total_discount: round_money(raw_total),
            savings_percentage: ratio_percent(raw_total, base_amount),
            discounts_applied,
        };

        tracing::debug!(
            original_amount = %summary.original_amount,
            final_amount = %summary.final_amount,
            total_discount = %summary.total_discount,
            discounts = summary.discounts_applied.len(),
            "order priced"
        );

        summary
    }

    pub fn has_available_discounts(&self, date: NaiveDate) -> bool {
        has_available_discounts(date)
    }
}
