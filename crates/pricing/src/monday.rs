use chrono::Weekday;
use rust_decimal::Decimal;

use orderflow_core::{percent_of, round_money};

use crate::calculator::PriceCalculator;
use crate::context::{DiscountKind, DiscountRecord, PricingContext};

/// Fixed percentage taken off orders placed on a Monday.
pub const MONDAY_DISCOUNT_PERCENTAGE: i64 = 10;

/// Takes a fixed percentage off the upstream amount when the order date is a
/// Monday.
#[derive(Debug, Clone)]
pub struct MondayDiscount<C> {
    inner: C,
    percentage: Decimal,
}

impl<C> MondayDiscount<C> {
    pub fn new(inner: C) -> Self {
        Self::with_percentage(inner, Decimal::from(MONDAY_DISCOUNT_PERCENTAGE))
    }

    pub fn with_percentage(inner: C, percentage: Decimal) -> Self {
        Self { inner, percentage }
    }

    fn applies(context: &PricingContext) -> bool {
        context.weekday() == Weekday::Mon
    }
}

impl<C: PriceCalculator> PriceCalculator for MondayDiscount<C> {
    fn calculate(&self, base_amount: Decimal, context: &mut PricingContext) -> Decimal {
        let amount = self.inner.calculate(base_amount, context);
        if !Self::applies(context) {
            return amount;
        }

        let discount = percent_of(amount, self.percentage);
        context.record_discount(DiscountRecord {
            kind: DiscountKind::MondayDiscount,
            percentage: self.percentage,
            amount: discount,
            description: "Monday special discount".to_string(),
        });

        round_money(amount - discount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::BasePriceCalculator;
    use chrono::NaiveDate;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    #[test]
    fn monday_discount_applies_on_monday() {
        let calculator = MondayDiscount::new(BasePriceCalculator);
        let mut ctx = PricingContext::new(monday());

        let result = calculator.calculate(d("100.00"), &mut ctx);

        assert_eq!(result, d("90.00"));
        assert_eq!(ctx.applied_discounts().len(), 1);
        let record = &ctx.applied_discounts()[0];
        assert_eq!(record.kind, DiscountKind::MondayDiscount);
        assert_eq!(record.percentage, Decimal::from(10));
        assert_eq!(record.amount, d("10"));
    }

    #[test]
    fn monday_discount_does_not_apply_on_other_days() {
        let calculator = MondayDiscount::new(BasePriceCalculator);
        for offset in 1..7u64 {
            let mut ctx = PricingContext::new(monday() + chrono::Days::new(offset));
            assert_eq!(calculator.calculate(d("100.00"), &mut ctx), d("100.00"));
            assert!(ctx.applied_discounts().is_empty());
        }
    }

    #[test]
    fn output_is_rounded_to_cents() {
        let calculator = MondayDiscount::new(BasePriceCalculator);
        let mut ctx = PricingContext::new(monday());

        // 33.35 - 3.335 = 30.015 -> 30.02
        assert_eq!(calculator.calculate(d("33.35"), &mut ctx), d("30.02"));
        assert_eq!(ctx.applied_discounts()[0].amount, d("3.335"));
    }
}
