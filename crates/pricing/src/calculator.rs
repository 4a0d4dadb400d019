use rust_decimal::Decimal;

use crate::context::PricingContext;

/// One stage of the price calculation chain.
///
/// Decorating stages own the stage they wrap and must call it before applying
/// their own adjustment. The context is shared by the whole chain for a
/// single calculation.
pub trait PriceCalculator: Send + Sync {
    fn calculate(&self, base_amount: Decimal, context: &mut PricingContext) -> Decimal;
}

impl<C> PriceCalculator for Box<C>
where
    C: PriceCalculator + ?Sized,
{
    fn calculate(&self, base_amount: Decimal, context: &mut PricingContext) -> Decimal {
        (**self).calculate(base_amount, context)
    }
}

/// Innermost stage: returns the amount untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasePriceCalculator;

impl BasePriceCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl PriceCalculator for BasePriceCalculator {
    fn calculate(&self, base_amount: Decimal, _context: &mut PricingContext) -> Decimal {
        base_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    #[test]
    fn base_calculator_returns_same_amount() {
        let mut ctx = PricingContext::new(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        let result = BasePriceCalculator::new().calculate("100.00".parse().unwrap(), &mut ctx);
        assert_eq!(result, "100.00".parse::<Decimal>().unwrap());
        assert!(ctx.applied_discounts().is_empty());
    }

    proptest! {
        /// Property: the base stage is the identity for any amount and any date.
        #[test]
        fn base_calculator_is_identity(cents in 0i64..100_000_000, day in 0u32..365) {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(day as u64);
            let mut ctx = PricingContext::new(date);
            let amount = Decimal::new(cents, 2);
            prop_assert_eq!(BasePriceCalculator.calculate(amount, &mut ctx), amount);
            prop_assert!(ctx.applied_discounts().is_empty());
        }
    }
}
