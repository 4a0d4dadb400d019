use std::sync::{Mutex, PoisonError};

use chrono::Weekday;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use orderflow_core::{percent_of, round_money};

use crate::calculator::PriceCalculator;
use crate::context::{DiscountKind, DiscountRecord, PricingContext};

/// Weekdays on which the random discount is offered.
pub const RANDOM_DISCOUNT_DAYS: [Weekday; 4] =
    [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu];

/// Takes a uniformly drawn percentage (1%–3% by default, two decimals) off
/// the upstream amount on eligible weekdays.
///
/// The generator is injected so callers can seed it; it sits behind a mutex
/// so one chain can serve concurrent calculations.
#[derive(Debug)]
pub struct RandomDiscount<C, R = StdRng> {
    inner: C,
    rng: Mutex<R>,
    min_percentage: Decimal,
    max_percentage: Decimal,
    days: Vec<Weekday>,
}

impl<C> RandomDiscount<C, StdRng> {
    /// Random discount backed by an entropy-seeded generator.
    pub fn new(inner: C) -> Self {
        Self::with_rng(inner, StdRng::from_entropy())
    }

    pub fn seeded(inner: C, seed: u64) -> Self {
        Self::with_rng(inner, StdRng::seed_from_u64(seed))
    }
}

impl<C, R: Rng> RandomDiscount<C, R> {
    pub fn with_rng(inner: C, rng: R) -> Self {
        Self {
            inner,
            rng: Mutex::new(rng),
            min_percentage: Decimal::ONE,
            max_percentage: Decimal::from(3),
            days: RANDOM_DISCOUNT_DAYS.to_vec(),
        }
    }

    /// Override the percentage bounds. Bounds are swapped if given reversed.
    pub fn with_range(mut self, min_percentage: Decimal, max_percentage: Decimal) -> Self {
        self.min_percentage = min_percentage.min(max_percentage);
        self.max_percentage = max_percentage.max(min_percentage);
        self
    }

    pub fn with_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.days = days.into_iter().collect();
        self
    }

    fn applies(&self, context: &PricingContext) -> bool {
        self.days.contains(&context.weekday())
    }

    /// `min + u * (max - min)` with `u` uniform in `[0, 1)`, rounded to two
    /// decimals.
    fn draw_percentage(&self) -> Decimal {
        let u: f64 = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .r#gen();
        let u = Decimal::from_f64(u).unwrap_or_default();
        round_money(self.min_percentage + u * (self.max_percentage - self.min_percentage))
    }
}

impl<C, R> PriceCalculator for RandomDiscount<C, R>
where
    C: PriceCalculator,
    R: Rng + Send,
{
    fn calculate(&self, base_amount: Decimal, context: &mut PricingContext) -> Decimal {
        let amount = self.inner.calculate(base_amount, context);
        if !self.applies(context) {
            return amount;
        }

        let percentage = self.draw_percentage();
        let discount = percent_of(amount, percentage);
        context.record_discount(DiscountRecord {
            kind: DiscountKind::RandomDiscount,
            percentage,
            amount: discount,
            description: format!("Random discount of {percentage}%"),
        });

        round_money(amount - discount)
    }
}
