use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderflow_core::{AggregateRoot, CustomerId, DomainError, DomainResult, OrderId};
use orderflow_pricing::{DiscountRecord, DiscountSummary};

/// Longest accepted product name on an order line.
pub const MAX_PRODUCT_NAME_LEN: usize = 255;

/// Highest accepted unit price (one billion currency units).
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// A terminal status has no outbound transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
                DomainError::validation(format!("status must be one of: {}", allowed.join(", ")))
            })
    }
}

/// Order line: product, quantity, unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderLine {
    pub fn new(product_name: impl Into<String>, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            product_name: product_name.into(),
            quantity,
            unit_price,
        }
    }

    /// `unit_price * quantity`; overflow is a validation error.
    pub fn line_total(&self) -> DomainResult<Decimal> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "line total of '{}' is out of range",
                    self.product_name
                ))
            })
    }

    pub fn validate(&self) -> DomainResult<()> {
        let name = self.product_name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("product_name must not be empty"));
        }
        if self.product_name.chars().count() > MAX_PRODUCT_NAME_LEN {
            return Err(DomainError::validation(format!(
                "product_name must be at most {MAX_PRODUCT_NAME_LEN} characters"
            )));
        }
        if self.quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        if self.unit_price.is_sign_negative() {
            return Err(DomainError::validation("price must not be negative"));
        }
        if self.unit_price > MAX_UNIT_PRICE {
            return Err(DomainError::validation(format!(
                "price must be at most {MAX_UNIT_PRICE}"
            )));
        }
        Ok(())
    }
}

/// Base amount of an order before discounts: sum of `price * quantity`.
pub fn base_amount(lines: &[OrderLine]) -> DomainResult<Decimal> {
    lines.iter().try_fold(Decimal::ZERO, |total, line| {
        total
            .checked_add(line.line_total()?)
            .ok_or_else(|| DomainError::validation("order amount is out of range"))
    })
}

/// Aggregate root: Order.
///
/// Pricing fields satisfy `total_amount = original_amount - discount_amount`
/// with a non-negative discount. The status only changes through
/// [`crate::OrderStateMachine::transition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    status: OrderStatus,
    lines: Vec<OrderLine>,
    original_amount: Decimal,
    discount_amount: Decimal,
    total_amount: Decimal,
    discount_details: Vec<DiscountRecord>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Order {
    /// Build a new `pending` order from its lines and the pricing computed for
    /// them.
    ///
    /// The discount amount is taken as `original - final` so the pricing
    /// invariant holds exactly even though each pipeline stage rounds.
    pub fn place(
        id: OrderId,
        customer_id: CustomerId,
        lines: Vec<OrderLine>,
        pricing: DiscountSummary,
        placed_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation("order must have at least one line"));
        }
        for line in &lines {
            line.validate()?;
        }

        let expected = base_amount(&lines)?;
        if pricing.original_amount != expected {
            return Err(DomainError::invariant(format!(
                "pricing was computed for {} but lines add up to {expected}",
                pricing.original_amount
            )));
        }

        let discount_amount = pricing.original_amount - pricing.final_amount;
        if discount_amount.is_sign_negative() {
            return Err(DomainError::invariant("discount amount must not be negative"));
        }

        Ok(Self {
            id,
            customer_id,
            status: OrderStatus::Pending,
            lines,
            original_amount: pricing.original_amount,
            discount_amount,
            total_amount: pricing.final_amount,
            discount_details: pricing.discounts_applied,
            created_at: placed_at,
            updated_at: placed_at,
            version: 0,
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn original_amount(&self) -> Decimal {
        self.original_amount
    }

    pub fn discount_amount(&self) -> Decimal {
        self.discount_amount
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn discount_details(&self) -> &[DiscountRecord] {
        &self.discount_details
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Called by repositories after a successful write.
    pub fn mark_persisted(&mut self, version: u64) {
        self.version = version;
    }

    pub(crate) fn set_status(&mut self, status: OrderStatus, at: DateTime<Utc>) {
        self.status = status;
        self.updated_at = at;
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;
    use orderflow_pricing::{DiscountService, PricingContext};

    pub(crate) fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    pub(crate) fn test_lines() -> Vec<OrderLine> {
        vec![
            OrderLine::new("Keyboard", 1, d("30.00")),
            OrderLine::new("Cable", 2, d("7.75")),
        ]
    }

    pub(crate) fn pending_order() -> Order {
        let lines = test_lines();
        let friday = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        let pricing = DiscountService::seeded(1)
            .calculate_final_amount(base_amount(&lines).unwrap(), PricingContext::new(friday));
        Order::place(OrderId::new(), CustomerId::new(), lines, pricing, Utc::now()).unwrap()
    }

    #[test]
    fn status_parses_known_values() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_lists_allowed_values_in_order() {
        let err = "archived".parse::<OrderStatus>().unwrap_err();
        assert_eq!(
            err,
            DomainError::validation(
                "status must be one of: pending, processing, shipped, delivered, cancelled"
            )
        );
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Delivered).unwrap();
        assert_eq!(json, "\"delivered\"");
    }

    #[test]
    fn only_cancelled_is_terminal() {
        let terminal: Vec<_> = OrderStatus::ALL.into_iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![OrderStatus::Cancelled]);
    }

    #[test]
    fn base_amount_sums_lines() {
        assert_eq!(base_amount(&test_lines()).unwrap(), d("45.50"));
    }

    #[test]
    fn oversized_amounts_are_rejected_not_panicking() {
        let huge = OrderLine::new("X", 2, Decimal::MAX);
        assert!(matches!(huge.validate(), Err(DomainError::Validation(_))));
        assert!(matches!(huge.line_total(), Err(DomainError::Validation(_))));

        let single = OrderLine::new("X", 1, Decimal::MAX);
        assert!(single.validate().is_err());
        assert_eq!(single.line_total().unwrap(), Decimal::MAX);
        let err = base_amount(&[single.clone(), single]).unwrap_err();
        assert_eq!(err, DomainError::validation("order amount is out of range"));

        let at_limit = OrderLine::new("X", u32::MAX, MAX_UNIT_PRICE);
        assert!(at_limit.validate().is_ok());
        assert!(at_limit.line_total().is_ok());
    }

    #[test]
    fn placed_order_is_pending_with_consistent_pricing() {
        let order = pending_order();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.original_amount(), d("45.50"));
        assert_eq!(order.total_amount(), d("45.50"));
        assert_eq!(order.discount_amount(), Decimal::ZERO);
        assert!(order.discount_details().is_empty());
        assert_eq!(order.version(), 0);
    }

    #[test]
    fn discounted_order_keeps_total_invariant() {
        let lines = test_lines();
        let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let pricing = DiscountService::seeded(8)
            .calculate_final_amount(base_amount(&lines).unwrap(), PricingContext::new(monday));
        let order = Order::place(OrderId::new(), CustomerId::new(), lines, pricing, Utc::now())
            .unwrap();

        assert_eq!(
            order.total_amount(),
            order.original_amount() - order.discount_amount()
        );
        assert!(order.discount_amount() > Decimal::ZERO);
        assert_eq!(order.discount_details().len(), 2);
    }

    #[test]
    fn place_rejects_empty_and_invalid_lines() {
        let friday = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        let service = DiscountService::seeded(1);

        let pricing = service.calculate_final_amount(Decimal::ZERO, PricingContext::new(friday));
        let err = Order::place(OrderId::new(), CustomerId::new(), vec![], pricing, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let lines = vec![OrderLine::new("Widget", 0, d("1.00"))];
        let pricing = service.calculate_final_amount(Decimal::ZERO, PricingContext::new(friday));
        let err = Order::place(OrderId::new(), CustomerId::new(), lines, pricing, Utc::now())
            .unwrap_err();
        assert_eq!(err, DomainError::validation("quantity must be at least 1"));

        let lines = vec![OrderLine::new("Widget", 1, d("-1.00"))];
        assert!(lines[0].validate().is_err());

        let lines = vec![OrderLine::new("x".repeat(256), 1, d("1.00"))];
        assert!(lines[0].validate().is_err());
    }

    #[test]
    fn place_rejects_pricing_for_other_amount() {
        let friday = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        let pricing = DiscountService::seeded(1)
            .calculate_final_amount(d("10.00"), PricingContext::new(friday));
        let err = Order::place(OrderId::new(), CustomerId::new(), test_lines(), pricing, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }
}
