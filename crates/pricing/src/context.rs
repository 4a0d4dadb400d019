use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderflow_core::{CustomerId, DomainError, DomainResult};

/// Kind of discount applied by a pricing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    MondayDiscount,
    RandomDiscount,
}

impl DiscountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountKind::MondayDiscount => "monday_discount",
            DiscountKind::RandomDiscount => "random_discount",
        }
    }
}

/// One applied discount, as recorded by the stage that applied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRecord {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub percentage: Decimal,
    /// Currency amount taken off, unrounded.
    pub amount: Decimal,
    pub description: String,
}

/// Scratchpad for a single price calculation.
///
/// Created fresh for every calculation. Stages may append discount records
/// but never remove or reorder them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingContext {
    order_date: NaiveDate,
    customer_id: Option<CustomerId>,
    applied_discounts: Vec<DiscountRecord>,
}

impl PricingContext {
    pub fn new(order_date: NaiveDate) -> Self {
        Self {
            order_date,
            customer_id: None,
            applied_discounts: Vec::new(),
        }
    }

    pub fn for_customer(order_date: NaiveDate, customer_id: CustomerId) -> Self {
        Self {
            customer_id: Some(customer_id),
            ..Self::new(order_date)
        }
    }

    /// Parse an order date given as `YYYY-MM-DD` or an RFC 3339 timestamp.
    ///
    /// Timestamps keep their own offset's calendar day.
    pub fn parse_order_date(raw: &str) -> DomainResult<NaiveDate> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .map_err(|e| DomainError::validation(format!("invalid order date '{raw}': {e}")))
    }

    pub fn order_date(&self) -> NaiveDate {
        self.order_date
    }

    pub fn weekday(&self) -> Weekday {
        self.order_date.weekday()
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    pub fn applied_discounts(&self) -> &[DiscountRecord] {
        &self.applied_discounts
    }

    pub fn record_discount(&mut self, record: DiscountRecord) {
        self.applied_discounts.push(record);
    }

    pub fn into_discounts(self) -> Vec<DiscountRecord> {
        self.applied_discounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_dates_and_timestamps() {
        let date = PricingContext::parse_order_date("2024-01-08").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());

        let ts = PricingContext::parse_order_date("2024-01-08T23:30:00-05:00").unwrap();
        assert_eq!(ts, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn rejects_unparsable_dates() {
        let err = PricingContext::parse_order_date("next monday").unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("next monday") => {}
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn records_are_kept_in_order() {
        let mut ctx = PricingContext::new(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(ctx.weekday(), Weekday::Mon);

        for kind in [DiscountKind::MondayDiscount, DiscountKind::RandomDiscount] {
            ctx.record_discount(DiscountRecord {
                kind,
                percentage: Decimal::ONE,
                amount: Decimal::ONE,
                description: kind.as_str().to_string(),
            });
        }

        let kinds: Vec<_> = ctx.applied_discounts().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![DiscountKind::MondayDiscount, DiscountKind::RandomDiscount]);
    }

    #[test]
    fn record_serializes_with_type_tag() {
        let record = DiscountRecord {
            kind: DiscountKind::RandomDiscount,
            percentage: "2.5".parse().unwrap(),
            amount: "1.02375".parse().unwrap(),
            description: "Random discount of 2.5%".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "random_discount");
        assert_eq!(json["percentage"], "2.5");
    }
}
