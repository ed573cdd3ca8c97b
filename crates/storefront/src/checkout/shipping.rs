//! Shipping methods and delivery estimates.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::Price;

/// How the order is shipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
    Overnight,
}

impl ShippingMethod {
    pub const ALL: [Self; 3] = [Self::Standard, Self::Express, Self::Overnight];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Overnight => "overnight",
        }
    }

    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Standard => "Standard Shipping",
            Self::Express => "Express Shipping",
            Self::Overnight => "Overnight Shipping",
        }
    }

    /// Shipping fee before any promo.
    #[must_use]
    pub const fn fee(&self) -> Decimal {
        match self {
            Self::Standard => Decimal::ZERO,
            Self::Express => Decimal::from_parts(999, 0, 0, false, 2),
            Self::Overnight => Decimal::from_parts(2499, 0, 0, false, 2),
        }
    }

    /// Delivery window in business days, `(earliest, latest)`.
    #[must_use]
    pub const fn business_days(&self) -> (u64, u64) {
        match self {
            Self::Standard => (5, 7),
            Self::Express => (2, 3),
            Self::Overnight => (1, 1),
        }
    }

    /// Human-readable delivery window, e.g. `5-7 business days`.
    #[must_use]
    pub const fn delivery_window(&self) -> &'static str {
        match self {
            Self::Standard => "5-7 business days",
            Self::Express => "2-3 business days",
            Self::Overnight => "Next business day",
        }
    }

    /// Full option label, e.g. `Express Shipping - 2-3 business days - $9.99`.
    #[must_use]
    pub fn label(&self) -> String {
        let fee = self.fee();
        let price = if fee.is_zero() {
            "Free".to_string()
        } else {
            Price::usd(fee).display()
        };
        format!("{} - {} - {price}", self.display_name(), self.delivery_window())
    }
}

impl std::str::FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown shipping method: {s}"))
    }
}

/// When an order should arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryEstimate {
    /// Window label, e.g. `5-7 business days`.
    pub label: &'static str,
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl DeliveryEstimate {
    /// Estimate for `method` when the order is placed on `placed_on`.
    #[must_use]
    pub fn for_method(method: ShippingMethod, placed_on: NaiveDate) -> Self {
        let (min, max) = method.business_days();
        Self {
            label: method.delivery_window(),
            earliest: add_business_days(placed_on, min),
            latest: add_business_days(placed_on, max),
        }
    }
}

/// The date `days` business days after `start`, skipping Saturdays and
/// Sundays. `start` itself is never counted.
#[must_use]
pub fn add_business_days(start: NaiveDate, days: u64) -> NaiveDate {
    let mut date = start;
    let mut remaining = days;
    while remaining > 0 {
        let Some(next) = date.checked_add_days(Days::new(1)) else {
            break;
        };
        date = next;
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            remaining -= 1;
        }
    }
    date
}
