//! The review step's summary of the order about to be placed.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::Price;

use super::forms::{PaymentInfo, ShippingInfo};
use crate::cart::CartTotals;

/// How the chosen payment method is shown on review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    /// `Credit Card`, `Paypal` or `Applepay`.
    pub label: &'static str,
    /// `**** **** **** 1234`, card payments only.
    pub masked_number: Option<String>,
    /// `Expires MM/YY`, card payments only.
    pub expires: Option<String>,
}

impl PaymentSummary {
    fn from_info(payment: &PaymentInfo) -> Self {
        Self {
            label: payment.method.display_name(),
            masked_number: payment.card.as_ref().map(|c| c.masked_number()),
            expires: payment
                .card
                .as_ref()
                .map(|c| format!("Expires {}", c.expiry_date)),
        }
    }
}

/// Everything the review step shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub full_name: String,
    /// Street address, with the apartment after a comma when present.
    pub street_line: String,
    /// `city, state zip`.
    pub locality_line: String,
    pub phone: String,
    pub payment: PaymentSummary,
    /// e.g. `Standard Shipping - 5-7 business days - Free`.
    pub shipping_method: String,
    pub totals: CartTotals,
    pub shipping_fee: Decimal,
    /// `totals.total + shipping_fee`.
    pub grand_total: Decimal,
}

impl ReviewSummary {
    #[must_use]
    pub fn new(
        shipping: &ShippingInfo,
        payment: &PaymentInfo,
        totals: CartTotals,
        shipping_fee: Decimal,
    ) -> Self {
        Self {
            full_name: shipping.full_name(),
            street_line: shipping.street_line(),
            locality_line: shipping.locality_line(),
            phone: shipping.phone.trim().to_string(),
            payment: PaymentSummary::from_info(payment),
            shipping_method: shipping.shipping_method.label(),
            totals,
            shipping_fee,
            grand_total: totals.total + shipping_fee,
        }
    }
}

impl fmt::Display for ReviewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Shipping to")?;
        writeln!(f, "  {}", self.full_name)?;
        writeln!(f, "  {}", self.street_line)?;
        writeln!(f, "  {}", self.locality_line)?;
        writeln!(f, "  Phone: {}", self.phone)?;
        writeln!(f, "Payment")?;
        writeln!(f, "  {}", self.payment.label)?;
        if let Some(masked) = &self.payment.masked_number {
            writeln!(f, "  {masked}")?;
        }
        if let Some(expires) = &self.payment.expires {
            writeln!(f, "  {expires}")?;
        }
        writeln!(f, "Shipping method")?;
        writeln!(f, "  {}", self.shipping_method)?;
        writeln!(f, "Subtotal  {}", Price::usd(self.totals.subtotal))?;
        writeln!(f, "Tax       {}", Price::usd(self.totals.tax))?;
        if !self.totals.discount.is_zero() {
            writeln!(f, "Discount  {}", Price::usd(-self.totals.discount))?;
        }
        writeln!(f, "Shipping  {}", Price::usd(self.shipping_fee))?;
        write!(f, "Total     {}", Price::usd(self.grand_total))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::cart::{LineItem, Product, Promo};
    use crate::checkout::{CardDetails, PaymentMethod, ShippingMethod};

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            email: "ada@example.com".to_string(),
            phone: "5550109999".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            address: "12 Analytical Way".to_string(),
            apartment: "Apt 4".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            shipping_method: ShippingMethod::Standard,
        }
    }

    fn totals() -> CartTotals {
        let items = vec![LineItem::new(&Product::new("shirt", "Shirt", dec!(20)), 2)];
        CartTotals::compute(&items, Promo::lookup("WELCOME10"))
    }

    #[test]
    fn test_card_summary() {
        let payment = PaymentInfo {
            method: PaymentMethod::Card,
            card: Some(CardDetails {
                card_number: "4111111111111234".to_string(),
                expiry_date: "09/27".to_string(),
                cvv: "123".to_string(),
                card_name: "Ada Lovelace".to_string(),
            }),
        };
        let summary = ReviewSummary::new(&shipping(), &payment, totals(), Decimal::ZERO);

        assert_eq!(summary.full_name, "Ada Lovelace");
        assert_eq!(summary.street_line, "12 Analytical Way, Apt 4");
        assert_eq!(summary.locality_line, "Springfield, IL 62701");
        assert_eq!(summary.payment.label, "Credit Card");
        assert_eq!(
            summary.payment.masked_number.as_deref(),
            Some("**** **** **** 1234")
        );
        assert_eq!(summary.payment.expires.as_deref(), Some("Expires 09/27"));
        assert_eq!(
            summary.shipping_method,
            "Standard Shipping - 5-7 business days - Free"
        );
        assert_eq!(summary.grand_total, dec!(39.20));
    }

    #[test]
    fn test_non_card_summary() {
        let payment = PaymentInfo {
            method: PaymentMethod::Paypal,
            card: None,
        };
        let summary = ReviewSummary::new(&shipping(), &payment, totals(), dec!(9.99));

        assert_eq!(summary.payment.label, "Paypal");
        assert!(summary.payment.masked_number.is_none());
        assert_eq!(summary.grand_total, dec!(49.19));
    }

    #[test]
    fn test_display() {
        let payment = PaymentInfo {
            method: PaymentMethod::Paypal,
            card: None,
        };
        let rendered =
            ReviewSummary::new(&shipping(), &payment, totals(), Decimal::ZERO).to_string();

        assert!(rendered.contains("Phone: 5550109999"));
        assert!(rendered.contains("Discount  -$4.00"));
        assert!(rendered.ends_with("Total     $39.20"));
    }
}
