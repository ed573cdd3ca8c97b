//! Derived cart totals.

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::round_cents;
use tracing::warn;

use super::item::LineItem;
use super::promo::Promo;

/// Sales tax applied to the subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Cart totals. Always derived from the current items and promo, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of `unit_price × quantity`, exact.
    pub subtotal: Decimal,
    /// `subtotal × TAX_RATE`, rounded to cents.
    pub tax: Decimal,
    /// `subtotal × promo rate`, rounded to cents. Zero without a promo.
    pub discount: Decimal,
    /// `subtotal + tax - discount`.
    pub total: Decimal,
    /// Sum of quantities.
    pub item_count: u32,
    /// Whether the active promo waives shipping.
    pub free_shipping: bool,
}

impl CartTotals {
    /// Compute totals for `items` under an optional promo.
    ///
    /// Items held by a [`CartStore`](super::CartStore) never overflow. For
    /// arbitrary items that do, the subtotal and total saturate at
    /// `Decimal::MAX`.
    #[must_use]
    pub fn compute(items: &[LineItem], promo: Option<&Promo>) -> Self {
        Self::try_compute(items, promo).unwrap_or_else(|| {
            warn!(items = items.len(), "Cart totals overflowed");
            Self {
                subtotal: Decimal::MAX,
                tax: Decimal::ZERO,
                discount: Decimal::ZERO,
                total: Decimal::MAX,
                item_count: item_count(items),
                free_shipping: promo.is_some_and(|p| p.free_shipping),
            }
        })
    }

    /// Like [`compute`](Self::compute), but `None` if any step overflows.
    #[must_use]
    pub fn try_compute(items: &[LineItem], promo: Option<&Promo>) -> Option<Self> {
        let subtotal = items.iter().try_fold(Decimal::ZERO, |sum, item| {
            sum.checked_add(item.checked_line_total()?)
        })?;
        let tax = round_cents(subtotal.checked_mul(TAX_RATE)?);
        let discount = match promo {
            Some(p) => round_cents(subtotal.checked_mul(p.discount_rate())?),
            None => Decimal::ZERO,
        };

        Some(Self {
            subtotal,
            tax,
            discount,
            total: subtotal.checked_add(tax)?.checked_sub(discount)?,
            item_count: item_count(items),
            free_shipping: promo.is_some_and(|p| p.free_shipping),
        })
    }

    /// Totals of an empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::ZERO,
            item_count: 0,
            free_shipping: false,
        }
    }
}

fn item_count(items: &[LineItem]) -> u32 {
    items.iter().fold(0, |n, i| n.saturating_add(i.quantity))
}
