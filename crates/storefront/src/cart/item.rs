//! Products and cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{Price, ProductId};

use super::error::CartError;

/// Smallest quantity a line item may hold.
pub const MIN_QUANTITY: u32 = 1;

/// Largest quantity a line item may hold.
pub const MAX_QUANTITY: u32 = 10;

/// Clamp a requested quantity into `[MIN_QUANTITY, MAX_QUANTITY]`.
///
/// Accepts any signed input so raw user values (`0`, `-3`, `99`) can be
/// passed straight through.
#[must_use]
pub fn clamp_quantity(requested: i64) -> u32 {
    let clamped = requested.clamp(i64::from(MIN_QUANTITY), i64::from(MAX_QUANTITY));
    u32::try_from(clamped).unwrap_or(MIN_QUANTITY)
}

/// A product offered for sale, as passed to "add to cart".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
}

impl Product {
    #[must_use]
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
        }
    }

    /// Reject prices outside `[0, Price::MAX_AMOUNT]`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidPrice`].
    pub fn check_price(&self) -> Result<(), CartError> {
        Price::check_amount(self.price).map_err(|e| CartError::InvalidPrice(self.id.clone(), e))?;
        Ok(())
    }
}

/// One product-and-quantity entry in the cart.
///
/// This is also the persisted shape: camelCase keys with `unitPrice` written
/// as a decimal string. Numeric `unitPrice` values are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item for `product`, clamping `quantity`.
    #[must_use]
    pub fn new(product: &Product, quantity: i64) -> Self {
        Self {
            product_id: product.id.clone(),
            title: product.title.clone(),
            unit_price: product.price,
            quantity: clamp_quantity(quantity),
        }
    }

    /// `unit_price × quantity`, or `None` if that overflows.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }

    /// `unit_price × quantity`, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.checked_line_total().unwrap_or(Decimal::MAX)
    }
}
