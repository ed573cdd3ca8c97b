use shopfront_core::{PriceError, ProductId};
use thiserror::Error;

/// Rejections from cart operations. None of these mutate the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// No line item with this product id.
    #[error("Item not found in cart: {0}")]
    UnknownProduct(ProductId),

    /// No saved-for-later entry with this product id.
    #[error("Item not found in saved items: {0}")]
    UnknownSavedItem(ProductId),

    /// The product's unit price is negative or above `Price::MAX_AMOUNT`.
    #[error("Invalid price for {0}: {1}")]
    InvalidPrice(ProductId, PriceError),

    /// The code is not in the promo table.
    #[error("Invalid promo code: {0}")]
    InvalidPromoCode(String),
}
