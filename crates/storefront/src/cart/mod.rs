//! Shopping cart.
//!
//! [`CartStore`] owns the line items, the saved-for-later list and the
//! active promo. Totals are always derived on demand.

mod error;
mod item;
mod promo;
mod store;
mod totals;

pub use error::CartError;
pub use item::{LineItem, MAX_QUANTITY, MIN_QUANTITY, Product, clamp_quantity};
pub use promo::{PROMOS, Promo};
pub use store::CartStore;
pub use totals::{CartTotals, TAX_RATE};
