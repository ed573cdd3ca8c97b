//! The cart store: line items, saved-for-later items and the active promo.

use rust_decimal::Decimal;
use shopfront_core::{Price, ProductId};
use tracing::{debug, info, warn};

use super::error::CartError;
use super::item::{LineItem, MAX_QUANTITY, Product, clamp_quantity};
use super::promo::Promo;
use super::totals::CartTotals;
use crate::storage::{Storage, keys};

/// Single source of truth for cart contents within a session.
///
/// Every mutation of the item list is written through to storage. Write
/// failures are logged and otherwise ignored, so the in-memory cart keeps
/// working when storage is unavailable. The active promo is not persisted.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    items: Vec<LineItem>,
    saved: Vec<LineItem>,
    promo: Option<&'static Promo>,
}

impl<S: Storage> CartStore<S> {
    /// Build a cart from whatever `storage` holds.
    ///
    /// A missing key, unreadable storage, or malformed JSON yields an empty
    /// list. Stored quantities are clamped back into range and lines with an
    /// out-of-range unit price are dropped.
    pub fn load(storage: S) -> Self {
        let items = read_items(&storage, keys::CART_ITEMS);
        let saved = read_items(&storage, keys::SAVED_ITEMS);
        debug!(
            items = items.len(),
            saved = saved.len(),
            "Cart loaded from storage"
        );
        Self {
            storage,
            items,
            saved,
            promo: None,
        }
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing line for the same product has its quantity increased
    /// (up to [`MAX_QUANTITY`]) and keeps its original unit price. A request
    /// against a line already at the ceiling is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidPrice`] without touching the cart if the
    /// product's price is negative or above `Price::MAX_AMOUNT`.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
    ) -> Result<CartTotals, CartError> {
        if let Err(e) = product.check_price() {
            warn!(
                product_id = %product.id,
                price = %product.price,
                "Refusing item with out-of-range price"
            );
            return Err(e);
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            if existing.quantity >= MAX_QUANTITY {
                debug!(product_id = %product.id, "Quantity already at maximum, ignoring add");
                return Ok(self.compute_totals());
            }
            existing.quantity =
                clamp_quantity(i64::from(existing.quantity) + i64::from(quantity));
            info!(
                product_id = %product.id,
                quantity = existing.quantity,
                "Increased line item quantity"
            );
        } else {
            let item = LineItem::new(product, i64::from(quantity));
            info!(
                product_id = %item.product_id,
                quantity = item.quantity,
                "Added line item"
            );
            self.items.push(item);
        }

        self.persist_items();
        Ok(self.compute_totals())
    }

    /// Remove the line for `product_id`. Absent products are a no-op.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Option<LineItem> {
        let Some(index) = self.items.iter().position(|i| &i.product_id == product_id) else {
            debug!(product_id = %product_id, "Remove ignored, product not in cart");
            return None;
        };

        let removed = self.items.remove(index);
        info!(product_id = %product_id, "Removed line item");
        self.persist_items();
        Some(removed)
    }

    /// Set the quantity of an existing line, clamped to `[1, 10]`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if there is no such line.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<CartTotals, CartError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| &i.product_id == product_id)
            .ok_or_else(|| CartError::UnknownProduct(product_id.clone()))?;

        item.quantity = clamp_quantity(quantity);
        info!(product_id = %product_id, quantity = item.quantity, "Set line item quantity");
        self.persist_items();
        Ok(self.compute_totals())
    }

    /// Totals for the current items and promo.
    #[must_use]
    pub fn compute_totals(&self) -> CartTotals {
        CartTotals::compute(&self.items, self.promo)
    }

    /// Activate a promo code, replacing any active one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidPromoCode`] and leaves the active promo
    /// untouched if the code is unknown.
    pub fn apply_promo(&mut self, code: &str) -> Result<&'static Promo, CartError> {
        let promo =
            Promo::lookup(code).ok_or_else(|| CartError::InvalidPromoCode(code.to_owned()))?;
        self.promo = Some(promo);
        info!(code = promo.code, "Promo code applied");
        Ok(promo)
    }

    /// Drop the active promo, returning it.
    pub fn clear_promo(&mut self) -> Option<&'static Promo> {
        self.promo.take()
    }

    /// The active promo, if any.
    #[must_use]
    pub const fn promo(&self) -> Option<&'static Promo> {
        self.promo
    }

    /// Empty the cart and drop the active promo. Saved items are kept.
    pub fn clear(&mut self) {
        self.items.clear();
        self.promo = None;
        if let Err(e) = self.storage.remove_item(keys::CART_ITEMS) {
            warn!(error = %e, "Failed to clear persisted cart");
        }
        info!("Cart cleared");
    }

    /// Move a line out of the cart into the saved-for-later list.
    ///
    /// If the product is already saved, the quantities are merged.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if there is no such line.
    pub fn save_for_later(&mut self, product_id: &ProductId) -> Result<LineItem, CartError> {
        let index = self
            .items
            .iter()
            .position(|i| &i.product_id == product_id)
            .ok_or_else(|| CartError::UnknownProduct(product_id.clone()))?;
        let item = self.items.remove(index);

        match self.saved.iter_mut().find(|s| &s.product_id == product_id) {
            Some(saved) => {
                saved.quantity =
                    clamp_quantity(i64::from(saved.quantity) + i64::from(item.quantity));
            }
            None => self.saved.push(item.clone()),
        }

        info!(product_id = %product_id, "Saved line item for later");
        self.persist_items();
        self.persist_saved();
        Ok(item)
    }

    /// Move a saved item back into the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownSavedItem`] if nothing is saved under
    /// `product_id`, or the error from [`add_item`](Self::add_item), in
    /// which case the item stays saved.
    pub fn move_to_cart(&mut self, product_id: &ProductId) -> Result<CartTotals, CartError> {
        let saved = self
            .saved
            .iter()
            .find(|s| &s.product_id == product_id)
            .ok_or_else(|| CartError::UnknownSavedItem(product_id.clone()))?;
        let product = Product {
            id: saved.product_id.clone(),
            title: saved.title.clone(),
            price: saved.unit_price,
        };
        let quantity = saved.quantity;

        let totals = self.add_item(&product, quantity)?;
        self.saved.retain(|s| &s.product_id != product_id);
        self.persist_saved();
        Ok(totals)
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn item(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// Saved-for-later items in the order they were saved.
    #[must_use]
    pub fn saved_items(&self) -> &[LineItem] {
        &self.saved
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Subtotal of the current items; shorthand for `compute_totals().subtotal`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.compute_totals().subtotal
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage backend, dropping in-memory state.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist_items(&mut self) {
        write_items(&mut self.storage, keys::CART_ITEMS, &self.items);
    }

    fn persist_saved(&mut self) {
        write_items(&mut self.storage, keys::SAVED_ITEMS, &self.saved);
    }
}

fn read_items<S: Storage>(storage: &S, key: &str) -> Vec<LineItem> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Storage unavailable, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<LineItem>>(&raw) {
        Ok(items) => items
            .into_iter()
            .filter_map(|mut item| {
                if let Err(e) = Price::check_amount(item.unit_price) {
                    warn!(
                        key,
                        product_id = %item.product_id,
                        error = %e,
                        "Dropping stored item with out-of-range price"
                    );
                    return None;
                }
                item.quantity = clamp_quantity(i64::from(item.quantity));
                Some(item)
            })
            .collect(),
        Err(e) => {
            warn!(key, error = %e, "Discarding malformed stored items");
            Vec::new()
        }
    }
}

fn write_items<S: Storage>(storage: &mut S, key: &str, items: &[LineItem]) {
    let json = match serde_json::to_string(items) {
        Ok(json) => json,
        Err(e) => {
            warn!(key, error = %e, "Failed to serialize items");
            return;
        }
    };
    if let Err(e) = storage.set_item(key, &json) {
        warn!(key, error = %e, "Failed to persist items");
    }
}
