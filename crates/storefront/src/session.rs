//! A shopper's session: the cart, the checkout in progress, and the
//! collaborators they report to.
//!
//! Actions here are what a view layer calls in response to user input.
//! Each one forwards to [`CartStore`] or [`CheckoutFlow`], then tells the
//! [`Notifier`] what happened and leaves a Sentry breadcrumb.

use std::sync::Arc;

use shopfront_core::ProductId;
use tracing::{info, instrument};

use crate::cart::{CartError, CartStore, CartTotals, LineItem, Product, Promo};
use crate::checkout::{
    CheckoutError, CheckoutFlow, CheckoutStatus, CheckoutStep, Clock, OrderConfirmation,
    OrderSubmitter, ReviewSummary, system_clock,
};
use crate::error::add_breadcrumb;
use crate::notify::{Notice, Notifier};
use crate::storage::Storage;

/// Notice shown when an advance fails validation.
pub const CORRECT_FIELDS_NOTICE: &str = "Please correct the highlighted fields";

/// A single shopper session.
///
/// Constructed once with its collaborators and passed by reference.
pub struct Session<S, O> {
    cart: CartStore<S>,
    checkout: Option<CheckoutFlow>,
    submitter: O,
    notifier: Arc<dyn Notifier>,
    clock: Clock,
}

impl<S: Storage, O: OrderSubmitter> Session<S, O> {
    /// Create a session, loading the cart from `storage`.
    pub fn new(storage: S, submitter: O, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            cart: CartStore::load(storage),
            checkout: None,
            submitter,
            notifier,
            clock: system_clock,
        }
    }

    /// Replace the clock used by checkouts started after this call.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    /// The checkout in progress (or just placed), if any.
    #[must_use]
    pub const fn checkout(&self) -> Option<&CheckoutFlow> {
        self.checkout.as_ref()
    }

    /// Mutable access to the checkout, for filling in its forms.
    pub const fn checkout_mut(&mut self) -> Option<&mut CheckoutFlow> {
        self.checkout.as_mut()
    }

    #[must_use]
    pub const fn submitter(&self) -> &O {
        &self.submitter
    }

    /// Give back the cart's storage backend.
    pub fn into_storage(self) -> S {
        self.cart.into_storage()
    }

    fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    // -------------------------------------------------------------------------
    // Cart actions
    // -------------------------------------------------------------------------

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidPrice`] if the product's price is out of
    /// range. The cart is left unchanged.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        quantity: u32,
    ) -> Result<CartTotals, CartError> {
        match self.cart.add_item(product, quantity) {
            Ok(totals) => {
                add_breadcrumb(
                    "cart",
                    "Added item",
                    Some(&[("product_id", product.id.as_str())]),
                );
                self.notify(Notice::success(format!("{} added to cart", product.title)));
                Ok(totals)
            }
            Err(e) => {
                self.notify(Notice::error(format!("Unable to add {} to cart", product.title)));
                Err(e)
            }
        }
    }

    /// Remove a line. Unknown products are silently ignored.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> Option<LineItem> {
        let removed = self.cart.remove_item(product_id)?;
        add_breadcrumb(
            "cart",
            "Removed item",
            Some(&[("product_id", product_id.as_str())]),
        );
        self.notify(Notice::info("Item removed from cart"));
        Some(removed)
    }

    /// Set a line's quantity (clamped to `[1, 10]`).
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if there is no such line.
    #[instrument(skip(self))]
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<CartTotals, CartError> {
        self.cart.set_quantity(product_id, quantity)
    }

    /// Apply a promo code.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidPromoCode`] for unknown codes.
    #[instrument(skip(self))]
    pub fn apply_promo(&mut self, code: &str) -> Result<&'static Promo, CartError> {
        match self.cart.apply_promo(code) {
            Ok(promo) => {
                add_breadcrumb("cart", "Applied promo", Some(&[("code", promo.code)]));
                self.notify(Notice::success(format!(
                    "Promo code applied: {}",
                    promo.description
                )));
                Ok(promo)
            }
            Err(e) => {
                self.notify(Notice::error("Invalid promo code"));
                Err(e)
            }
        }
    }

    pub fn clear_promo(&mut self) -> Option<&'static Promo> {
        self.cart.clear_promo()
    }

    /// Move a line to the saved-for-later list.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if there is no such line.
    #[instrument(skip(self))]
    pub fn save_for_later(&mut self, product_id: &ProductId) -> Result<LineItem, CartError> {
        match self.cart.save_for_later(product_id) {
            Ok(item) => {
                self.notify(Notice::success(format!("{} saved for later", item.title)));
                Ok(item)
            }
            Err(e) => {
                self.notify(Notice::info("Item not found in cart"));
                Err(e)
            }
        }
    }

    /// Move a saved item back into the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownSavedItem`] if nothing is saved under
    /// `product_id`, or [`CartError::InvalidPrice`] if the saved price is
    /// out of range.
    #[instrument(skip(self))]
    pub fn move_to_cart(&mut self, product_id: &ProductId) -> Result<CartTotals, CartError> {
        let title = self
            .cart
            .saved_items()
            .iter()
            .find(|s| &s.product_id == product_id)
            .map(|s| s.title.clone());

        match (self.cart.move_to_cart(product_id), title) {
            (Ok(totals), Some(title)) => {
                self.notify(Notice::success(format!("{title} moved to cart")));
                Ok(totals)
            }
            (Ok(totals), None) => Ok(totals),
            (Err(e @ CartError::UnknownSavedItem(_)), _) => {
                self.notify(Notice::info("Item not found in saved items"));
                Err(e)
            }
            (Err(e), _) => {
                self.notify(Notice::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Empty the cart and drop the promo. Saved items are kept.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        let had_items = !self.cart.is_empty();
        self.cart.clear();
        if !had_items {
            return;
        }
        add_breadcrumb("cart", "Cleared cart", None);
        self.notify(Notice::info("Cart cleared"));
    }

    // -------------------------------------------------------------------------
    // Checkout actions
    // -------------------------------------------------------------------------

    /// Start a checkout, or resume the one in progress.
    ///
    /// A previously placed checkout is replaced by a fresh one.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when there is nothing to buy.
    #[instrument(skip(self))]
    pub fn begin_checkout(&mut self) -> Result<&mut CheckoutFlow, CheckoutError> {
        if self.cart.is_empty() {
            self.notify(Notice::error(CheckoutError::EmptyCart.to_string()));
            return Err(CheckoutError::EmptyCart);
        }

        let resumable = self
            .checkout
            .as_ref()
            .is_some_and(|flow| flow.status() != CheckoutStatus::Placed);
        if !resumable {
            info!("Checkout started");
            add_breadcrumb("checkout", "Started checkout", None);
            self.checkout = Some(CheckoutFlow::with_clock(self.clock));
        }

        self.checkout.as_mut().ok_or(CheckoutError::NotStarted)
    }

    /// Drop the checkout in progress. Forms and draft are discarded.
    pub fn abandon_checkout(&mut self) -> Option<CheckoutFlow> {
        let flow = self.checkout.take();
        if flow.is_some() {
            info!("Checkout abandoned");
        }
        flow
    }

    /// Validate the current step and move forward.
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::advance`]. Validation failures also raise the
    /// "correct the highlighted fields" notice.
    #[instrument(skip(self))]
    pub fn advance_checkout(&mut self) -> Result<CheckoutStep, CheckoutError> {
        let flow = self.checkout.as_mut().ok_or(CheckoutError::NotStarted)?;
        match flow.advance() {
            Ok(step) => {
                add_breadcrumb("checkout", "Advanced", Some(&[("step", step.as_str())]));
                Ok(step)
            }
            Err(e) => {
                if matches!(e, CheckoutError::Validation(_)) {
                    self.notify(Notice::error(CORRECT_FIELDS_NOTICE));
                }
                Err(e)
            }
        }
    }

    /// Go back one step.
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::retreat`].
    pub fn retreat_checkout(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.checkout
            .as_mut()
            .ok_or(CheckoutError::NotStarted)?
            .retreat()
    }

    /// Jump to a step already reached.
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::jump_to`].
    pub fn jump_to(&mut self, step: CheckoutStep) -> Result<(), CheckoutError> {
        self.checkout
            .as_mut()
            .ok_or(CheckoutError::NotStarted)?
            .jump_to(step)
    }

    /// Summary for the review step.
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::review_summary`].
    pub fn review_summary(&self) -> Result<ReviewSummary, CheckoutError> {
        self.checkout
            .as_ref()
            .ok_or(CheckoutError::NotStarted)?
            .review_summary(&self.cart)
    }

    /// Place the order.
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::place_order`]. Submission failures are also
    /// reported to the notifier.
    #[instrument(skip(self))]
    pub async fn place_order(&mut self) -> Result<OrderConfirmation, CheckoutError> {
        let flow = self.checkout.as_mut().ok_or(CheckoutError::NotStarted)?;
        add_breadcrumb("checkout", "Placing order", None);

        match flow.place_order(&mut self.cart, &self.submitter).await {
            Ok(confirmation) => {
                self.notify(Notice::success(format!(
                    "Order {} placed successfully",
                    confirmation.order_id
                )));
                Ok(confirmation)
            }
            Err(e) => {
                self.notify(Notice::error(e.to_string()));
                Err(e)
            }
        }
    }
}
