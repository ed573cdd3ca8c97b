//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_checkout` - Cart through placed order, via [`Session`]
//! - `persistence` - Cart state surviving a reload from disk
//!
//! This library holds the shared fixtures: deterministic order submitters,
//! filled-in forms and a fixed clock.
//!
//! [`Session`]: shopfront_storefront::session::Session

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shopfront_core::OrderId;
use shopfront_storefront::cart::Product;
use shopfront_storefront::checkout::{
    CardDetails, CheckoutFlow, OrderRequest, OrderSubmitter, PaymentForm, PaymentMethod,
    ShippingInfo, ShippingMethod, SubmissionError, SubmissionReceipt,
};
use shopfront_storefront::notify::RecordingNotifier;
use shopfront_storefront::session::Session;
use shopfront_storefront::storage::Storage;

/// The order id every [`FakeSubmitter`] returns.
pub const FAKE_ORDER_ID: &str = "NP-TEST0001";

/// Monday 2 June 2025.
#[must_use]
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap_or_default()
}

/// Accepts every order and remembers the last one.
#[derive(Debug, Default)]
pub struct FakeSubmitter {
    calls: AtomicUsize,
    last: std::sync::Mutex<Option<OrderRequest>>,
}

impl FakeSubmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders submitted.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent order request.
    pub fn last_order(&self) -> Option<OrderRequest> {
        self.last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl OrderSubmitter for FakeSubmitter {
    async fn submit(&self, order: &OrderRequest) -> Result<SubmissionReceipt, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(order.clone());
        Ok(SubmissionReceipt {
            order_id: OrderId::new(FAKE_ORDER_ID),
        })
    }
}

/// Rejects every order with the given error.
#[derive(Debug, Clone)]
pub struct FailingSubmitter(pub SubmissionError);

impl FailingSubmitter {
    #[must_use]
    pub fn unavailable() -> Self {
        Self(SubmissionError::Unavailable("connection refused".to_string()))
    }
}

#[async_trait]
impl OrderSubmitter for FailingSubmitter {
    async fn submit(&self, _order: &OrderRequest) -> Result<SubmissionReceipt, SubmissionError> {
        Err(self.0.clone())
    }
}

/// A shirt at $20.00.
#[must_use]
pub fn shirt() -> Product {
    Product::new("shirt-001", "Shirt", Decimal::new(20, 0))
}

/// A hat at $15.50.
#[must_use]
pub fn hat() -> Product {
    Product::new("hat-001", "Hat", Decimal::new(1550, 2))
}

/// Shipping details that pass validation.
#[must_use]
pub fn sample_shipping(method: ShippingMethod) -> ShippingInfo {
    ShippingInfo {
        email: "ada@example.com".to_string(),
        phone: "555 010 9999".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        address: "12 Analytical Way".to_string(),
        apartment: "Apt 3".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip_code: "62701".to_string(),
        shipping_method: method,
    }
}

/// A card payment that passes validation on [`fixed_today`].
#[must_use]
pub fn sample_card() -> PaymentForm {
    PaymentForm {
        method: PaymentMethod::Card,
        card: CardDetails {
            card_number: "4111 1111 1111 1111".to_string(),
            expiry_date: "12/27".to_string(),
            cvv: "123".to_string(),
            card_name: "Ada Lovelace".to_string(),
        },
    }
}

/// Fill both forms of `flow` with the sample values.
pub fn fill_forms(flow: &mut CheckoutFlow, method: ShippingMethod) {
    *flow.shipping_form_mut() = sample_shipping(method);
    *flow.payment_form_mut() = sample_card();
}

/// A session over `storage` with a fixed clock and a recording notifier.
pub fn session<S, O>(storage: S, submitter: O) -> (Session<S, O>, Arc<RecordingNotifier>)
where
    S: Storage,
    O: OrderSubmitter,
{
    let notifier = Arc::new(RecordingNotifier::new());
    let session = Session::new(storage, submitter, notifier.clone()).with_clock(fixed_today);
    (session, notifier)
}
