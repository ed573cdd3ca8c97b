//! End-to-end tests from an empty cart to a placed order.
//!
//! These drive a [`Session`] the way a view layer would, with an in-memory
//! store, a fixed clock and fake order submitters.
//!
//! [`Session`]: shopfront_storefront::session::Session

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use shopfront_integration_tests::{
    FAKE_ORDER_ID, FailingSubmitter, FakeSubmitter, fill_forms, hat, sample_shipping, session,
    shirt,
};
use shopfront_storefront::checkout::{
    CheckoutError, CheckoutStatus, CheckoutStep, FormField, PaymentMethod, ShippingMethod,
};
use shopfront_storefront::notify::{Notice, NoticeLevel};
use shopfront_storefront::storage::MemoryStorage;

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn test_two_shirts_with_welcome10() {
    let (mut session, notifier) = session(MemoryStorage::new(), FakeSubmitter::new());

    session.add_to_cart(&shirt(), 1).unwrap();
    session.add_to_cart(&shirt(), 1).unwrap();
    session.apply_promo("WELCOME10").unwrap();

    let totals = session.cart().compute_totals();
    assert_eq!(totals.subtotal, dec!(40.00));
    assert_eq!(totals.tax, dec!(3.20));
    assert_eq!(totals.discount, dec!(4.00));
    assert_eq!(totals.total, dec!(39.20));

    fill_forms(session.begin_checkout().unwrap(), ShippingMethod::Standard);
    assert_eq!(session.advance_checkout().unwrap(), CheckoutStep::Payment);
    assert_eq!(session.advance_checkout().unwrap(), CheckoutStep::Review);

    let summary = session.review_summary().unwrap();
    assert_eq!(summary.full_name, "Ada Lovelace");
    assert_eq!(summary.grand_total, dec!(39.20));
    assert!(summary.to_string().contains("Total     $39.20"));

    let confirmation = session.place_order().await.unwrap();
    assert_eq!(confirmation.order_id.as_str(), FAKE_ORDER_ID);
    assert_eq!(confirmation.total, dec!(39.20));
    assert_eq!(confirmation.shipping_fee, dec!(0));
    assert_eq!(
        confirmation.estimated_delivery.earliest,
        NaiveDate::from_ymd_opt(2025, 6, 9).unwrap()
    );

    assert!(session.cart().is_empty());
    assert_eq!(session.checkout().unwrap().status(), CheckoutStatus::Placed);
    assert_eq!(
        notifier.last(),
        Some(Notice::success("Order NP-TEST0001 placed successfully"))
    );
}

#[tokio::test]
async fn test_express_shipping_adds_fee() {
    let (mut session, _) = session(MemoryStorage::new(), FakeSubmitter::new());

    session.add_to_cart(&hat(), 2).unwrap();
    fill_forms(session.begin_checkout().unwrap(), ShippingMethod::Express);
    session.advance_checkout().unwrap();
    session.advance_checkout().unwrap();

    // 31.00 + 2.48 tax + 9.99 express
    let confirmation = session.place_order().await.unwrap();
    assert_eq!(confirmation.shipping_fee, dec!(9.99));
    assert_eq!(confirmation.total, dec!(43.47));
}

#[tokio::test]
async fn test_freeship_waives_fee() {
    let (mut session, _) = session(MemoryStorage::new(), FakeSubmitter::new());

    session.add_to_cart(&shirt(), 1).unwrap();
    session.apply_promo("freeship").unwrap();
    fill_forms(session.begin_checkout().unwrap(), ShippingMethod::Overnight);
    session.advance_checkout().unwrap();
    session.advance_checkout().unwrap();

    let confirmation = session.place_order().await.unwrap();
    assert_eq!(confirmation.shipping_fee, dec!(0));
    assert_eq!(confirmation.total, dec!(21.60));
}

#[tokio::test]
async fn test_submitter_receives_draft() {
    let submitter = FakeSubmitter::new();
    let (mut session, _) = session(MemoryStorage::new(), submitter);

    session.add_to_cart(&shirt(), 3).unwrap();
    fill_forms(session.begin_checkout().unwrap(), ShippingMethod::Standard);
    session.advance_checkout().unwrap();
    session.advance_checkout().unwrap();
    session.place_order().await.unwrap();

    let order = session.submitter().last_order().unwrap();
    assert_eq!(session.submitter().calls(), 1);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.shipping, sample_shipping(ShippingMethod::Standard));
    assert_eq!(order.payment.method, PaymentMethod::Card);
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn test_missing_field_stays_on_shipping() {
    let (mut session, notifier) = session(MemoryStorage::new(), FakeSubmitter::new());

    session.add_to_cart(&shirt(), 1).unwrap();
    let flow = session.begin_checkout().unwrap();
    fill_forms(flow, ShippingMethod::Standard);
    flow.shipping_form_mut().city = "   ".to_string();

    let err = session.advance_checkout().unwrap_err();
    let errors = err.field_errors().unwrap();
    assert!(errors.contains(FormField::City));
    assert_eq!(session.checkout().unwrap().step(), CheckoutStep::Shipping);
    assert_eq!(notifier.last().unwrap().level, NoticeLevel::Error);
}

#[test]
fn test_bogus_promo_leaves_discount_unchanged() {
    let (mut session, _) = session(MemoryStorage::new(), FakeSubmitter::new());

    session.add_to_cart(&shirt(), 1).unwrap();
    session.apply_promo("SAVE20").unwrap();
    session.apply_promo("BOGUS").unwrap_err();

    assert_eq!(session.cart().compute_totals().discount, dec!(4.00));
}

#[tokio::test]
async fn test_failed_submission_keeps_cart() {
    let (mut session, notifier) = session(MemoryStorage::new(), FailingSubmitter::unavailable());

    session.add_to_cart(&shirt(), 2).unwrap();
    fill_forms(session.begin_checkout().unwrap(), ShippingMethod::Standard);
    session.advance_checkout().unwrap();
    session.advance_checkout().unwrap();

    let err = session.place_order().await.unwrap_err();
    assert!(matches!(err, CheckoutError::Submission(_)));
    assert_eq!(session.cart().items().len(), 1);

    let flow = session.checkout().unwrap();
    assert_eq!(flow.step(), CheckoutStep::Review);
    assert_eq!(flow.status(), CheckoutStatus::InProgress);
    assert_eq!(
        notifier.last(),
        Some(Notice::error(
            "Order service unavailable: connection refused"
        ))
    );
}

#[tokio::test]
async fn test_placed_checkout_is_replaced() {
    let (mut session, _) = session(MemoryStorage::new(), FakeSubmitter::new());

    session.add_to_cart(&shirt(), 1).unwrap();
    fill_forms(session.begin_checkout().unwrap(), ShippingMethod::Standard);
    session.advance_checkout().unwrap();
    session.advance_checkout().unwrap();
    session.place_order().await.unwrap();

    assert_eq!(session.advance_checkout(), Err(CheckoutError::AlreadyPlaced));
    assert!(matches!(
        session.begin_checkout(),
        Err(CheckoutError::EmptyCart)
    ));

    session.add_to_cart(&hat(), 1).unwrap();
    let flow = session.begin_checkout().unwrap();
    assert_eq!(flow.step(), CheckoutStep::Shipping);
    assert_eq!(flow.status(), CheckoutStatus::InProgress);
}

#[test]
fn test_jump_back_and_forward() {
    let (mut session, _) = session(MemoryStorage::new(), FakeSubmitter::new());

    session.add_to_cart(&shirt(), 1).unwrap();
    fill_forms(session.begin_checkout().unwrap(), ShippingMethod::Standard);

    assert_eq!(
        session.jump_to(CheckoutStep::Review),
        Err(CheckoutError::StepNotReached(CheckoutStep::Review))
    );

    session.advance_checkout().unwrap();
    session.advance_checkout().unwrap();
    session.jump_to(CheckoutStep::Shipping).unwrap();
    session.jump_to(CheckoutStep::Review).unwrap();
    assert_eq!(session.retreat_checkout().unwrap(), CheckoutStep::Payment);
}
