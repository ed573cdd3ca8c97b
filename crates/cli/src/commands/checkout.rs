//! Checkout command.
//!
//! Runs the whole wizard non-interactively: shipping and payment values come
//! from a JSON file, each step is validated in turn, the review is printed
//! and the order is placed.
//!
//! ```json
//! {
//!   "shipping": {
//!     "email": "ada@example.com",
//!     "phone": "555 010 9999",
//!     "firstName": "Ada",
//!     "lastName": "Lovelace",
//!     "address": "12 Analytical Way",
//!     "city": "Springfield",
//!     "state": "IL",
//!     "zipCode": "62701",
//!     "shippingMethod": "express"
//!   },
//!   "payment": {
//!     "method": "card",
//!     "cardNumber": "4111 1111 1111 1111",
//!     "expiryDate": "12/27",
//!     "cvv": "123",
//!     "cardName": "Ada Lovelace"
//!   }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use shopfront_storefront::checkout::{
    CheckoutError, CheckoutStep, PaymentForm, ShippingInfo, format_card_number, format_cvv,
    format_expiry,
};
use shopfront_storefront::config::StorefrontConfig;
use shopfront_storefront::notify::RecordingNotifier;
use shopfront_storefront::{Result, StorefrontError};

use super::{CliSession, open_session};
use crate::render;

/// Form values for a checkout run.
#[derive(Debug, Deserialize)]
pub struct CheckoutDetails {
    pub shipping: ShippingInfo,
    #[serde(default)]
    pub payment: PaymentForm,
}

impl CheckoutDetails {
    /// Read details from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::BadInput` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StorefrontError::BadInput(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            StorefrontError::BadInput(format!("invalid details in {}: {e}", path.display()))
        })
    }
}

/// Run the checkout wizard against the persisted cart.
///
/// # Errors
///
/// Returns an error if the details file is unreadable, a step fails
/// validation, the cart is empty, or the order submission fails.
pub async fn run(
    config: &StorefrontConfig,
    details_path: &Path,
    promo: Option<&str>,
    delay_ms: Option<u64>,
) -> Result<()> {
    let details = CheckoutDetails::from_file(details_path)?;
    let (mut session, notifier) = open_session(config, delay_ms.map(Duration::from_millis));

    if let Some(code) = promo {
        let applied = session.apply_promo(code);
        render::notices(&notifier.drain());
        applied?;
    }

    let begun = session.begin_checkout().map(|flow| {
        *flow.shipping_form_mut() = details.shipping;
        *flow.payment_form_mut() = formatted(details.payment);
    });
    render::notices(&notifier.drain());
    begun?;

    complete_step(&mut session, &notifier, CheckoutStep::Shipping)?;
    complete_step(&mut session, &notifier, CheckoutStep::Payment)?;

    render::review(&session.review_summary()?);

    tracing::info!("Placing order");
    let placed = session.place_order().await;
    render::notices(&notifier.drain());
    render::confirmation(&placed?);
    Ok(())
}

/// Card fields as the payment form would hold them after live formatting.
fn formatted(mut payment: PaymentForm) -> PaymentForm {
    let card = &mut payment.card;
    card.card_number = format_card_number(&card.card_number);
    card.expiry_date = format_expiry(&card.expiry_date);
    card.cvv = format_cvv(&card.cvv);
    payment
}

/// Advance past `step`, printing field errors if it does not validate.
fn complete_step(
    session: &mut CliSession,
    notifier: &RecordingNotifier,
    step: CheckoutStep,
) -> Result<()> {
    let advanced = session.advance_checkout();
    render::notices(&notifier.drain());

    match advanced {
        Ok(next) => {
            tracing::debug!(from = %step, to = %next, "Step complete");
            Ok(())
        }
        Err(CheckoutError::Validation(errors)) => {
            render::field_errors(step, &errors);
            Err(CheckoutError::Validation(errors).into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::commands::cart;

    const DETAILS: &str = r#"{
        "shipping": {
            "email": "ada@example.com",
            "phone": "555 010 9999",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "address": "12 Analytical Way",
            "city": "Springfield",
            "state": "IL",
            "zipCode": "62701",
            "shippingMethod": "standard"
        },
        "payment": {
            "method": "paypal"
        }
    }"#;

    fn write_details(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("details.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    fn config(dir: &Path) -> StorefrontConfig {
        StorefrontConfig {
            data_dir: dir.join("state"),
            ..StorefrontConfig::default()
        }
    }

    #[test]
    fn test_details_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_details(dir.path(), DETAILS);

        let details = CheckoutDetails::from_file(&path).unwrap();
        assert_eq!(details.shipping.first_name, "Ada");
        assert_eq!(details.shipping.apartment, "");
    }

    #[test]
    fn test_details_missing_file() {
        let err = CheckoutDetails::from_file(Path::new("/nonexistent/details.json")).unwrap_err();
        assert!(matches!(err, StorefrontError::BadInput(_)));
    }

    #[tokio::test]
    async fn test_checkout_places_order_and_clears_cart() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let path = write_details(dir.path(), DETAILS);

        cart::add(&config, "shirt", "Shirt", "20".parse().unwrap(), 2).unwrap();
        run(&config, &path, Some("WELCOME10"), Some(0)).await.unwrap();

        let (session, _) = open_session(&config, None);
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let path = write_details(dir.path(), DETAILS);

        let err = run(&config, &path, None, Some(0)).await.unwrap_err();
        assert!(matches!(
            err,
            StorefrontError::Checkout(CheckoutError::EmptyCart)
        ));
    }

    #[tokio::test]
    async fn test_checkout_with_invalid_shipping_keeps_cart() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let path = write_details(dir.path(), r#"{ "shipping": { "email": "nope" } }"#);

        cart::add(&config, "shirt", "Shirt", "20".parse().unwrap(), 1).unwrap();
        let err = run(&config, &path, None, Some(0)).await.unwrap_err();
        assert!(matches!(
            err,
            StorefrontError::Checkout(CheckoutError::Validation(_))
        ));

        let (session, _) = open_session(&config, None);
        assert_eq!(session.cart().items().len(), 1);
    }

    #[test]
    fn test_card_fields_are_formatted() {
        let payment: PaymentForm = serde_json::from_str(
            r#"{ "method": "card", "cardNumber": "4111111111111111",
                 "expiryDate": "1299", "cvv": "12a3", "cardName": "Ada Lovelace" }"#,
        )
        .unwrap();

        let card = formatted(payment).card;
        assert_eq!(card.card_number, "4111 1111 1111 1111");
        assert_eq!(card.expiry_date, "12/99");
        assert_eq!(card.cvv, "123");
        assert_eq!(card.card_name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_checkout_accepts_unformatted_card() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let details = DETAILS.replace(
            r#""method": "paypal""#,
            r#""method": "card", "cardNumber": "4111111111111111",
               "expiryDate": "1299", "cvv": "123", "cardName": "Ada Lovelace""#,
        );
        let path = write_details(dir.path(), &details);

        cart::add(&config, "shirt", "Shirt", "20".parse().unwrap(), 1).unwrap();
        run(&config, &path, None, Some(0)).await.unwrap();

        let (session, _) = open_session(&config, None);
        assert!(session.cart().is_empty());
    }
}
