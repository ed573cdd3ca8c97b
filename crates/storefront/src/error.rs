//! Unified error handling with Sentry integration.
//!
//! Each module has its own error enum; [`StorefrontError`] wraps them for
//! callers that drive several modules at once (the CLI).

use thiserror::Error;

use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Storefront-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Cart operation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout operation rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Input could not be parsed.
    #[error("Bad input: {0}")]
    BadInput(String),
}

impl StorefrontError {
    /// Whether this is worth reporting to Sentry.
    ///
    /// Rejections caused by customer input are expected; failures of the
    /// storefront's own collaborators are not.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::Config(_)
                | Self::Checkout(CheckoutError::Submission(_) | CheckoutError::SubmissionPending)
        )
    }

    /// Capture the error to Sentry if it is reportable, logging either way.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "Storefront rejection");
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "shirt-001")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::SubmissionError;

    #[test]
    fn test_storefront_error_display() {
        let err = StorefrontError::from(CartError::InvalidPromoCode("BOGUS".to_string()));
        assert_eq!(err.to_string(), "Cart error: Invalid promo code: BOGUS");

        let err = StorefrontError::BadInput("price".to_string());
        assert_eq!(err.to_string(), "Bad input: price");
    }

    #[test]
    fn test_reportable_errors() {
        assert!(
            StorefrontError::from(CheckoutError::Submission(SubmissionError::Unavailable(
                "timeout".to_string()
            )))
            .is_reportable()
        );
        assert!(
            StorefrontError::from(StorageError::Unavailable("disk full".to_string()))
                .is_reportable()
        );
        assert!(!StorefrontError::from(CheckoutError::EmptyCart).is_reportable());
        assert!(
            !StorefrontError::from(CartError::UnknownProduct("hat".into())).is_reportable()
        );
    }

    #[test]
    fn test_breadcrumb_without_client_is_noop() {
        add_breadcrumb("cart", "Added item", Some(&[("product_id", "shirt")]));
    }
}
