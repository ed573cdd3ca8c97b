//! Cart commands.
//!
//! Each command opens the persisted cart, performs one action, prints the
//! notices it raised and then the cart.

use shopfront_core::{Price, ProductId};
use shopfront_storefront::Result;
use shopfront_storefront::cart::Product;
use shopfront_storefront::config::StorefrontConfig;

use super::open_session;
use crate::render;

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error if the price is out of range.
pub fn add(
    config: &StorefrontConfig,
    id: &str,
    title: &str,
    price: Price,
    quantity: u32,
) -> Result<()> {
    let (mut session, notifier) = open_session(config, None);
    let product = Product::new(id, title, price.amount);

    let added = session.add_to_cart(&product, quantity);

    render::notices(&notifier.drain());
    added?;
    render::cart(session.cart());
    Ok(())
}

/// Remove a line. Unknown ids are ignored.
pub fn remove(config: &StorefrontConfig, id: &str) {
    let (mut session, notifier) = open_session(config, None);

    if session.remove_from_cart(&ProductId::new(id)).is_none() {
        tracing::debug!(product_id = %id, "Nothing to remove");
    }

    render::notices(&notifier.drain());
    render::cart(session.cart());
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn set(config: &StorefrontConfig, id: &str, quantity: i64) -> Result<()> {
    let (mut session, _notifier) = open_session(config, None);

    session.set_quantity(&ProductId::new(id), quantity)?;

    render::cart(session.cart());
    Ok(())
}

/// Print the cart.
pub fn show(config: &StorefrontConfig) {
    let (session, _notifier) = open_session(config, None);
    render::cart(session.cart());
}

/// Print the cart with a promo code applied.
///
/// Promo codes are not persisted, so this is a preview; pass `--promo` to
/// `checkout` to use one.
///
/// # Errors
///
/// Returns an error if the code is unknown.
pub fn promo(config: &StorefrontConfig, code: &str) -> Result<()> {
    let (mut session, notifier) = open_session(config, None);

    let applied = session.apply_promo(code);
    render::notices(&notifier.drain());
    applied?;

    render::cart(session.cart());
    Ok(())
}

/// Move a line to saved-for-later.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn save(config: &StorefrontConfig, id: &str) -> Result<()> {
    let (mut session, notifier) = open_session(config, None);

    let saved = session.save_for_later(&ProductId::new(id));
    render::notices(&notifier.drain());
    saved?;

    render::cart(session.cart());
    Ok(())
}

/// Move a saved item back into the cart.
///
/// # Errors
///
/// Returns an error if nothing is saved under `id`.
pub fn restore(config: &StorefrontConfig, id: &str) -> Result<()> {
    let (mut session, notifier) = open_session(config, None);

    let restored = session.move_to_cart(&ProductId::new(id));
    render::notices(&notifier.drain());
    restored?;

    render::cart(session.cart());
    Ok(())
}

/// Empty the cart. Saved items are kept.
pub fn clear(config: &StorefrontConfig) {
    let (mut session, notifier) = open_session(config, None);

    session.clear_cart();

    render::notices(&notifier.drain());
    render::cart(session.cart());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use shopfront_storefront::storage::{FileStorage, Storage, keys};

    use super::*;

    fn config(dir: &Path) -> StorefrontConfig {
        StorefrontConfig {
            data_dir: dir.to_path_buf(),
            ..StorefrontConfig::default()
        }
    }

    #[test]
    fn test_add_persists_between_commands() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        add(&config, "shirt", "Shirt", "20".parse().unwrap(), 2).unwrap();
        add(&config, "shirt", "Shirt", "20".parse().unwrap(), 1).unwrap();

        let (session, _) = open_session(&config, None);
        assert_eq!(session.cart().items().len(), 1);
        assert_eq!(session.cart().items().first().unwrap().quantity, 3);
    }

    #[test]
    fn test_add_out_of_range_price_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let huge = Price::usd(Price::MAX_AMOUNT + Price::MAX_AMOUNT);
        assert!(add(&config, "big", "Big", huge, 2).is_err());

        let storage = FileStorage::new(dir.path());
        assert!(storage.get_item(keys::CART_ITEMS).unwrap().is_none());
    }

    #[test]
    fn test_unknown_promo_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        assert!(promo(&config, "BOGUS").is_err());
        assert!(promo(&config, "save20").is_ok());
    }

    #[test]
    fn test_clear_keeps_saved_items() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        add(&config, "shirt", "Shirt", "20".parse().unwrap(), 1).unwrap();
        add(&config, "hat", "Hat", "15".parse().unwrap(), 1).unwrap();
        save(&config, "hat").unwrap();
        clear(&config);

        let storage = FileStorage::new(dir.path());
        assert!(storage.get_item(keys::CART_ITEMS).unwrap().is_none());
        assert!(storage.get_item(keys::SAVED_ITEMS).unwrap().is_some());
    }

    #[test]
    fn test_set_unknown_product_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(set(&config(dir.path()), "ghost", 3).is_err());
    }
}
