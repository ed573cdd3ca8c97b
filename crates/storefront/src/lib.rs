//! Shopfront storefront library.
//!
//! Provides the shopping cart and the multi-step checkout wizard as a
//! library, so that any front end (the CLI, tests) can drive them.
//!
//! - [`cart`] - persisted cart with promo codes and saved-for-later items
//! - [`checkout`] - shipping, payment and review steps, then order submission
//! - [`session`] - ties a cart and a checkout to a notifier and a submitter

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod notify;
pub mod session;
pub mod storage;

pub use error::{Result, StorefrontError};
