//! Terminal output.
//!
//! Everything the CLI shows the user goes through here; logs go to stderr
//! through `tracing`.

#![allow(clippy::print_stdout)]

use shopfront_core::Price;
use shopfront_storefront::cart::{CartStore, LineItem, PROMOS};
use shopfront_storefront::checkout::{
    CheckoutStep, FieldErrors, OrderConfirmation, ReviewSummary,
};
use shopfront_storefront::notify::{Notice, NoticeLevel};
use shopfront_storefront::storage::Storage;

pub fn notices(notices: &[Notice]) {
    for notice in notices {
        let marker = match notice.level {
            NoticeLevel::Success => "✓",
            NoticeLevel::Error => "✗",
            NoticeLevel::Info => "•",
        };
        println!("{marker} {}", notice.message);
    }
}

fn line(item: &LineItem) {
    println!(
        "  {:<24} {:>3} × {:>9} = {:>10}",
        item.title,
        item.quantity,
        Price::usd(item.unit_price),
        Price::usd(item.line_total()),
    );
}

/// Print the cart lines, saved items and totals.
pub fn cart<S: Storage>(cart: &CartStore<S>) {
    if cart.is_empty() {
        println!("Your cart is empty");
    } else {
        println!("Cart");
        cart.items().iter().for_each(line);

        let totals = cart.compute_totals();
        println!();
        println!("Items     {}", totals.item_count);
        println!("Subtotal  {}", Price::usd(totals.subtotal));
        println!("Tax       {}", Price::usd(totals.tax));
        if let Some(promo) = cart.promo() {
            println!(
                "Discount  {} ({} - {})",
                Price::usd(-totals.discount),
                promo.code,
                promo.description
            );
        }
        println!("Total     {}", Price::usd(totals.total));
    }

    if !cart.saved_items().is_empty() {
        println!();
        println!("Saved for later");
        cart.saved_items().iter().for_each(line);
    }
}

pub fn promos() {
    for promo in PROMOS {
        println!("{:<10} {}", promo.code, promo.description);
    }
}

pub fn field_errors(step: CheckoutStep, errors: &FieldErrors) {
    println!("{} step:", step.display_name());
    for error in errors {
        println!("  {:<12} {}", error.field.as_str(), error.issue);
    }
}

pub fn review(summary: &ReviewSummary) {
    println!("Review your order");
    println!("{summary}");
    println!();
}

pub fn confirmation(confirmation: &OrderConfirmation) {
    let delivery = &confirmation.estimated_delivery;
    println!("Order {}", confirmation.order_id);
    println!("Total     {}", Price::usd(confirmation.total));
    println!(
        "Delivery  {} ({} to {})",
        delivery.label, delivery.earliest, delivery.latest
    );
}
