//! Order submission.
//!
//! Placing an order hands a frozen [`OrderRequest`] to an
//! [`OrderSubmitter`]. The shipped [`SimulatedSubmitter`] stands in for a
//! backend call; tests substitute their own implementation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::OrderId;
use thiserror::Error;
use tracing::info;

use super::forms::{PaymentInfo, ShippingInfo};
use super::shipping::DeliveryEstimate;
use crate::cart::{CartTotals, LineItem};

/// Errors returned by an order submitter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The order was refused.
    #[error("Order rejected: {0}")]
    Rejected(String),

    /// The submission service could not be reached.
    #[error("Order service unavailable: {0}")]
    Unavailable(String),
}

/// Everything needed to place an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub items: Vec<LineItem>,
    pub totals: CartTotals,
    pub shipping: ShippingInfo,
    pub payment: PaymentInfo,
    /// Fee for the chosen method, already zero when the promo waives it.
    pub shipping_fee: Decimal,
    pub placed_on: NaiveDate,
}

impl OrderRequest {
    /// Amount charged: cart total plus shipping.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        self.totals.total + self.shipping_fee
    }
}

/// What the submitter hands back for an accepted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub order_id: OrderId,
}

/// The outcome shown to the customer once the order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    /// Cart total plus shipping fee.
    pub total: Decimal,
    pub shipping_fee: Decimal,
    /// The cart totals the order was charged from.
    pub totals: CartTotals,
    pub estimated_delivery: DeliveryEstimate,
    pub placed_on: NaiveDate,
}

/// Submits orders to whatever processes them.
///
/// Implement this trait to substitute a fake in tests or a real backend.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Submit an order. Not retried by callers.
    async fn submit(&self, order: &OrderRequest) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Waits a fixed latency, then accepts every order with a fresh id.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedSubmitter {
    latency: Duration,
}

impl SimulatedSubmitter {
    /// Latency used by [`Default`].
    pub const DEFAULT_LATENCY: Duration = Duration::from_secs(3);

    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LATENCY)
    }
}

#[async_trait]
impl OrderSubmitter for SimulatedSubmitter {
    async fn submit(&self, order: &OrderRequest) -> Result<SubmissionReceipt, SubmissionError> {
        tokio::time::sleep(self.latency).await;
        let order_id = OrderId::generate();
        info!(
            order_id = %order_id,
            items = order.items.len(),
            total = %order.grand_total(),
            "Simulated order accepted"
        );
        Ok(SubmissionReceipt { order_id })
    }
}
