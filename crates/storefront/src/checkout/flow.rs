//! Checkout wizard state machine.
//!
//! ```text
//! Shipping --advance--> Payment --advance--> Review --place_order--> Placed
//!     ^                    |                   |
//!     +------retreat-------+------retreat------+
//! ```
//!
//! Moving forward requires the current step's form to validate. Moving back
//! never loses data. Jumping is allowed to any step already reached.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::CheckoutError;
use super::forms::{PaymentForm, PaymentInfo, ShippingInfo};
use super::review::ReviewSummary;
use super::shipping::{DeliveryEstimate, ShippingMethod};
use super::submission::{OrderConfirmation, OrderRequest, OrderSubmitter};
use super::validation::{validate_payment, validate_shipping};
use crate::cart::{CartStore, CartTotals};
use crate::storage::Storage;

/// Source of "today" for expiry checks and delivery estimates.
pub type Clock = fn() -> NaiveDate;

/// Today's date in the local timezone.
#[must_use]
pub fn system_clock() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Steps in the checkout wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    Shipping,
    Payment,
    Review,
}

impl CheckoutStep {
    pub const ALL: [Self; 3] = [Self::Shipping, Self::Payment, Self::Review];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Shipping => "shipping",
            Self::Payment => "payment",
            Self::Review => "review",
        }
    }

    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Shipping => "Shipping",
            Self::Payment => "Payment",
            Self::Review => "Review",
        }
    }

    /// Get the step number (1-indexed).
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::Shipping => 1,
            Self::Payment => 2,
            Self::Review => 3,
        }
    }

    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Shipping => Some(Self::Payment),
            Self::Payment => Some(Self::Review),
            Self::Review => None,
        }
    }

    #[must_use]
    pub const fn previous(&self) -> Option<Self> {
        match self {
            Self::Shipping => None,
            Self::Payment => Some(Self::Shipping),
            Self::Review => Some(Self::Payment),
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckoutStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown checkout step: {s}"))
    }
}

/// Where the flow is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStatus {
    /// Filling in the steps.
    InProgress,
    /// An order submission is in flight.
    Submitting,
    /// Terminal: the order was accepted.
    Placed,
}

/// One dot of the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepIndicator {
    pub step: CheckoutStep,
    /// Every step up to and including the current one is active.
    pub active: bool,
}

/// Validated snapshots collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    pub shipping: Option<ShippingInfo>,
    pub payment: Option<PaymentInfo>,
}

impl OrderDraft {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.shipping.is_some() && self.payment.is_some()
    }
}

/// A single checkout session.
///
/// The flow owns the editable forms the view writes into; `advance` copies
/// a validated form into the [`OrderDraft`].
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    highest_reached: CheckoutStep,
    status: CheckoutStatus,
    shipping_form: ShippingInfo,
    payment_form: PaymentForm,
    draft: OrderDraft,
    clock: Clock,
    confirmation: Option<OrderConfirmation>,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    /// Start at the shipping step using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(system_clock)
    }

    /// Start at the shipping step with an injected clock.
    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            step: CheckoutStep::Shipping,
            highest_reached: CheckoutStep::Shipping,
            status: CheckoutStatus::InProgress,
            shipping_form: ShippingInfo::default(),
            payment_form: PaymentForm::default(),
            draft: OrderDraft::default(),
            clock,
            confirmation: None,
        }
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The furthest step reached so far.
    #[must_use]
    pub const fn highest_reached(&self) -> CheckoutStep {
        self.highest_reached
    }

    #[must_use]
    pub const fn status(&self) -> CheckoutStatus {
        self.status
    }

    #[must_use]
    pub const fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    #[must_use]
    pub const fn shipping_form(&self) -> &ShippingInfo {
        &self.shipping_form
    }

    pub const fn shipping_form_mut(&mut self) -> &mut ShippingInfo {
        &mut self.shipping_form
    }

    #[must_use]
    pub const fn payment_form(&self) -> &PaymentForm {
        &self.payment_form
    }

    pub const fn payment_form_mut(&mut self) -> &mut PaymentForm {
        &mut self.payment_form
    }

    /// The confirmation, once the order has been placed.
    #[must_use]
    pub const fn confirmation(&self) -> Option<&OrderConfirmation> {
        self.confirmation.as_ref()
    }

    /// Today's date according to the flow's clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// The 3-step progress indicator.
    #[must_use]
    pub fn progress(&self) -> [StepIndicator; 3] {
        CheckoutStep::ALL.map(|step| StepIndicator {
            step,
            active: step <= self.step,
        })
    }

    /// Validate the current step and move to the next one.
    ///
    /// On success the current form is copied into the draft.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Validation`] with every failing field
    /// - [`CheckoutError::AtFinalStep`] on the review step
    /// - [`CheckoutError::SubmissionPending`] / [`CheckoutError::AlreadyPlaced`]
    ///   once an order is in flight or placed
    pub fn advance(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.ensure_editable()?;

        match self.step {
            CheckoutStep::Shipping => {
                validate_shipping(&self.shipping_form).map_err(CheckoutError::Validation)?;
                self.draft.shipping = Some(self.shipping_form.clone());
            }
            CheckoutStep::Payment => {
                validate_payment(&self.payment_form, self.today())
                    .map_err(CheckoutError::Validation)?;
                self.draft.payment = Some(self.payment_form.snapshot());
            }
            CheckoutStep::Review => return Err(CheckoutError::AtFinalStep),
        }

        let next = self.step.next().ok_or(CheckoutError::AtFinalStep)?;
        self.move_to(next);
        self.highest_reached = self.highest_reached.max(next);
        Ok(next)
    }

    /// Go back one step. A no-op on the shipping step.
    ///
    /// # Errors
    ///
    /// Returns an error only once an order is in flight or placed.
    pub fn retreat(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.ensure_editable()?;

        match self.step.previous() {
            Some(previous) => self.move_to(previous),
            None => debug!("Already at the first checkout step"),
        }
        Ok(self.step)
    }

    /// Jump directly to a step already reached.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::StepNotReached`] for a step beyond the
    /// furthest one reached.
    pub fn jump_to(&mut self, step: CheckoutStep) -> Result<(), CheckoutError> {
        self.ensure_editable()?;

        if step > self.highest_reached {
            return Err(CheckoutError::StepNotReached(step));
        }
        self.move_to(step);
        Ok(())
    }

    /// Shipping fee for the drafted method, waived by a free-shipping promo.
    #[must_use]
    pub fn shipping_fee(&self, totals: &CartTotals) -> Decimal {
        let method = self
            .draft
            .shipping
            .as_ref()
            .map_or(self.shipping_form.shipping_method, |s| s.shipping_method);
        shipping_fee_for(method, totals)
    }

    /// Data for the review step.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::IncompleteDraft`] until both shipping and
    /// payment have been validated.
    pub fn review_summary<S: Storage>(
        &self,
        cart: &CartStore<S>,
    ) -> Result<ReviewSummary, CheckoutError> {
        let (Some(shipping), Some(payment)) = (&self.draft.shipping, &self.draft.payment) else {
            return Err(CheckoutError::IncompleteDraft);
        };
        let totals = cart.compute_totals();
        Ok(ReviewSummary::new(
            shipping,
            payment,
            totals,
            self.shipping_fee(&totals),
        ))
    }

    /// Submit the order.
    ///
    /// Freezes the draft with the cart's current items and totals, hands it
    /// to `submitter`, and on success clears the cart. The flow is
    /// `Submitting` while the call is in flight; if the returned future is
    /// dropped early it stays that way.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::NotAtReview`] outside the review step
    /// - [`CheckoutError::EmptyCart`] when there is nothing to order
    /// - [`CheckoutError::Submission`] when the submitter fails; the flow
    ///   returns to review with the draft and cart intact
    pub async fn place_order<S, O>(
        &mut self,
        cart: &mut CartStore<S>,
        submitter: &O,
    ) -> Result<OrderConfirmation, CheckoutError>
    where
        S: Storage,
        O: OrderSubmitter + ?Sized,
    {
        self.ensure_editable()?;

        if self.step != CheckoutStep::Review {
            return Err(CheckoutError::NotAtReview);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let (Some(shipping), Some(payment)) = (&self.draft.shipping, &self.draft.payment) else {
            return Err(CheckoutError::IncompleteDraft);
        };

        let totals = cart.compute_totals();
        let request = OrderRequest {
            items: cart.items().to_vec(),
            totals,
            shipping: shipping.clone(),
            payment: payment.clone(),
            shipping_fee: shipping_fee_for(shipping.shipping_method, &totals),
            placed_on: self.today(),
        };

        self.status = CheckoutStatus::Submitting;
        info!(
            items = request.items.len(),
            total = %request.grand_total(),
            "Submitting order"
        );

        let receipt = match submitter.submit(&request).await {
            Ok(receipt) => receipt,
            Err(e) => {
                self.status = CheckoutStatus::InProgress;
                warn!(error = %e, "Order submission failed");
                return Err(e.into());
            }
        };

        let confirmation = OrderConfirmation {
            order_id: receipt.order_id,
            total: request.grand_total(),
            shipping_fee: request.shipping_fee,
            totals: request.totals,
            estimated_delivery: DeliveryEstimate::for_method(
                request.shipping.shipping_method,
                request.placed_on,
            ),
            placed_on: request.placed_on,
        };

        self.status = CheckoutStatus::Placed;
        self.confirmation = Some(confirmation.clone());
        cart.clear();
        info!(order_id = %confirmation.order_id, "Order placed");
        Ok(confirmation)
    }

    const fn ensure_editable(&self) -> Result<(), CheckoutError> {
        match self.status {
            CheckoutStatus::InProgress => Ok(()),
            CheckoutStatus::Submitting => Err(CheckoutError::SubmissionPending),
            CheckoutStatus::Placed => Err(CheckoutError::AlreadyPlaced),
        }
    }

    fn move_to(&mut self, step: CheckoutStep) {
        debug!(from = %self.step, to = %step, "Checkout step changed");
        self.step = step;
    }
}

fn shipping_fee_for(method: ShippingMethod, totals: &CartTotals) -> Decimal {
    if totals.free_shipping {
        Decimal::ZERO
    } else {
        method.fee()
    }
}
