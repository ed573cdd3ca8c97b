use thiserror::Error;

use super::flow::CheckoutStep;
use super::submission::SubmissionError;
use super::validation::FieldErrors;

/// Rejections from the checkout flow.
///
/// Every variant except [`CheckoutError::Submission`] leaves the flow
/// exactly as it was. A failed submission returns the flow to review.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// No checkout session has been started.
    #[error("No checkout in progress")]
    NotStarted,

    /// The current step's form did not validate.
    #[error("Please correct the highlighted fields")]
    Validation(FieldErrors),

    /// Direct navigation to a step the customer has not reached yet.
    #[error("The {0} step has not been reached yet")]
    StepNotReached(CheckoutStep),

    /// `advance` called on the review step.
    #[error("Already at the final step")]
    AtFinalStep,

    /// `place_order` called before the review step.
    #[error("Orders can only be placed from the review step")]
    NotAtReview,

    #[error("Your cart is empty")]
    EmptyCart,

    /// The draft is missing validated shipping or payment details.
    #[error("Checkout details are incomplete")]
    IncompleteDraft,

    /// A submission is already in flight.
    #[error("Your order is already being processed")]
    SubmissionPending,

    #[error("This order has already been placed")]
    AlreadyPlaced,

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl CheckoutError {
    /// Field errors, when this is a validation failure.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
