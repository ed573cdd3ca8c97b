//! Checkout wizard.
//!
//! Contains the step state machine, form values and their validation,
//! shipping methods, the review summary and order submission.

mod error;
mod flow;
mod format;
mod forms;
mod review;
mod shipping;
mod submission;
mod validation;

pub use error::CheckoutError;
pub use flow::{
    CheckoutFlow, CheckoutStatus, CheckoutStep, Clock, OrderDraft, StepIndicator, system_clock,
};
pub use format::{format_card_number, format_cvv, format_expiry};
pub use forms::{CardDetails, PaymentForm, PaymentInfo, PaymentMethod, ShippingInfo};
pub use review::{PaymentSummary, ReviewSummary};
pub use shipping::{DeliveryEstimate, ShippingMethod, add_business_days};
pub use submission::{
    OrderConfirmation, OrderRequest, OrderSubmitter, SimulatedSubmitter, SubmissionError,
    SubmissionReceipt,
};
pub use validation::{
    FieldError, FieldErrors, FieldIssue, FormField, is_valid_card_number, is_valid_cvv,
    is_valid_expiry, validate_payment, validate_shipping,
};
