//! Field-level validation for the checkout forms.
//!
//! Every field is checked on each pass and at most one issue is reported
//! per field, so the view can show all inline errors at once.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::Serialize;
use shopfront_core::{Email, Phone};
use thiserror::Error;

use super::forms::{CardDetails, PaymentForm, PaymentMethod, ShippingInfo};

static EXPIRY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2})/([0-9]{2})$").expect("Invalid regex"));

static CARD_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{13,19}$").expect("Invalid regex"));

static CVV_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").expect("Invalid regex"));

/// A form field that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Email,
    Phone,
    FirstName,
    LastName,
    Address,
    City,
    State,
    ZipCode,
    CardNumber,
    ExpiryDate,
    Cvv,
    CardName,
}

impl FormField {
    /// The field's input id, e.g. `zipCode`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::ZipCode => "zipCode",
            Self::CardNumber => "cardNumber",
            Self::ExpiryDate => "expiryDate",
            Self::Cvv => "cvv",
            Self::CardName => "cardName",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field was rejected. The display text is shown to the user as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldIssue {
    #[error("This field is required")]
    Required,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a valid phone number")]
    InvalidPhone,
    #[error("Please enter a valid card number")]
    InvalidCardNumber,
    #[error("Please enter a valid expiry date")]
    InvalidExpiryDate,
    #[error("Please enter a valid CVV")]
    InvalidCvv,
    #[error("Please enter the name on card")]
    MissingCardName,
}

/// One rejected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub issue: FieldIssue,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.issue)
    }
}

/// Every rejected field from one validation pass, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, field: FormField, issue: FieldIssue) {
        self.0.push(FieldError { field, issue });
    }

    /// The issue reported for `field`, if any.
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<FieldIssue> {
        self.0.iter().find(|e| e.field == field).map(|e| e.issue)
    }

    #[must_use]
    pub fn contains(&self, field: FormField) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Validate the shipping step.
///
/// Required fields must be non-empty after trimming. A non-empty email or
/// phone must also be well formed.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_shipping(info: &ShippingInfo) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    let required = [
        (FormField::Email, &info.email),
        (FormField::Phone, &info.phone),
        (FormField::FirstName, &info.first_name),
        (FormField::LastName, &info.last_name),
        (FormField::Address, &info.address),
        (FormField::City, &info.city),
        (FormField::State, &info.state),
        (FormField::ZipCode, &info.zip_code),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(field, FieldIssue::Required);
            continue;
        }
        match field {
            FormField::Email if Email::parse(value).is_err() => {
                errors.push(field, FieldIssue::InvalidEmail);
            }
            FormField::Phone if Phone::parse(value).is_err() => {
                errors.push(field, FieldIssue::InvalidPhone);
            }
            _ => {}
        }
    }

    errors.into_result()
}

/// Validate the payment step. Only card payments carry fields; other
/// methods always pass.
///
/// # Errors
///
/// Returns every failing card field.
pub fn validate_payment(form: &PaymentForm, today: NaiveDate) -> Result<(), FieldErrors> {
    match form.method {
        PaymentMethod::Card => validate_card(&form.card, today),
        PaymentMethod::Paypal | PaymentMethod::Applepay => Ok(()),
    }
}

fn validate_card(card: &CardDetails, today: NaiveDate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if !is_valid_card_number(&card.card_number) {
        errors.push(FormField::CardNumber, FieldIssue::InvalidCardNumber);
    }
    if !is_valid_expiry(&card.expiry_date, today) {
        errors.push(FormField::ExpiryDate, FieldIssue::InvalidExpiryDate);
    }
    if !is_valid_cvv(&card.cvv) {
        errors.push(FormField::Cvv, FieldIssue::InvalidCvv);
    }
    if card.card_name.trim().is_empty() {
        errors.push(FormField::CardName, FieldIssue::MissingCardName);
    }

    errors.into_result()
}

/// 13-19 digits once whitespace is removed.
#[must_use]
pub fn is_valid_card_number(number: &str) -> bool {
    let compact: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    CARD_NUMBER_REGEX.is_match(&compact)
}

/// 3 or 4 digits, nothing else.
#[must_use]
pub fn is_valid_cvv(cvv: &str) -> bool {
    CVV_REGEX.is_match(cvv)
}

/// `MM/YY` with a real month, not earlier than the current month.
///
/// Years are compared as two digits against `today`'s year modulo 100, so
/// a card expiring in `01/00` is rejected during 2099.
#[must_use]
pub fn is_valid_expiry(expiry: &str, today: NaiveDate) -> bool {
    let Some(caps) = EXPIRY_REGEX.captures(expiry) else {
        return false;
    };
    let (Some(month), Some(year)) = (
        caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()),
        caps.get(2).and_then(|y| y.as_str().parse::<i32>().ok()),
    ) else {
        return false;
    };

    let current_year = today.year().rem_euclid(100);
    let current_month = today.month();

    (1..=12).contains(&month)
        && (year > current_year || (year == current_year && month >= current_month))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::checkout::ShippingMethod;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn valid_shipping() -> ShippingInfo {
        ShippingInfo {
            email: "ada@example.com".to_string(),
            phone: "+1 555 010 9999".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            address: "12 Analytical Way".to_string(),
            apartment: String::new(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            shipping_method: ShippingMethod::Standard,
        }
    }

    fn valid_card() -> PaymentForm {
        PaymentForm {
            method: PaymentMethod::Card,
            card: CardDetails {
                card_number: "4111 1111 1111 1111".to_string(),
                expiry_date: "12/27".to_string(),
                cvv: "123".to_string(),
                card_name: "Ada Lovelace".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_shipping_passes() {
        assert_eq!(validate_shipping(&valid_shipping()), Ok(()));
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let info = ShippingInfo {
            first_name: "   ".to_string(),
            city: String::new(),
            ..valid_shipping()
        };

        let errors = validate_shipping(&info).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(FormField::FirstName), Some(FieldIssue::Required));
        assert_eq!(errors.get(FormField::City), Some(FieldIssue::Required));
    }

    #[test]
    fn test_apartment_is_optional() {
        let info = ShippingInfo {
            apartment: String::new(),
            ..valid_shipping()
        };
        assert!(validate_shipping(&info).is_ok());
    }

    #[test]
    fn test_invalid_email_and_phone() {
        let info = ShippingInfo {
            email: "ada@localhost".to_string(),
            phone: "0123".to_string(),
            ..valid_shipping()
        };

        let errors = validate_shipping(&info).unwrap_err();
        assert_eq!(errors.get(FormField::Email), Some(FieldIssue::InvalidEmail));
        assert_eq!(errors.get(FormField::Phone), Some(FieldIssue::InvalidPhone));
    }

    #[test]
    fn test_blank_email_reports_only_required() {
        let info = ShippingInfo {
            email: "  ".to_string(),
            ..valid_shipping()
        };

        let errors = validate_shipping(&info).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(FormField::Email), Some(FieldIssue::Required));
    }

    #[test]
    fn test_valid_card_passes() {
        assert_eq!(validate_payment(&valid_card(), today()), Ok(()));
    }

    #[test]
    fn test_other_methods_skip_card_checks() {
        let form = PaymentForm {
            method: PaymentMethod::Applepay,
            card: CardDetails::default(),
        };
        assert!(validate_payment(&form, today()).is_ok());
    }

    #[test]
    fn test_every_card_field_is_checked() {
        let form = PaymentForm {
            method: PaymentMethod::Card,
            card: CardDetails::default(),
        };

        let errors = validate_payment(&form, today()).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.get(FormField::CardNumber).unwrap().to_string(),
            "Please enter a valid card number"
        );
        assert_eq!(
            errors.get(FormField::CardName).unwrap().to_string(),
            "Please enter the name on card"
        );
    }

    #[test]
    fn test_card_number_length() {
        assert!(is_valid_card_number("4111111111111"));
        assert!(is_valid_card_number("4111 1111 1111 1111 111"));
        assert!(!is_valid_card_number("411111111111"));
        assert!(!is_valid_card_number("41111111111111111111"));
        assert!(!is_valid_card_number("4111-1111-1111-1111"));
    }

    #[test]
    fn test_cvv() {
        assert!(is_valid_cvv("123"));
        assert!(is_valid_cvv("1234"));
        assert!(!is_valid_cvv("12"));
        assert!(!is_valid_cvv("12a"));
        assert!(!is_valid_cvv(" 123"));
    }

    #[test]
    fn test_expiry_current_month_is_valid() {
        assert!(is_valid_expiry("06/25", today()));
    }

    #[test]
    fn test_expiry_previous_month_is_invalid() {
        assert!(!is_valid_expiry("05/25", today()));
        assert!(!is_valid_expiry("12/24", today()));
    }

    #[test]
    fn test_expiry_rejects_bad_month_and_shape() {
        assert!(!is_valid_expiry("13/30", today()));
        assert!(!is_valid_expiry("00/30", today()));
        assert!(!is_valid_expiry("1/30", today()));
        assert!(!is_valid_expiry("01/2030", today()));
        assert!(!is_valid_expiry("", today()));
    }

    #[test]
    fn test_expiry_two_digit_year_wraps_at_century() {
        let late = NaiveDate::from_ymd_opt(2099, 12, 1).unwrap();
        assert!(!is_valid_expiry("01/00", late));
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::new();
        errors.push(FormField::Email, FieldIssue::Required);
        errors.push(FormField::Cvv, FieldIssue::InvalidCvv);
        assert_eq!(
            errors.to_string(),
            "email: This field is required; cvv: Please enter a valid CVV"
        );
    }
}
