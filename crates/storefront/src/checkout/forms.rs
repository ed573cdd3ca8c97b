//! Checkout form values.
//!
//! The view layer writes raw input into a [`ShippingInfo`] and a
//! [`PaymentForm`] owned by the checkout flow. Nothing here is validated;
//! see [`super::validation`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::shipping::ShippingMethod;

/// Contact and delivery details, as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShippingInfo {
    pub email: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    /// Apartment, suite, etc. The only optional field.
    pub apartment: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub shipping_method: ShippingMethod,
}

impl ShippingInfo {
    /// `first last`, trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Street line with the apartment appended after a comma when present.
    #[must_use]
    pub fn street_line(&self) -> String {
        let apartment = self.apartment.trim();
        if apartment.is_empty() {
            self.address.trim().to_string()
        } else {
            format!("{}, {apartment}", self.address.trim())
        }
    }

    /// `city, state zip`.
    #[must_use]
    pub fn locality_line(&self) -> String {
        format!(
            "{}, {} {}",
            self.city.trim(),
            self.state.trim(),
            self.zip_code.trim()
        )
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Paypal,
    Applepay,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Paypal => "paypal",
            Self::Applepay => "applepay",
        }
    }

    /// Label shown on the review step.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Card => "Credit Card",
            Self::Paypal => "Paypal",
            Self::Applepay => "Applepay",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "paypal" => Ok(Self::Paypal),
            "applepay" => Ok(Self::Applepay),
            _ => Err(format!("unknown payment method: {s}")),
        }
    }
}

/// Card fields, as entered.
///
/// `Debug` redacts the number and CVV.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardDetails {
    pub card_number: String,
    /// `MM/YY`.
    pub expiry_date: String,
    pub cvv: String,
    pub card_name: String,
}

impl CardDetails {
    /// The card number with everything but the last four digits masked,
    /// e.g. `**** **** **** 1234`.
    #[must_use]
    pub fn masked_number(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let last_four: String = digits.iter().skip(digits.len().saturating_sub(4)).collect();
        format!("**** **** **** {last_four}")
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &self.masked_number())
            .field("expiry_date", &self.expiry_date)
            .field("cvv", &"[REDACTED]")
            .field("card_name", &self.card_name)
            .finish()
    }
}

/// The payment step's editable state.
///
/// Card fields are kept while another method is selected so switching back
/// does not lose them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentForm {
    pub method: PaymentMethod,
    #[serde(flatten)]
    pub card: CardDetails,
}

impl PaymentForm {
    /// Snapshot the values that matter for the selected method.
    #[must_use]
    pub fn snapshot(&self) -> PaymentInfo {
        PaymentInfo {
            method: self.method,
            card: (self.method == PaymentMethod::Card).then(|| self.card.clone()),
        }
    }
}

/// Validated payment details stored in the order draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    /// Present only for [`PaymentMethod::Card`].
    pub card: Option<CardDetails>,
}
