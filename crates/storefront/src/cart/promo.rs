//! Promo code table.

use rust_decimal::Decimal;
use serde::Serialize;

/// A recognized promo code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Promo {
    /// Canonical upper-case code.
    pub code: &'static str,
    /// Percentage taken off the subtotal.
    pub percent_off: u32,
    /// Whether the promo waives the shipping fee.
    pub free_shipping: bool,
    /// Short human-readable description, e.g. `20% off`.
    pub description: &'static str,
}

/// Every promo code the storefront accepts.
pub const PROMOS: &[Promo] = &[
    Promo {
        code: "SAVE20",
        percent_off: 20,
        free_shipping: false,
        description: "20% off",
    },
    Promo {
        code: "WELCOME10",
        percent_off: 10,
        free_shipping: false,
        description: "10% off",
    },
    Promo {
        code: "FREESHIP",
        percent_off: 0,
        free_shipping: true,
        description: "Free shipping",
    },
];

impl Promo {
    /// Look up a code, ignoring ASCII case.
    ///
    /// Surrounding whitespace is significant: `" SAVE20"` is not a code.
    #[must_use]
    pub fn lookup(code: &str) -> Option<&'static Self> {
        PROMOS.iter().find(|p| p.code.eq_ignore_ascii_case(code))
    }

    /// Discount rate as a fraction of the subtotal (`0.20` for 20% off).
    #[must_use]
    pub fn discount_rate(&self) -> Decimal {
        Decimal::new(i64::from(self.percent_off), 2)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Promo::lookup("save20").unwrap().code, "SAVE20");
        assert_eq!(Promo::lookup("Welcome10").unwrap().code, "WELCOME10");
        assert!(Promo::lookup("FREESHIP").unwrap().free_shipping);
    }

    #[test]
    fn test_lookup_rejects_unknown_and_padded_codes() {
        assert!(Promo::lookup("BOGUS").is_none());
        assert!(Promo::lookup(" SAVE20").is_none());
        assert!(Promo::lookup("").is_none());
    }

    #[test]
    fn test_discount_rate() {
        assert_eq!(Promo::lookup("SAVE20").unwrap().discount_rate(), dec!(0.20));
        assert_eq!(Promo::lookup("WELCOME10").unwrap().discount_rate(), dec!(0.10));
        assert_eq!(Promo::lookup("FREESHIP").unwrap().discount_rate(), dec!(0));
    }
}
