//! Live input formatting for the card fields.
//!
//! These normalize what the customer types before it lands in the payment
//! form; they never reject input.

/// Keep digits only and group them in fours: `4111111111111111` becomes
/// `4111 1111 1111 1111`.
#[must_use]
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(char::is_ascii_digit).collect();
    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep digits only; once there are two, insert `/` after the month and
/// keep at most two more digits: `1230` becomes `12/30`.
#[must_use]
pub fn format_expiry(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 2 {
        return digits;
    }
    let (month, rest) = digits.split_at(2);
    let year: String = rest.chars().take(2).collect();
    format!("{month}/{year}")
}

/// Keep digits only, at most four.
#[must_use]
pub fn format_cvv(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).take(4).collect()
}
