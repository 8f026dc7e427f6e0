//! Luhn checksum validation for order numbers
//!
//! Order numbers are validated as a string of decimal digits only; empty
//! strings and any non-digit character are rejected outright before the
//! checksum is even computed.

/// Validate an order number's Luhn (mod-10) checksum.
///
/// Returns `false` for the empty string or any string containing
/// non-digit characters.
pub fn is_valid(number: &str) -> bool {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = number
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let digit = (b - b'0') as u32;
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_numbers() {
        for n in [
            "12345678903",
            "98765432103",
            "79927398713",
            "4111111111111111",
            "378282246310005",
        ] {
            assert!(is_valid(n), "{n} should be valid");
        }
    }

    #[test]
    fn invalid_numbers() {
        for n in ["", "order #123", "12345678901"] {
            assert!(!is_valid(n), "{n} should be invalid");
        }
    }

    #[test]
    fn rejects_non_digit_characters() {
        assert!(!is_valid("1234-5678-903"));
        assert!(!is_valid("１２３４５")); // full-width digits aren't ascii
    }
}
