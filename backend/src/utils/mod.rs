//! # Utilities Module
//!
//! This module contains helper functions used across the backend service.

/// Format an amount with thousands separators for log output.
///
/// Amounts are in the ledger's smallest unit; no decimal scaling is applied.
///
/// ## Examples
///
/// ```rust,ignore
/// assert_eq!(format_amount(1_234_567), "1,234,567");
/// assert_eq!(format_amount(999), "999");
/// ```
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Truncate a string to a maximum length.
///
/// Useful for logging long principal identities.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }

    let half = max_len.saturating_sub(3) / 2;
    let head: String = s.chars().take(half).collect();
    let tail: String = s
        .chars()
        .rev()
        .take(half)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1_000), "1,000");
        assert_eq!(format_amount(1_234_567), "1,234,567");
        assert_eq!(format_amount(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("abcdefghij", 10), "abcdefghij");
        assert_eq!(truncate_string("abcdefghijklmnop", 10), "abc...nop");
    }
}
