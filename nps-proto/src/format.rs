//! Canonical string formats used on the wire.
//!
//! Format strings follow the `strftime` conventions understood by `chrono`.

/// Dates: `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-times: `YYYY-MM-DD HH:MM:SS`.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Times: `HH:MM:SS`.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Separators accepted (and discarded) in human-written amounts.
///
/// Amounts travel as unsigned integers in minor currency units, so
/// `"1.234,56"` becomes `"123456"`.
pub const AMOUNT_SEPARATORS: [char; 2] = [',', '.'];

/// Strips thousands and decimal separators from an amount.
#[must_use]
pub fn strip_amount_separators(value: &str) -> String {
    value.replace(AMOUNT_SEPARATORS, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_amount_separators() {
        assert_eq!(strip_amount_separators("105.05"), "10505");
        assert_eq!(strip_amount_separators("105,05"), "10505");
        assert_eq!(strip_amount_separators("1.234,56"), "123456");
        assert_eq!(strip_amount_separators("42"), "42");
    }
}
