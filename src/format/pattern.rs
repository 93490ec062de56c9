//! Pattern formatter
//!
//! Applies a numeral-style format specifier (`"0.00"`, `"$0.0a"`, `"0.0%"`)
//! to a number. Only the shape of the specifier matters: digits after the
//! first `.` set the decimal places, `%` scales by a hundred, `$` marks
//! currency, and `a`/`m` ask for K/M/B abbreviation.

use super::magnitude::{format_number, FormatOptions};
use super::precision::{format_with_separators, PrecisionOptions};

const CURRENCY_SYMBOL: &str = "$";

/// Decimal places requested by a format specifier
///
/// Counts the digits between the first `.` and the next one, so `"0.00"`
/// and `"$0.00a"` both ask for two places and `"0.0%"` asks for one.
pub fn decimal_places(format: &str) -> u32 {
    let count = format
        .split('.')
        .nth(1)
        .map_or(0, |fraction| fraction.chars().filter(char::is_ascii_digit).count());
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn wants_abbreviation(format: &str) -> bool {
    format.contains('m') || format.contains('a')
}

/// Format a number according to a format specifier
///
/// `separators` forces the fully grouped rendering even when the specifier
/// asks for abbreviation.
///
/// # Examples
/// ```
/// use pie_chart::format::format_number_by_format;
///
/// assert_eq!(format_number_by_format(0.5, "0.0%", false), "50.0%");
/// assert_eq!(format_number_by_format(1234.5, "$0.00", false), "$1,234.50");
/// assert_eq!(format_number_by_format(1_234_567.0, "$0.00a", false), "$1.23M");
/// ```
pub fn format_number_by_format(value: f64, format: &str, separators: bool) -> String {
    if format.is_empty() {
        return format_with_separators(value, PrecisionOptions::with_precision(0));
    }

    let places = decimal_places(format);

    if format.contains('%') {
        let rendered = format_with_separators(value * 100.0, PrecisionOptions::with_precision(places));
        return format!("{rendered}%");
    }

    let currency = if format.contains(CURRENCY_SYMBOL) {
        CURRENCY_SYMBOL
    } else {
        ""
    };
    let rounded = format_with_separators(value, PrecisionOptions::with_precision(places));

    if separators || !wants_abbreviation(format) {
        return if format.starts_with(CURRENCY_SYMBOL) {
            format!("{currency}{rounded}")
        } else {
            format!("{rounded}{currency}")
        };
    }

    // Abbreviated: scale the integer part, keeping as many decimals as the
    // grouped rendering had.
    let mut parts = rounded.split('.');
    let integer_part = parts.next().unwrap_or_default();
    let fraction_part = parts.next().unwrap_or_default();

    let integer = integer_part.replace(',', "").parse::<f64>().unwrap_or(f64::NAN);
    let decimals = u32::try_from(fraction_part.len()).unwrap_or(u32::MAX);
    let scaled = format_number(Some(integer), &FormatOptions::with_decimals(decimals));

    format!("{currency}{scaled}")
}
