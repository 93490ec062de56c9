//! Magnitude formatter
//!
//! Picks a K/M/B scale and a precision band from the absolute value, then
//! hands the scaled number to the precision renderer.

use super::pattern::format_number_by_format;
use super::precision::{format_with_separators, PrecisionOptions};

/// Precision used for scaled (K/M/B) values when no `decimals` is given
const DEFAULT_SCALED_PRECISION: u32 = 3;

/// Precision for values between one and a thousand
const DEFAULT_PRECISION: u32 = 2;

/// Precision used when percentages are pre-scaled by the caller
const PERCENT_PRECISION: u32 = 2;

struct Scale {
    threshold: f64,
    divisor: f64,
    suffix: &'static str,
}

/// Large-value scales, checked top-down
const SCALES: [Scale; 3] = [
    Scale {
        threshold: 1e9,
        divisor: 1e9,
        suffix: "B",
    },
    Scale {
        threshold: 1e6,
        divisor: 1e6,
        suffix: "M",
    },
    Scale {
        threshold: 1e3,
        divisor: 1e3,
        suffix: "K",
    },
];

/// Small-value bands as (exclusive upper bound, precision), checked top-down
const SMALL_BANDS: [(f64, u32); 4] = [(1e-7, 0), (1e-5, 6), (1e-3, 4), (1.0, 4)];

/// Options for [`format_number`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Decimal places for K/M/B values. Zero counts as unset.
    pub decimals: Option<u32>,
    /// Format specifier such as `"$0.00"` or `"0.0%"`
    pub format: Option<String>,
    /// Value is already a percentage; render it with two places and `%`
    pub percent_values: bool,
}

impl FormatOptions {
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..Self::default()
        }
    }

    pub fn with_decimals(decimals: u32) -> Self {
        Self {
            decimals: Some(decimals),
            ..Self::default()
        }
    }

    pub fn percent() -> Self {
        Self {
            percent_values: true,
            ..Self::default()
        }
    }
}

/// Format a number at a human scale
///
/// `None` renders as `"-"`. A non-empty format specifier takes over
/// completely; otherwise values of a thousand or more are scaled to K/M/B.
///
/// # Examples
/// ```
/// use pie_chart::format::{format_number, FormatOptions};
///
/// assert_eq!(format_number(Some(1_234_567_890.0), &FormatOptions::default()), "1.235B");
/// assert_eq!(format_number(Some(234.567), &FormatOptions::default()), "234.57");
/// assert_eq!(format_number(None, &FormatOptions::default()), "-");
/// ```
pub fn format_number(value: Option<f64>, options: &FormatOptions) -> String {
    let Some(num) = value else {
        return "-".to_string();
    };

    if options.percent_values {
        let rendered = format_with_separators(num, PrecisionOptions::with_precision(PERCENT_PRECISION));
        return format!("{rendered}%");
    }

    if let Some(format) = options.format.as_deref().filter(|f| !f.is_empty()) {
        return format_number_by_format(num, format, false);
    }

    // NaN fails every comparison and falls through to the default band,
    // where the renderer turns it into "0".
    let abs = num.abs();

    if let Some(scale) = SCALES.iter().find(|scale| abs >= scale.threshold) {
        let precision = options
            .decimals
            .filter(|&d| d != 0)
            .unwrap_or(DEFAULT_SCALED_PRECISION);
        let rendered = format_with_separators(
            num / scale.divisor,
            PrecisionOptions::with_precision(precision),
        );
        return format!("{rendered}{}", scale.suffix);
    }

    let precision = SMALL_BANDS
        .iter()
        .find(|(upper, _)| abs < *upper)
        .map_or(DEFAULT_PRECISION, |&(_, precision)| precision);

    format_with_separators(num, PrecisionOptions::with_precision(precision))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(value: f64) -> String {
        format_number(Some(value), &FormatOptions::default())
    }

    #[test]
    fn test_null_renders_dash() {
        assert_eq!(format_number(None, &FormatOptions::percent()), "-");
        assert_eq!(format_number(None, &FormatOptions::with_format("$0.00")), "-");
    }

    #[test]
    fn test_large_scales() {
        assert_eq!(plain(1_234_567_890.0), "1.235B");
        assert_eq!(plain(2_500_000.0), "2.500M");
        assert_eq!(plain(1234.567), "1.235K");
        assert_eq!(plain(-1_500_000.0), "-1.500M");
        assert_eq!(plain(1_000.0), "1.000K");
        assert_eq!(plain(2_000_000_000_000.0), "2,000.000B");
    }

    #[test]
    fn test_billions_keep_quotient_at_precision() {
        for value in [1e9, 3.75e9, 12_345_678_901.0, -9.99e11] {
            let rendered = plain(value);
            assert!(rendered.ends_with('B'), "{rendered}");
            let expected = format_with_separators(value / 1e9, PrecisionOptions::with_precision(3));
            assert_eq!(rendered.trim_end_matches('B'), expected);
        }
    }

    #[test]
    fn test_decimals_only_apply_to_scaled_values() {
        let one = FormatOptions::with_decimals(1);
        assert_eq!(format_number(Some(1234.567), &one), "1.2K");
        assert_eq!(format_number(Some(234.567), &one), "234.57");

        // zero decimals is treated as unset
        let zero = FormatOptions::with_decimals(0);
        assert_eq!(format_number(Some(1234.567), &zero), "1.235K");
    }

    #[test]
    fn test_small_bands() {
        assert_eq!(plain(234.567), "234.57");
        assert_eq!(plain(1.0), "1.00");
        assert_eq!(plain(0.5), "0.5");
        assert_eq!(plain(0.00012345), "0.0001235");
        assert_eq!(plain(0.0000012), "0.0000012");
        assert_eq!(plain(0.00000001234), "0.000000012");
        assert_eq!(plain(0.0), "0");

        // below what a Decimal can hold, still spelled out rather than zeroed
        assert_eq!(plain(1.5e-29), "0.0000000000000000...");
        assert_eq!(plain(-3e-35), "-0.000000000000000...");
    }

    #[test]
    fn test_percent_values() {
        assert_eq!(format_number(Some(12.345), &FormatOptions::percent()), "12.35%");
        assert_eq!(format_number(Some(0.5), &FormatOptions::percent()), "0.5%");

        // percent mode wins over a format specifier
        let options = FormatOptions {
            format: Some("$0.00".to_string()),
            percent_values: true,
            ..FormatOptions::default()
        };
        assert_eq!(format_number(Some(40.0), &options), "40.00%");
    }

    #[test]
    fn test_format_specifier_delegates() {
        assert_eq!(format_number(Some(0.25), &FormatOptions::with_format("0.0%")), "25.0%");
        assert_eq!(format_number(Some(1234.5), &FormatOptions::with_format("$0.00")), "$1,234.50");
        // an empty specifier is ignored
        assert_eq!(format_number(Some(1234.5), &FormatOptions::with_format("")), "1.235K");
    }

    #[test]
    fn test_not_a_number() {
        assert_eq!(plain(f64::NAN), "0");
    }
}
