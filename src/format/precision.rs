//! Precision renderer
//!
//! Every formatter in this crate bottoms out here: a number is turned into a
//! `,`-grouped string at a fixed precision. Values are carried as
//! [`Decimal`] so rounding happens on the decimal digits the user sees, not on
//! the binary approximation behind an `f64`.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Longest rendering returned before the ellipsis kicks in
pub const MAX_RENDERED_LEN: usize = 18;

/// Marker appended to renderings cut at [`MAX_RENDERED_LEN`]
pub const ELLIPSIS: &str = "...";

/// Fixed-point padding never goes past what a `Decimal` can hold
const MAX_DECIMAL_PLACES: u32 = 28;

/// Significant digits used when a sub-unit value is asked for zero precision
const FALLBACK_SIGNIFICANT_DIGITS: u32 = 2;

/// A number as accepted by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    /// Finite value inside `Decimal` range
    Finite(Decimal),
    /// Finite `f64` too large for `Decimal` (always integral at that size)
    Wide(f64),
    /// Nonzero `f64` whose digits reach past the last place a `Decimal` holds
    Tiny(f64),
    /// NaN, infinities, and unparseable text
    NotANumber,
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        if !value.is_finite() {
            return Self::NotANumber;
        }
        // `f64` Display is the shortest round-trip form and never uses an
        // exponent, so the decimal sees the same digits a user would type.
        let plain = value.to_string();
        if value.abs() < 1.0 && fraction_len(&plain) > MAX_DECIMAL_PLACES as usize {
            return Self::Tiny(value);
        }
        match Decimal::from_str(&plain) {
            Ok(decimal) => Self::Finite(decimal),
            Err(_) if value.abs() < 1.0 => Self::Tiny(value),
            Err(_) => Self::Wide(value),
        }
    }
}

impl From<Decimal> for NumericValue {
    fn from(value: Decimal) -> Self {
        Self::Finite(value)
    }
}

impl From<i64> for NumericValue {
    fn from(value: i64) -> Self {
        Self::Finite(Decimal::from(value))
    }
}

impl From<&str> for NumericValue {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        // Exponents and over-long fractions go through `f64` so out-of-range
        // magnitudes land in `Wide`/`Tiny` instead of being rounded away.
        let exponent = trimmed.contains(&['e', 'E'][..]);
        if !exponent && fraction_len(trimmed) <= MAX_DECIMAL_PLACES as usize {
            if let Ok(decimal) = Decimal::from_str(trimmed) {
                return Self::Finite(decimal);
            }
        }
        trimmed
            .parse::<f64>()
            .map_or(Self::NotANumber, Self::from)
    }
}

/// Tie-breaking rule for fixed-point rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// Ties toward positive infinity
    #[default]
    HalfCeil,
    /// Ties toward negative infinity
    HalfFloor,
    /// Ties away from zero
    HalfUp,
    /// Ties to the even neighbour
    HalfEven,
    /// Always toward positive infinity
    Ceil,
    /// Always toward negative infinity
    Floor,
}

impl Rounding {
    /// `rust_decimal` has no signed half-ceiling strategy, so the sign picks
    /// the equivalent symmetric one.
    fn strategy(self, negative: bool) -> RoundingStrategy {
        match self {
            Self::HalfCeil if negative => RoundingStrategy::MidpointTowardZero,
            Self::HalfCeil => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfFloor if negative => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfFloor => RoundingStrategy::MidpointTowardZero,
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
            Self::Ceil => RoundingStrategy::ToPositiveInfinity,
            Self::Floor => RoundingStrategy::ToNegativeInfinity,
        }
    }
}

/// Options for [`format_with_separators`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrecisionOptions {
    /// Decimal places (magnitude >= 1) or significant digits (magnitude < 1).
    /// `None` renders the value as-is.
    pub precision: Option<u32>,
    /// Rounding for the fixed-point branch
    pub rounding: Rounding,
}

impl PrecisionOptions {
    pub fn with_precision(precision: u32) -> Self {
        Self {
            precision: Some(precision),
            rounding: Rounding::default(),
        }
    }

    #[must_use]
    pub fn rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }
}

/// Render a number with `,` thousands separators
///
/// Non-finite input renders as `"0"`. With a precision, values of magnitude
/// one or more get exactly that many decimal places; smaller values keep that
/// many significant digits instead so they don't collapse to `0.00`. Precise
/// renderings longer than [`MAX_RENDERED_LEN`] are cut and suffixed with
/// [`ELLIPSIS`].
///
/// # Examples
/// ```
/// use pie_chart::format::{format_with_separators, PrecisionOptions};
///
/// assert_eq!(format_with_separators(1234.5, PrecisionOptions::with_precision(2)), "1,234.50");
/// assert_eq!(format_with_separators(0.000123456, PrecisionOptions::with_precision(4)), "0.0001235");
/// assert_eq!(format_with_separators(f64::NAN, PrecisionOptions::with_precision(2)), "0");
/// ```
pub fn format_with_separators(value: impl Into<NumericValue>, options: PrecisionOptions) -> String {
    let value = value.into();

    let Some(precision) = options.precision else {
        return match value {
            NumericValue::Finite(decimal) => group_decimal(&decimal.normalize().to_string()),
            NumericValue::Wide(wide) => group_decimal(&wide.to_string()),
            NumericValue::Tiny(tiny) => tiny.to_string(),
            NumericValue::NotANumber => "0".to_string(),
        };
    };

    let rendered = match value {
        NumericValue::NotANumber => return "0".to_string(),
        NumericValue::Finite(decimal) if decimal.abs() >= Decimal::ONE => {
            fixed_point(decimal, precision, options.rounding)
        }
        NumericValue::Finite(decimal) => significant(decimal, precision),
        NumericValue::Wide(wide) => group_decimal(&pad_fraction(&wide.to_string(), precision)),
        NumericValue::Tiny(tiny) => tiny_significant(tiny, precision),
    };

    truncate_with_ellipsis(rendered)
}

fn fixed_point(value: Decimal, places: u32, rounding: Rounding) -> String {
    let rounded =
        value.round_dp_with_strategy(places, rounding.strategy(value.is_sign_negative()));
    group_decimal(&pad_fraction(&rounded.to_string(), places))
}

fn significant(value: Decimal, digits: u32) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    let digits = if digits == 0 {
        FALLBACK_SIGNIFICANT_DIGITS
    } else {
        digits
    };
    let rounded = value
        .round_sf_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
        .unwrap_or(value);
    group_decimal(&rounded.normalize().to_string())
}

/// Significant digits of a value below `Decimal` resolution, spelled out
/// positionally (`1.5e-29` at 2 digits is `0.000…015`)
fn tiny_significant(value: f64, digits: u32) -> String {
    let digits = if digits == 0 {
        FALLBACK_SIGNIFICANT_DIGITS
    } else {
        digits
    };
    let scientific = format!("{:.*e}", digits as usize - 1, value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let mantissa = mantissa.replace('.', "");
    let significant = mantissa.trim_end_matches('0');
    let zeros = "0".repeat(exponent.unsigned_abs().saturating_sub(1) as usize);
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{sign}0.{zeros}{significant}")
}

/// Digits after the first `.` of a plain decimal string
fn fraction_len(plain: &str) -> usize {
    plain.split_once('.').map_or(0, |(_, fraction)| fraction.len())
}

/// Extend (never shorten) the fractional part of a plain decimal string to
/// exactly `places` digits.
fn pad_fraction(plain: &str, places: u32) -> String {
    let places = places.min(MAX_DECIMAL_PLACES) as usize;
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain, ""));
    if places == 0 {
        return integer.to_string();
    }
    format!("{integer}.{fraction:0<places$}")
}

/// Insert `,` every three integer digits of a plain decimal string
fn group_decimal(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (count, ch) in integer.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let grouped: String = grouped.chars().rev().collect();

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

fn truncate_with_ellipsis(mut rendered: String) -> String {
    if rendered.chars().count() <= MAX_RENDERED_LEN {
        return rendered;
    }
    let cut = rendered
        .char_indices()
        .nth(MAX_RENDERED_LEN)
        .map_or(rendered.len(), |(idx, _)| idx);
    rendered.truncate(cut);
    rendered.push_str(ELLIPSIS);
    rendered
}
