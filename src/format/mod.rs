//! Number formatting for chart labels, tooltips and legends
//!
//! Three layers, each delegating to the next:
//!
//! ```text
//! format_number  (null, percent, K/M/B scale, precision band)
//!   └─ format_number_by_format  (specifier: places, %, $, abbreviation)
//!        └─ format_with_separators  (grouping, rounding, truncation)
//! ```
//!
//! Formatting never fails: non-finite input renders as `"0"`.

mod magnitude;
mod pattern;
mod precision;

pub use magnitude::{format_number, FormatOptions};
pub use pattern::{decimal_places, format_number_by_format};
pub use precision::{
    format_with_separators, NumericValue, PrecisionOptions, Rounding, ELLIPSIS, MAX_RENDERED_LEN,
};
