//! # format — number → display string
//!
//! Rounding here is half away from zero on the *exact* binary value of the
//! `f64`, which is what a browser's `toFixed` does.  `0.125` is exactly
//! representable and rounds to `0.13`; `1.005` is really
//! `1.00499999999999989…` and rounds to `1.00`.

use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

fn to_decimal(value: f64, dp: u32) -> Option<Decimal> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
}

/// Round to `dp` decimal places.  Non-finite input comes back unchanged.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    to_decimal(value, dp)
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Fixed number of decimals, zero-padded: `fixed(0.2985, 4) == "0.2985"`.
pub fn fixed(value: f64, dp: u32) -> String {
    match to_decimal(value, dp) {
        Some(mut d) => {
            d.rescale(dp);
            d.to_string()
        }
        None => value.to_string(),
    }
}

/// en-US grouping with at most three fraction digits, trailing zeros
/// dropped: `29850000.0 → "29,850,000"`, `98500.1234 → "98,500.123"`.
pub fn grouped(value: f64) -> String {
    let Some(d) = to_decimal(value, 3) else {
        return value.to_string();
    };

    let text = d.normalize().to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let int_grouped = match int_part.parse::<u128>() {
        Ok(n) => n.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };

    match frac_part {
        Some(frac) => format!("{sign}{int_grouped}.{frac}"),
        None => format!("{sign}{int_grouped}"),
    }
}

/// Integer grouping: `875000 → "875,000"`.
pub fn grouped_int(value: u64) -> String {
    value.to_formatted_string(&Locale::en)
}
