//! Normalisation of free-text currency input ("R$ 1.234,56") into a number.
//!
//! The input is read in Brazilian notation: `.` groups thousands and `,`
//! separates decimals. Every `.` is discarded, so plain decimal-point input
//! such as `"10.50"` reads as `1050.0`.

use once_cell::sync::Lazy;
use regex::Regex;

// Hardcoded regex pattern - guaranteed to be valid at compile time
#[allow(clippy::unwrap_used)]
static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d,.]").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid amount: {input:?}")]
pub struct AmountParseError {
    pub input: String,
}

pub fn parse_amount(raw: &str) -> Result<f64, AmountParseError> {
    let digits = NON_NUMERIC.replace_all(raw, "");
    let normalized = digits.replace('.', "").replace(',', ".");

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| AmountParseError {
            input: raw.to_string(),
        })
}
