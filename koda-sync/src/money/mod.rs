//! Price-string parsing and product-name sanitization
//!
//! Catalog prices are stored as display strings with a currency glyph
//! ("349€", "10,99€"). The provider's pricing API wants integer minor units,
//! so parsing goes through `Decimal` and rounds half-up at two places.

use rust_decimal::prelude::*;

/// Minor units per major currency unit (euro cents)
const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Characters allowed in a provider-facing product name besides Unicode
/// alphanumerics and spaces
const NAME_WHITELIST: &str = "-_.,'\"&()!?";

/// Price-string parsing failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceParseError {
    #[error("price string is empty")]
    Empty,
    #[error("price string is not a number: {0:?}")]
    Invalid(String),
    #[error("price must be positive, got {0} minor units")]
    NonPositive(i64),
}

/// Parse a display price string into integer minor units.
///
/// Strips currency glyphs and whitespace, strips thousands separators,
/// normalizes a decimal comma to a dot, multiplies by 100 and rounds
/// half-up. Rejects non-positive results.
///
/// `"349€"` → 34900, `"10,99€"` → 1099, `"1.234,50€"` → 123450.
pub fn parse_minor_units(raw: &str) -> Result<i64, PriceParseError> {
    let filtered: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.' || *c == '-')
        .collect();

    if filtered.is_empty() {
        return Err(PriceParseError::Empty);
    }

    let normalized = normalize_separators(&filtered);

    let amount: Decimal = normalized
        .parse()
        .map_err(|_| PriceParseError::Invalid(raw.to_string()))?;

    let minor = (amount * Decimal::from(MINOR_UNITS_PER_MAJOR))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let minor = minor
        .to_i64()
        .ok_or_else(|| PriceParseError::Invalid(raw.to_string()))?;

    if minor <= 0 {
        return Err(PriceParseError::NonPositive(minor));
    }

    Ok(minor)
}

/// Resolve ',' and '.' into a canonical decimal-dot form.
///
/// When both separators occur, the rightmost is the decimal mark and the
/// rest are thousands separators. A lone separator followed by exactly
/// three digits is a thousands separator ("1.234" is 1234 euros, not
/// 1.234); anything else marks the decimal.
fn normalize_separators(s: &str) -> String {
    let last_sep = s.rfind([',', '.']);

    let Some(sep_idx) = last_sep else {
        return s.to_string();
    };

    let sep_count = s.chars().filter(|c| *c == ',' || *c == '.').count();
    let frac_len = s.len() - sep_idx - 1;
    let decimal_sep = sep_count > 1 || frac_len != 3;

    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        match c {
            ',' | '.' => {
                if decimal_sep && i == sep_idx {
                    out.push('.');
                }
                // thousands separators are dropped
            }
            other => out.push(other),
        }
    }
    out
}

/// Sanitize a product title for the provider catalog.
///
/// Smart quotes become straight quotes, dashes normalize to '-', symbols
/// outside a small whitelist are dropped, and whitespace runs collapse to a
/// single space. Unicode letters and digits pass through untouched.
pub fn sanitize_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.chars() {
        let mapped = match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => Some('"'),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2039}' | '\u{203A}' => Some('\''),
            '\u{2013}' | '\u{2014}' => Some('-'),
            c if c.is_whitespace() => None,
            c if c.is_alphanumeric() || NAME_WHITELIST.contains(c) => Some(c),
            _ => continue,
        };

        match mapped {
            Some(c) => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
            None => pending_space = true,
        }
    }

    out
}

#[cfg(test)]
mod tests;
