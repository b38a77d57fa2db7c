//! Text and number normalization for scraped values.
//!
//! Marketplaces render prices with locale separators, currency signs,
//! non-breaking spaces and occasionally mis-decoded bytes. These functions turn
//! that text into clean values or fail; an unreadable price is never zero.

use once_cell::sync::Lazy;
use pricescout_sources::PriceStrategy;
use regex::Regex;
use thiserror::Error;

/// Everything that cannot be part of a number.
static PRICE_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9,.\-]").expect("price noise regex is hardcoded and valid"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("title is empty")]
    EmptyTitle,

    #[error("no number in price text '{raw}'")]
    EmptyPrice { raw: String },

    #[error("price text '{raw}' is not a number")]
    InvalidPrice { raw: String },

    #[error("price text '{raw}' is negative")]
    NegativePrice { raw: String },
}

/// Trim a scraped title.
pub fn normalize_title(raw: &str) -> Result<String, NormalizeError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(NormalizeError::EmptyTitle);
    }
    Ok(title.to_string())
}

/// Parse a scraped price using the source's strategy.
pub fn normalize_price(raw: &str, strategy: PriceStrategy) -> Result<f64, NormalizeError> {
    let price = match strategy {
        PriceStrategy::Decimal => parse_decimal(raw)?,
        PriceStrategy::DigitsOnly => parse_digits(raw)?,
    };

    if !price.is_finite() {
        return Err(NormalizeError::InvalidPrice {
            raw: raw.to_string(),
        });
    }
    if price < 0.0 {
        return Err(NormalizeError::NegativePrice {
            raw: raw.to_string(),
        });
    }
    Ok(price)
}

fn parse_decimal(raw: &str) -> Result<f64, NormalizeError> {
    let stripped = PRICE_NOISE.replace_all(raw, "");
    // Dots from abbreviations such as "руб." or "от." sit at the edges
    let stripped = stripped.trim_matches('.');

    if !stripped.bytes().any(|b| b.is_ascii_digit()) {
        return Err(NormalizeError::EmptyPrice {
            raw: raw.to_string(),
        });
    }

    let unified = unify_separators(stripped);
    unified
        .parse::<f64>()
        .map_err(|_| NormalizeError::InvalidPrice {
            raw: raw.to_string(),
        })
}

/// Rewrite the number so that `.` is the only (decimal) separator.
///
/// With both `,` and `.` present the last one is the decimal separator. A
/// separator that repeats is a thousands separator.
fn unify_separators(number: &str) -> String {
    let commas = number.matches(',').count();
    let dots = number.matches('.').count();

    let decimal = match (commas, dots) {
        (0, 0) => None,
        (_, 0) => (commas == 1).then_some(','),
        (0, _) => (dots == 1).then_some('.'),
        _ => number.rfind([',', '.']).and_then(|i| number[i..].chars().next()),
    };

    number
        .chars()
        .filter_map(|c| match c {
            ',' | '.' if Some(c) == decimal => Some('.'),
            ',' | '.' => None,
            other => Some(other),
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn parse_digits(raw: &str) -> Result<f64, NormalizeError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(NormalizeError::EmptyPrice {
            raw: raw.to_string(),
        });
    }

    digits
        .parse::<u64>()
        .map(|value| value as f64)
        .map_err(|_| NormalizeError::InvalidPrice {
            raw: raw.to_string(),
        })
}
