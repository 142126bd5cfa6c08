#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! pt-BR display strings for data-display widgets.
//!
//! Output mirrors the browser's `pt-BR` number formatting: `.` groups
//! thousands, `,` separates decimals, currency is prefixed with `R$` and a
//! non-breaking space. Non-finite inputs render as an en dash.

use chrono::NaiveDate;

/// Rendered in place of NaN and infinities.
pub const PLACEHOLDER: &str = "–";
/// Currency prefix including the non-breaking space.
pub const CURRENCY_PREFIX: &str = "R$\u{a0}";

/// Widest fractional precision rendered; larger requests are clamped.
pub const MAX_DECIMALS: u8 = 20;

const GROUP_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// Format a number with `decimals` fractional digits, at most [`MAX_DECIMALS`].
#[must_use]
pub fn format_number(value: f64, decimals: u8) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let (negative, magnitude) = split_sign(value, decimals);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{magnitude}")
}

/// Format a BRL amount, e.g. `1234.5` → `R$ 1.234,50`.
#[must_use]
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let (negative, magnitude) = split_sign(value, 2);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{CURRENCY_PREFIX}{magnitude}")
}

/// Format a ratio as a percentage, e.g. `0.1234` with 2 decimals → `12,34%`.
#[must_use]
pub fn format_percentage(ratio: f64, decimals: u8) -> String {
    if !ratio.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{}%", format_number(ratio * 100.0, decimals))
}

/// Format a calendar date as `dd/mm/aaaa`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

// Sign is dropped when the rounded magnitude is zero.
fn split_sign(value: f64, decimals: u8) -> (bool, String) {
    let precision = usize::from(decimals.min(MAX_DECIMALS));
    let rendered = format!("{:.*}", precision, value.abs());
    let nonzero = rendered.bytes().any(|byte| matches!(byte, b'1'..=b'9'));
    let (whole, fraction) = rendered
        .split_once('.')
        .map_or((rendered.as_str(), None), |(whole, fraction)| {
            (whole, Some(fraction))
        });
    let mut magnitude = group_thousands(whole);
    if let Some(fraction) = fraction {
        magnitude.push(DECIMAL_SEPARATOR);
        magnitude.push_str(fraction);
    }
    (value.is_sign_negative() && nonzero, magnitude)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(digit);
    }
    grouped
}
