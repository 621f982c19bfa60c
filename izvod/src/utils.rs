use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Currency;

/// Timestamp substituted when a statement date does not parse.
const DATE_FALLBACK: &str = "2025-01-01T00:00:00";

/// Parses a Serbian-formatted amount (`1.234,56`) into minor units.
///
/// A trailing three-letter currency code is stripped first, so both
/// `"2.500,00"` and `"2.500,00 RSD"` parse. Anything that is not a
/// non-negative amount with at most two fractional digits yields `None`.
pub(crate) fn parse_amount(raw: &str) -> Option<u64> {
    static CURRENCY_SUFFIX: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\s*[A-Z]{3}\s*$").expect("valid regex"));

    let cleaned = CURRENCY_SUFFIX.replace(raw.trim(), "");
    let cleaned = cleaned.replace('.', "");

    if cleaned.is_empty() || cleaned.starts_with('-') {
        return None;
    }

    let mut split = cleaned.split(',');
    let int_part = split.next()?;
    let dec_part = split.next().unwrap_or("");
    if split.next().is_some() {
        // more than one decimal comma
        return None;
    }

    let int_part: u64 = int_part.parse().ok()?;

    let dec_part: u64 = match dec_part.len() {
        0 => 0,
        1 => dec_part.chars().next().and_then(|c| c.to_digit(10))? as u64 * 10,
        2 => dec_part.parse().ok()?,
        _ => return None,
    };

    int_part.checked_mul(100)?.checked_add(dec_part)
}

/// Parses a `DD.MM.YYYY` date; impossible calendar dates yield `None`.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d.%m.%Y").ok()
}

/// Renders a date as the midnight timestamp the notification schema uses.
pub(crate) fn format_iso_midnight(date: NaiveDate) -> String {
    date.format("%Y-%m-%dT00:00:00").to_string()
}

/// Converts a raw `DD.MM.YYYY` string into a midnight timestamp, with a
/// fixed fallback when the text does not parse.
pub(crate) fn normalize_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => format_iso_midnight(date),
        None => DATE_FALLBACK.to_string(),
    }
}

pub(crate) fn parse_currency(raw: &str) -> Currency {
    match raw.trim() {
        "RSD" => Currency::RSD,
        "EUR" => Currency::EUR,
        "USD" => Currency::USD,
        "CHF" => Currency::CHF,
        other => Currency::Other(other.to_string()),
    }
}

/// True when the text has at least one upper-case letter and no lower-case
/// ones. Used to tell all-caps payee rows from mixed-case purpose rows.
pub(crate) fn is_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// Truncates to at most `max` characters, never splitting a multi-byte char.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
