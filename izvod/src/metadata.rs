//! Header scan: statement number, account, holder and balance labels.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Balance, StatementMetadata};
use crate::utils::{parse_amount, parse_currency};

static STATEMENT_NO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)/(\d{2}\.\d{2}\.\d{4})").expect("valid regex"));

static CURRENCY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]{3}").expect("valid regex"));

static ACCOUNT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{18}|\d{12}").expect("valid regex"));

static IBAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"RS\d{20}").expect("valid regex"));

static BALANCE_WITH_CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d.,]+)\s*[A-Z]{3}").expect("valid regex"));

/// Scans the fragment sequence for statement-level header data.
///
/// One forward pass; each fragment is tested against a fixed chain of label
/// predicates and feeds at most one field. Later matches overwrite earlier
/// ones, except the account holder where the first match wins. The scan is
/// total: fragments that match no label, and labels whose value does not
/// parse, leave the metadata untouched or `None`.
pub fn scan_metadata(fragments: &[String]) -> StatementMetadata {
    let mut metadata = StatementMetadata::default();

    for (i, fragment) in fragments.iter().enumerate() {
        let text = fragment.as_str();
        let lower = text.to_lowercase();

        if lower.contains("izvod broj i datum:") {
            if let Some(cap) = STATEMENT_NO_DATE.captures(text) {
                metadata.statement_number =
                    cap.get(1).map(|m| m.as_str().to_string());
                metadata.statement_date =
                    cap.get(2).map(|m| m.as_str().to_string());
            }
        } else if text.contains("Valuta:") {
            if let Some(m) = CURRENCY_CODE.find(text) {
                metadata.currency = parse_currency(m.as_str());
            }
        } else if text.contains("račun broj:") {
            // also covers the longer "Platni račun broj:" label
            if let Some(m) = ACCOUNT_NUMBER.find(text) {
                metadata.account_number = Some(m.as_str().to_string());
            }
        } else if text.contains("IBAN") {
            if let Some(m) = IBAN.find(text) {
                metadata.iban = Some(m.as_str().to_string());
            }
        } else if (lower.contains("doo") || lower.contains("d.o.o") || lower.contains(" pr "))
            && metadata.account_holder.is_none()
        {
            let mut holder = text.split('\n').next().unwrap_or(text);
            if let Some((before, _)) = holder.split_once("Adresa:") {
                holder = before;
            }
            metadata.account_holder = Some(holder.trim().to_string());
        } else if text.contains("Početno stanje") {
            let value = next_or_current(fragments, i);
            if let Some(raw) = BALANCE_WITH_CURRENCY.captures(value).and_then(|c| c.get(1)) {
                metadata.beginning_balance = parse_balance(raw.as_str());
            }
        } else if text.contains("Krajnje stanje") {
            let value = next_or_current(fragments, i);
            if let Some(raw) = BALANCE_WITH_CURRENCY.captures(value).and_then(|c| c.get(1)) {
                metadata.ending_balance = parse_balance(raw.as_str());
            }
        } else if text.contains("Ukupno na teret") && i + 1 < fragments.len() {
            if let Some(raw) = BALANCE_WITH_CURRENCY
                .captures(&fragments[i + 1])
                .and_then(|c| c.get(1))
            {
                metadata.total_debit = parse_balance(raw.as_str());
            }
        } else if text.contains("Ukupno u korist") && i + 1 < fragments.len() {
            if let Some(raw) = BALANCE_WITH_CURRENCY
                .captures(&fragments[i + 1])
                .and_then(|c| c.get(1))
            {
                metadata.total_credit = parse_balance(raw.as_str());
            }
        }
    }

    metadata
}

/// Balance values are printed in the fragment after their label; at the very
/// end of the sequence the label fragment itself is searched instead.
fn next_or_current(fragments: &[String], i: usize) -> &str {
    fragments
        .get(i + 1)
        .map(String::as_str)
        .unwrap_or(&fragments[i])
}

fn parse_balance(raw: &str) -> Option<Balance> {
    parse_amount(raw).map(|minor| minor as Balance)
}
