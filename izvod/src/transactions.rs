//! Transaction stream parser.
//!
//! The statement table arrives as an ordered run of short text fragments
//! with no markup left to tell columns apart. Records are reconstructed
//! positionally: a 1-3 digit fragment opens a record, the following
//! fragments are matched against per-column predicates. Every predicate is
//! optional; a fragment that fails one is simply left for the next step.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Benefit, Transaction};
use crate::utils::{is_upper, parse_amount, parse_date, truncate_chars};

/// Column labels closing the table header; data starts after the last one.
const COLUMN_LABELS: [&str; 3] = ["U KORIST", "UPLATE", "ISPLATE"];

/// How far past the section header the column labels are searched.
const HEADER_WINDOW: usize = 20;

/// Domestic records occupy six fragments. Foreign-exchange records may run
/// shorter or longer; the loop re-synchronizes on the next serial-shaped
/// fragment.
const RECORD_STRIDE: usize = 6;

const PURPOSE_MAX_CHARS: usize = 140;

static SERIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}$").expect("valid regex"));

static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}\.\d{2}\.\d{4}").expect("valid regex"));

static DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}").expect("valid regex"));

static FT_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^FT\d+").expect("valid regex"));

static PAYEE_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-ZČĆŽŠĐ][A-ZČĆŽŠĐ\s]+$").expect("valid regex"));

static FT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"FT\d+[A-Z0-9]*").expect("valid regex"));

static FT_REF_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^FT\d+[A-Z0-9]*").expect("valid regex"));

static DASHED_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+-\d+").expect("valid regex"));

static AMOUNT_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d.,]+$").expect("valid regex"));

static FX_FT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"FT\d+[A-Z0-9]+").expect("valid regex"));

static FX_BANK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)Banka[^:]*:\s*(.*?)(?:Nalogodavac|Zemlja|$)").expect("valid regex")
});

static FX_PAYER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Nalogodavac:\s*(.*?)(?:Zemlja|$)").expect("valid regex"));

static FX_ENUM_LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^1/").expect("valid regex"));

static FX_ENUM_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s),?\s*2/.*").expect("valid regex"));

static OSNOV_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Osnov:\s*([^\n]+)").expect("valid regex"));

static RRN_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"RRN.*").expect("valid regex"));

static OPIS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Opis:\s*([^\n]+)").expect("valid regex"));

static IZNOS_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+Iznos:.*").expect("valid regex"));

static FX_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,3}(?:\.\d{3})*,\d{2}").expect("valid regex"));

/// Reconstructs all transactions from the fragment sequence.
///
/// Total: a statement without a transaction section yields an empty vector,
/// and no malformed fragment run can fail the call. Records decoded with a
/// zero amount are dropped. The loop executes at most one pass per fragment
/// after the table header, so output length is bounded by input length.
pub fn parse_transactions(fragments: &[String]) -> Vec<Transaction> {
    let Some(section_start) = find_section(fragments) else {
        return Vec::new();
    };
    let data_start = find_data_start(fragments, section_start);

    let mut transactions = Vec::new();
    let mut i = data_start;
    let budget = fragments.len() - data_start;
    let mut iterations = 0;

    while i < fragments.len() && iterations < budget {
        iterations += 1;

        if SERIAL.is_match(&fragments[i]) {
            match decode_at(fragments, i) {
                Some(txn) if txn.amount > 0 => {
                    transactions.push(txn);
                    i += RECORD_STRIDE;
                }
                _ => i += 1,
            }
        } else {
            i += 1;
        }
    }

    transactions
}

fn find_section(fragments: &[String]) -> Option<usize> {
    fragments.iter().position(|t| {
        t.contains("PREGLED SVIH VAŠIH TRANSAKCIJA") || t.contains("PREGLED VAŠIH TRANSAKCIJA")
    })
}

/// Table data begins after the last column label near the section header.
/// The label row repeats `ISPLATE`/`UPLATE` per column, hence last.
fn find_data_start(fragments: &[String], section_start: usize) -> usize {
    let mut data_start = section_start;
    let window_end = (section_start + HEADER_WINDOW).min(fragments.len());

    for j in section_start..window_end {
        if COLUMN_LABELS.contains(&fragments[j].as_str()) {
            data_start = j + 1;
        }
    }

    data_start
}

fn decode_at(fragments: &[String], start: usize) -> Option<Transaction> {
    // a record needs at least two fragments after the serial
    if start + 2 >= fragments.len() {
        return None;
    }

    let mut txn = Transaction {
        serial_no: fragments[start].clone(),
        ..Transaction::default()
    };

    if fragments[start + 1].contains("FT") {
        decode_foreign(fragments, start, &mut txn);
    } else {
        decode_domestic(fragments, start + 1, &mut txn);
    }

    Some(txn)
}

/// Domestic layout: booking date, availability date, purpose, payee,
/// reference, then one or two amount columns.
fn decode_domestic(fragments: &[String], mut idx: usize, txn: &mut Transaction) {
    // booking date doubles as the user date in this layout
    if let Some(text) = fragments.get(idx) {
        if let Some(m) = DATE.find(text) {
            txn.posted = parse_date(m.as_str());
            txn.user = txn.posted;
            idx += 1;
        }
    }

    if let Some(text) = fragments.get(idx) {
        if let Some(m) = DATE.find(text) {
            txn.available = parse_date(m.as_str());
            idx += 1;
        }
    }

    // purpose row is mixed-case free text, never a date or a reference
    if let Some(text) = fragments.get(idx) {
        if !DATE_PREFIX.is_match(text) && !FT_PREFIX.is_match(text) && !is_upper(text) {
            txn.purpose = Some(truncate_chars(text, PURPOSE_MAX_CHARS));
            idx += 1;
        }
    }

    // payee row is all caps; bank names route to the bank field
    if let Some(text) = fragments.get(idx) {
        if PAYEE_ROW.is_match(text) {
            if text.contains("BANK") {
                txn.payee_bank = Some(text.clone());
            } else {
                txn.payee_name = Some(text.clone());
            }
            idx += 1;
        }
    }

    // reference: an embedded FT token (possibly prefixed, "PBZ:PBO:FT…"),
    // or the whole fragment when it is reference-shaped
    if let Some(text) = fragments.get(idx) {
        if text.contains("FT") {
            if let Some(m) = FT_TOKEN.find(text) {
                txn.fitid = Some(m.as_str().to_string());
                txn.payee_refnumber = txn.fitid.clone();
                idx += 1;
            }
        } else if FT_REF_PREFIX.is_match(text) || DASHED_REF.is_match(text) {
            txn.fitid = Some(text.clone());
            txn.payee_refnumber = Some(text.clone());
            idx += 1;
        }
    }

    // amount columns: debit first, credit second, stop at the first
    // fragment that is not purely numeric
    let mut debit = None;
    let mut credit = None;
    for slot in 0..2 {
        let Some(text) = fragments.get(idx) else { break };
        if !AMOUNT_ONLY.is_match(text) {
            break;
        }
        let value = parse_amount(text).filter(|v| *v > 0);
        if slot == 0 {
            debit = value;
        } else {
            credit = value;
        }
        idx += 1;
    }

    match (debit, credit) {
        // a figure in both columns is treated as a debit
        (Some(amount), _) => {
            txn.benefit = Benefit::Debit;
            txn.amount = amount;
        }
        (None, Some(amount)) => {
            txn.benefit = Benefit::Credit;
            txn.amount = amount;
        }
        (None, None) => {}
    }
}

/// Foreign-exchange layout: one composite description block, then a date
/// fragment, then an amount fragment with possibly concatenated figures.
fn decode_foreign(fragments: &[String], start: usize, txn: &mut Transaction) {
    let block = fragments[start + 1].as_str();

    if let Some(m) = FX_FT_TOKEN.find(block) {
        txn.fitid = Some(m.as_str().to_string());
        txn.payee_refnumber = txn.fitid.clone();
    }

    // first free-text line serves as the purpose until a labeled field wins
    for line in block.split('\n') {
        if !line.contains("FT") && line.chars().count() > 5 {
            txn.purpose = Some(truncate_chars(line, PURPOSE_MAX_CHARS));
            break;
        }
    }

    if let Some(cap) = FX_BANK.captures(block).and_then(|c| c.get(1)) {
        txn.payee_bank = Some(cap.as_str().trim().to_string());
    }

    if let Some(cap) = FX_PAYER.captures(block).and_then(|c| c.get(1)) {
        let mut name = cap.as_str().trim().to_string();
        // numbered orderer lists keep only their first item
        if name.contains("1/") {
            name = FX_ENUM_LEAD.replace(&name, "").into_owned();
            name = FX_ENUM_TAIL.replace(&name, "").into_owned();
        }
        txn.payee_name = Some(truncate_chars(&name, PURPOSE_MAX_CHARS));
    }

    // Osnov overrides the line-scan purpose, Opis overrides both
    if let Some(cap) = OSNOV_LINE.captures(block).and_then(|c| c.get(1)) {
        let osnov = RRN_TAIL.replace(cap.as_str().trim(), "");
        let osnov = osnov.trim();
        txn.purpose = if osnov.is_empty() {
            None
        } else {
            Some(truncate_chars(osnov, PURPOSE_MAX_CHARS))
        };
    }

    if let Some(cap) = OPIS_LINE.captures(block).and_then(|c| c.get(1)) {
        let opis = IZNOS_TAIL.replace(cap.as_str().trim(), "");
        let opis = opis.trim();
        if !opis.is_empty() {
            txn.purpose = Some(truncate_chars(opis, PURPOSE_MAX_CHARS));
        }
    }

    if let Some(text) = fragments.get(start + 2) {
        let mut dates = DATE.find_iter(text).map(|m| parse_date(m.as_str()));
        if let Some(first) = dates.next() {
            txn.posted = first;
            txn.user = first;
            txn.available = first;
        }
        if let Some(second) = dates.next() {
            txn.available = second;
        }
    }

    // figures may be concatenated ("4.500,00446.748,75"); the strict
    // thousands pattern splits them, the first positive one is the amount
    if let Some(text) = fragments.get(start + 3) {
        for m in FX_AMOUNT.find_iter(text) {
            if let Some(amount) = parse_amount(m.as_str()).filter(|v| *v > 0) {
                txn.amount = amount;
                txn.benefit = Benefit::Credit;
                break;
            }
        }
    }
}
