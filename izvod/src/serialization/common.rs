/// Formats a minor-unit value (para) with two decimals.
pub fn format_minor_units<T>(value: T, decimal_separator: char) -> String
where
    T: Into<i128>,
{
    let v: i128 = value.into();
    let sign = if v < 0 { "-" } else { "" };
    let v = v.unsigned_abs();
    let units = v / 100;
    let frac = v % 100;

    format!("{sign}{units}{decimal_separator}{frac:02}")
}

/// Formats a Serbian account number as `XXX-XXXXXXXXXXXXX-XX` when the
/// digit-cleaned value has exactly 18 digits; anything else is returned
/// unchanged.
pub(super) fn format_account_number(account: &str) -> String {
    let digits: String = account.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 18 {
        format!("{}-{}-{}", &digits[..3], &digits[3..16], &digits[16..])
    } else {
        account.to_string()
    }
}
