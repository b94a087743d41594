use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Reads the longest leading decimal literal of `input`, the way spreadsheet
/// exports are usually read by hand: `"1500abc"` is 1500, `"1.000.000"` is 1.
///
/// Returns the value together with the number of bytes consumed, or `None`
/// when the input does not start with a number.
pub fn leading_number(input: &str) -> Option<(f64, usize)> {
    let bytes = input.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    input[..end].parse::<f64>().ok().map(|value| (value, end))
}

/// Best-effort amount parse: anything that is not a usable non-negative
/// number becomes zero.
pub fn parse_amount_lenient(input: &str) -> f64 {
    parse_amount_checked(input).0
}

/// Same reading as [`parse_amount_lenient`], plus whether the whole cell was
/// consumed. A blank cell reads as an exact zero.
pub fn parse_amount_checked(input: &str) -> (f64, bool) {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return (0.0, true);
    }
    match leading_number(trimmed) {
        Some((value, consumed)) if value.is_finite() && value >= 0.0 => {
            (value, consumed == trimmed.len())
        }
        _ => (0.0, false),
    }
}

pub fn parse_date_lenient(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// Absolute distance in whole days. Both sides are calendar dates, so the
/// rounded-up day count is exact.
pub fn days_between(reference: NaiveDate, date: NaiveDate) -> u32 {
    let days = (reference - date).num_days().unsigned_abs();
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Formats an amount as Indonesian Rupiah without decimals, e.g. `Rp 1.250.000`.
pub fn format_idr(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}
