//! Soft numeric coercion of form text.
//!
//! Every field of the input set arrives as text. Coercion never fails: blank,
//! non-numeric, negative and non-finite values all become zero. A leading
//! numeric prefix is honoured, so `"12abc"` reads as 12. Amounts saturate at
//! [`MAX_AMOUNT`] so sums over a long projection stay finite.

/// Ceiling for any single coerced amount.
pub const MAX_AMOUNT: f64 = 1.0e12;

/// Parse a currency or rate field into a non-negative finite amount.
pub fn parse_amount(raw: &str) -> f64 {
    let prefix = decimal_prefix(raw.trim());
    match prefix.parse::<f64>() {
        Ok(v) if v.is_finite() => v.clamp(0.0, MAX_AMOUNT),
        _ => 0.0,
    }
}

/// Parse a whole-number field (hours, semester counts). Any fractional part is
/// dropped; negatives clamp to zero.
pub fn parse_whole(raw: &str) -> u32 {
    let prefix = integer_prefix(raw.trim());
    match prefix.parse::<i64>() {
        Ok(v) if v > 0 => u32::try_from(v).unwrap_or(u32::MAX),
        Ok(_) => 0,
        // Digit runs too long for i64 are still positive integers.
        Err(_) if prefix.bytes().any(|b| b.is_ascii_digit()) && !prefix.starts_with('-') => {
            u32::MAX
        }
        Err(_) => 0,
    }
}

/// Interpret the job flag: only an explicit "yes" counts.
pub fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("yes")
}

fn integer_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return "";
    }
    &s[..end]
}

fn decimal_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            digits += 1;
        }
        end = frac_end;
    }
    if digits == 0 {
        return "";
    }
    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
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
    &s[..end]
}
