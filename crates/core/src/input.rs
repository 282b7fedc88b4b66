//! Numeric coercion for form-backed fields.
//!
//! Every editable number in an experiment arrives as raw text. None of these
//! helpers fail: unparsable input resolves to a caller-supplied fallback so a
//! field always holds a renderable value.

/// Parse the leading integer of `raw` (`"12abc"` → 12, `"3.7"` → 3).
///
/// Leading whitespace and a single sign are accepted. Returns `None` when no
/// digits follow, or when the digits overflow `i64`.
pub fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let v = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -v } else { v })
}

/// Schedule counts: anything unparsable or below 1 becomes 1.
pub fn count_or_one(raw: &str) -> u32 {
    positive_or(raw, 1)
}

/// Positive integer, or `fallback` when unparsable or below 1.
pub fn positive_or(raw: &str, fallback: u32) -> u32 {
    match leading_int(raw) {
        Some(v) if v >= 1 => v.min(u32::MAX as i64) as u32,
        _ => fallback,
    }
}

/// Non-negative integer; negatives clamp to 0, unparsable input gives `fallback`.
pub fn non_negative_or(raw: &str, fallback: u32) -> u32 {
    match leading_int(raw) {
        Some(v) => v.clamp(0, u32::MAX as i64) as u32,
        None => fallback,
    }
}

/// Integer clamped into `[min, max]`; unparsable input gives `fallback`.
pub fn clamped_or(raw: &str, fallback: u32, min: u32, max: u32) -> u32 {
    match leading_int(raw) {
        Some(v) => v.clamp(min as i64, max as i64) as u32,
        None => fallback,
    }
}

/// Finite float, or `fallback` for empty, unparsable, `NaN` or infinite input.
pub fn float_or(raw: &str, fallback: f64) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => fallback,
    }
}
