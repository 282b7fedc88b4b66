//! Fixed-decimal formatting for rates and proportions.
//!
//! Values are scaled and rounded into an integer before printing, so two
//! calls with the same value and precision always render identically
//! (`0.125` at two decimals is `"0.13"`, never `"0.12"`).

/// Round `v` to `decimals` places, half away from zero.
pub fn round_to(v: f64, decimals: u32) -> f64 {
    if !v.is_finite() {
        return v;
    }
    let scale = 10_f64.powi(decimals.min(9) as i32);
    (v * scale).round() / scale
}

/// `v` with exactly `decimals` fractional digits.
pub fn fixed(v: f64, decimals: usize) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Inf".to_string() } else { "-Inf".to_string() };
    }

    let decimals = decimals.min(9);
    let scale = 10_i64.pow(decimals as u32);
    let scaled = (v * scale as f64).round();
    if scaled.abs() >= i64::MAX as f64 {
        return if v < 0.0 { "-Inf".to_string() } else { "Inf".to_string() };
    }

    let scaled = scaled as i64;
    let abs = scaled.unsigned_abs();
    let int_part = abs / scale as u64;
    let frac_part = abs % scale as u64;

    let sign = if scaled < 0 { "-" } else { "" };
    if decimals == 0 {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part:0decimals$}")
    }
}

/// A `[0, 1]` ratio as a percentage string with a trailing `%`.
pub fn percent(ratio: f64, decimals: usize) -> String {
    format!("{}%", fixed(ratio * 100.0, decimals))
}
