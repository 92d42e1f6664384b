//! Canonical text form for solution values.
//!
//! Solutions travel as JSON numbers but are matched against user-entered
//! filter text, so both sides are reduced to one spelling: integers without
//! a fractional part, no negative zero, and exponent notation only outside
//! `[1e-6, 1e21)`.

/// Render `value` in its canonical text form.
pub fn canonical_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }

    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

/// Parse user input as a finite number.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Canonicalise numeric text; anything that is not a finite number is only trimmed.
pub fn normalize_number_text(text: &str) -> String {
    match parse_number(text) {
        Some(value) => canonical_number(value),
        None => text.trim().to_string(),
    }
}
