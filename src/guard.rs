//! Numeric sanitization for untrusted classifier fields.
//!
//! The Classifier Service is treated as an untrusted numeric source:
//! confidence and CO₂ impact may arrive negative, out of range, or
//! non-finite. Every function here coerces; none of them reject.
//! A partially broken response must still render.

/// Clamp a raw 0..1 confidence into a whole percentage.
///
/// Non-finite input (NaN, ±Infinity) coerces to 0. The result is
/// always in 0..=100.
pub fn sanitize_confidence(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    (raw.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Floor a raw CO₂ impact estimate at zero kilograms.
///
/// Non-finite input coerces to 0.0. A negative estimate means the
/// upstream model could not price the item; it is not a debt.
pub fn sanitize_impact(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.max(0.0)
    } else {
        0.0
    }
}

/// Render the impact statement shown under the result metrics.
///
/// A zero value renders a qualitative line instead of "0.00kg": the
/// service reports zero when it could not estimate impact, and a
/// literal zero quantity would read as "recycling this does nothing".
pub fn impact_label(value: f64, recyclable: bool) -> String {
    let value = sanitize_impact(value);
    if value > 0.0 {
        if recyclable {
            format!("Diverts ~{value:.2}kg CO₂")
        } else {
            format!("Avoids {value:.2}kg CO₂ when disposed correctly")
        }
    } else if recyclable {
        "Positive recycling impact".to_string()
    } else {
        "Dispose responsibly".to_string()
    }
}

/// Render the carbon-footprint metric chip ("1.20kg CO₂ impact").
///
/// Zero renders as "Trace CO₂ impact" for the same reason as
/// [`impact_label`].
pub fn footprint_label(value: f64) -> String {
    let value = sanitize_impact(value);
    if value > 0.0 {
        format!("{value:.2}kg CO₂ impact")
    } else {
        "Trace CO₂ impact".to_string()
    }
}
