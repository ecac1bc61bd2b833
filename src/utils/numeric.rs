//! Finite-number helpers shared by the forecast and rule passes.

/// Collapses NaN and infinities to `0.0`.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `numerator / denominator`, or `0.0` when the denominator is not positive.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        finite_or_zero(numerator / denominator)
    } else {
        0.0
    }
}

/// Percentage of `part` over `whole`, sanitized like [`ratio`].
pub fn percentage(part: f64, whole: f64) -> f64 {
    ratio(part, whole) * 100.0
}

/// Rounds to two decimals for presentation.
pub fn round2(value: f64) -> f64 {
    finite_or_zero((value * 100.0).round() / 100.0)
}
