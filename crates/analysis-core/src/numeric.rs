//! Shared numeric helpers used by every indicator and scorer.

/// The single "numeric-or-absent" predicate: a field counts as a number only
/// when it is present and finite.
#[inline]
pub fn numeric(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Round to a fixed number of decimal places.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Round to cents, the precision every indicator series is reported at.
#[inline]
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation around a caller-supplied center.
pub fn population_std_dev(data: &[f64], center: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let variance = data.iter().map(|x| (x - center).powi(2)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}
