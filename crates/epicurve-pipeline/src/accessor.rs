//! Bounds-checked column access
//!
//! Smoothing, lag and moving-average passes all look at neighbouring indices.
//! Every such lookup goes through [`offset`] so that an index outside the
//! column is an explicit `None` instead of a silent zero or a panic.

/// Value at `index + delta`, if that position exists
#[inline]
#[must_use]
pub fn offset(values: &[f64], index: usize, delta: isize) -> Option<f64> {
    index
        .checked_add_signed(delta)
        .and_then(|i| values.get(i).copied())
}

/// Value at `index + delta`, NaN when out of range
#[inline]
#[must_use]
pub fn offset_or_nan(values: &[f64], index: usize, delta: isize) -> f64 {
    offset(values, index, delta).unwrap_or(f64::NAN)
}

/// Cumulative value `lookback` days before `index`
///
/// The day before the first day counts as zero, so the first difference equals
/// the first cumulative value. Anything earlier is unknown.
///
/// Because of that zero, a window of `n` first yields a value at index `n - 1`;
/// this keeps a one-day window equal to the daily delta on the first day.
#[inline]
#[must_use]
pub fn cumulative_before(values: &[f64], index: usize, lookback: usize) -> f64 {
    match index.checked_sub(lookback) {
        Some(i) => values.get(i).copied().unwrap_or(f64::NAN),
        None if lookback - index == 1 => 0.0,
        None => f64::NAN,
    }
}
