//! Mathematical utility functions for funnel metrics
//!
//! This module provides standardised percentage, mean and rounding helpers
//! with proper zero-division handling for use across the analysis module.

/// Calculate percentage safely for u64 values, returning 0.0 if total is zero.
///
/// # Examples
/// ```
/// use funnel_watch::utils::math::safe_percentage;
///
/// assert_eq!(safe_percentage(50, 100), 50.0);
/// assert_eq!(safe_percentage(1, 4), 25.0);
/// assert_eq!(safe_percentage(0, 100), 0.0);
/// assert_eq!(safe_percentage(50, 0), 0.0);  // Zero-division guard
/// ```
#[inline]
pub fn safe_percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Arithmetic mean, returning 0.0 for an empty input
///
/// # Examples
/// ```
/// use funnel_watch::utils::math::mean;
///
/// assert_eq!(mean([10.0, 45.0, 5.0]), 20.0);
/// assert_eq!(mean(Vec::<f64>::new()), 0.0);
/// ```
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Round to a fixed number of decimal places
///
/// # Examples
/// ```
/// use funnel_watch::utils::math::round_to;
///
/// assert_eq!(round_to(33.33333, 2), 33.33);
/// assert_eq!(round_to(66.666, 2), 66.67);
/// ```
#[inline]
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
