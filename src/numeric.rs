//! Numeric helpers for level rounding and progress percentages.
//!
//! Formulas produce `f64` levels while experience is integral. These helpers
//! keep the conversions in one place so every query rounds and divides the
//! same way.

use crate::config::PercentageMode;
use crate::error::ProgressionError;

/// Round a formula output to an integer level, halves away from zero.
///
/// # Examples
///
/// ```rust
/// use xpcurve::numeric::round_level;
///
/// assert_eq!(round_level(2.5).unwrap(), 3);
/// assert_eq!(round_level(-2.5).unwrap(), -3);
/// assert_eq!(round_level(2.49).unwrap(), 2);
/// ```
pub fn round_level(value: f64) -> Result<i64, ProgressionError> {
    let rounded = value.round();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return Err(ProgressionError::Internal(format!(
            "formula produced a level that is not representable: {}",
            value
        )));
    }
    Ok(rounded as i64)
}

/// Percentage of `experience` relative to `next_floor`, checked to lie in
/// `[0, 100]`.
///
/// # Examples
///
/// ```rust
/// use xpcurve::config::PercentageMode;
/// use xpcurve::numeric::percentage;
///
/// assert_eq!(percentage(350, 400, PercentageMode::Fractional).unwrap(), 87);
/// assert_eq!(percentage(350, 400, PercentageMode::Truncated).unwrap(), 0);
/// ```
pub fn percentage(
    experience: i64,
    next_floor: i64,
    mode: PercentageMode,
) -> Result<i64, ProgressionError> {
    if next_floor <= 0 {
        return Err(ProgressionError::Internal(format!(
            "next level floor must be positive, got {}",
            next_floor
        )));
    }

    let percent = match mode {
        PercentageMode::Fractional => {
            let scaled = i128::from(experience) * 100 / i128::from(next_floor);
            i64::try_from(scaled).unwrap_or(i64::MAX)
        }
        PercentageMode::Truncated => (experience / next_floor).saturating_mul(100),
    };

    if !(0..=100).contains(&percent) {
        return Err(ProgressionError::Internal(format!(
            "percentage {} outside [0, 100] (experience {}, next floor {})",
            percent, experience, next_floor
        )));
    }
    Ok(percent)
}
