//! Level floor search.
//!
//! Inverts a monotonic formula: finds the smallest experience whose formula
//! value equals a target level. The search runs in three phases:
//!
//! ```text
//! [bracket] → [bisect to a hit] → [bisect to the plateau floor]
//! ```
//!
//! 1. **Bracket**: probe experience 1, 2, 4, ... (capped at
//!    `max_experience`) until the formula reaches the target.
//! 2. **Hit**: binary search the bracket until some experience evaluates to
//!    exactly the target level.
//! 3. **Floor**: many experience values share a level (a plateau); narrow
//!    the range between the last value below the target and the hit until
//!    the first value on the plateau remains.
//!
//! Throughout, `formula(low) < target` holds, so the result is the floor of
//! the plateau and never negative.
//!
//! Formulas are non-decreasing, so the target always lies above `low` and
//! at or below `high`; the search never needs to test which side of the
//! bracket the formula approaches from.

use crate::config::SearchConfig;
use crate::error::ProgressionError;
use crate::formula::LevelFormula;
use log::{debug, trace, warn};

/// Find the smallest experience `e` in `[0, config.max_experience]` with
/// `formula(e) == level`.
///
/// # Errors
///
/// * `LevelBelowFloor` if `level < formula(0)`
/// * `LevelUnreachable` if the formula never reaches `level` within
///   `max_experience`
/// * `LevelSkipped` if the formula jumps from below `level` to above it
///   between two adjacent experience values
/// * `SearchExhausted` if a phase needs more than `max_iterations`
///   evaluations; each phase needs at most 64, so only a budget below that
///   can trigger it
///
/// # Examples
///
/// ```rust
/// use xpcurve::config::SearchConfig;
/// use xpcurve::search::experience_for_level;
///
/// let formula = |experience: i64| (experience / 100) as f64;
/// let floor = experience_for_level(&formula, 3, &SearchConfig::default()).unwrap();
/// assert_eq!(floor, 300);
/// ```
pub fn experience_for_level(
    formula: &dyn LevelFormula,
    level: i64,
    config: &SearchConfig,
) -> Result<i64, ProgressionError> {
    let target = level as f64;
    let max = config.max_experience.max(0);

    let floor_level = formula.level_at(0);
    if floor_level == target {
        return Ok(0);
    }
    if target < floor_level {
        return Err(ProgressionError::LevelBelowFloor {
            level,
            floor: floor_level,
        });
    }

    let (low, high) = bracket(formula, level, max, config)?;
    let (low, hit) = find_hit(formula, level, low, high, config)?;
    let floor = plateau_floor(formula, level, low, hit, config)?;

    debug!(
        "level {} floor is {} ({})",
        level,
        floor,
        formula.describe()
    );
    Ok(floor)
}

/// Grow `high` geometrically until `formula(high) >= level`.
///
/// Returns `(low, high)` with `formula(low) < level <= formula(high)`.
fn bracket(
    formula: &dyn LevelFormula,
    level: i64,
    max: i64,
    config: &SearchConfig,
) -> Result<(i64, i64), ProgressionError> {
    let target = level as f64;
    let mut low = 0;
    let mut high = max.min(1);
    let mut iterations = 0;

    loop {
        iterations += 1;
        if iterations > config.max_iterations {
            return Err(exhausted(level, iterations - 1));
        }

        let value = formula.level_at(high);
        trace!("bracket probe {} -> {}", high, value);
        if value >= target {
            return Ok((low, high));
        }
        if high >= max {
            warn!(
                "level {} not reached by {} within {} experience",
                level,
                formula.describe(),
                max
            );
            return Err(ProgressionError::LevelUnreachable {
                level,
                max_experience: max,
            });
        }
        low = high;
        high = high.saturating_mul(2).min(max);
    }
}

/// Binary search `(low, high]` for an experience that evaluates to exactly
/// `level`.
///
/// Returns `(low, hit)` where `low` is the tightest known value below the
/// target.
fn find_hit(
    formula: &dyn LevelFormula,
    level: i64,
    mut low: i64,
    mut high: i64,
    config: &SearchConfig,
) -> Result<(i64, i64), ProgressionError> {
    let target = level as f64;
    if formula.level_at(high) == target {
        return Ok((low, high));
    }

    // formula(high) overshoots from here on.
    let mut iterations = 0;
    while high - low > 1 {
        iterations += 1;
        if iterations > config.max_iterations {
            return Err(exhausted(level, iterations - 1));
        }

        let mid = low + (high - low) / 2;
        let value = formula.level_at(mid);
        trace!("hit probe {} -> {}", mid, value);
        if value == target {
            return Ok((low, mid));
        }
        if value > target {
            high = mid;
        } else {
            low = mid;
        }
    }

    // Adjacent values straddle the target: the formula skips this level.
    warn!(
        "{} skips level {} between experience {} and {}",
        formula.describe(),
        level,
        low,
        high
    );
    Err(ProgressionError::LevelSkipped {
        level,
        below: low,
        above: high,
    })
}

/// Narrow `(low, hit]` to the first experience on the plateau of `level`.
fn plateau_floor(
    formula: &dyn LevelFormula,
    level: i64,
    mut low: i64,
    mut hit: i64,
    config: &SearchConfig,
) -> Result<i64, ProgressionError> {
    let target = level as f64;
    let mut iterations = 0;

    while hit - low > 1 {
        iterations += 1;
        if iterations > config.max_iterations {
            return Err(exhausted(level, iterations - 1));
        }

        let mid = low + (hit - low) / 2;
        let value = formula.level_at(mid);
        trace!("floor probe {} -> {}", mid, value);
        if value == target {
            hit = mid;
        } else {
            low = mid;
        }
    }
    Ok(hit)
}

fn exhausted(level: i64, iterations: u32) -> ProgressionError {
    warn!(
        "search for level {} exhausted after {} iterations",
        level, iterations
    );
    ProgressionError::SearchExhausted { level, iterations }
}
