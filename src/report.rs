//! Progress report module.
//!
//! Contains the `ProgressReport` type, a read-only breakdown of every value
//! derived from a progression at one point in time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Derived values of a progression, computed once.
///
/// This is read-only, cloneable and serializable, so it can be logged,
/// sent to a client or stored alongside a save without carrying the
/// formula itself.
///
/// # Examples
///
/// ```rust
/// use xpcurve::Progression;
/// use xpcurve::formula::LinearFormula;
///
/// let progression = Progression::with_experience(LinearFormula::new(100).unwrap(), 350).unwrap();
/// let report = progression.report().unwrap();
///
/// assert_eq!(report.level, 3);
/// assert_eq!(report.level_floor, 300);
/// assert_eq!(report.next_level_floor, 400);
/// assert_eq!(report.experience_until_level_up, 50);
/// assert_eq!(report.percentage_until_level_up, 87);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressReport {
    /// Description of the formula in use.
    pub formula: String,

    /// Total accumulated experience.
    pub experience: i64,

    /// Rounded current level.
    pub level: i64,

    /// Unrounded formula output at the current experience.
    pub expected_level: f64,

    /// Experience at which the current level starts.
    pub level_floor: i64,

    /// Experience at which the next level starts.
    pub next_level_floor: i64,

    pub experience_until_level_up: i64,

    /// Integer percentage in `[0, 100]`.
    pub percentage_until_level_up: i64,
}

impl ProgressReport {
    /// Experience gained since the floor of the current level.
    pub fn experience_into_level(&self) -> i64 {
        self.experience - self.level_floor
    }
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level {} ({} xp, {} to next, {}%)",
            self.level,
            self.experience,
            self.experience_until_level_up,
            self.percentage_until_level_up
        )
    }
}
