//! Error types for progression queries and transitions.
//!
//! All errors that can occur while building, querying or transforming a
//! progression are represented by the `ProgressionError` enum.

use thiserror::Error;

/// Errors that can occur during progression operations.
///
/// # Examples
///
/// ```rust
/// use xpcurve::ProgressionError;
///
/// let err = ProgressionError::InvalidArgument { name: "amount", value: -5 };
/// assert_eq!(err.to_string(), "Invalid argument amount: -5 (must be >= 0)");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProgressionError {
    /// A progression was built without a level formula.
    #[error("Missing level formula")]
    MissingFormula,

    /// A negative experience or level was passed where a non-negative one
    /// is required.
    #[error("Invalid argument {name}: {value} (must be >= 0)")]
    InvalidArgument { name: &'static str, value: i64 },

    /// A formula definition was rejected (zero step, unsorted table, ...).
    #[error("Invalid formula: {0}")]
    InvalidFormula(String),

    /// An internal invariant was violated.
    ///
    /// This signals a logic or formula defect rather than bad input, e.g.
    /// removing more experience than is held or a percentage outside
    /// `[0, 100]`.
    #[error("Internal error: {0}")]
    Internal(String),

    /// The requested level lies below `formula(0)`.
    #[error("Level {level} is below the formula floor {floor}")]
    LevelBelowFloor { level: i64, floor: f64 },

    /// The formula never evaluates to exactly the requested level within
    /// `[0, max_experience]`.
    #[error("Level {level} is not reachable with experience <= {max_experience}")]
    LevelUnreachable { level: i64, max_experience: i64 },

    /// The formula jumps over the requested level: experience `below`
    /// evaluates under it and `below + 1` (`above`) over it.
    #[error("Level {level} is skipped by the formula between experience {below} and {above}")]
    LevelSkipped { level: i64, below: i64, above: i64 },

    /// The search did not converge within the configured iteration budget.
    ///
    /// No phase of a search over `i64` needs more than 64 evaluations, so
    /// this only fires when `max_iterations` is set below that.
    #[error("Search for level {level} gave up after {iterations} iterations")]
    SearchExhausted { level: i64, iterations: u32 },

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ProgressionError {
    pub(crate) fn invalid_argument(name: &'static str, value: i64) -> Self {
        Self::InvalidArgument { name, value }
    }

    /// True for errors caused by caller input rather than a broken invariant.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            ProgressionError::InvalidArgument { .. } | ProgressionError::InvalidFormula(_)
        )
    }

    /// True for internal invariant violations.
    pub fn is_internal(&self) -> bool {
        matches!(self, ProgressionError::Internal(_))
    }
}

impl From<serde_json::Error> for ProgressionError {
    fn from(err: serde_json::Error) -> Self {
        ProgressionError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProgressionError::invalid_argument("level", -1);
        assert!(err.to_string().contains("level"));
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn test_error_classification() {
        assert!(ProgressionError::invalid_argument("amount", -3).is_invalid_argument());
        assert!(ProgressionError::Internal("negative".into()).is_internal());
        assert!(!ProgressionError::MissingFormula.is_internal());
    }

    #[test]
    fn test_unreachable_display() {
        let err = ProgressionError::LevelUnreachable {
            level: 7,
            max_experience: 1000,
        };
        let display = err.to_string();
        assert!(display.contains("7"));
        assert!(display.contains("1000"));
    }

    #[test]
    fn test_skipped_display() {
        let err = ProgressionError::LevelSkipped {
            level: 5,
            below: 29,
            above: 30,
        };
        assert_eq!(
            err.to_string(),
            "Level 5 is skipped by the formula between experience 29 and 30"
        );
    }

    #[test]
    fn test_json_error_maps_to_config() {
        let err: ProgressionError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ProgressionError::Config(_)));
    }
}
