//! # xpcurve - Immutable Experience/Level Progression
//!
//! Models character experience and levels over any monotonic
//! "experience → level" formula:
//! - **Formula-agnostic**: bring a closure or use a built-in curve
//! - **Immutable** snapshots (every transition returns a new value)
//! - **Invertible**: finds the experience floor of any reachable level
//!
//! ## Core Concepts
//!
//! ### Forward and inverse
//!
//! ```text
//! experience ──[LevelFormula]──> level
//! level ──[level floor search]──> minimum experience
//! ```
//!
//! 1. **Formulas** map experience to a level and never decrease
//! 2. **Level floor search** inverts a formula by bracketing and bisection
//! 3. **Progression** combines both into level, next-level and percentage
//!    queries
//!
//! ## Example
//!
//! ```rust
//! use xpcurve::*;
//!
//! let progression = Progression::new(|experience: i64| (experience / 100) as f64);
//! assert_eq!(progression.experience_for_level(3).unwrap(), 300);
//!
//! let progression = progression.add_experience(350).unwrap();
//! assert_eq!(progression.level().unwrap(), 3);
//! assert_eq!(progression.experience_until_level_up().unwrap(), 50);
//!
//! let reset = progression.reset_experience_to_current_level().unwrap();
//! assert_eq!(reset.experience(), 300);
//! assert_eq!(progression.experience(), 350); // unchanged
//! ```
//!
//! ## Modules
//!
//! - [`formula`] - Formula trait and built-in curves
//! - [`search`] - Level floor search
//! - [`progression`] - Progression snapshots
//! - [`report`] - Serializable breakdowns
//! - [`config`] - Search bounds and percentage mode
//! - [`numeric`] - Rounding and percentage helpers
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod formula;
pub mod numeric;
pub mod progression;
pub mod report;
pub mod search;

// Re-export main types for convenience
pub use config::{PercentageMode, ProgressionConfig, SearchConfig};
pub use error::ProgressionError;
pub use progression::{Progression, ProgressionBuilder};
pub use report::ProgressReport;

// Re-export formulas
pub use formula::{FormulaSpec, LevelFormula, LinearFormula, PowerFormula, TableFormula};
