//! Configuration for progression searches and derived queries.
//!
//! The core does not read files or the environment; callers build a
//! `ProgressionConfig` directly or parse one from JSON and hand it to the
//! progression at construction.

use crate::error::ProgressionError;
use crate::formula::FormulaSpec;
use serde::{Deserialize, Serialize};

/// How `percentage_until_level_up` divides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentageMode {
    /// `floor(experience * 100 / next_floor)` in wide integer arithmetic.
    #[default]
    Fractional,
    /// `(experience / next_floor) * 100`, dividing before scaling.
    ///
    /// Reproduces the reference calculation, which divides before
    /// multiplying and so yields 0 anywhere below the next floor.
    Truncated,
}

/// Bounds for the level floor search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Upper bound of the experience range searched.
    pub max_experience: i64,
    /// Formula evaluations allowed per search phase before giving up.
    pub max_iterations: u32,
}

impl SearchConfig {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 256;
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_experience: i64::MAX,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Full progression configuration.
///
/// # Examples
///
/// ```rust
/// use xpcurve::config::{PercentageMode, ProgressionConfig};
///
/// let config = ProgressionConfig::from_json(
///     r#"{
///         "formula": { "kind": "linear", "experience_per_level": 250 },
///         "search": { "max_experience": 1000000 },
///         "percentage": "truncated"
///     }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.search.max_experience, 1_000_000);
/// assert_eq!(config.search.max_iterations, 256);
/// assert_eq!(config.percentage, PercentageMode::Truncated);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Formula used by `Progression::from_config`.
    pub formula: FormulaSpec,
    pub search: SearchConfig,
    pub percentage: PercentageMode,
}

impl ProgressionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ProgressionError> {
        let config: ProgressionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ProgressionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the search bounds.
    pub fn validate(&self) -> Result<(), ProgressionError> {
        if self.search.max_experience < 0 {
            return Err(ProgressionError::Config(format!(
                "max_experience must be >= 0, got {}",
                self.search.max_experience
            )));
        }
        if self.search.max_iterations == 0 {
            return Err(ProgressionError::Config(
                "max_iterations must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
