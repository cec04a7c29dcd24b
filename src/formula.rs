//! Level formulas module.
//!
//! A formula maps accumulated experience to a level. Formulas are stateless
//! and deterministic: the same experience always produces the same level,
//! and the level never decreases as experience grows. The progression core
//! evaluates formulas forwards and inverts them with the level floor search.

use crate::error::ProgressionError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Trait for experience → level formulas.
///
/// Implementations must be monotonic non-decreasing and total over the
/// non-negative integers. Any `Fn(i64) -> f64` closure that is
/// `Send + Sync` is a formula.
///
/// # Examples
///
/// ```rust
/// use xpcurve::LevelFormula;
///
/// let formula = |experience: i64| (experience / 100) as f64;
/// assert_eq!(formula.level_at(350), 3.0);
/// ```
pub trait LevelFormula: Send + Sync {
    /// Level reached with `experience` accumulated. May be fractional;
    /// callers round when they need an integer level.
    fn level_at(&self, experience: i64) -> f64;

    /// Human-readable description used in logs and reports.
    fn describe(&self) -> String {
        String::from("custom formula")
    }
}

impl<F> LevelFormula for F
where
    F: Fn(i64) -> f64 + Send + Sync,
{
    fn level_at(&self, experience: i64) -> f64 {
        self(experience)
    }
}

/// One level per fixed amount of experience: `level = experience / step`.
///
/// # Examples
///
/// ```rust
/// use xpcurve::formula::{LevelFormula, LinearFormula};
///
/// let formula = LinearFormula::new(100).unwrap();
/// assert_eq!(formula.level_at(299), 2.0);
/// assert_eq!(formula.level_at(300), 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearFormula {
    experience_per_level: i64,
}

impl LinearFormula {
    /// Create a linear formula. `experience_per_level` must be positive.
    pub fn new(experience_per_level: i64) -> Result<Self, ProgressionError> {
        if experience_per_level <= 0 {
            return Err(ProgressionError::InvalidFormula(format!(
                "experience per level must be positive, got {}",
                experience_per_level
            )));
        }
        Ok(Self {
            experience_per_level,
        })
    }

    pub fn experience_per_level(&self) -> i64 {
        self.experience_per_level
    }
}

impl LevelFormula for LinearFormula {
    fn level_at(&self, experience: i64) -> f64 {
        (experience / self.experience_per_level) as f64
    }

    fn describe(&self) -> String {
        format!("linear ({} xp/level)", self.experience_per_level)
    }
}

/// Threshold table: the level is the number of thresholds already reached.
///
/// With thresholds `[100, 250, 450]`, experience below 100 is level 0,
/// 100..250 is level 1, and so on. Thresholds must be strictly ascending
/// and non-negative.
///
/// # Examples
///
/// ```rust
/// use xpcurve::formula::{LevelFormula, TableFormula};
///
/// let formula = TableFormula::new(vec![100, 250, 450]).unwrap();
/// assert_eq!(formula.level_at(99), 0.0);
/// assert_eq!(formula.level_at(250), 2.0);
/// assert_eq!(formula.level_at(10_000), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFormula {
    thresholds: Vec<i64>,
}

impl TableFormula {
    pub fn new(thresholds: Vec<i64>) -> Result<Self, ProgressionError> {
        if let Some(first) = thresholds.first() {
            if *first < 0 {
                return Err(ProgressionError::InvalidFormula(format!(
                    "thresholds must be non-negative, got {}",
                    first
                )));
            }
        }
        if let Some(pair) = thresholds.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ProgressionError::InvalidFormula(format!(
                "thresholds must be strictly ascending, got {} then {}",
                pair[0], pair[1]
            )));
        }
        Ok(Self { thresholds })
    }

    /// The highest level this table can express.
    pub fn max_level(&self) -> i64 {
        self.thresholds.len() as i64
    }
}

impl LevelFormula for TableFormula {
    fn level_at(&self, experience: i64) -> f64 {
        self.thresholds.partition_point(|t| *t <= experience) as f64
    }

    fn describe(&self) -> String {
        format!("table ({} levels)", self.thresholds.len())
    }
}

/// Polynomial curve where the experience needed for level `L` grows as
/// `base * L^exponent`: the level is the largest `L` with
/// `base * L^exponent <= experience`, i.e. `floor((experience / base)^(1 / exponent))`
/// computed without `powf` rounding at level boundaries.
///
/// # Examples
///
/// ```rust
/// use xpcurve::formula::{LevelFormula, PowerFormula};
///
/// let formula = PowerFormula::new(100.0, 2.0).unwrap();
/// assert_eq!(formula.level_at(899), 2.0);
/// assert_eq!(formula.level_at(900), 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerFormula {
    base: f64,
    exponent: f64,
}

impl PowerFormula {
    /// Create a power formula. Both `base` and `exponent` must be positive
    /// and finite.
    pub fn new(base: f64, exponent: f64) -> Result<Self, ProgressionError> {
        if !(base.is_finite() && base > 0.0) {
            return Err(ProgressionError::InvalidFormula(format!(
                "base must be positive, got {}",
                base
            )));
        }
        if !(exponent.is_finite() && exponent > 0.0) {
            return Err(ProgressionError::InvalidFormula(format!(
                "exponent must be positive, got {}",
                exponent
            )));
        }
        Ok(Self { base, exponent })
    }

    /// Experience at which `level` starts.
    pub fn threshold(&self, level: f64) -> f64 {
        // powi stays exact while the result fits the f64 mantissa.
        let grown = if self.exponent.fract() == 0.0 && self.exponent <= i32::MAX as f64 {
            level.powi(self.exponent as i32)
        } else {
            level.powf(self.exponent)
        };
        self.base * grown
    }
}

impl LevelFormula for PowerFormula {
    fn level_at(&self, experience: i64) -> f64 {
        let experience = experience.max(0) as f64;
        let mut level = (experience / self.base).powf(1.0 / self.exponent).floor();

        // The root estimate can land one off either side of a boundary.
        // Past 2^53 a step of 1.0 no longer changes the level, so stop there.
        while level > 0.0 && level - 1.0 != level && self.threshold(level) > experience {
            level -= 1.0;
        }
        while level + 1.0 != level && self.threshold(level + 1.0) <= experience {
            level += 1.0;
        }
        level
    }

    fn describe(&self) -> String {
        format!("power ({} * level^{})", self.base, self.exponent)
    }
}

/// Serializable description of a built-in formula.
///
/// # Examples
///
/// ```rust
/// use xpcurve::formula::{FormulaSpec, LevelFormula};
///
/// let spec: FormulaSpec =
///     serde_json::from_str(r#"{"kind":"linear","experience_per_level":100}"#).unwrap();
/// let formula = spec.build().unwrap();
/// assert_eq!(formula.level_at(300), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormulaSpec {
    Linear { experience_per_level: i64 },
    Table { thresholds: Vec<i64> },
    Power { base: f64, exponent: f64 },
}

impl FormulaSpec {
    /// Validate the parameters and build a shareable formula.
    pub fn build(&self) -> Result<Arc<dyn LevelFormula>, ProgressionError> {
        let formula: Arc<dyn LevelFormula> = match self {
            FormulaSpec::Linear {
                experience_per_level,
            } => Arc::new(LinearFormula::new(*experience_per_level)?),
            FormulaSpec::Table { thresholds } => Arc::new(TableFormula::new(thresholds.clone())?),
            FormulaSpec::Power { base, exponent } => Arc::new(PowerFormula::new(*base, *exponent)?),
        };
        Ok(formula)
    }
}

impl Default for FormulaSpec {
    fn default() -> Self {
        FormulaSpec::Linear {
            experience_per_level: 100,
        }
    }
}
