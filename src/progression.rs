//! Progression module.
//!
//! Provides the `Progression` type, an immutable snapshot of accumulated
//! experience bound to a level formula. Queries derive levels from the
//! formula on demand; transitions return a new snapshot and leave the
//! original untouched.

use crate::config::ProgressionConfig;
use crate::error::ProgressionError;
use crate::formula::LevelFormula;
use crate::numeric::{percentage, round_level};
use crate::report::ProgressReport;
use crate::search;
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Immutable experience snapshot bound to a level formula.
///
/// Cloning is cheap: the formula and configuration are shared through
/// `Arc`, and every snapshot derived from this one shares them too.
///
/// # Examples
///
/// ```rust
/// use xpcurve::Progression;
///
/// let start = Progression::new(|experience: i64| (experience / 100) as f64);
/// let later = start.add_experience(350).unwrap();
///
/// assert_eq!(start.experience(), 0);
/// assert_eq!(later.experience(), 350);
/// assert_eq!(later.level().unwrap(), 3);
/// assert_eq!(later.experience_until_level_up().unwrap(), 50);
/// assert_eq!(later.percentage_until_level_up().unwrap(), 87);
/// ```
#[derive(Clone)]
pub struct Progression {
    experience: i64,
    formula: Arc<dyn LevelFormula>,
    config: Arc<ProgressionConfig>,
}

impl Progression {
    /// Create a progression with zero experience and the default config.
    pub fn new<F>(formula: F) -> Self
    where
        F: LevelFormula + 'static,
    {
        Self::with_shared_formula(Arc::new(formula))
    }

    /// Create a progression over an already shared formula.
    pub fn with_shared_formula(formula: Arc<dyn LevelFormula>) -> Self {
        Self {
            experience: 0,
            formula,
            config: Arc::new(ProgressionConfig::default()),
        }
    }

    /// Create a progression starting at `experience`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `experience` is negative.
    pub fn with_experience<F>(formula: F, experience: i64) -> Result<Self, ProgressionError>
    where
        F: LevelFormula + 'static,
    {
        Self::builder().formula(formula).experience(experience).build()
    }

    /// Start a builder; see [`ProgressionBuilder`].
    pub fn builder() -> ProgressionBuilder {
        ProgressionBuilder::default()
    }

    /// Build a progression at zero experience from a config's formula spec.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xpcurve::{Progression, ProgressionConfig};
    ///
    /// let config = ProgressionConfig::from_json(
    ///     r#"{"formula":{"kind":"table","thresholds":[100,250,450]}}"#,
    /// )
    /// .unwrap();
    /// let progression = Progression::from_config(&config).unwrap();
    /// assert_eq!(progression.set_level(2).unwrap().experience(), 250);
    /// ```
    pub fn from_config(config: &ProgressionConfig) -> Result<Self, ProgressionError> {
        config.validate()?;
        Self::builder()
            .shared_formula(config.formula.build()?)
            .config(config.clone())
            .build()
    }

    /// Total accumulated experience.
    pub fn experience(&self) -> i64 {
        self.experience
    }

    pub fn formula(&self) -> &Arc<dyn LevelFormula> {
        &self.formula
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// Unrounded formula output for an arbitrary experience value.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `experience` is negative.
    pub fn expected_level(&self, experience: i64) -> Result<f64, ProgressionError> {
        if experience < 0 {
            return Err(ProgressionError::invalid_argument("experience", experience));
        }
        Ok(self.formula.level_at(experience))
    }

    /// Current level: the formula output rounded half away from zero.
    pub fn level(&self) -> Result<i64, ProgressionError> {
        round_level(self.formula.level_at(self.experience))
    }

    /// Smallest experience at which the formula reaches exactly `level`.
    ///
    /// See [`search::experience_for_level`] for the search and its errors.
    pub fn experience_for_level(&self, level: i64) -> Result<i64, ProgressionError> {
        search::experience_for_level(self.formula.as_ref(), level, &self.config.search)
    }

    /// Experience still needed to reach the next level.
    ///
    /// Negative when the formula disagrees with rounding (a formula that
    /// returns 2.6 at the floor of level 2, for example).
    pub fn experience_until_level_up(&self) -> Result<i64, ProgressionError> {
        let next_floor = self.next_level_floor()?;
        Ok(next_floor - self.experience)
    }

    /// Progress toward the next level floor as an integer percentage.
    ///
    /// The value is `experience / floor(level + 1)` scaled to 100, divided
    /// according to the configured [`PercentageMode`](crate::config::PercentageMode).
    ///
    /// # Errors
    ///
    /// `Internal` if the result falls outside `[0, 100]`, which only a
    /// formula inconsistent with its own rounding can cause.
    pub fn percentage_until_level_up(&self) -> Result<i64, ProgressionError> {
        let next_floor = self.next_level_floor()?;
        percentage(self.experience, next_floor, self.config.percentage)
    }

    /// Signed distance from the floor of `level` to the current experience.
    ///
    /// Positive when the progression is already past that floor.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `level` is negative.
    pub fn experience_from_current_to_level(&self, level: i64) -> Result<i64, ProgressionError> {
        if level < 0 {
            return Err(ProgressionError::invalid_argument("level", level));
        }
        Ok(self.experience - self.experience_for_level(level)?)
    }

    /// New snapshot with `amount` more experience.
    pub fn add_experience(&self, amount: i64) -> Result<Self, ProgressionError> {
        if amount < 0 {
            return Err(ProgressionError::invalid_argument("amount", amount));
        }
        let experience = self.experience.checked_add(amount).ok_or_else(|| {
            ProgressionError::Internal(format!(
                "adding {} to {} overflows",
                amount, self.experience
            ))
        })?;
        debug!("add {} xp: {} -> {}", amount, self.experience, experience);
        self.modified(experience)
    }

    /// New snapshot with `amount` less experience.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a negative `amount`; `Internal` if more
    /// experience is removed than is held.
    pub fn remove_experience(&self, amount: i64) -> Result<Self, ProgressionError> {
        if amount < 0 {
            return Err(ProgressionError::invalid_argument("amount", amount));
        }
        let experience = self.experience - amount;
        debug!("remove {} xp: {} -> {}", amount, self.experience, experience);
        self.modified(experience)
    }

    /// New snapshot sitting exactly on the floor of `level`.
    pub fn set_level(&self, level: i64) -> Result<Self, ProgressionError> {
        if level < 0 {
            return Err(ProgressionError::invalid_argument("level", level));
        }
        let experience = self.experience_for_level(level)?;
        debug!("set level {}: {} -> {}", level, self.experience, experience);
        self.modified(experience)
    }

    /// New snapshot with progress inside the current level discarded.
    pub fn reset_experience_to_current_level(&self) -> Result<Self, ProgressionError> {
        let level = self.level()?;
        let experience = self.experience_for_level(level)?;
        debug!(
            "reset to level {} floor: {} -> {}",
            level, self.experience, experience
        );
        self.modified(experience)
    }

    /// Snapshot of every derived value, for display and debugging.
    pub fn report(&self) -> Result<ProgressReport, ProgressionError> {
        let level = self.level()?;
        Ok(ProgressReport {
            formula: self.formula.describe(),
            experience: self.experience,
            level,
            expected_level: self.formula.level_at(self.experience),
            level_floor: self.experience_for_level(level)?,
            next_level_floor: self.next_level_floor()?,
            experience_until_level_up: self.experience_until_level_up()?,
            percentage_until_level_up: self.percentage_until_level_up()?,
        })
    }

    fn next_level_floor(&self) -> Result<i64, ProgressionError> {
        let level = self.level()?;
        let next = level.checked_add(1).ok_or_else(|| {
            ProgressionError::Internal(format!("level {} has no successor", level))
        })?;
        self.experience_for_level(next)
    }

    /// Every transition funnels through here so the non-negative invariant
    /// is checked in one place.
    fn modified(&self, experience: i64) -> Result<Self, ProgressionError> {
        if experience < 0 {
            return Err(ProgressionError::Internal(format!(
                "experience would become negative: {}",
                experience
            )));
        }
        Ok(Self {
            experience,
            formula: Arc::clone(&self.formula),
            config: Arc::clone(&self.config),
        })
    }
}

impl PartialEq for Progression {
    /// Equal when the experience matches and both share the same formula
    /// instance.
    fn eq(&self, other: &Self) -> bool {
        self.experience == other.experience
            && Arc::as_ptr(&self.formula) as *const () == Arc::as_ptr(&other.formula) as *const ()
            && self.config == other.config
    }
}

impl fmt::Debug for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progression")
            .field("experience", &self.experience)
            .field("formula", &self.formula.describe())
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`Progression`].
///
/// Unlike [`Progression::new`], the formula is optional here, so `build`
/// reports a missing one as an error.
///
/// # Examples
///
/// ```rust
/// use xpcurve::{Progression, ProgressionError};
/// use xpcurve::formula::LinearFormula;
///
/// let err = Progression::builder().experience(10).build().unwrap_err();
/// assert_eq!(err, ProgressionError::MissingFormula);
///
/// let progression = Progression::builder()
///     .formula(LinearFormula::new(50).unwrap())
///     .experience(120)
///     .build()
///     .unwrap();
/// assert_eq!(progression.level().unwrap(), 2);
/// ```
#[derive(Default)]
pub struct ProgressionBuilder {
    formula: Option<Arc<dyn LevelFormula>>,
    experience: i64,
    config: ProgressionConfig,
}

impl ProgressionBuilder {
    pub fn formula<F>(self, formula: F) -> Self
    where
        F: LevelFormula + 'static,
    {
        self.shared_formula(Arc::new(formula))
    }

    pub fn shared_formula(mut self, formula: Arc<dyn LevelFormula>) -> Self {
        self.formula = Some(formula);
        self
    }

    pub fn experience(mut self, experience: i64) -> Self {
        self.experience = experience;
        self
    }

    pub fn config(mut self, config: ProgressionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Progression, ProgressionError> {
        let formula = self.formula.ok_or(ProgressionError::MissingFormula)?;
        if self.experience < 0 {
            return Err(ProgressionError::invalid_argument(
                "experience",
                self.experience,
            ));
        }
        Ok(Progression {
            experience: self.experience,
            formula,
            config: Arc::new(self.config),
        })
    }
}
