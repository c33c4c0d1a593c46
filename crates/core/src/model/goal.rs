use thiserror::Error;

/// Default daily goal: 8 hours, in seconds.
pub const DEFAULT_DAILY_GOAL_SECS: u32 = 8 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GoalError {
    #[error("goal must be a positive number of hours")]
    NotPositive,
}

/// User-configured target daily study duration, in whole seconds.
///
/// Always positive; invalid input never replaces an existing goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Goal {
    seconds: u32,
}

impl Goal {
    /// Build a goal from an hours value, rounding to whole seconds.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::NotPositive` if `hours` is not finite, not
    /// positive, or rounds to less than one second.
    pub fn from_hours(hours: f64) -> Result<Self, GoalError> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(GoalError::NotPositive);
        }
        let seconds = (hours * 3600.0).round();
        if seconds < 1.0 || seconds > f64::from(u32::MAX) {
            return Err(GoalError::NotPositive);
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self {
            seconds: seconds as u32,
        })
    }

    /// Build a goal from whole seconds.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::NotPositive` for zero.
    pub fn from_seconds(seconds: u32) -> Result<Self, GoalError> {
        if seconds == 0 {
            return Err(GoalError::NotPositive);
        }
        Ok(Self { seconds })
    }

    #[must_use]
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    #[must_use]
    pub fn hours(&self) -> f64 {
        f64::from(self.seconds) / 3600.0
    }

    /// Fraction of the goal covered by `today_secs`, clamped to `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self, today_secs: u64) -> f64 {
        (today_secs as f64 / f64::from(self.seconds)).min(1.0)
    }
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            seconds: DEFAULT_DAILY_GOAL_SECS,
        }
    }
}
