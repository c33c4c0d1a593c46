use std::sync::Arc;

use log::warn;

use study_core::model::Goal;

use crate::kv::{KvStore, StorageError};

/// Blob key holding the daily goal, encoded as a stringified hours value.
pub const GOAL_KEY: &str = "dailyGoal";

/// Persistence for the single daily-goal value.
#[derive(Clone)]
pub struct GoalStore {
    kv: Arc<dyn KvStore>,
}

impl GoalStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// The persisted goal, or `None` when unset.
    ///
    /// An unparsable or non-positive stored value reads as unset, never as
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the blob store itself fails.
    pub async fn load(&self) -> Result<Option<Goal>, StorageError> {
        let Some(raw) = self.kv.get(GOAL_KEY).await? else {
            return Ok(None);
        };
        let parsed = raw.trim().parse::<f64>().ok().and_then(|hours| Goal::from_hours(hours).ok());
        if parsed.is_none() {
            warn!("stored goal {raw:?} is invalid, falling back to default");
        }
        Ok(parsed)
    }

    /// Persist the goal as an hours string.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the blob store fails.
    pub async fn save(&self, goal: Goal) -> Result<(), StorageError> {
        self.kv.set(GOAL_KEY, &goal.hours().to_string()).await
    }
}
