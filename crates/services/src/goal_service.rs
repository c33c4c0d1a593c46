use study_core::model::Goal;
use storage::goal_store::GoalStore;

use crate::error::GoalServiceError;

/// Loads, validates, and persists the single daily-goal value.
#[derive(Clone)]
pub struct GoalService {
    store: GoalStore,
}

impl GoalService {
    #[must_use]
    pub fn new(store: GoalStore) -> Self {
        Self { store }
    }

    /// Persisted goal, or the 8-hour default when unset or unreadable.
    ///
    /// # Errors
    ///
    /// Returns `GoalServiceError::Storage` on storage failures.
    pub async fn load(&self) -> Result<Goal, GoalServiceError> {
        Ok(self.store.load().await?.unwrap_or_default())
    }

    /// Parse user input as hours and persist it on success.
    ///
    /// Invalid input (non-numeric, non-finite, or not positive) returns a
    /// validation error and leaves the stored goal unchanged.
    ///
    /// # Errors
    ///
    /// Returns `GoalServiceError::InvalidInput` for rejected input, or
    /// `GoalServiceError::Storage` when persistence fails.
    pub async fn save_input(&self, input: &str) -> Result<Goal, GoalServiceError> {
        let invalid = || GoalServiceError::InvalidInput {
            raw: input.to_owned(),
        };
        let hours: f64 = input.trim().parse().map_err(|_| invalid())?;
        let goal = Goal::from_hours(hours).map_err(|_| invalid())?;
        self.store.save(goal).await?;
        Ok(goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use storage::kv::InMemoryKvStore;

    fn service() -> GoalService {
        GoalService::new(GoalStore::new(Arc::new(InMemoryKvStore::new())))
    }

    #[tokio::test]
    async fn defaults_to_eight_hours_when_unset() {
        let service = service();
        assert_eq!(service.load().await.unwrap().seconds(), 28_800);
    }

    #[tokio::test]
    async fn valid_input_is_persisted() {
        let service = service();
        let goal = service.save_input("3").await.unwrap();
        assert_eq!(goal.seconds(), 10_800);
        assert_eq!(service.load().await.unwrap().seconds(), 10_800);
    }

    #[tokio::test]
    async fn invalid_input_keeps_the_prior_goal() {
        let service = service();
        service.save_input("3").await.unwrap();

        for bad in ["-1", "0", "abc", "", "NaN", "inf"] {
            let err = service.save_input(bad).await.unwrap_err();
            assert!(matches!(err, GoalServiceError::InvalidInput { .. }), "{bad}");
        }
        assert_eq!(service.load().await.unwrap().seconds(), 10_800);
    }
}
