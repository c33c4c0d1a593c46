use study_core::Clock;
use study_core::model::{Session, SessionDraft, SessionError, SessionId};
use storage::session_store::SessionStore;

use crate::error::SessionServiceError;

/// Records completed sessions and exposes the persisted history.
///
/// The store is the single source of truth; every read reloads it rather
/// than caching a snapshot.
#[derive(Clone)]
pub struct SessionService {
    clock: Clock,
    store: SessionStore,
}

impl SessionService {
    #[must_use]
    pub fn new(clock: Clock, store: SessionStore) -> Self {
        Self { clock, store }
    }

    /// Persist one completed session, stamped with the clock's current
    /// local date and time of day (the moment the session *completed*).
    ///
    /// A zero duration records nothing and returns `None`; stopping the
    /// timer before the first tick must not create a record.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError` for a blank subject or storage failure.
    pub async fn record(
        &self,
        subject: &str,
        duration_secs: u32,
    ) -> Result<Option<Session>, SessionServiceError> {
        if subject.trim().is_empty() {
            return Err(SessionError::EmptySubject.into());
        }
        if duration_secs == 0 {
            return Ok(None);
        }

        let draft = SessionDraft {
            subject: subject.to_owned(),
            duration_secs,
            date: self.clock.today(),
            recorded_at: self.clock.time_of_day(),
        };
        let session = self.store.append(draft, self.clock.now_millis()).await?;
        Ok(Some(session))
    }

    /// All persisted sessions in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` on storage failures.
    pub async fn list_all(&self) -> Result<Vec<Session>, SessionServiceError> {
        Ok(self.store.load_all().await?)
    }

    /// Sessions recorded today, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` on storage failures.
    pub async fn list_today(&self) -> Result<Vec<Session>, SessionServiceError> {
        Ok(self.store.load_by_date(self.clock.today()).await?)
    }

    /// Delete a session by id; a missing id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` on storage failures.
    pub async fn delete(&self, id: SessionId) -> Result<(), SessionServiceError> {
        Ok(self.store.remove(id).await?)
    }
}
