use chrono::NaiveDate;
use thiserror::Error;

use crate::model::SessionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("subject must not be empty")]
    EmptySubject,

    #[error("duration must be at least one second")]
    ZeroDuration,
}

/// One completed interval of studying.
///
/// Immutable once created; deletion happens at the store level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    subject: String,
    duration_secs: u32,
    date: NaiveDate,
    recorded_at: String,
}

/// Unvalidated session fields, before the store assigns an id.
#[derive(Debug, Clone)]
pub struct SessionDraft {
    pub subject: String,
    pub duration_secs: u32,
    pub date: NaiveDate,
    pub recorded_at: String,
}

impl SessionDraft {
    /// Validate the draft and attach a store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptySubject` if the subject is blank after
    /// trimming, or `SessionError::ZeroDuration` for a zero-length session.
    pub fn assign_id(self, id: SessionId) -> Result<Session, SessionError> {
        Session::from_persisted(
            id,
            self.subject,
            self.duration_secs,
            self.date,
            self.recorded_at,
        )
    }
}

impl Session {
    /// Rehydrate a session from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the subject is blank or the duration is zero.
    pub fn from_persisted(
        id: SessionId,
        subject: impl Into<String>,
        duration_secs: u32,
        date: NaiveDate,
        recorded_at: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let subject = subject.into().trim().to_string();
        if subject.is_empty() {
            return Err(SessionError::EmptySubject);
        }
        if duration_secs == 0 {
            return Err(SessionError::ZeroDuration);
        }

        Ok(Self {
            id,
            subject,
            duration_secs,
            date,
            recorded_at: recorded_at.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Local calendar date of the moment the session completed.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Display time of day the session was recorded.
    #[must_use]
    pub fn recorded_at(&self) -> &str {
        &self.recorded_at
    }
}
