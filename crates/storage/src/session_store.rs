use std::sync::Arc;

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use study_core::model::{Session, SessionDraft, SessionId};

use crate::kv::{KvStore, StorageError};

/// Blob key holding the JSON-encoded session array.
pub const SESSIONS_KEY: &str = "sessions";

/// Wire shape for one persisted session.
///
/// This mirrors the domain `Session` so the store can serialize without
/// leaking storage concerns into the domain layer. Field names are the
/// persisted JSON keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub subject: String,
    pub duration: u32,
    pub date: String,
    pub time: String,
}

impl SessionRecord {
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            id: session.id().value(),
            subject: session.subject().to_owned(),
            duration: session.duration_secs(),
            date: session.date().format("%Y-%m-%d").to_string(),
            time: session.recorded_at().to_owned(),
        }
    }

    /// Convert the record back into a domain `Session`.
    ///
    /// # Errors
    ///
    /// Returns a message if the date cannot be parsed or the fields fail
    /// domain validation.
    pub fn into_session(self) -> Result<Session, String> {
        let date: NaiveDate = self
            .date
            .parse()
            .map_err(|_| format!("invalid date: {}", self.date))?;
        Session::from_persisted(
            SessionId::new(self.id),
            self.subject,
            self.duration,
            date,
            self.time,
        )
        .map_err(|err| err.to_string())
    }
}

/// Append-only (with delete) collection of session records, persisted as a
/// single JSON blob under [`SESSIONS_KEY`].
///
/// Every mutating call is a read-modify-write against the blob store; the
/// single `set` replaces the whole array, so readers never observe a
/// partial write.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KvStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// All persisted sessions in insertion order.
    ///
    /// An absent or corrupt blob reads as the empty collection; records that
    /// fail domain validation are skipped individually. Neither is fatal.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the blob store itself fails.
    pub async fn load_all(&self) -> Result<Vec<Session>, StorageError> {
        let records = self.load_records().await?;
        Ok(records
            .into_iter()
            .filter_map(|record| {
                let id = record.id;
                match record.into_session() {
                    Ok(session) => Some(session),
                    Err(err) => {
                        warn!("skipping invalid session record {id}: {err}");
                        None
                    }
                }
            })
            .collect())
    }

    /// Sessions whose date matches exactly, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the blob store fails.
    pub async fn load_by_date(&self, date: NaiveDate) -> Result<Vec<Session>, StorageError> {
        let sessions = self.load_all().await?;
        Ok(sessions
            .into_iter()
            .filter(|session| session.date() == date)
            .collect())
    }

    /// Assign an id, validate, and persist one new session.
    ///
    /// Ids are derived from `now_millis` and bumped past the largest stored
    /// id, so generation stays monotonic even when two sessions complete
    /// within the same millisecond.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the draft fails domain
    /// validation, or other `StorageError`s when persistence fails.
    pub async fn append(
        &self,
        draft: SessionDraft,
        now_millis: i64,
    ) -> Result<Session, StorageError> {
        let mut records = self.load_records().await?;
        let id = next_id(&records, now_millis);
        let session = draft
            .assign_id(SessionId::new(id))
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        records.push(SessionRecord::from_session(&session));
        self.save_records(&records).await?;
        Ok(session)
    }

    /// Delete the session with the matching id. No-op when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when persistence fails.
    pub async fn remove(&self, id: SessionId) -> Result<(), StorageError> {
        let mut records = self.load_records().await?;
        let before = records.len();
        records.retain(|record| record.id != id.value());
        if records.len() != before {
            self.save_records(&records).await?;
        }
        Ok(())
    }

    async fn load_records(&self) -> Result<Vec<SessionRecord>, StorageError> {
        let Some(raw) = self.kv.get(SESSIONS_KEY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!("stored session blob is corrupt, treating as empty: {err}");
                Ok(Vec::new())
            }
        }
    }

    async fn save_records(&self, records: &[SessionRecord]) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(records)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.set(SESSIONS_KEY, &encoded).await
    }
}

fn next_id(records: &[SessionRecord], now_millis: i64) -> i64 {
    records
        .iter()
        .map(|record| record.id)
        .max()
        .map_or(now_millis, |max| now_millis.max(max + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::InMemoryKvStore;

    fn store() -> (SessionStore, Arc<InMemoryKvStore>) {
        let kv = Arc::new(InMemoryKvStore::new());
        (SessionStore::new(Arc::clone(&kv) as Arc<dyn KvStore>), kv)
    }

    fn draft(subject: &str, duration_secs: u32, on: &str) -> SessionDraft {
        SessionDraft {
            subject: subject.into(),
            duration_secs,
            date: on.parse().unwrap(),
            recorded_at: "10:00:00".into(),
        }
    }

    #[tokio::test]
    async fn empty_store_loads_as_empty() {
        let (store, _kv) = store();
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_blob_loads_as_empty() {
        let (store, kv) = store();
        kv.set(SESSIONS_KEY, "{not json").await.unwrap();
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_and_load_preserve_totals() {
        let (store, _kv) = store();
        store
            .append(draft("Math", 1800, "2024-01-01"), 1_000)
            .await
            .unwrap();
        store
            .append(draft("Math", 3600, "2024-01-01"), 2_000)
            .await
            .unwrap();

        let sessions = store.load_all().await.unwrap();
        assert_eq!(sessions.len(), 2);
        let total: u64 = sessions.iter().map(|s| u64::from(s.duration_secs())).sum();
        assert_eq!(total, 5400);
    }

    #[tokio::test]
    async fn ids_stay_monotonic_under_collision() {
        let (store, _kv) = store();
        let first = store
            .append(draft("Math", 60, "2024-01-01"), 1_000)
            .await
            .unwrap();
        let second = store
            .append(draft("Polity", 60, "2024-01-01"), 1_000)
            .await
            .unwrap();
        assert_eq!(first.id().value(), 1_000);
        assert_eq!(second.id().value(), 1_001);
    }

    #[tokio::test]
    async fn remove_deletes_matching_session_only() {
        let (store, _kv) = store();
        let keep = store
            .append(draft("Math", 60, "2024-01-01"), 1_000)
            .await
            .unwrap();
        let gone = store
            .append(draft("Polity", 60, "2024-01-01"), 2_000)
            .await
            .unwrap();

        store.remove(gone.id()).await.unwrap();

        let sessions = store.load_all().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id(), keep.id());
    }

    #[tokio::test]
    async fn removing_missing_id_is_a_noop() {
        let (store, _kv) = store();
        store
            .append(draft("Math", 60, "2024-01-01"), 1_000)
            .await
            .unwrap();

        store.remove(SessionId::new(999)).await.unwrap();
        assert_eq!(store.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn load_by_date_filters_exactly() {
        let (store, _kv) = store();
        store
            .append(draft("Math", 60, "2024-01-01"), 1_000)
            .await
            .unwrap();
        store
            .append(draft("Math", 60, "2024-01-02"), 2_000)
            .await
            .unwrap();

        let sessions = store.load_by_date("2024-01-01".parse().unwrap()).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].date(), "2024-01-01".parse::<NaiveDate>().unwrap());
    }

    #[tokio::test]
    async fn invalid_records_are_skipped_not_fatal() {
        let (store, kv) = store();
        kv.set(
            SESSIONS_KEY,
            r#"[{"id":1,"subject":"Math","duration":60,"date":"2024-01-01","time":"10:00:00"},
                {"id":2,"subject":"","duration":60,"date":"2024-01-01","time":"10:00:00"},
                {"id":3,"subject":"Polity","duration":60,"date":"not-a-date","time":"10:00:00"}]"#,
        )
        .await
        .unwrap();

        let sessions = store.load_all().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].subject(), "Math");
    }

    #[tokio::test]
    async fn wire_format_matches_the_persisted_shape() {
        let (store, kv) = store();
        store
            .append(draft("Math", 1800, "2024-01-01"), 1_000)
            .await
            .unwrap();

        let raw = kv.get(SESSIONS_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], 1_000);
        assert_eq!(value[0]["subject"], "Math");
        assert_eq!(value[0]["duration"], 1800);
        assert_eq!(value[0]["date"], "2024-01-01");
        assert_eq!(value[0]["time"], "10:00:00");
    }
}
