#![forbid(unsafe_code)]

pub mod goal_store;
pub mod kv;
pub mod session_store;
pub mod sqlite;

pub use goal_store::{GOAL_KEY, GoalStore};
pub use kv::{InMemoryKvStore, KvStore, StorageError};
pub use session_store::{SESSIONS_KEY, SessionRecord, SessionStore};
pub use sqlite::{SqliteInitError, SqliteKvStore};
