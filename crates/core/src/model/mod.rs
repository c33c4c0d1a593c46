mod goal;
mod ids;
mod session;

pub use goal::{DEFAULT_DAILY_GOAL_SECS, Goal, GoalError};
pub use ids::SessionId;
pub use session::{Session, SessionDraft, SessionError};
