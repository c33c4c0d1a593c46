#![forbid(unsafe_code)]

pub mod error;
pub mod goal_service;
pub mod session_service;
pub mod stats_service;
pub mod timer_service;

pub use study_core::Clock;

pub use error::{GoalServiceError, SessionServiceError, TimerServiceError};
pub use goal_service::GoalService;
pub use session_service::SessionService;
pub use stats_service::{MAX_WEEK_OFFSET, Overview, StatsService};
pub use timer_service::TimerService;
