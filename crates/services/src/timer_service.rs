use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use study_core::model::Session;
use study_core::timer::{Timer, TimerState};

use crate::error::TimerServiceError;
use crate::session_service::SessionService;

/// Drives the [`Timer`] state machine from a one-second tokio interval and
/// turns completed runs into persisted sessions.
///
/// Every transition out of `Running` aborts the tick task before the state
/// change completes, so rapid start/stop cycles never leave two live tick
/// loops. A tick that is already in flight when the task is aborted lands in
/// a non-`Running` timer and is ignored by `Timer::tick`.
pub struct TimerService {
    sessions: SessionService,
    timer: Arc<Mutex<Timer>>,
    subject: Mutex<Option<String>>,
    tick_task: Mutex<Option<JoinHandle<()>>>,
}

impl TimerService {
    #[must_use]
    pub fn new(sessions: SessionService) -> Self {
        Self {
            sessions,
            timer: Arc::new(Mutex::new(Timer::new())),
            subject: Mutex::new(None),
            tick_task: Mutex::new(None),
        }
    }

    /// Current state of the underlying timer.
    ///
    /// # Errors
    ///
    /// Returns `TimerServiceError::Lock` if the timer state is unavailable.
    pub fn state(&self) -> Result<TimerState, TimerServiceError> {
        Ok(self.lock_timer()?.state())
    }

    /// Elapsed seconds counted so far.
    ///
    /// # Errors
    ///
    /// Returns `TimerServiceError::Lock` if the timer state is unavailable.
    pub fn elapsed_secs(&self) -> Result<u32, TimerServiceError> {
        Ok(self.lock_timer()?.elapsed_secs())
    }

    /// Begin a run for the given subject and start the one-second tick.
    ///
    /// # Errors
    ///
    /// Returns `TimerServiceError::MissingSubject` for a blank subject, or
    /// `TimerError::AlreadyRunning` when the timer is not idle.
    pub fn start(&self, subject: &str) -> Result<(), TimerServiceError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(TimerServiceError::MissingSubject);
        }
        self.lock_timer()?.start()?;
        *self.lock_subject()? = Some(subject.to_owned());
        self.spawn_tick()
    }

    /// Suspend counting, retaining the elapsed seconds.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::NotRunning` unless the timer is running.
    pub fn pause(&self) -> Result<(), TimerServiceError> {
        self.cancel_tick()?;
        self.lock_timer()?.pause()?;
        Ok(())
    }

    /// Continue counting from the retained elapsed seconds.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::NotPaused` unless the timer is paused.
    pub fn resume(&self) -> Result<(), TimerServiceError> {
        self.lock_timer()?.resume()?;
        self.spawn_tick()
    }

    /// Stop the run and persist it as a session when any time elapsed.
    ///
    /// Stopping before the first tick records nothing and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns `TimerServiceError` when persistence fails.
    pub async fn stop(&self) -> Result<Option<Session>, TimerServiceError> {
        self.cancel_tick()?;
        let elapsed = self.lock_timer()?.stop();
        let subject = self.lock_subject()?.take();
        match (elapsed, subject) {
            (Some(secs), Some(subject)) => Ok(self.sessions.record(&subject, secs).await?),
            _ => Ok(None),
        }
    }

    /// Discard the run without recording anything.
    ///
    /// # Errors
    ///
    /// Returns `TimerServiceError::Lock` if the timer state is unavailable.
    pub fn reset(&self) -> Result<(), TimerServiceError> {
        self.cancel_tick()?;
        self.lock_timer()?.reset();
        self.lock_subject()?.take();
        Ok(())
    }

    fn spawn_tick(&self) -> Result<(), TimerServiceError> {
        let timer = Arc::clone(&self.timer);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; consume it so the count
            // starts one full second after the run begins.
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Ok(mut timer) = timer.lock() {
                    timer.tick();
                }
            }
        });

        let mut slot = self
            .tick_task
            .lock()
            .map_err(|e| TimerServiceError::Lock(e.to_string()))?;
        if let Some(old) = slot.replace(handle) {
            old.abort();
        }
        Ok(())
    }

    fn cancel_tick(&self) -> Result<(), TimerServiceError> {
        let handle = self
            .tick_task
            .lock()
            .map_err(|e| TimerServiceError::Lock(e.to_string()))?
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
        Ok(())
    }

    fn lock_timer(&self) -> Result<MutexGuard<'_, Timer>, TimerServiceError> {
        self.timer
            .lock()
            .map_err(|e| TimerServiceError::Lock(e.to_string()))
    }

    fn lock_subject(&self) -> Result<MutexGuard<'_, Option<String>>, TimerServiceError> {
        self.subject
            .lock()
            .map_err(|e| TimerServiceError::Lock(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use storage::kv::InMemoryKvStore;
    use storage::session_store::SessionStore;
    use study_core::time::fixed_clock;

    fn services() -> (SessionService, TimerService) {
        let store = SessionStore::new(Arc::new(InMemoryKvStore::new()));
        let sessions = SessionService::new(fixed_clock(), store);
        let timer = TimerService::new(sessions.clone());
        (sessions, timer)
    }

    async fn advance(duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_first_tick_records_nothing() {
        let (sessions, timer) = services();
        timer.start("Math").unwrap();
        assert_eq!(timer.stop().await.unwrap(), None);
        assert!(sessions.list_all().await.unwrap().is_empty());
        assert_eq!(timer.state().unwrap(), TimerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_run_is_recorded_on_stop() {
        let (sessions, timer) = services();
        timer.start("Math").unwrap();
        advance(Duration::from_millis(3_500)).await;

        let session = timer.stop().await.unwrap().unwrap();
        assert_eq!(session.subject(), "Math");
        assert_eq!(session.duration_secs(), 3);
        assert_eq!(sessions.list_all().await.unwrap().len(), 1);
        assert_eq!(timer.elapsed_secs().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_subject_cannot_start_a_run() {
        let (_sessions, timer) = services();
        assert!(matches!(
            timer.start("  ").unwrap_err(),
            TimerServiceError::MissingSubject
        ));
        assert_eq!(timer.state().unwrap(), TimerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_suspends_the_count() {
        let (_sessions, timer) = services();
        timer.start("Math").unwrap();
        advance(Duration::from_millis(2_500)).await;
        timer.pause().unwrap();
        assert_eq!(timer.state().unwrap(), TimerState::Paused);

        advance(Duration::from_secs(5)).await;
        assert_eq!(timer.elapsed_secs().unwrap(), 2);

        timer.resume().unwrap();
        advance(Duration::from_millis(1_200)).await;

        let session = timer.stop().await.unwrap().unwrap();
        assert_eq!(session.duration_secs(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_restart_leaves_a_single_counter() {
        let (_sessions, timer) = services();
        timer.start("Math").unwrap();
        assert_eq!(timer.stop().await.unwrap(), None);

        timer.start("Math").unwrap();
        advance(Duration::from_millis(2_500)).await;
        let session = timer.stop().await.unwrap().unwrap();
        assert_eq!(session.duration_secs(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_discards_without_recording() {
        let (sessions, timer) = services();
        timer.start("Math").unwrap();
        advance(Duration::from_millis(2_500)).await;
        timer.reset().unwrap();

        assert_eq!(timer.state().unwrap(), TimerState::Idle);
        assert_eq!(timer.elapsed_secs().unwrap(), 0);
        advance(Duration::from_secs(3)).await;
        assert_eq!(timer.elapsed_secs().unwrap(), 0);
        assert!(sessions.list_all().await.unwrap().is_empty());
    }
}
