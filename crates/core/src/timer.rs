use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimerError {
    #[error("timer is already running")]
    AlreadyRunning,

    #[error("timer is not running")]
    NotRunning,

    #[error("timer is not paused")]
    NotPaused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Elapsed-seconds state machine for an active study session.
///
/// The timer counts ticks; it has no notion of wall-clock time or of the
/// subject being studied. An external one-second scheduler calls `tick`
/// while the timer is `Running` and must be cancelled on every transition
/// out of `Running`.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    state: TimerState,
    elapsed_secs: u32,
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Begin counting from the current elapsed value.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::AlreadyRunning` unless the timer is `Idle`.
    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.state != TimerState::Idle {
            return Err(TimerError::AlreadyRunning);
        }
        self.state = TimerState::Running;
        Ok(())
    }

    /// Advance the count by one second. Ignored unless `Running`.
    pub fn tick(&mut self) {
        if self.state == TimerState::Running {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        }
    }

    /// Stop counting without losing the elapsed value.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::NotRunning` unless the timer is `Running`.
    pub fn pause(&mut self) -> Result<(), TimerError> {
        if self.state != TimerState::Running {
            return Err(TimerError::NotRunning);
        }
        self.state = TimerState::Paused;
        Ok(())
    }

    /// Continue counting from the retained elapsed value.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::NotPaused` unless the timer is `Paused`.
    pub fn resume(&mut self) -> Result<(), TimerError> {
        if self.state != TimerState::Paused {
            return Err(TimerError::NotPaused);
        }
        self.state = TimerState::Running;
        Ok(())
    }

    /// Return to `Idle`, yielding the elapsed seconds when any accumulated.
    ///
    /// A stop with zero elapsed seconds yields `None` so no session record
    /// is ever created for it.
    pub fn stop(&mut self) -> Option<u32> {
        let elapsed = self.elapsed_secs;
        self.state = TimerState::Idle;
        self.elapsed_secs = 0;
        if elapsed > 0 { Some(elapsed) } else { None }
    }

    /// Return to `Idle`, discarding elapsed seconds without emitting them.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.elapsed_secs = 0;
    }
}
