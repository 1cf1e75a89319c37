//! Automatic attempt logging around a unit of work.
//!
//! A [`FixSession`] remembers when work on a bug started and records the
//! attempt with that start time once the outcome is known. [`track`] wraps a
//! fallible closure and derives the outcome from its `Result`.

use crate::attempt::Attempt;
use crate::timestamp::now_local;
use crate::tracker::Tracker;
use chrono::NaiveDateTime;

/// Guard that records one attempt on [`finish`](FixSession::finish), or a
/// failed attempt if it is dropped unfinished (early return, `?`, panic).
pub struct FixSession<'a> {
    tracker: &'a mut Tracker,
    description: String,
    started_at: NaiveDateTime,
    successful: bool,
    finished: bool,
}

impl<'a> FixSession<'a> {
    /// Start a session now. The outcome defaults to success.
    pub fn start(tracker: &'a mut Tracker, description: impl Into<String>) -> Self {
        Self::start_at(tracker, description, now_local())
    }

    pub fn start_at(
        tracker: &'a mut Tracker,
        description: impl Into<String>,
        started_at: NaiveDateTime,
    ) -> Self {
        let description = description.into();
        tracing::info!(description = %description, started_at = %started_at, "fix session started");
        FixSession {
            tracker,
            description,
            started_at,
            successful: true,
            finished: false,
        }
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    pub fn mark_success(&mut self) {
        self.successful = true;
    }

    pub fn mark_failure(&mut self) {
        self.successful = false;
    }

    /// Record the attempt with the session's start time.
    pub fn finish(mut self) -> Attempt {
        self.record()
    }

    fn record(&mut self) -> Attempt {
        self.finished = true;
        let description = std::mem::take(&mut self.description);
        self.tracker
            .add_at(self.successful, description, self.started_at)
    }
}

impl Drop for FixSession<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(description = %self.description, "fix session dropped unfinished, recording failure");
            self.successful = false;
            self.record();
        }
    }
}

/// Run `work` and record an attempt: successful iff it returns `Ok`.
/// The closure's result is returned unchanged.
pub fn track<T, E, F>(tracker: &mut Tracker, description: &str, work: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
{
    let mut session = FixSession::start(tracker, description);
    let result = work();
    if result.is_err() {
        session.mark_failure();
    }
    session.finish();
    result
}
