use crate::prelude::TraceError;
use log::{debug, info, warn};

/// Tracks consecutive failed ticks of one view and decides how loudly to log.
///
/// Failed ticks are expected while the simulator is mid-write, so single
/// failures stay at debug level. A streak reaching `warn_after` (and every
/// further multiple of it) is reported as a warning.
#[derive(Debug, Clone)]
pub struct TickLogger {
    view: String,
    warn_after: usize,
    consecutive_failures: usize,
}

impl TickLogger {
    pub fn new(view: impl Into<String>, warn_after: usize) -> Self {
        Self {
            view: view.into(),
            warn_after: warn_after.max(1),
            consecutive_failures: 0,
        }
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    pub fn consecutive_failures(&self) -> usize {
        self.consecutive_failures
    }

    /// Returns `true` when the failure was escalated to a warning.
    pub fn record_failure(&mut self, err: &TraceError) -> bool {
        self.consecutive_failures += 1;
        if self.consecutive_failures % self.warn_after == 0 {
            warn!(
                "{} view: {} consecutive ticks failed, keeping last frame: {}",
                self.view, self.consecutive_failures, err
            );
            true
        } else {
            debug!("{} view: tick skipped: {}", self.view, err);
            false
        }
    }

    pub fn record_success(&mut self) {
        if self.consecutive_failures >= self.warn_after {
            info!(
                "{} view recovered after {} failed ticks",
                self.view, self.consecutive_failures
            );
        }
        self.consecutive_failures = 0;
    }
}
