use scout_core::LogEntry;

use crate::session::SessionPhase;
use crate::toast::Toast;

/// Hook for presentation layers that render session changes as they happen.
///
/// Every method defaults to doing nothing.
pub trait SessionObserver: Send {
    fn log_appended(&mut self, _entry: &LogEntry) {}

    fn log_cleared(&mut self) {}

    fn toast_shown(&mut self, _toast: &Toast) {}

    fn phase_changed(&mut self, _phase: SessionPhase) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
