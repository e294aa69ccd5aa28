//! Search session controller: drives one search at a time from submission to
//! a settled report or error, and owns the cooldown, log and toast state the
//! presentation layer renders.

pub mod cooldown;
pub mod observer;
pub mod session;
pub mod toast;

pub use cooldown::Cooldown;
pub use observer::{NoopObserver, SessionObserver};
pub use session::{
    ActiveView, FailureKind, SearchSession, SessionFailure, SessionPhase, Settlement,
    SubmitOutcome, DEFAULT_RATE_LIMIT_COOLDOWN_SECS, PROFILE_INCOMPLETE_MESSAGE,
};
pub use toast::{Toast, ToastKind, ToastQueue, TOAST_TTL};
