//! Search session state machine.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──2xx──▶ Streaming ──end of body──▶ Settled(Report)
//!                      │                   │
//!                      └──429 / error──────┴──error event / read failure──▶ Settled(Error)
//! ```
//!
//! The cooldown runs alongside these phases and gates `submit`. Taking
//! `&mut self` for the whole search keeps at most one search in flight.

use scout_client::{ScoutClient, ScoutError};
use scout_core::{
    LogBuffer, LogKind, Location, ProfileStore, ScoutReport, SearchForm, SearchRequest,
    StreamEvent,
};

use crate::cooldown::Cooldown;
use crate::observer::{NoopObserver, SessionObserver};
use crate::toast::{ToastKind, ToastQueue};

pub const PROFILE_INCOMPLETE_MESSAGE: &str = "Please complete all sections of your profile.";
pub const DEFAULT_RATE_LIMIT_COOLDOWN_SECS: u64 = 60;

const CONNECTION_LOST_MESSAGE: &str = "Connection lost.";
const STARTING_LOG: &str = "Starting search...";
const REPORT_READY_LOG: &str = "Final report ready.";
const RATE_LIMITED_LOG: &str = "Search paused (rate limited).";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Submitting,
    Streaming,
    Settled(Settlement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Report,
    Error,
}

/// Which screen the presentation layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Profile,
    Jobs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RateLimit,
    Error,
}

/// The error a settled search shows to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFailure {
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Rejected before any request: the profile has blank fields.
    ProfileIncomplete,
    /// Rejected before any request: a rate-limit cooldown is running.
    CoolingDown { remaining_secs: u64 },
    /// The stream ended normally. A report may or may not have arrived.
    Completed { report_received: bool },
    Failed(SessionFailure),
}

pub struct SearchSession {
    client: ScoutClient,
    profile: ProfileStore,
    form: SearchForm,
    view: ActiveView,
    phase: SessionPhase,
    report: Option<ScoutReport>,
    failure: Option<SessionFailure>,
    logs: LogBuffer,
    toasts: ToastQueue,
    cooldown: Cooldown,
    rate_limit_cooldown_secs: u64,
    observer: Box<dyn SessionObserver>,
}

impl SearchSession {
    /// New session on the profile view with an empty form.
    #[must_use]
    pub fn new(client: ScoutClient, profile: ProfileStore) -> Self {
        Self {
            client,
            profile,
            form: SearchForm::default(),
            view: ActiveView::Profile,
            phase: SessionPhase::Idle,
            report: None,
            failure: None,
            logs: LogBuffer::new(),
            toasts: ToastQueue::new(),
            cooldown: Cooldown::new(),
            rate_limit_cooldown_secs: DEFAULT_RATE_LIMIT_COOLDOWN_SECS,
            observer: Box::new(NoopObserver),
        }
    }

    #[must_use]
    pub fn with_rate_limit_cooldown(mut self, secs: u64) -> Self {
        self.rate_limit_cooldown_secs = secs;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    // --- form and navigation -------------------------------------------------

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.form.query = query.into();
    }

    pub fn set_location(&mut self, location: Location) {
        self.form.location = location;
    }

    #[must_use]
    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    pub fn show_view(&mut self, view: ActiveView) {
        self.view = view;
    }

    /// Leave the profile view for the search form, if the profile is complete.
    ///
    /// Returns `false` and shows a notice otherwise.
    pub fn continue_to_search(&mut self) -> bool {
        if self.profile.is_complete() {
            self.view = ActiveView::Jobs;
            true
        } else {
            self.show_toast(PROFILE_INCOMPLETE_MESSAGE, ToastKind::Error);
            false
        }
    }

    /// Drop the current report and return to the search form. The profile
    /// and form inputs are kept.
    pub fn find_more(&mut self) {
        self.report = None;
        self.view = ActiveView::Jobs;
        if matches!(self.phase, SessionPhase::Settled(_)) {
            self.set_phase(SessionPhase::Idle);
        }
    }

    // --- search lifecycle ----------------------------------------------------

    /// Run one search to completion.
    ///
    /// Rejections leave the session untouched apart from the profile notice.
    /// Every failure shows exactly one toast, appends an error log entry and
    /// leaves the session ready for another submission.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.profile.is_complete() {
            tracing::info!(
                missing = ?self.profile.profile().missing_fields(),
                "search rejected: profile incomplete"
            );
            self.show_toast(PROFILE_INCOMPLETE_MESSAGE, ToastKind::Error);
            self.view = ActiveView::Profile;
            return SubmitOutcome::ProfileIncomplete;
        }

        if self.cooldown.is_active() {
            let remaining_secs = self.cooldown.remaining();
            tracing::debug!(remaining_secs, "search ignored during cooldown");
            return SubmitOutcome::CoolingDown { remaining_secs };
        }

        self.report = None;
        self.failure = None;
        self.clear_logs();
        self.append_log(STARTING_LOG, LogKind::Info);
        self.set_phase(SessionPhase::Submitting);

        let request = SearchRequest::new(&self.form, self.profile.profile());
        match self.run_search(&request).await {
            Ok(()) => {
                self.set_phase(SessionPhase::Settled(Settlement::Report));
                SubmitOutcome::Completed {
                    report_received: self.report.is_some(),
                }
            }
            Err(err) => SubmitOutcome::Failed(self.fail(&err)),
        }
    }

    async fn run_search(&mut self, request: &SearchRequest) -> Result<(), ScoutError> {
        let mut stream = self.client.open_search(request).await?;
        self.set_phase(SessionPhase::Streaming);

        while let Some(event) = stream.next_event().await? {
            match event {
                StreamEvent::Step(content) => self.append_log(content, LogKind::Step),
                StreamEvent::Result(report) => {
                    tracing::info!(jobs = report.jobs.len(), "report received");
                    self.report = Some(report);
                    self.append_log(REPORT_READY_LOG, LogKind::Info);
                }
                StreamEvent::Error(message) => return Err(ScoutError::Stream(message)),
            }
        }

        tracing::info!(report = self.report.is_some(), "stream ended");
        Ok(())
    }

    fn fail(&mut self, err: &ScoutError) -> SessionFailure {
        let failure = if err.is_rate_limit() {
            let secs = self.rate_limit_cooldown_secs;
            tracing::warn!(error = %err, cooldown_secs = secs, "search rate limited");
            self.cooldown.start(secs);
            self.clear_logs();
            self.report = None;
            self.append_log(RATE_LIMITED_LOG, LogKind::Error);
            SessionFailure {
                kind: FailureKind::RateLimit,
                message: format!("Engine capacity reached. Protocol paused for {secs} seconds."),
            }
        } else {
            tracing::error!(error = %err, "search failed");
            let message = user_message(err);
            self.append_log(format!("Search failed: {message}"), LogKind::Error);
            SessionFailure {
                kind: FailureKind::Error,
                message,
            }
        };

        self.show_toast(&failure.message, ToastKind::Error);
        self.failure = Some(failure.clone());
        self.set_phase(SessionPhase::Settled(Settlement::Error));
        failure
    }

    // --- state for presentation ----------------------------------------------

    #[must_use]
    pub fn profile(&self) -> &ProfileStore {
        &self.profile
    }

    #[must_use]
    pub fn report(&self) -> Option<&ScoutReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn failure(&self) -> Option<&SessionFailure> {
        self.failure.as_ref()
    }

    #[must_use]
    pub fn logs(&self) -> &LogBuffer {
        &self.logs
    }

    #[must_use]
    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    #[must_use]
    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn view(&self) -> ActiveView {
        self.view
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Submitting | SessionPhase::Streaming
        )
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.cooldown.is_active()
    }

    /// Label for the search button.
    #[must_use]
    pub fn submit_label(&self) -> String {
        if self.is_loading() {
            "Searching...".to_owned()
        } else if self.cooldown.is_active() {
            format!("Wait ({}s)", self.cooldown.remaining())
        } else {
            "Search Jobs".to_owned()
        }
    }

    // --- internal mutation helpers -------------------------------------------

    fn append_log(&mut self, content: impl Into<String>, kind: LogKind) {
        let entry = self.logs.push(content, kind);
        self.observer.log_appended(entry);
    }

    fn clear_logs(&mut self) {
        self.logs.clear();
        self.observer.log_cleared();
    }

    fn show_toast(&mut self, message: &str, kind: ToastKind) {
        let toast = self.toasts.push(message, kind);
        self.observer.toast_shown(&toast);
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "session phase change");
        self.phase = phase;
        self.observer.phase_changed(phase);
    }
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("endpoint", &self.client.endpoint().as_str())
            .field("form", &self.form)
            .field("view", &self.view)
            .field("phase", &self.phase)
            .field("report", &self.report.is_some())
            .field("failure", &self.failure)
            .field("logs", &self.logs.len())
            .field("cooldown", &self.cooldown.remaining())
            .finish_non_exhaustive()
    }
}

/// User-facing text for a failure that is not a rate limit.
fn user_message(err: &ScoutError) -> String {
    match err {
        ScoutError::Stream(message) if !message.trim().is_empty() => message.clone(),
        ScoutError::Stream(_) => "Search failed.".to_owned(),
        ScoutError::Http(_) | ScoutError::UnexpectedStatus { .. } => {
            CONNECTION_LOST_MESSAGE.to_owned()
        }
        ScoutError::RateLimited { .. } | ScoutError::InvalidBaseUrl { .. } => err.to_string(),
    }
}
