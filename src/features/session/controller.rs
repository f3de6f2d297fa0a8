//! Session lifecycle controller.
//!
//! Owns the single active study session: start/pause/resume/end
//! transitions, the countdown, and the blocking/notification side effects.
//!
//! ```text
//! Idle --start--> Active <--pause/resume--> Paused
//!                   |                         |
//!                   +------ end / zero -------+--> Completed --> Idle
//! ```

use chrono::Local;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::countdown::{Countdown, Tick};
use super::timer::{progress_percent, SessionTimer};
use super::validate;
use crate::api::{SessionOutcome, StudySession};
use crate::config::Config;
use crate::core::{BlockingService, SessionStore};
use crate::error::StudyError;
use crate::features::blocking::{default_blocklist, BlockingCoordinator};
use crate::notify::Notifier;

/// Focus score recorded when a session runs to zero without user input.
pub const DEFAULT_FOCUS_SCORE: u8 = 75;

/// Lifecycle state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Idle,
    Active,
    Paused,
    Completed,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Active => write!(f, "Active"),
            Self::Paused => write!(f, "Paused"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Behavior knobs for a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Ask the blocking service to block `websites` when a session starts.
    pub block_websites: bool,
    pub websites: Vec<String>,
    /// Score submitted when the countdown reaches zero. Capped at 100.
    pub default_focus_score: u8,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            block_websites: true,
            websites: default_blocklist(),
            default_focus_score: DEFAULT_FOCUS_SCORE,
        }
    }
}

impl ControllerOptions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            block_websites: config.session.block_websites,
            websites: config.blocking.websites.clone(),
            default_focus_score: config.session.default_focus_score.min(validate::MAX_FOCUS_SCORE),
        }
    }

    #[must_use]
    pub const fn with_blocking(mut self, enabled: bool) -> Self {
        self.block_websites = enabled;
        self
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    /// The user ended it.
    Manual,
    /// The countdown reached zero.
    Completed,
}

/// What happened when a session ended.
#[derive(Debug)]
pub struct EndReport {
    /// Local copy of the session with the outcome and end time applied.
    pub session: StudySession,
    pub outcome: SessionOutcome,
    pub reason: EndReason,
    /// Set when the store refused or could not be reached. Local state was
    /// reset anyway; the backend record stays authoritative until retried.
    pub error: Option<StudyError>,
}

impl EndReport {
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        self.error.is_none()
    }
}

/// Point-in-time view of the timer, for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub state: LifecycleState,
    pub session_id: Option<String>,
    pub subject: Option<String>,
    pub remaining_seconds: u32,
    pub total_seconds: u32,
    pub elapsed_seconds: u32,
    pub progress_percent: f64,
    pub is_active: bool,
    pub is_paused: bool,
}

struct ActiveSession {
    session: StudySession,
    timer: SessionTimer,
    countdown: Countdown,
}

/// Drives one study session at a time.
pub struct SessionController<S, B, N> {
    store: S,
    blocking: BlockingCoordinator<B>,
    notifier: N,
    options: ControllerOptions,
    state: LifecycleState,
    active: Option<ActiveSession>,
    epoch: u64,
}

fn no_active_session() -> StudyError {
    StudyError::InvalidState("No active study session".to_string())
}

impl<S, B, N> SessionController<S, B, N>
where
    S: SessionStore,
    B: BlockingService,
    N: Notifier,
{
    /// Build a controller. A default focus score above 100 is capped.
    pub fn new(store: S, blocking: B, notifier: N, mut options: ControllerOptions) -> Self {
        options.default_focus_score = options.default_focus_score.min(validate::MAX_FOCUS_SCORE);
        Self {
            store,
            blocking: BlockingCoordinator::new(blocking),
            notifier,
            options,
            state: LifecycleState::Idle,
            active: None,
            epoch: 0,
        }
    }

    /// Start `session`: ask the store, arm the countdown, then request blocking.
    ///
    /// Blocking failures only produce a warning.
    ///
    /// # Errors
    ///
    /// - [`StudyError::InvalidState`] if a session is already active
    /// - [`StudyError::Validation`] for a zero duration
    /// - [`StudyError::StartRejected`] / transport errors from the store;
    ///   the controller stays `Idle` and no countdown runs
    pub async fn start(&mut self, session: StudySession) -> Result<(), StudyError> {
        if self.active.is_some() {
            return Err(StudyError::InvalidState(
                "A study session is already active. End or discard it first.".to_string(),
            ));
        }
        if session.duration_minutes == 0 {
            let err = StudyError::Validation("Duration must be at least one minute".to_string());
            self.notifier.warning(&err.to_string());
            return Err(err);
        }

        info!(session = %session.id, minutes = session.duration_minutes, "starting study session");
        if let Err(e) = self.store.start_session(&session.id).await {
            let err = e.into_start_rejected();
            warn!(session = %session.id, error = %err, "session start failed");
            self.notifier.error(&format!("Failed to start session: {err}"));
            return Err(err);
        }

        self.epoch += 1;
        let epoch = self.epoch;
        let minutes = session.duration_minutes;

        let mut session = session;
        session.start_time = Some(Local::now().naive_local());
        session.end_time = None;

        self.active = Some(ActiveSession {
            timer: SessionTimer::from_minutes(minutes),
            countdown: Countdown::start(epoch),
            session,
        });
        self.state = LifecycleState::Active;
        self.notifier.success("Study session started");

        if self.options.block_websites {
            self.block_for(epoch, minutes).await;
        }
        Ok(())
    }

    async fn block_for(&mut self, epoch: u64, minutes: u32) {
        let result = self.blocking.block(self.options.websites.as_slice(), minutes).await;

        // The response belongs to a session that is no longer running.
        if self.current_epoch() != Some(epoch) {
            debug!(epoch, "dropping stale blocking response");
            return;
        }

        match result {
            Ok(r) if r.success && r.mock_mode => {
                self.notifier.success("Distracting websites blocked (mock mode)");
            }
            Ok(r) if r.success => self.notifier.success("Distracting websites blocked"),
            Ok(_) => self
                .notifier
                .warning("Website blocking failed - check permissions"),
            Err(e) => {
                warn!(error = %e, "website blocking unavailable");
                self.notifier.warning("Website blocking not available");
            }
        }
    }

    /// Suppress countdown decrements. The tick source keeps running.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::InvalidState`] unless the session is `Active`.
    pub fn pause(&mut self) -> Result<(), StudyError> {
        match self.state {
            LifecycleState::Active => {}
            LifecycleState::Paused => {
                return Err(StudyError::InvalidState("Session is already paused".to_string()))
            }
            LifecycleState::Idle | LifecycleState::Completed => return Err(no_active_session()),
        }
        if let Some(active) = self.active.as_mut() {
            active.timer.pause();
        }
        self.state = LifecycleState::Paused;
        self.notifier.info("Session paused");
        Ok(())
    }

    /// Re-enable countdown decrements.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::InvalidState`] unless the session is `Paused`.
    pub fn resume(&mut self) -> Result<(), StudyError> {
        match self.state {
            LifecycleState::Paused => {}
            LifecycleState::Active => {
                return Err(StudyError::InvalidState("Session is not paused".to_string()))
            }
            LifecycleState::Idle | LifecycleState::Completed => return Err(no_active_session()),
        }
        if let Some(active) = self.active.as_mut() {
            active.timer.resume();
        }
        self.state = LifecycleState::Active;
        self.notifier.info("Session resumed");
        Ok(())
    }

    /// Pause when active, resume when paused. Returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::InvalidState`] when no session is active.
    pub fn toggle_pause(&mut self) -> Result<LifecycleState, StudyError> {
        if self.state == LifecycleState::Paused {
            self.resume()?;
        } else {
            self.pause()?;
        }
        Ok(self.state)
    }

    /// Wait for the next countdown tick.
    ///
    /// Pends forever while no countdown is running, so it can sit in a
    /// `select!` next to other event sources.
    pub async fn next_tick(&mut self) -> Tick {
        if let Some(active) = self.active.as_mut() {
            if let Some(tick) = active.countdown.next().await {
                return tick;
            }
        }
        std::future::pending().await
    }

    /// Apply a tick from the countdown, ignoring ticks from an earlier session.
    ///
    /// Returns the end report if this tick completed the session.
    pub async fn handle_tick(&mut self, tick: Tick) -> Option<EndReport> {
        if self.current_epoch() != Some(tick.epoch) {
            debug!(tick = tick.epoch, current = ?self.current_epoch(), "ignoring stale tick");
            return None;
        }
        self.tick().await
    }

    /// Apply one elapsed second to the active session.
    ///
    /// Decrements only while `Active`. When the remaining time hits zero the
    /// session is completed with the default outcome and the report returned.
    pub async fn tick(&mut self) -> Option<EndReport> {
        let active = self.active.as_mut()?;
        if !active.timer.tick() {
            return None;
        }
        self.complete().await
    }

    async fn complete(&mut self) -> Option<EndReport> {
        let goals = self.active.as_ref()?.session.goals.clone();
        self.notifier.success("Study session completed! Great work!");

        let outcome = SessionOutcome::completed(&goals, self.options.default_focus_score);
        match self.finish(outcome, EndReason::Completed).await {
            Ok(report) => Some(report),
            Err(e) => {
                // The countdown is spent; never leave it armed at zero.
                warn!(error = %e, "automatic completion failed");
                self.notifier.error(&format!("Failed to complete session: {e}"));
                self.teardown();
                self.release_block().await;
                None
            }
        }
    }

    /// End the active session with the given outcome.
    ///
    /// The countdown is cancelled and local state reset to `Idle` even if the
    /// store refuses; that failure is carried in [`EndReport::error`].
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::InvalidState`] when nothing is active, or
    /// [`StudyError::Validation`] for a bad outcome (state is left untouched).
    pub async fn end(&mut self, outcome: SessionOutcome) -> Result<EndReport, StudyError> {
        self.finish(outcome, EndReason::Manual).await
    }

    /// End the active session with the default focus score and every goal completed.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::InvalidState`] when nothing is active.
    pub async fn end_with_defaults(&mut self) -> Result<EndReport, StudyError> {
        let goals = self
            .active
            .as_ref()
            .map(|a| a.session.goals.clone())
            .ok_or_else(no_active_session)?;
        let outcome = SessionOutcome::completed(&goals, self.options.default_focus_score);
        self.finish(outcome, EndReason::Manual).await
    }

    async fn finish(
        &mut self,
        outcome: SessionOutcome,
        reason: EndReason,
    ) -> Result<EndReport, StudyError> {
        let goals = &self.active.as_ref().ok_or_else(no_active_session)?.session.goals;
        if let Err(e) = validate::outcome(&outcome, goals) {
            self.notifier.warning(&e.to_string());
            return Err(e);
        }

        let ActiveSession {
            mut session,
            mut countdown,
            ..
        } = self.active.take().ok_or_else(no_active_session)?;
        countdown.cancel();
        drop(countdown);
        self.state = LifecycleState::Completed;
        info!(session = %session.id, ?reason, score = outcome.focus_score, "ending study session");

        let error = match self.store.end_session(&session.id, &outcome).await {
            Ok(()) => {
                self.notifier.success("Study session ended successfully");
                None
            }
            Err(e) => {
                let err = e.into_end_rejected();
                warn!(session = %session.id, error = %err, "session end was not recorded");
                self.notifier.error(&format!("Failed to end session: {err}"));
                Some(err)
            }
        };

        self.release_block().await;

        session.end_time = Some(Local::now().naive_local());
        session.completed_goals.clone_from(&outcome.completed_goals);
        session.focus_score = Some(outcome.focus_score);
        session.notes.clone_from(&outcome.notes);
        session.distractions = outcome.distractions;
        session.breaks_taken = outcome.breaks_taken;

        self.state = LifecycleState::Idle;
        Ok(EndReport {
            session,
            outcome,
            reason,
            error,
        })
    }

    async fn release_block(&mut self) {
        match self.blocking.unblock().await {
            Ok(true) => self.notifier.success("Websites unblocked"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "unblock failed"),
        }
    }

    /// Drop the active session locally without recording an outcome.
    ///
    /// The countdown stops and any block is lifted; the store is not told,
    /// so the backend keeps the session as started.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::InvalidState`] when nothing is active.
    pub async fn discard(&mut self) -> Result<StudySession, StudyError> {
        let ActiveSession {
            session,
            mut countdown,
            ..
        } = self.active.take().ok_or_else(no_active_session)?;
        countdown.cancel();
        self.state = LifecycleState::Idle;
        info!(session = %session.id, "discarding study session");

        self.release_block().await;
        self.notifier
            .warning("Session discarded; the backend still lists it as started");
        Ok(session)
    }

    /// Cancel the countdown and forget the active session. No network calls.
    ///
    /// Dropping the controller has the same effect on the countdown.
    pub fn teardown(&mut self) -> Option<StudySession> {
        let mut active = self.active.take()?;
        active.countdown.cancel();
        self.state = LifecycleState::Idle;
        debug!(session = %active.session.id, "controller torn down");
        Some(active.session)
    }

    fn current_epoch(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.countdown.epoch())
    }

    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        matches!(self.state, LifecycleState::Paused)
    }

    #[must_use]
    pub fn active_session(&self) -> Option<&StudySession> {
        self.active.as_ref().map(|a| &a.session)
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.active.as_ref().map_or(0, |a| a.timer.remaining_seconds())
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u32 {
        self.active.as_ref().map_or(0, |a| a.timer.elapsed_seconds())
    }

    /// Elapsed share of the session, 0 when idle.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.active.as_ref().map_or(0.0, |a| {
            progress_percent(a.timer.total_seconds(), a.timer.remaining_seconds())
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        let active = self.active.as_ref();
        TimerSnapshot {
            state: self.state,
            session_id: active.map(|a| a.session.id.clone()),
            subject: active.map(|a| a.session.subject.clone()),
            remaining_seconds: self.time_remaining(),
            total_seconds: active.map_or(0, |a| a.timer.total_seconds()),
            elapsed_seconds: self.elapsed_seconds(),
            progress_percent: self.progress_percent(),
            is_active: self.is_active(),
            is_paused: self.is_paused(),
        }
    }

    #[must_use]
    pub const fn options(&self) -> &ControllerOptions {
        &self.options
    }

    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::api::{BlockResponse, UnblockResponse};
    use crate::core::{MockBlockingService, MockSessionStore};
    use crate::notify::{drain, ChannelNotifier, Notification, NotificationKind};

    type TestController = SessionController<MockSessionStore, MockBlockingService, ChannelNotifier>;

    fn session(minutes: u32) -> StudySession {
        StudySession {
            id: "s1".to_string(),
            subject: "Math".to_string(),
            duration_minutes: minutes,
            start_time: None,
            end_time: None,
            goals: vec!["Review algebra".to_string()],
            completed_goals: Vec::new(),
            focus_score: None,
            notes: String::new(),
            distractions: 0,
            breaks_taken: 0,
        }
    }

    fn accepting_store() -> MockSessionStore {
        let mut store = MockSessionStore::new();
        store.expect_start_session().returning(|_| Ok(()));
        store.expect_end_session().returning(|_, _| Ok(()));
        store
    }

    fn working_blocker() -> MockBlockingService {
        let mut blocker = MockBlockingService::new();
        blocker.expect_block().returning(|req| {
            Ok(BlockResponse {
                success: true,
                blocked_count: Some(u32::try_from(req.websites.len()).unwrap()),
                mock_mode: Some(false),
                message: None,
            })
        });
        blocker.expect_unblock().returning(|| {
            Ok(UnblockResponse {
                success: true,
                message: None,
            })
        });
        blocker
    }

    fn controller(
        store: MockSessionStore,
        blocker: MockBlockingService,
    ) -> (TestController, UnboundedReceiver<Notification>) {
        let (notifier, rx) = ChannelNotifier::new();
        (
            SessionController::new(store, blocker, notifier, ControllerOptions::default()),
            rx,
        )
    }

    fn kinds(notes: &[Notification]) -> Vec<NotificationKind> {
        notes.iter().map(|n| n.kind).collect()
    }

    #[tokio::test]
    async fn test_start_sets_remaining_from_duration() {
        for minutes in [1, 25, 90] {
            let (mut c, _rx) = controller(accepting_store(), working_blocker());
            c.start(session(minutes)).await.unwrap();

            assert_eq!(c.state(), LifecycleState::Active);
            assert_eq!(c.time_remaining(), minutes * 60);
            assert!(c.active_session().unwrap().start_time.is_some());
        }
    }

    #[tokio::test]
    async fn test_start_rejected_stays_idle() {
        let mut store = MockSessionStore::new();
        store.expect_start_session().times(1).returning(|_| {
            Err(StudyError::Api {
                status: 409,
                message: "Session already started".to_string(),
            })
        });
        let mut blocker = MockBlockingService::new();
        blocker.expect_block().never();

        let (mut c, mut rx) = controller(store, blocker);
        let err = c.start(session(25)).await.unwrap_err();

        assert!(matches!(err, StudyError::StartRejected(_)));
        assert_eq!(c.state(), LifecycleState::Idle);
        assert!(!c.is_active());
        assert_eq!(c.time_remaining(), 0);
        assert_eq!(kinds(&drain(&mut rx)), vec![NotificationKind::Error]);
    }

    #[tokio::test]
    async fn test_start_rejects_zero_duration_without_store_call() {
        let mut store = MockSessionStore::new();
        store.expect_start_session().never();

        let (mut c, _rx) = controller(store, MockBlockingService::new());
        assert!(matches!(
            c.start(session(0)).await,
            Err(StudyError::Validation(_))
        ));
        assert_eq!(c.state(), LifecycleState::Idle);
    }

    #[tokio::test]
    async fn test_blocking_failure_only_warns() {
        let mut blocker = MockBlockingService::new();
        blocker
            .expect_block()
            .returning(|_| Err(StudyError::Network("connection refused".to_string())));

        let (mut c, mut rx) = controller(accepting_store(), blocker);
        c.start(session(25)).await.unwrap();

        assert_eq!(c.state(), LifecycleState::Active);
        let notes = drain(&mut rx);
        assert!(notes.iter().any(|n| n.kind == NotificationKind::Warning));
        assert!(notes.iter().all(|n| n.kind != NotificationKind::Error));
    }

    #[tokio::test]
    async fn test_end_lifts_block_even_when_block_timed_out() {
        let mut blocker = MockBlockingService::new();
        blocker
            .expect_block()
            .times(1)
            .returning(|_| Err(StudyError::Timeout("http://localhost:5000".to_string())));
        blocker.expect_unblock().times(1).returning(|| {
            Ok(UnblockResponse {
                success: true,
                message: None,
            })
        });

        let (mut c, mut rx) = controller(accepting_store(), blocker);
        c.start(session(25)).await.unwrap();
        let report = c.end_with_defaults().await.unwrap();

        assert!(report.is_recorded());
        assert_eq!(c.state(), LifecycleState::Idle);
        assert!(drain(&mut rx).iter().any(|n| n.message == "Websites unblocked"));
    }

    #[tokio::test]
    async fn test_out_of_range_default_score_still_completes_once() {
        let mut store = MockSessionStore::new();
        store.expect_start_session().returning(|_| Ok(()));
        store
            .expect_end_session()
            .withf(|_, outcome| outcome.focus_score == 100)
            .times(1)
            .returning(|_, _| Ok(()));

        let (notifier, _rx) = ChannelNotifier::new();
        let options = ControllerOptions {
            default_focus_score: 150,
            ..ControllerOptions::default()
        };
        let mut c = SessionController::new(store, working_blocker(), notifier, options);
        assert_eq!(c.options().default_focus_score, 100);

        c.start(session(1)).await.unwrap();
        let mut reports = 0;
        for _ in 0..200 {
            if c.tick().await.is_some() {
                reports += 1;
            }
        }

        assert_eq!(reports, 1);
        assert_eq!(c.state(), LifecycleState::Idle);
        assert_eq!(c.time_remaining(), 0);
    }

    #[tokio::test]
    async fn test_second_start_is_refused() {
        let (mut c, _rx) = controller(accepting_store(), working_blocker());
        c.start(session(25)).await.unwrap();

        let err = c.start(session(10)).await.unwrap_err();
        assert!(matches!(err, StudyError::InvalidState(_)));
        assert_eq!(c.time_remaining(), 1500);
    }

    #[tokio::test]
    async fn test_tick_decrements_only_while_active() {
        let (mut c, _rx) = controller(accepting_store(), working_blocker());
        c.start(session(25)).await.unwrap();

        c.tick().await;
        c.tick().await;
        assert_eq!(c.time_remaining(), 1498);

        c.pause().unwrap();
        assert!(c.is_paused());
        for _ in 0..10 {
            assert!(c.tick().await.is_none());
        }
        assert_eq!(c.time_remaining(), 1498);

        c.resume().unwrap();
        c.tick().await;
        assert_eq!(c.time_remaining(), 1497);
    }

    #[tokio::test]
    async fn test_pause_resume_preserves_remaining() {
        let (mut c, _rx) = controller(accepting_store(), working_blocker());
        c.start(session(5)).await.unwrap();
        c.tick().await;

        let before = c.time_remaining();
        assert_eq!(c.toggle_pause().unwrap(), LifecycleState::Paused);
        assert_eq!(c.toggle_pause().unwrap(), LifecycleState::Active);
        assert_eq!(c.time_remaining(), before);
    }

    #[tokio::test]
    async fn test_pause_requires_active_session() {
        let (mut c, _rx) = controller(accepting_store(), working_blocker());
        assert!(matches!(c.pause(), Err(StudyError::InvalidState(_))));
        assert!(matches!(c.resume(), Err(StudyError::InvalidState(_))));

        c.start(session(5)).await.unwrap();
        assert!(matches!(c.resume(), Err(StudyError::InvalidState(_))));
        c.pause().unwrap();
        assert!(matches!(c.pause(), Err(StudyError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_full_countdown_completes_once_with_all_goals() {
        let mut store = MockSessionStore::new();
        store.expect_start_session().returning(|_| Ok(()));
        store
            .expect_end_session()
            .withf(|id, outcome| {
                id == "s1"
                    && outcome.focus_score == DEFAULT_FOCUS_SCORE
                    && outcome.completed_goals == vec!["Review algebra".to_string()]
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let (mut c, mut rx) = controller(store, working_blocker());
        c.start(session(25)).await.unwrap();

        let mut reports = Vec::new();
        for _ in 0..1500 {
            if let Some(report) = c.tick().await {
                reports.push(report);
            }
        }
        // Further ticks after completion do nothing.
        assert!(c.tick().await.is_none());

        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.reason, EndReason::Completed);
        assert!(report.is_recorded());
        assert!(report
            .session
            .completed_goals
            .contains(&"Review algebra".to_string()));
        assert!(report.session.end_time.is_some());
        assert_eq!(c.state(), LifecycleState::Idle);
        assert!(!c.is_active());

        let messages: Vec<String> = drain(&mut rx).into_iter().map(|n| n.message).collect();
        assert!(messages.iter().any(|m| m.contains("completed")));
        assert!(messages.iter().any(|m| m == "Websites unblocked"));
    }

    #[tokio::test]
    async fn test_progress_monotonic_over_session() {
        let (mut c, _rx) = controller(accepting_store(), working_blocker());
        c.start(session(1)).await.unwrap();

        let mut last = c.progress_percent();
        assert!(last.abs() < f64::EPSILON);
        while c.is_active() {
            let percent = c.progress_percent();
            assert!(percent >= last && percent <= 100.0);
            last = percent;
            c.tick().await;
        }
        assert!(last > 98.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_cancels_countdown() {
        let (mut c, _rx) = controller(accepting_store(), working_blocker());
        c.start(session(25)).await.unwrap();

        let tick = c.next_tick().await;
        assert!(c.handle_tick(tick).await.is_none());
        assert_eq!(c.time_remaining(), 1499);

        let report = c.end_with_defaults().await.unwrap();
        assert_eq!(report.reason, EndReason::Manual);
        assert_eq!(c.state(), LifecycleState::Idle);

        let waited = tokio::time::timeout(Duration::from_secs(10), c.next_tick()).await;
        assert!(waited.is_err(), "no tick may arrive after end()");
    }

    #[tokio::test]
    async fn test_end_failure_still_resets_locally() {
        let mut store = MockSessionStore::new();
        store.expect_start_session().returning(|_| Ok(()));
        store.expect_end_session().returning(|_, _| {
            Err(StudyError::Api {
                status: 500,
                message: "disk full".to_string(),
            })
        });

        let (mut c, mut rx) = controller(store, working_blocker());
        c.start(session(25)).await.unwrap();
        drain(&mut rx);

        let outcome = SessionOutcome {
            focus_score: 60,
            completed_goals: Vec::new(),
            notes: "tired".to_string(),
            distractions: 2,
            breaks_taken: 1,
        };
        let report = c.end(outcome).await.unwrap();

        assert!(matches!(report.error, Some(StudyError::EndRejected(_))));
        assert_eq!(c.state(), LifecycleState::Idle);
        assert!(drain(&mut rx)
            .iter()
            .any(|n| n.kind == NotificationKind::Error));
    }

    #[tokio::test]
    async fn test_end_rejects_bad_outcome_and_keeps_running() {
        let mut store = MockSessionStore::new();
        store.expect_start_session().returning(|_| Ok(()));
        store.expect_end_session().never();

        let (mut c, _rx) = controller(store, working_blocker());
        c.start(session(25)).await.unwrap();

        let mut outcome = SessionOutcome::completed(&["Unrelated".to_string()], 80);
        assert!(matches!(
            c.end(outcome.clone()).await,
            Err(StudyError::Validation(_))
        ));
        outcome.completed_goals.clear();
        outcome.focus_score = 150;
        assert!(c.end(outcome).await.is_err());

        assert_eq!(c.state(), LifecycleState::Active);
        assert_eq!(c.time_remaining(), 1500);
    }

    #[tokio::test]
    async fn test_end_when_idle() {
        let (mut c, _rx) = controller(accepting_store(), working_blocker());
        assert!(matches!(
            c.end_with_defaults().await,
            Err(StudyError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_stale_tick_is_ignored() {
        let (mut c, _rx) = controller(accepting_store(), working_blocker());
        c.start(session(25)).await.unwrap();

        assert!(c.handle_tick(Tick { epoch: 999 }).await.is_none());
        assert_eq!(c.time_remaining(), 1500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_countdown() {
        let (mut c, _rx) = controller(accepting_store(), working_blocker());
        c.start(session(25)).await.unwrap();

        let left = c.teardown().unwrap();
        assert_eq!(left.id, "s1");
        assert_eq!(c.state(), LifecycleState::Idle);

        let waited = tokio::time::timeout(Duration::from_secs(10), c.next_tick()).await;
        assert!(waited.is_err());
        assert!(c.teardown().is_none());
    }

    #[tokio::test]
    async fn test_discard_allows_new_start() {
        let (mut c, mut rx) = controller(accepting_store(), working_blocker());
        c.start(session(25)).await.unwrap();

        let discarded = c.discard().await.unwrap();
        assert_eq!(discarded.id, "s1");
        assert_eq!(c.state(), LifecycleState::Idle);
        assert!(drain(&mut rx)
            .iter()
            .any(|n| n.kind == NotificationKind::Warning));

        c.start(session(10)).await.unwrap();
        assert_eq!(c.time_remaining(), 600);
    }

    #[tokio::test]
    async fn test_no_blocking_when_disabled() {
        let mut blocker = MockBlockingService::new();
        blocker.expect_block().never();
        blocker.expect_unblock().never();

        let (notifier, _rx) = ChannelNotifier::new();
        let options = ControllerOptions::default().with_blocking(false);
        let mut c = SessionController::new(accepting_store(), blocker, notifier, options);

        c.start(session(1)).await.unwrap();
        c.end_with_defaults().await.unwrap();
    }

    #[tokio::test]
    async fn test_snapshot() {
        let (mut c, _rx) = controller(accepting_store(), working_blocker());
        let idle = c.snapshot();
        assert_eq!(idle.state, LifecycleState::Idle);
        assert!(!idle.is_active);
        assert_eq!(idle.remaining_seconds, 0);

        c.start(session(2)).await.unwrap();
        for _ in 0..60 {
            c.tick().await;
        }
        let snap = c.snapshot();
        assert_eq!(snap.session_id.as_deref(), Some("s1"));
        assert_eq!(snap.total_seconds, 120);
        assert_eq!(snap.elapsed_seconds, 60);
        assert!((snap.progress_percent - 50.0).abs() < 0.01);
    }
}
