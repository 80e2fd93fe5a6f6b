//! Call Desk: owner of the "current call" state for the test-call flow.
//!
//! Only three things ever write the current call: the poll loop on success,
//! a manual refresh on success, and an explicit reset. Every asynchronous
//! writer carries the [`SessionToken`] it was started under and its commit is
//! dropped when that token is no longer current.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use callboard_client::CallBackend;
use callboard_types::{
    CallRecord, FullCallDetails, PhoneCallInput, TranscriptEntry, WebCallInput, WebCallResponse,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::poller::{CallOutcomePoller, PollOutcome, PollPolicy, PollProgress};
use crate::session::SessionEvent;
use crate::transcript::TranscriptAccumulator;
use crate::{Error, Result};

pub const NOTICE_STARTED: &str = "Call started - speak now!";
pub const NOTICE_PROCESSING: &str = "Call ended. Processing transcript and extracting data...";
pub const NOTICE_ANALYZED: &str = "Call completed! Results analyzed and ready.";
pub const NOTICE_UNANALYZED: &str =
    "Call completed. Run a manual refresh if results don't appear.";
pub const NOTICE_REFRESHING: &str = "Fetching latest call data...";
pub const NOTICE_REFRESHED: &str = "Call data refreshed successfully!";
pub const NOTICE_PHONE_STARTED: &str = "Phone call initiated successfully!";

/// Generation of the desk's current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(u64);

impl SessionToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifecycle {
    NotStarted,
    Active,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Idle,
    InCall,
    Processing { attempt: u32, max_attempts: u32 },
    Analyzed,
    /// The call finished but no results arrived within the poll budget.
    Unanalyzed,
}

/// Client-side handle to one live call
#[derive(Debug, Clone)]
pub struct CallSession {
    pub token: SessionToken,
    /// Provider-issued id from session start.
    pub call_id: String,
    /// Durable backend id, once known.
    pub resolved_call_id: Option<String>,
    pub transcript: TranscriptAccumulator,
    pub lifecycle: SessionLifecycle,
    poll_started: bool,
}

impl CallSession {
    fn new(token: SessionToken, call_id: String) -> Self {
        Self {
            token,
            call_id,
            resolved_call_id: None,
            transcript: TranscriptAccumulator::new(),
            lifecycle: SessionLifecycle::NotStarted,
            poll_started: false,
        }
    }

    /// Id to use for backend reads: the durable one when known.
    pub fn lookup_id(&self) -> &str {
        self.resolved_call_id.as_deref().unwrap_or(&self.call_id)
    }
}

/// Point-in-time copy of the desk state for rendering
#[derive(Debug, Clone)]
pub struct DeskSnapshot {
    pub token: SessionToken,
    pub phase: CallPhase,
    pub session: Option<CallSession>,
    pub details: Option<FullCallDetails>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl DeskSnapshot {
    pub fn transcript(&self) -> &[TranscriptEntry] {
        self.session
            .as_ref()
            .map(|s| s.transcript.entries())
            .unwrap_or(&[])
    }
}

#[derive(Debug)]
struct DeskState {
    generation: u64,
    phase: CallPhase,
    session: Option<CallSession>,
    details: Option<FullCallDetails>,
    notice: Option<String>,
    error: Option<String>,
}

impl DeskState {
    fn token(&self) -> SessionToken {
        SessionToken(self.generation)
    }

    fn is_current(&self, token: SessionToken) -> bool {
        self.generation == token.0
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.phase = CallPhase::Idle;
        self.session = None;
        self.details = None;
        self.notice = None;
        self.error = None;
    }
}

/// The cancel token stays in the slot until the task is replaced or
/// finishes, even while a caller is awaiting the handle.
struct PollTask {
    token: SessionToken,
    cancel: CancellationToken,
    handle: Option<JoinHandle<PollOutcome>>,
}

pub struct CallDesk {
    backend: Arc<dyn CallBackend>,
    poller: CallOutcomePoller,
    state: Arc<Mutex<DeskState>>,
    poll: Mutex<Option<PollTask>>,
}

impl CallDesk {
    pub fn new<B>(backend: Arc<B>, clock: Arc<dyn Clock>, policy: PollPolicy) -> Self
    where
        B: CallBackend + 'static,
    {
        let poller = CallOutcomePoller::new(backend.clone(), clock, policy);
        Self {
            backend,
            poller,
            state: Arc::new(Mutex::new(DeskState {
                generation: 0,
                phase: CallPhase::Idle,
                session: None,
                details: None,
                notice: None,
                error: None,
            })),
            poll: Mutex::new(None),
        }
    }

    pub fn poller(&self) -> &CallOutcomePoller {
        &self.poller
    }

    pub fn snapshot(&self) -> DeskSnapshot {
        let state = lock(&self.state);
        DeskSnapshot {
            token: state.token(),
            phase: state.phase,
            session: state.session.clone(),
            details: state.details.clone(),
            notice: state.notice.clone(),
            error: state.error.clone(),
        }
    }

    pub fn current_token(&self) -> SessionToken {
        lock(&self.state).token()
    }

    /// Create a web call on the backend and open a fresh session for it.
    pub async fn start_web_call(
        &self,
        input: &WebCallInput,
    ) -> Result<(SessionToken, WebCallResponse)> {
        let response = match self.backend.create_web_call(input).await {
            Ok(response) => response,
            Err(err) => {
                lock(&self.state).error = Some(format!("Failed to start web call: {}", err));
                return Err(err.into());
            }
        };
        let token = self.begin_session(&response.call_id);
        Ok((token, response))
    }

    /// Outbound phone calls are fire-and-forget; results show up in the call list.
    pub async fn start_phone_call(&self, input: &PhoneCallInput) -> Result<CallRecord> {
        match self.backend.create_phone_call(input).await {
            Ok(record) => {
                let mut state = lock(&self.state);
                state.error = None;
                state.notice = Some(NOTICE_PHONE_STARTED.to_string());
                Ok(record)
            }
            Err(err) => {
                lock(&self.state).error =
                    Some(format!("Failed to initiate phone call: {}", err));
                Err(err.into())
            }
        }
    }

    /// Open a session for `call_id`, discarding the previous one and any poll still running for it.
    pub fn begin_session(&self, call_id: &str) -> SessionToken {
        self.cancel_poll();
        let mut state = lock(&self.state);
        state.reset();
        let token = state.token();
        state.session = Some(CallSession::new(token, call_id.to_string()));
        token
    }

    /// Drop the current call entirely.
    pub fn start_new_call(&self) -> SessionToken {
        self.cancel_poll();
        let mut state = lock(&self.state);
        state.reset();
        state.token()
    }

    /// Apply a live-session event. Returns false when `token` is stale.
    ///
    /// `Ended` spawns the poll loop, so this must run inside a tokio runtime.
    pub fn handle_event(&self, token: SessionToken, event: SessionEvent) -> bool {
        let mut state = lock(&self.state);
        if !state.is_current(token) {
            debug!(
                generation = token.0,
                current = state.generation,
                "dropping event for stale session"
            );
            return false;
        }

        let max_attempts = self.poller.policy().max_attempts;
        let DeskState {
            phase,
            session,
            notice,
            error,
            ..
        } = &mut *state;
        let Some(session) = session.as_mut() else {
            return false;
        };

        match event {
            SessionEvent::Started => {
                session.lifecycle = SessionLifecycle::Active;
                *phase = CallPhase::InCall;
                *notice = Some(NOTICE_STARTED.to_string());
            }
            SessionEvent::TranscriptUpdate(entries) => {
                session.transcript.apply(entries);
            }
            SessionEvent::Error(reason) => {
                session.lifecycle = SessionLifecycle::Ended;
                *phase = CallPhase::Idle;
                *error = Some(format!("Call error: {}", reason));
            }
            SessionEvent::Ended => {
                if session.poll_started {
                    debug!(generation = token.0, "ignoring repeated end event");
                    return true;
                }
                session.lifecycle = SessionLifecycle::Ended;
                session.poll_started = true;
                *phase = CallPhase::Processing {
                    attempt: 0,
                    max_attempts,
                };
                *notice = Some(NOTICE_PROCESSING.to_string());
                let call_id = session.call_id.clone();
                drop(state);
                self.spawn_poll(token, call_id);
            }
        }
        true
    }

    fn spawn_poll(&self, token: SessionToken, call_id: String) {
        let cancel = CancellationToken::new();
        let poller = self.poller.clone();
        let state = Arc::clone(&self.state);
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let progress_state = Arc::clone(&state);
            let outcome = poller
                .run(&call_id, &task_cancel, move |progress| {
                    commit_progress(&progress_state, token, progress)
                })
                .await;
            commit_outcome(&state, token, &outcome);
            outcome
        });

        let previous = lock(&self.poll).replace(PollTask {
            token,
            cancel,
            handle: Some(handle),
        });
        if let Some(previous) = previous {
            previous.cancel.cancel();
        }
    }

    fn cancel_poll(&self) {
        if let Some(task) = lock(&self.poll).take() {
            debug!(generation = task.token.0, "cancelling in-flight poll");
            task.cancel.cancel();
        }
    }

    /// Wait for the current session's poll loop, if one was started.
    ///
    /// Dropping the returned future leaves the loop cancellable by the next
    /// [`CallDesk::begin_session`] or [`CallDesk::start_new_call`].
    pub async fn wait_for_outcome(&self) -> Option<PollOutcome> {
        let (token, handle) = {
            let mut slot = lock(&self.poll);
            let task = slot.as_mut()?;
            (task.token, task.handle.take()?)
        };
        let joined = handle.await;

        let mut slot = lock(&self.poll);
        if slot.as_ref().is_some_and(|task| task.token == token) {
            *slot = None;
        }
        drop(slot);

        match joined {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                warn!(error = %err, "poll task did not complete");
                None
            }
        }
    }

    /// Stop the loop for `token` without clearing the slot, so a waiter
    /// still sees how it ended.
    fn stop_poll(&self, token: SessionToken) {
        if let Some(task) = lock(&self.poll).as_ref()
            && task.token == token
        {
            debug!(generation = token.0, "stopping poll after analyzed refresh");
            task.cancel.cancel();
        }
    }

    /// One non-retrying fetch of the current call's latest state.
    ///
    /// Failures are recorded as the desk's error and returned. Never starts
    /// the automatic loop. Analyzed results stop a loop that is still
    /// running; anything else leaves it going.
    pub async fn refresh(&self) -> Result<FullCallDetails> {
        let (token, lookup_id) = {
            let mut state = lock(&self.state);
            let Some(session) = state.session.as_ref() else {
                return Err(Error::NoActiveCall);
            };
            let lookup_id = session.lookup_id().to_string();
            state.notice = Some(NOTICE_REFRESHING.to_string());
            state.error = None;
            (state.token(), lookup_id)
        };

        let result = self.poller.refresh(&lookup_id).await;

        let mut state = lock(&self.state);
        let current = state.is_current(token);
        match result {
            Ok(details) => {
                let analyzed = details.is_analyzed();
                if current {
                    if let Some(session) = state.session.as_mut() {
                        session.resolved_call_id = Some(details.call.id.clone());
                    }
                    if analyzed {
                        state.phase = CallPhase::Analyzed;
                    }
                    state.details = Some(details.clone());
                    state.notice = Some(NOTICE_REFRESHED.to_string());
                } else {
                    debug!(generation = token.0, "discarding refresh for stale session");
                }
                drop(state);
                if current && analyzed {
                    self.stop_poll(token);
                }
                Ok(details)
            }
            Err(err) => {
                if current {
                    state.notice = None;
                    state.error = Some(format!("Failed to refresh call data: {}", err));
                }
                Err(err.into())
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn commit_progress(state: &Mutex<DeskState>, token: SessionToken, progress: PollProgress) {
    let mut state = lock(state);
    if !state.is_current(token) {
        return;
    }
    if let PollProgress::Attempt {
        attempt,
        max_attempts,
    } = progress
    {
        state.phase = CallPhase::Processing {
            attempt,
            max_attempts,
        };
        state.notice = Some(format!(
            "Fetching call results... ({}/{})",
            attempt, max_attempts
        ));
    }
}

fn commit_outcome(state: &Mutex<DeskState>, token: SessionToken, outcome: &PollOutcome) {
    let mut state = lock(state);
    if !state.is_current(token) {
        debug!(generation = token.0, "discarding poll outcome for stale session");
        return;
    }

    match outcome {
        PollOutcome::Resolved { details, .. } => {
            if let Some(session) = state.session.as_mut() {
                session.resolved_call_id = Some(details.call.id.clone());
            }
            state.details = Some(details.clone());
            state.phase = CallPhase::Analyzed;
            state.notice = Some(NOTICE_ANALYZED.to_string());
        }
        // Results committed by a refresh while the last attempt was in
        // flight win over the loop giving up.
        PollOutcome::Exhausted { .. } if state.phase == CallPhase::Analyzed => {
            debug!(generation = token.0, "poll exhausted after results were committed");
        }
        PollOutcome::Exhausted { last_seen, .. } => {
            if let Some(details) = last_seen
                && let Some(session) = state.session.as_mut()
            {
                session.resolved_call_id = Some(details.call.id.clone());
            }
            state.phase = CallPhase::Unanalyzed;
            state.notice = Some(NOTICE_UNANALYZED.to_string());
        }
        PollOutcome::Cancelled => {}
    }
}
