use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use callboard_types::TranscriptEntry;
use futures::stream::{Stream, StreamExt};
use tokio::sync::mpsc;

use crate::desk::{CallDesk, SessionToken};
use crate::Result;

/// Events emitted by the real-time voice SDK for one call
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started,
    /// Cumulative snapshot of the conversation so far.
    TranscriptUpdate(Vec<TranscriptEntry>),
    Ended,
    Error(String),
}

/// Seam for the external real-time voice client.
#[async_trait]
pub trait LiveCallSession: Send {
    async fn start(&mut self, access_token: &str) -> Result<()>;

    async fn stop(&mut self) -> Result<()>;

    /// The event stream for this session. Yields `Some` once.
    fn take_events(&mut self) -> Option<SessionEvents>;
}

/// Async stream of [`SessionEvent`]s backed by an unbounded channel.
pub struct SessionEvents {
    receiver: mpsc::UnboundedReceiver<SessionEvent>,
}

impl SessionEvents {
    pub fn channel() -> (mpsc::UnboundedSender<SessionEvent>, SessionEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, SessionEvents { receiver: rx })
    }

    /// Next event if one is already queued.
    pub fn try_next(&mut self) -> Option<SessionEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Stream for SessionEvents {
    type Item = SessionEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// How a driven session finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    Ended,
    Failed(String),
    /// The event source went away without an end or error event.
    Disconnected,
}

/// Feed session events into `desk` until the call ends or fails.
///
/// A normal end triggers the desk's poll loop; callers await it with
/// [`CallDesk::wait_for_outcome`].
pub async fn drive_session(
    desk: &CallDesk,
    token: SessionToken,
    events: &mut SessionEvents,
) -> SessionEnd {
    while let Some(event) = events.next().await {
        let end = match &event {
            SessionEvent::Ended => Some(SessionEnd::Ended),
            SessionEvent::Error(reason) => Some(SessionEnd::Failed(reason.clone())),
            SessionEvent::Started | SessionEvent::TranscriptUpdate(_) => None,
        };
        desk.handle_event(token, event);
        if let Some(end) = end {
            return end;
        }
    }
    SessionEnd::Disconnected
}
