use async_trait::async_trait;
use callboard_runtime::{Error, LiveCallSession, Result, SessionEvent, SessionEvents};

/// Live session that emits a fixed script of events once started.
pub struct ScriptedSession {
    script: Vec<SessionEvent>,
    events: Option<SessionEvents>,
    sender: Option<tokio::sync::mpsc::UnboundedSender<SessionEvent>>,
    started_with: Option<String>,
    stopped: bool,
    fail_start: Option<String>,
}

impl ScriptedSession {
    pub fn new(script: Vec<SessionEvent>) -> Self {
        let (sender, events) = SessionEvents::channel();
        Self {
            script,
            events: Some(events),
            sender: Some(sender),
            started_with: None,
            stopped: false,
            fail_start: None,
        }
    }

    /// Make `start` fail the way an SDK connection failure would.
    pub fn failing(reason: impl Into<String>) -> Self {
        let mut session = Self::new(Vec::new());
        session.fail_start = Some(reason.into());
        session
    }

    pub fn started_with(&self) -> Option<&str> {
        self.started_with.as_deref()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[async_trait]
impl LiveCallSession for ScriptedSession {
    async fn start(&mut self, access_token: &str) -> Result<()> {
        if let Some(reason) = &self.fail_start {
            return Err(Error::Session(reason.clone()));
        }
        self.started_with = Some(access_token.to_string());
        // Dropping the sender afterwards closes the stream once the script drains.
        if let Some(sender) = self.sender.take() {
            for event in self.script.drain(..) {
                let _ = sender.send(event);
            }
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.stopped = true;
        self.sender = None;
        Ok(())
    }

    fn take_events(&mut self) -> Option<SessionEvents> {
        self.events.take()
    }
}
