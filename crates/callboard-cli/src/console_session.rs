//! Terminal stand-in for the real-time voice SDK.
//!
//! Emits `Started` when started and `Ended` once the operator presses Enter
//! (or stdin closes). No audio and no transcript.

use async_trait::async_trait;
use callboard_runtime::{LiveCallSession, Result, SessionEvent, SessionEvents};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

pub struct ConsoleSession {
    sender: Option<UnboundedSender<SessionEvent>>,
    events: Option<SessionEvents>,
    reader: Option<JoinHandle<()>>,
}

impl Default for ConsoleSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSession {
    pub fn new() -> Self {
        let (sender, events) = SessionEvents::channel();
        Self {
            sender: Some(sender),
            events: Some(events),
            reader: None,
        }
    }
}

#[async_trait]
impl LiveCallSession for ConsoleSession {
    async fn start(&mut self, access_token: &str) -> Result<()> {
        let Some(sender) = self.sender.clone() else {
            return Err(callboard_runtime::Error::Session(
                "session already stopped".to_string(),
            ));
        };
        debug!(token_len = access_token.len(), "console session starting");
        let _ = sender.send(SessionEvent::Started);

        self.reader = Some(tokio::spawn(async move {
            let mut line = String::new();
            let mut stdin = BufReader::new(tokio::io::stdin());
            let event = match stdin.read_line(&mut line).await {
                Ok(_) => SessionEvent::Ended,
                Err(err) => SessionEvent::Error(format!("could not read from terminal: {}", err)),
            };
            let _ = sender.send(event);
        }));
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(SessionEvent::Ended);
        }
        Ok(())
    }

    fn take_events(&mut self) -> Option<SessionEvents> {
        self.events.take()
    }
}
