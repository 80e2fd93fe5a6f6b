//! Client-side runtime for test calls.
//!
//! - [`poller`]: bounded retry loop that waits for the backend to attach
//!   analysis results to a finished call
//! - [`transcript`]: snapshot-replacing live transcript
//! - [`session`]: seam for the external real-time voice SDK
//! - [`desk`]: explicit owner of the "current call" state, with session
//!   liveness checks guarding every asynchronous commit

pub mod clock;
pub mod desk;
pub mod error;
pub mod poller;
pub mod session;
pub mod transcript;

pub use clock::{Clock, TokioClock};
pub use desk::{CallDesk, CallPhase, CallSession, DeskSnapshot, SessionLifecycle, SessionToken};
pub use error::{Error, Result};
pub use poller::{CallOutcomePoller, PollOutcome, PollPolicy, PollProgress};
pub use session::{LiveCallSession, SessionEnd, SessionEvent, SessionEvents, drive_session};
pub use transcript::TranscriptAccumulator;
