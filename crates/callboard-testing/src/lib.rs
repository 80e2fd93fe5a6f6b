//! Testing infrastructure for callboard tests.
//!
//! - `FakeBackend`: in-memory backend with scripted result availability and failures
//! - `ManualClock`: virtual clock that records every requested delay
//! - `ScriptedSession`: live call session that replays a fixed event script
//! - `fixtures`: sample records, transcripts and results
//! - `TestWorld`: isolated workspace for driving the CLI binary

pub mod backend;
pub mod clock;
pub mod fixtures;
pub mod session;
pub mod world;

pub use backend::FakeBackend;
pub use clock::ManualClock;
pub use session::ScriptedSession;
pub use world::{CliResult, TestWorld};
