//! `callboard` command-line client.
//!
//! Handlers talk to the backend through `callboard-client`. The test-call
//! flow is driven through the `CallDesk` from `callboard-runtime`, with the
//! terminal standing in for the voice SDK (see [`console_session`]).

mod args;
mod commands;
pub mod console_session;
pub mod context;
mod handlers;
pub mod logging;
pub mod presentation;

pub use args::{
    AgentCommand, AgentFieldArgs, AuthCommand, CallCommand, Cli, Commands, LogLevel, OutputFormat,
    TestCallCommand,
};
pub use commands::run;
