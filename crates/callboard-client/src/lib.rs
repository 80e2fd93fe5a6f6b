//! Client for the callboard backend REST API.
//!
//! [`HttpBackend`] speaks HTTP to the backend. The poller and the call desk in
//! `callboard-runtime` depend only on the [`CallQueries`] and [`CallLauncher`]
//! traits, so tests can swap in a scripted backend.

pub mod config;
pub mod error;
pub mod http;
pub mod queries;

pub use config::{Config, Credentials, PollSettings, resolve_token, resolve_workspace_path};
pub use error::{Error, Result};
pub use http::HttpBackend;
pub use queries::{CallBackend, CallLauncher, CallQueries};
