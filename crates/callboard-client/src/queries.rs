use async_trait::async_trait;
use callboard_types::{CallRecord, FullCallDetails, PhoneCallInput, WebCallInput, WebCallResponse};

use crate::Result;

/// Idempotent call reads. Every method is safe to repeat and has no backend side effects.
#[async_trait]
pub trait CallQueries: Send + Sync {
    /// `GET /calls`, newest first.
    async fn list_calls(&self) -> Result<Vec<CallRecord>>;

    /// `GET /calls/{id}`. Fails with `NotFound` when `id` names no record owned by the caller.
    async fn get_call(&self, id: &str) -> Result<CallRecord>;

    /// `GET /calls/{id}/full`. `results` stays `None` until post-call analysis lands.
    async fn get_call_full(&self, id: &str) -> Result<FullCallDetails>;
}

/// Operations that start a call through the backend.
#[async_trait]
pub trait CallLauncher: Send + Sync {
    async fn create_web_call(&self, input: &WebCallInput) -> Result<WebCallResponse>;
    async fn create_phone_call(&self, input: &PhoneCallInput) -> Result<CallRecord>;
}

pub trait CallBackend: CallQueries + CallLauncher {}

impl<T: CallQueries + CallLauncher> CallBackend for T {}
