//! In-memory stand-in for the backend's call endpoints.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use callboard_client::{CallLauncher, CallQueries, Error, Result};
use callboard_types::{
    CallRecord, CallResults, CallStatus, CallType, FullCallDetails, PhoneCallInput, WebCallInput,
    WebCallResponse,
};
use tokio::sync::Semaphore;

use crate::fixtures;

#[derive(Default)]
struct State {
    records: Vec<CallRecord>,
    results: HashMap<String, CallResults>,
    results_from_fetch: Option<u32>,
    results_available: bool,
    provider_id_lookup: bool,
    failing_fetches: HashSet<u32>,
    fail_all: bool,
    next_web_call: Option<String>,
    web_calls: Vec<WebCallInput>,
    phone_calls: Vec<PhoneCallInput>,
}

struct FetchGate {
    /// `None` holds every full fetch.
    only: Option<u32>,
    permits: Arc<Semaphore>,
}

/// Scriptable backend.
///
/// Stored results only show up in full-detail reads once they are
/// "available": either explicitly, or from the Nth full fetch onwards.
pub struct FakeBackend {
    state: Mutex<State>,
    gate: Mutex<Option<FetchGate>>,
    direct_lookups: AtomicU32,
    list_scans: AtomicU32,
    full_fetches: AtomicU32,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                results_available: true,
                provider_id_lookup: true,
                ..State::default()
            }),
            gate: Mutex::new(None),
            direct_lookups: AtomicU32::new(0),
            list_scans: AtomicU32::new(0),
            full_fetches: AtomicU32::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_call(self, record: CallRecord) -> Self {
        self.state().records.push(record);
        self
    }

    /// Store `results` for the durable call id they name.
    pub fn with_results(self, results: CallResults) -> Self {
        self.state().results.insert(results.call_id.clone(), results);
        self
    }

    /// Results appear starting with full fetch number `fetch` (1-based).
    pub fn with_results_from_fetch(self, fetch: u32) -> Self {
        {
            let mut state = self.state();
            state.results_from_fetch = Some(fetch);
            state.results_available = false;
        }
        self
    }

    pub fn without_results(self) -> Self {
        self.set_results_available(false);
        self
    }

    /// When disabled, `GET /calls/{provider_id}` is a 404 and only the list scan can resolve it.
    pub fn with_provider_id_lookup(self, enabled: bool) -> Self {
        self.state().provider_id_lookup = enabled;
        self
    }

    /// Make full fetch number `fetch` fail with a 503.
    pub fn with_failing_fetch(self, fetch: u32) -> Self {
        self.state().failing_fetches.insert(fetch);
        self
    }

    /// Id handed out by the next `create_web_call`.
    pub fn with_web_call_id(self, call_id: &str) -> Self {
        self.state().next_web_call = Some(call_id.to_string());
        self
    }

    /// Hold every full fetch until the test adds permits to the returned semaphore.
    ///
    /// The response is read before the fetch blocks, like a reply that is
    /// already on the wire.
    pub fn gate_full_fetches(&self) -> Arc<Semaphore> {
        self.install_gate(None)
    }

    /// Hold only full fetch number `fetch`; every other fetch goes straight through.
    pub fn gate_full_fetch(&self, fetch: u32) -> Arc<Semaphore> {
        self.install_gate(Some(fetch))
    }

    fn install_gate(&self, only: Option<u32>) -> Arc<Semaphore> {
        let permits = Arc::new(Semaphore::new(0));
        *self.gate.lock().unwrap_or_else(PoisonError::into_inner) = Some(FetchGate {
            only,
            permits: Arc::clone(&permits),
        });
        permits
    }

    pub fn set_results_available(&self, available: bool) {
        let mut state = self.state();
        state.results_available = available;
        if available {
            state.results_from_fetch = None;
        }
    }

    pub fn set_fail_all(&self, fail: bool) {
        self.state().fail_all = fail;
    }

    pub fn add_call(&self, record: CallRecord) {
        self.state().records.push(record);
    }

    pub fn full_fetches(&self) -> u32 {
        self.full_fetches.load(Ordering::SeqCst)
    }

    pub fn direct_lookups(&self) -> u32 {
        self.direct_lookups.load(Ordering::SeqCst)
    }

    pub fn list_scans(&self) -> u32 {
        self.list_scans.load(Ordering::SeqCst)
    }

    pub fn web_calls(&self) -> Vec<WebCallInput> {
        self.state().web_calls.clone()
    }

    pub fn phone_calls(&self) -> Vec<PhoneCallInput> {
        self.state().phone_calls.clone()
    }

    fn unavailable() -> Error {
        Error::Api {
            status: 503,
            detail: "backend unavailable".to_string(),
        }
    }
}

#[async_trait]
impl CallQueries for FakeBackend {
    async fn list_calls(&self) -> Result<Vec<CallRecord>> {
        self.list_scans.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        if state.fail_all {
            return Err(Self::unavailable());
        }
        let mut records = state.records.clone();
        records.reverse();
        Ok(records)
    }

    async fn get_call(&self, id: &str) -> Result<CallRecord> {
        self.direct_lookups.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        if state.fail_all {
            return Err(Self::unavailable());
        }
        state
            .records
            .iter()
            .find(|r| r.id == id || (state.provider_id_lookup && r.matches_client_id(id)))
            .cloned()
            .ok_or_else(|| Error::NotFound("Call not found".to_string()))
    }

    async fn get_call_full(&self, id: &str) -> Result<FullCallDetails> {
        let fetch = self.full_fetches.fetch_add(1, Ordering::SeqCst) + 1;
        let response = self.full_response(fetch, id);

        let permits = self
            .gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|gate| gate.only.is_none_or(|only| only == fetch))
            .map(|gate| Arc::clone(&gate.permits));
        if let Some(permits) = permits
            && let Ok(permit) = permits.acquire().await
        {
            permit.forget();
        }
        response
    }
}

impl FakeBackend {
    fn full_response(&self, fetch: u32, id: &str) -> Result<FullCallDetails> {
        let state = self.state();
        if state.fail_all || state.failing_fetches.contains(&fetch) {
            return Err(Self::unavailable());
        }
        let record = state
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Call not found".to_string()))?;

        let available = state.results_available
            || state.results_from_fetch.is_some_and(|from| fetch >= from);
        let results = if available {
            state.results.get(&record.id).cloned()
        } else {
            None
        };
        Ok(fixtures::full_details(record, results))
    }
}

#[async_trait]
impl CallLauncher for FakeBackend {
    async fn create_web_call(&self, input: &WebCallInput) -> Result<WebCallResponse> {
        let mut state = self.state();
        if state.fail_all {
            return Err(Self::unavailable());
        }
        state.web_calls.push(input.clone());
        let n = state.web_calls.len();
        let call_id = state
            .next_web_call
            .take()
            .unwrap_or_else(|| format!("call_web_{}", n));
        Ok(WebCallResponse {
            access_token: format!("access-{}", call_id),
            call_id,
        })
    }

    async fn create_phone_call(&self, input: &PhoneCallInput) -> Result<CallRecord> {
        let mut state = self.state();
        if state.fail_all {
            return Err(Self::unavailable());
        }
        state.phone_calls.push(input.clone());
        let n = state.phone_calls.len();
        let mut record = fixtures::call_record(
            &format!("phone-{}", n),
            &format!("call_phone_{}", n),
            CallStatus::Initiated,
        );
        record.call_type = Some(CallType::Phone);
        record.phone_number = Some(input.phone_number.clone());
        record.driver_name = input.driver_name.clone();
        record.load_number = input.load_number.clone();
        state.records.push(record.clone());
        Ok(record)
    }
}
