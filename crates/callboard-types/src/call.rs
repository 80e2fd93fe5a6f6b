use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CallResults, CallTranscript};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Phone,
    Web,
}

impl CallType {
    pub fn label(&self) -> &'static str {
        match self {
            CallType::Phone => "Phone Call",
            CallType::Web => "Web Call",
        }
    }
}

/// Backend lifecycle of a call record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Initiated,
    InProgress,
    Completed,
    Failed,
    Ended,
}

impl CallStatus {
    /// Results are only ever attached to records in a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CallStatus::Completed | CallStatus::Failed | CallStatus::Ended
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Initiated => "initiated",
            CallStatus::InProgress => "in_progress",
            CallStatus::Completed => "completed",
            CallStatus::Failed => "failed",
            CallStatus::Ended => "ended",
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable call row owned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_configuration_id: Option<String>,
    /// Provider-issued session id; what the client holds right after starting a call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retell_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_type: Option<CallType>,
    pub status: CallStatus,
    pub driver_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub load_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_log_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CallRecord {
    /// True when `client_id` names this record, either by durable id or by provider call id.
    pub fn matches_client_id(&self, client_id: &str) -> bool {
        self.id == client_id || self.retell_call_id.as_deref() == Some(client_id)
    }

    /// Web calls are stored with a placeholder phone number.
    pub fn is_web_call(&self) -> bool {
        self.call_type == Some(CallType::Web) || self.phone_number.as_deref() == Some("WEB_CALL")
    }
}

/// Response of `GET /calls/{id}/full`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullCallDetails {
    pub call: CallRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<CallTranscript>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<CallResults>,
}

impl FullCallDetails {
    /// Results present means the backend finished post-call analysis.
    pub fn is_analyzed(&self) -> bool {
        self.results.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebCallInput {
    pub agent_configuration_id: String,
    pub driver_name: String,
    pub load_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneCallInput {
    pub agent_configuration_id: String,
    pub driver_name: String,
    pub phone_number: String,
    pub load_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebCallResponse {
    pub access_token: String,
    pub call_id: String,
}
