use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ScenarioType;

/// Fields extracted from a call that pivoted into the emergency protocol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyFields {
    pub emergency_type: Option<String>,
    pub is_safe: Option<bool>,
    pub injuries: Option<String>,
    pub location_emergency: Option<String>,
    pub load_secure: Option<bool>,
    pub safety_status: Option<String>,
    pub injury_status: Option<String>,
    pub escalation_status: Option<String>,
}

/// Fields extracted from a routine driver check-in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckInFields {
    pub driver_status: Option<String>,
    pub current_location: Option<String>,
    pub eta: Option<String>,
    pub delay_reason: Option<String>,
    pub unloading_status: Option<String>,
    pub dock_door: Option<String>,
    pub pod_reminder_acknowledged: Option<bool>,
}

/// Scenario-specific extraction, discriminated on the wire by `is_emergency`
#[derive(Debug, Clone, PartialEq)]
pub enum CallAnalysis {
    Emergency(EmergencyFields),
    CheckIn(CheckInFields),
}

impl CallAnalysis {
    pub fn is_emergency(&self) -> bool {
        matches!(self, CallAnalysis::Emergency(_))
    }
}

/// Backend-derived analysis of a completed call.
///
/// The backend sends a flat object carrying both field sets; only the set
/// selected by `is_emergency` is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCallResults", into = "RawCallResults")]
pub struct CallResults {
    pub id: String,
    pub call_id: String,
    pub scenario_type: ScenarioType,
    pub call_summary: Option<String>,
    pub call_outcome: Option<String>,
    pub analysis: CallAnalysis,
    pub analysis_data: Option<serde_json::Value>,
    pub confidence_score: Option<f64>,
    pub processing_notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CallResults {
    pub fn is_emergency(&self) -> bool {
        self.analysis.is_emergency()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawCallResults {
    id: String,
    call_id: String,
    #[serde(default)]
    scenario_type: ScenarioType,
    #[serde(default)]
    is_emergency: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    call_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    call_outcome: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    driver_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delay_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unloading_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dock_door: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pod_reminder_acknowledged: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    emergency_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_safe: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    injuries: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location_emergency: Option<String>,
    // older rows used this name
    #[serde(default, skip_serializing)]
    emergency_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    load_secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    safety_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    injury_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    escalation_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    analysis_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    processing_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<RawCallResults> for CallResults {
    fn from(raw: RawCallResults) -> Self {
        let analysis = if raw.is_emergency {
            CallAnalysis::Emergency(EmergencyFields {
                emergency_type: raw.emergency_type,
                is_safe: raw.is_safe,
                injuries: raw.injuries,
                location_emergency: raw.location_emergency.or(raw.emergency_location),
                load_secure: raw.load_secure,
                safety_status: raw.safety_status,
                injury_status: raw.injury_status,
                escalation_status: raw.escalation_status,
            })
        } else {
            CallAnalysis::CheckIn(CheckInFields {
                driver_status: raw.driver_status,
                current_location: raw.current_location,
                eta: raw.eta,
                delay_reason: raw.delay_reason,
                unloading_status: raw.unloading_status,
                dock_door: raw.dock_door,
                pod_reminder_acknowledged: raw.pod_reminder_acknowledged,
            })
        };

        CallResults {
            id: raw.id,
            call_id: raw.call_id,
            scenario_type: raw.scenario_type,
            call_summary: raw.call_summary,
            call_outcome: raw.call_outcome,
            analysis,
            analysis_data: raw.analysis_data,
            confidence_score: raw.confidence_score,
            processing_notes: raw.processing_notes,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

impl From<CallResults> for RawCallResults {
    fn from(results: CallResults) -> Self {
        let mut raw = RawCallResults {
            id: results.id,
            call_id: results.call_id,
            scenario_type: results.scenario_type,
            is_emergency: results.analysis.is_emergency(),
            call_summary: results.call_summary,
            call_outcome: results.call_outcome,
            analysis_data: results.analysis_data,
            confidence_score: results.confidence_score,
            processing_notes: results.processing_notes,
            created_at: results.created_at,
            updated_at: results.updated_at,
            ..Default::default()
        };

        match results.analysis {
            CallAnalysis::Emergency(fields) => {
                raw.emergency_type = fields.emergency_type;
                raw.is_safe = fields.is_safe;
                raw.injuries = fields.injuries;
                raw.location_emergency = fields.location_emergency;
                raw.load_secure = fields.load_secure;
                raw.safety_status = fields.safety_status;
                raw.injury_status = fields.injury_status;
                raw.escalation_status = fields.escalation_status;
            }
            CallAnalysis::CheckIn(fields) => {
                raw.driver_status = fields.driver_status;
                raw.current_location = fields.current_location;
                raw.eta = fields.eta;
                raw.delay_reason = fields.delay_reason;
                raw.unloading_status = fields.unloading_status;
                raw.dock_door = fields.dock_door;
                raw.pod_reminder_acknowledged = fields.pod_reminder_acknowledged;
            }
        }

        raw
    }
}
