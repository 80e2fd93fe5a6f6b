//! Sample records for tests.

use callboard_types::{
    CallAnalysis, CallRecord, CallResults, CallStatus, CallTranscript, CallType, CheckInFields,
    EmergencyFields, FullCallDetails, ScenarioType, TranscriptEntry,
};
use chrono::{DateTime, TimeZone, Utc};

pub fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A web call row with durable id `id` that was started under provider id `retell_call_id`.
pub fn call_record(id: &str, retell_call_id: &str, status: CallStatus) -> CallRecord {
    CallRecord {
        id: id.to_string(),
        user_id: Some("user-1".to_string()),
        agent_configuration_id: Some("agent-1".to_string()),
        retell_call_id: Some(retell_call_id.to_string()),
        call_type: Some(CallType::Web),
        status,
        driver_name: "Mike Johnson".to_string(),
        phone_number: Some("WEB_CALL".to_string()),
        load_number: "7891-B".to_string(),
        started_at: Some(timestamp()),
        ended_at: None,
        duration_seconds: Some(125),
        metadata: None,
        recording_url: None,
        public_log_url: None,
        created_at: Some(timestamp()),
        updated_at: None,
    }
}

pub fn conversation() -> Vec<TranscriptEntry> {
    vec![
        TranscriptEntry::agent("Hi Mike, this is Dispatch with a check call on load 7891-B."),
        TranscriptEntry::user("Hey, I'm driving on I-10 past Indio."),
        TranscriptEntry::agent("Got it. What's your ETA?"),
        TranscriptEntry::user("Should be there tomorrow around 8 AM."),
    ]
}

pub fn transcript(call_id: &str) -> CallTranscript {
    let entries = conversation();
    let text = entries
        .iter()
        .map(|e| format!("{}: {}", e.role.label(), e.content))
        .collect::<Vec<_>>()
        .join("\n");
    CallTranscript {
        id: format!("transcript-{}", call_id),
        call_id: call_id.to_string(),
        transcript: text,
        transcript_json: Some(entries),
        created_at: Some(timestamp()),
        updated_at: None,
    }
}

pub fn checkin_results(call_id: &str) -> CallResults {
    CallResults {
        id: format!("results-{}", call_id),
        call_id: call_id.to_string(),
        scenario_type: ScenarioType::DriverCheckin,
        call_summary: Some("Driver is on schedule heading to Phoenix.".to_string()),
        call_outcome: Some("in_transit_update".to_string()),
        analysis: CallAnalysis::CheckIn(CheckInFields {
            driver_status: Some("driving".to_string()),
            current_location: Some("I-10 near Indio, CA".to_string()),
            eta: Some("Tomorrow, 8:00 AM".to_string()),
            delay_reason: None,
            unloading_status: None,
            dock_door: None,
            pod_reminder_acknowledged: Some(true),
        }),
        analysis_data: None,
        confidence_score: Some(0.92),
        processing_notes: None,
        created_at: Some(timestamp()),
        updated_at: None,
    }
}

pub fn emergency_results(call_id: &str) -> CallResults {
    CallResults {
        id: format!("results-{}", call_id),
        call_id: call_id.to_string(),
        scenario_type: ScenarioType::EmergencyProtocol,
        call_summary: Some("Driver reported a blown tire, pulled over safely.".to_string()),
        call_outcome: Some("emergency_escalation".to_string()),
        analysis: CallAnalysis::Emergency(EmergencyFields {
            emergency_type: Some("breakdown".to_string()),
            is_safe: Some(true),
            injuries: Some("none".to_string()),
            location_emergency: Some("I-15 North, Mile Marker 123".to_string()),
            load_secure: Some(true),
            safety_status: Some("driver_safe".to_string()),
            injury_status: Some("no_injuries".to_string()),
            escalation_status: Some("connected_to_human".to_string()),
        }),
        analysis_data: None,
        confidence_score: None,
        processing_notes: None,
        created_at: Some(timestamp()),
        updated_at: None,
    }
}

pub fn full_details(record: CallRecord, results: Option<CallResults>) -> FullCallDetails {
    let transcript = transcript(&record.id);
    FullCallDetails {
        call: record,
        transcript: Some(transcript),
        results,
    }
}
