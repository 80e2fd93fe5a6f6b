use callboard_types::{
    CallAnalysis, CallRecord, CallResults, CallStatus, CallType, CheckInFields, EmergencyFields,
    FullCallDetails, format_duration, humanize,
};
use std::fmt::Write;

use super::{Palette, hint};
use crate::args::hints::cmd;

const NOT_SPECIFIED: &str = "Not specified";

pub fn list(calls: &[CallRecord], palette: Palette) -> String {
    if calls.is_empty() {
        return format!(
            "No calls yet.\n{}\n",
            hint(palette, "Place a test call", cmd::TEST_CALL_WEB)
        );
    }

    let mut out = String::new();
    for call in calls {
        let kind = if call.is_web_call() {
            CallType::Web
        } else {
            CallType::Phone
        };
        let started = call
            .started_at
            .or(call.created_at)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{}  {}  {} / load {}  {}  {}  {}",
            palette.muted(&call.id),
            kind.label(),
            call.driver_name,
            call.load_number,
            status(call.status, palette),
            format_duration(call.duration_seconds),
            started
        );
    }
    out
}

fn status(status: CallStatus, palette: Palette) -> String {
    match status {
        CallStatus::Completed => palette.good(status.as_str()),
        CallStatus::Failed => palette.alert(status.as_str()),
        CallStatus::Initiated | CallStatus::InProgress => palette.warn(status.as_str()),
        CallStatus::Ended => palette.muted(status.as_str()),
    }
}

/// Full call view: header, summary, extracted data and transcript.
pub fn detail(details: &FullCallDetails, palette: Palette) -> String {
    let call = &details.call;
    let mut out = String::new();

    let _ = writeln!(out, "{}", palette.heading("Call Results"));
    let _ = writeln!(
        out,
        "Status: {} | Duration: {}",
        status(call.status, palette),
        format_duration(call.duration_seconds)
    );
    let _ = writeln!(
        out,
        "Driver: {} | Load: {} | Call: {}",
        call.driver_name, call.load_number, call.id
    );

    match &details.results {
        Some(results) => write_results(&mut out, results, palette),
        None => {
            let _ = writeln!(out);
            let _ = writeln!(out, "Results are not available yet.");
            let _ = writeln!(
                out,
                "{}",
                hint(palette, "Check again", &cmd::call_refresh(&call.id))
            );
        }
    }

    if let Some(transcript) = &details.transcript {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", palette.heading("Full Transcript"));
        if transcript.entries().is_empty() {
            for line in transcript.transcript.lines() {
                let _ = writeln!(out, "  {}", line);
            }
        } else {
            for entry in transcript.entries() {
                let _ = writeln!(out, "  {}: {}", entry.role.label(), entry.content);
            }
        }
    }

    if let Some(url) = &call.recording_url {
        let _ = writeln!(out);
        let _ = writeln!(out, "Recording: {}", url);
    }
    out
}

fn write_results(out: &mut String, results: &CallResults, palette: Palette) {
    let badge = if results.is_emergency() {
        palette.alert("🚨 EMERGENCY")
    } else {
        palette.good("✓ Normal Call")
    };
    let _ = writeln!(out, "{}  ({})", badge, results.scenario_type.label());

    if let Some(summary) = &results.call_summary {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", palette.heading("📋 Call Summary"));
        let _ = writeln!(out, "  {}", summary);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", palette.heading("Extracted Data"));
    field(out, "Call Outcome", &enum_value(results.call_outcome.as_deref()));
    match &results.analysis {
        CallAnalysis::Emergency(fields) => write_emergency(out, fields),
        CallAnalysis::CheckIn(fields) => write_checkin(out, fields),
    }
    if let Some(confidence) = results.confidence_score {
        field(out, "Confidence", &format!("{:.0}%", confidence * 100.0));
    }
}

fn write_emergency(out: &mut String, fields: &EmergencyFields) {
    field(out, "Emergency Type", &enum_value(fields.emergency_type.as_deref()));
    field(out, "Safety Status", &text_value(fields.safety_status.as_deref()));
    field(out, "Injury Status", &enum_value(fields.injury_status.as_deref()));
    field(
        out,
        "Emergency Location",
        &text_value(fields.location_emergency.as_deref()),
    );
    let load_secure = match fields.load_secure {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "Unknown",
    };
    field(out, "Load Secure", load_secure);
    field(
        out,
        "Escalation Status",
        &text_value(fields.escalation_status.as_deref()),
    );
}

fn write_checkin(out: &mut String, fields: &CheckInFields) {
    field(out, "Driver Status", &enum_value(fields.driver_status.as_deref()));
    field(
        out,
        "Current Location",
        &text_value(fields.current_location.as_deref()),
    );
    field(out, "ETA", &text_value(fields.eta.as_deref()));
    field(
        out,
        "Delay Reason",
        fields.delay_reason.as_deref().unwrap_or("None"),
    );
    field(
        out,
        "Unloading Status",
        &text_value(fields.unloading_status.as_deref()),
    );
    if let Some(door) = &fields.dock_door {
        field(out, "Dock Door", door);
    }
    let pod = if fields.pod_reminder_acknowledged == Some(true) {
        "Acknowledged"
    } else {
        "Not Acknowledged"
    };
    field(out, "POD Reminder", pod);
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {:<20}{}", format!("{}:", label), value);
}

fn enum_value(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => humanize(v),
        _ => NOT_SPECIFIED.to_string(),
    }
}

fn text_value(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_SPECIFIED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callboard_testing::fixtures::{
        call_record, checkin_results, emergency_results, full_details,
    };

    #[test]
    fn test_checkin_detail_shows_checkin_fields_only() {
        let record = call_record("c-1", "call_a", CallStatus::Completed);
        let details = full_details(record, Some(checkin_results("c-1")));

        let text = detail(&details, Palette::plain());

        assert!(text.contains("✓ Normal Call"));
        assert!(text.contains("  Call Outcome:       In Transit Update\n"));
        assert!(text.contains("  Driver Status:      Driving\n"));
        assert!(text.contains("  Delay Reason:       None\n"));
        assert!(text.contains("  POD Reminder:       Acknowledged\n"));
        assert!(!text.contains("Emergency Type"));
        assert!(text.contains("  Driver: Hey, I'm driving on I-10 past Indio.\n"));
    }

    #[test]
    fn test_emergency_detail_shows_emergency_fields_only() {
        let record = call_record("c-2", "call_b", CallStatus::Completed);
        let details = full_details(record, Some(emergency_results("c-2")));

        let text = detail(&details, Palette::plain());

        assert!(text.contains("🚨 EMERGENCY"));
        assert!(text.contains("  Emergency Type:     Breakdown\n"));
        assert!(text.contains("  Injury Status:      No Injuries\n"));
        assert!(text.contains("  Load Secure:        Yes\n"));
        assert!(!text.contains("Driver Status"));
    }

    #[test]
    fn test_detail_without_results_points_to_refresh() {
        let record = call_record("c-3", "call_c", CallStatus::Ended);
        let details = full_details(record, None);

        let text = detail(&details, Palette::plain());

        assert!(text.contains("Results are not available yet."));
        assert!(text.contains("callboard call refresh c-3"));
    }

    #[test]
    fn test_list_line() {
        let record = call_record("c-1", "call_a", CallStatus::Completed);
        let text = list(&[record], Palette::plain());
        insta::assert_snapshot!(text.trim_end(), @"c-1  Web Call  Mike Johnson / load 7891-B  completed  2m 5s  2025-01-10 08:00");
    }
}
