use callboard_runtime::{CallPhase, DeskSnapshot};
use callboard_types::{FullCallDetails, TranscriptEntry};
use serde::Serialize;
use std::fmt::Write;

use super::{Palette, calls, hint};
use crate::args::hints::cmd;

/// JSON shape of a finished test call
#[derive(Debug, Serialize)]
pub struct TestCallReport<'a> {
    pub call_id: Option<&'a str>,
    pub resolved_call_id: Option<&'a str>,
    pub phase: &'static str,
    pub notice: Option<&'a str>,
    pub error: Option<&'a str>,
    pub transcript: &'a [TranscriptEntry],
    pub details: Option<&'a FullCallDetails>,
}

impl<'a> TestCallReport<'a> {
    pub fn new(snapshot: &'a DeskSnapshot) -> Self {
        let session = snapshot.session.as_ref();
        Self {
            call_id: session.map(|s| s.call_id.as_str()),
            resolved_call_id: session.and_then(|s| s.resolved_call_id.as_deref()),
            phase: phase_name(snapshot.phase),
            notice: snapshot.notice.as_deref(),
            error: snapshot.error.as_deref(),
            transcript: snapshot.transcript(),
            details: snapshot.details.as_ref(),
        }
    }
}

pub fn phase_name(phase: CallPhase) -> &'static str {
    match phase {
        CallPhase::Idle => "idle",
        CallPhase::InCall => "in_call",
        CallPhase::Processing { .. } => "processing",
        CallPhase::Analyzed => "analyzed",
        CallPhase::Unanalyzed => "unanalyzed",
    }
}

pub fn summary(snapshot: &DeskSnapshot, palette: Palette) -> String {
    let mut out = String::new();

    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "{}", palette.alert(error));
    }
    if let Some(notice) = &snapshot.notice {
        let _ = writeln!(out, "{}", notice);
    }

    match (&snapshot.details, snapshot.phase) {
        (Some(details), _) => {
            let _ = writeln!(out);
            out.push_str(&calls::detail(details, palette));
        }
        (None, _) if !snapshot.transcript().is_empty() => {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", palette.heading("Live Transcript"));
            for entry in snapshot.transcript() {
                let _ = writeln!(out, "  {}: {}", entry.role.label(), entry.content);
            }
        }
        _ => {}
    }

    if snapshot.phase == CallPhase::Unanalyzed
        && let Some(session) = &snapshot.session
    {
        let id = session.lookup_id();
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            hint(palette, "Fetch the results later", &cmd::call_refresh(id))
        );
        let _ = writeln!(
            out,
            "{}",
            hint(palette, "Or keep waiting", &cmd::call_await(id))
        );
    }
    out
}
