use std::sync::Arc;
use std::time::Duration;

use callboard_runtime::desk::{
    NOTICE_ANALYZED, NOTICE_PHONE_STARTED, NOTICE_REFRESHED, NOTICE_UNANALYZED,
};
use callboard_runtime::{
    CallDesk, CallPhase, Error, LiveCallSession, PollOutcome, PollPolicy, SessionEnd, SessionEvent,
    SessionLifecycle, drive_session,
};
use callboard_testing::fixtures::{call_record, checkin_results, conversation, emergency_results};
use callboard_testing::{FakeBackend, ManualClock, ScriptedSession};
use callboard_types::{CallStatus, PhoneCallInput, TranscriptEntry, WebCallInput};

fn web_input() -> WebCallInput {
    WebCallInput {
        agent_configuration_id: "agent-1".to_string(),
        driver_name: "Mike Johnson".to_string(),
        load_number: "7891-B".to_string(),
    }
}

fn desk_for(backend: &Arc<FakeBackend>, clock: &Arc<ManualClock>) -> CallDesk {
    CallDesk::new(backend.clone(), clock.clone(), PollPolicy::default())
}

fn analyzed_backend() -> FakeBackend {
    FakeBackend::new()
        .with_web_call_id("call_a")
        .with_call(call_record("c-1", "call_a", CallStatus::Completed))
        .with_results(checkin_results("c-1"))
}

#[tokio::test]
async fn test_web_call_flow_ends_analyzed() -> anyhow::Result<()> {
    // Given
    let backend = Arc::new(analyzed_backend());
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);

    // When: the call starts, talks, and ends
    let (token, response) = desk.start_web_call(&web_input()).await?;
    assert_eq!(response.call_id, "call_a");

    assert!(desk.handle_event(token, SessionEvent::Started));
    assert_eq!(desk.snapshot().phase, CallPhase::InCall);

    let talk = conversation();
    desk.handle_event(token, SessionEvent::TranscriptUpdate(talk[..2].to_vec()));
    desk.handle_event(token, SessionEvent::TranscriptUpdate(talk.clone()));
    desk.handle_event(token, SessionEvent::Ended);
    assert!(matches!(
        desk.snapshot().phase,
        CallPhase::Processing { max_attempts: 5, .. }
    ));

    let outcome = desk.wait_for_outcome().await;

    // Then
    assert!(matches!(outcome, Some(PollOutcome::Resolved { attempts: 1, .. })));
    let snapshot = desk.snapshot();
    assert_eq!(snapshot.phase, CallPhase::Analyzed);
    assert_eq!(snapshot.transcript(), talk.as_slice());
    assert_eq!(snapshot.notice.as_deref(), Some(NOTICE_ANALYZED));
    let session = snapshot.session.expect("session is kept");
    assert_eq!(session.lifecycle, SessionLifecycle::Ended);
    assert_eq!(session.resolved_call_id.as_deref(), Some("c-1"));
    assert!(snapshot.details.is_some_and(|d| d.is_analyzed()));
    assert_eq!(backend.web_calls(), vec![web_input()]);
    Ok(())
}

#[tokio::test]
async fn test_exhausted_poll_then_manual_refresh() -> anyhow::Result<()> {
    // Given: analysis never lands during the automatic loop
    let backend = Arc::new(analyzed_backend().without_results());
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);
    let (token, _) = desk.start_web_call(&web_input()).await?;
    desk.handle_event(token, SessionEvent::Started);
    desk.handle_event(token, SessionEvent::Ended);

    let outcome = desk.wait_for_outcome().await;
    assert!(matches!(outcome, Some(PollOutcome::Exhausted { attempts: 5, .. })));
    let snapshot = desk.snapshot();
    assert_eq!(snapshot.phase, CallPhase::Unanalyzed);
    assert_eq!(snapshot.notice.as_deref(), Some(NOTICE_UNANALYZED));
    assert!(snapshot.details.is_none());
    assert_eq!(backend.full_fetches(), 5);

    // When: results land later and the operator refreshes
    backend.set_results_available(true);
    let details = desk.refresh().await?;

    // Then: one extra fetch, no extra waiting
    assert!(details.is_analyzed());
    assert_eq!(desk.snapshot().phase, CallPhase::Analyzed);
    assert_eq!(backend.full_fetches(), 6);
    assert_eq!(clock.sleeps().len(), 5);
    assert!(desk.wait_for_outcome().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_refresh_results_survive_exhausted_last_attempt() -> anyhow::Result<()> {
    // Given: a one-attempt poll whose reply was read before analysis landed
    let backend = Arc::new(analyzed_backend().with_results_from_fetch(2));
    let gate = backend.gate_full_fetch(1);
    let clock = Arc::new(ManualClock::new());
    let policy = PollPolicy {
        max_attempts: 1,
        ..PollPolicy::default()
    };
    let desk = CallDesk::new(backend.clone(), clock.clone(), policy);
    let token = desk.begin_session("c-1");
    desk.handle_event(token, SessionEvent::Ended);
    while backend.full_fetches() == 0 {
        tokio::task::yield_now().await;
    }

    // When: a refresh commits results, then the stale reply is delivered
    let details = desk.refresh().await?;
    assert!(details.is_analyzed());
    gate.add_permits(1);
    let outcome = desk.wait_for_outcome().await;

    // Then: the loop gave up, but the refreshed results stand
    assert!(matches!(outcome, Some(PollOutcome::Exhausted { attempts: 1, .. })));
    let snapshot = desk.snapshot();
    assert_eq!(snapshot.phase, CallPhase::Analyzed);
    assert_eq!(snapshot.notice.as_deref(), Some(NOTICE_REFRESHED));
    assert!(snapshot.details.is_some_and(|d| d.is_analyzed()));
    assert_eq!(backend.full_fetches(), 2);
    Ok(())
}

#[tokio::test]
async fn test_analyzed_refresh_stops_running_poll() -> anyhow::Result<()> {
    // Given: the loop is blocked in its first fetch, which will come back empty
    let backend = Arc::new(analyzed_backend().with_results_from_fetch(2));
    let gate = backend.gate_full_fetch(1);
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);
    let token = desk.begin_session("c-1");
    desk.handle_event(token, SessionEvent::Ended);
    while backend.full_fetches() == 0 {
        tokio::task::yield_now().await;
    }

    // When
    desk.refresh().await?;
    gate.add_permits(1);
    let outcome = desk.wait_for_outcome().await;

    // Then: no retry after the refresh found results
    assert_eq!(outcome, Some(PollOutcome::Cancelled));
    assert_eq!(desk.snapshot().phase, CallPhase::Analyzed);
    assert_eq!(backend.full_fetches(), 2);
    Ok(())
}

#[tokio::test]
async fn test_refresh_without_results_keeps_poll_running() -> anyhow::Result<()> {
    // Given
    let backend = Arc::new(analyzed_backend().with_results_from_fetch(3));
    let gate = backend.gate_full_fetch(1);
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);
    let token = desk.begin_session("c-1");
    desk.handle_event(token, SessionEvent::Ended);
    while backend.full_fetches() == 0 {
        tokio::task::yield_now().await;
    }

    // When: the refresh comes back unanalyzed
    let details = desk.refresh().await?;
    assert!(!details.is_analyzed());
    gate.add_permits(1);
    let outcome = desk.wait_for_outcome().await;

    // Then: the loop keeps going and picks the results up itself
    assert!(matches!(outcome, Some(PollOutcome::Resolved { attempts: 2, .. })));
    assert_eq!(desk.snapshot().phase, CallPhase::Analyzed);
    assert_eq!(backend.full_fetches(), 3);
    Ok(())
}

#[tokio::test]
async fn test_abandoned_wait_leaves_poll_cancellable() -> anyhow::Result<()> {
    // Given: a poll stuck in its first fetch
    let backend = Arc::new(analyzed_backend().without_results());
    let gate = backend.gate_full_fetches();
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);
    let token = desk.begin_session("c-1");
    desk.handle_event(token, SessionEvent::Ended);

    // When: the waiter gives up, then the operator starts over
    let waited = tokio::time::timeout(Duration::from_millis(20), desk.wait_for_outcome()).await;
    assert!(waited.is_err());
    desk.start_new_call();
    gate.add_permits(10);
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }

    // Then: the old loop stopped after the fetch it was already in
    assert_eq!(backend.full_fetches(), 1);
    assert_eq!(gate.available_permits(), 9);
    assert_eq!(desk.snapshot().phase, CallPhase::Idle);
    Ok(())
}

#[tokio::test]
async fn test_failed_refresh_records_error() -> anyhow::Result<()> {
    let backend = Arc::new(analyzed_backend());
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);
    desk.begin_session("call_a");
    backend.set_fail_all(true);

    let err = desk.refresh().await.unwrap_err();

    assert!(matches!(err, Error::Backend(_)));
    let snapshot = desk.snapshot();
    let error = snapshot.error.expect("error text set");
    assert!(error.starts_with("Failed to refresh call data:"));
    assert_eq!(snapshot.phase, CallPhase::Idle);
    Ok(())
}

#[tokio::test]
async fn test_refresh_without_call_is_rejected() {
    let backend = Arc::new(FakeBackend::new());
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);

    let err = desk.refresh().await.unwrap_err();

    assert!(matches!(err, Error::NoActiveCall));
    assert_eq!(backend.full_fetches(), 0);
}

#[tokio::test]
async fn test_session_error_does_not_poll() {
    let backend = Arc::new(analyzed_backend());
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);
    let token = desk.begin_session("call_a");

    desk.handle_event(token, SessionEvent::Started);
    desk.handle_event(token, SessionEvent::Error("microphone permission denied".to_string()));

    assert!(desk.wait_for_outcome().await.is_none());
    let snapshot = desk.snapshot();
    assert_eq!(snapshot.phase, CallPhase::Idle);
    assert_eq!(
        snapshot.error.as_deref(),
        Some("Call error: microphone permission denied")
    );
    assert_eq!(backend.full_fetches(), 0);
}

#[tokio::test]
async fn test_repeated_end_starts_one_poll() {
    let backend = Arc::new(analyzed_backend());
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);
    let token = desk.begin_session("call_a");

    desk.handle_event(token, SessionEvent::Ended);
    desk.handle_event(token, SessionEvent::Ended);

    assert!(desk.wait_for_outcome().await.is_some());
    assert!(desk.wait_for_outcome().await.is_none());
    assert_eq!(backend.full_fetches(), 1);
}

#[tokio::test]
async fn test_events_for_replaced_session_are_ignored() {
    let backend = Arc::new(FakeBackend::new());
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);

    let old = desk.begin_session("call_a");
    desk.handle_event(old, SessionEvent::TranscriptUpdate(conversation()));
    let new = desk.begin_session("call_b");

    let applied = desk.handle_event(
        old,
        SessionEvent::TranscriptUpdate(vec![TranscriptEntry::user("late line")]),
    );

    assert!(!applied);
    assert_ne!(old, new);
    let snapshot = desk.snapshot();
    assert_eq!(snapshot.token, new);
    assert!(snapshot.transcript().is_empty());
    assert_eq!(snapshot.session.map(|s| s.call_id), Some("call_b".to_string()));
}

#[tokio::test]
async fn test_late_poll_outcome_is_discarded_after_new_session() {
    // Given: a poll for call A blocked inside its first full fetch
    let backend = Arc::new(
        FakeBackend::new()
            .with_call(call_record("c-1", "call_a", CallStatus::Completed))
            .with_results(emergency_results("c-1")),
    );
    let gate = backend.gate_full_fetches();
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);
    let first = desk.begin_session("call_a");
    desk.handle_event(first, SessionEvent::Ended);
    while backend.full_fetches() == 0 {
        tokio::task::yield_now().await;
    }

    // When: the operator moves on, then call A's results arrive
    desk.begin_session("call_b");
    gate.add_permits(1);
    while gate.available_permits() > 0 {
        tokio::task::yield_now().await;
    }
    tokio::task::yield_now().await;

    // Then: call B's state is untouched
    let snapshot = desk.snapshot();
    assert_eq!(snapshot.phase, CallPhase::Idle);
    assert!(snapshot.details.is_none());
    assert!(snapshot.notice.is_none());
    assert_eq!(snapshot.session.map(|s| s.call_id), Some("call_b".to_string()));
}

#[tokio::test]
async fn test_start_new_call_clears_everything() -> anyhow::Result<()> {
    let backend = Arc::new(analyzed_backend());
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);
    let (token, _) = desk.start_web_call(&web_input()).await?;
    desk.handle_event(token, SessionEvent::TranscriptUpdate(conversation()));
    desk.handle_event(token, SessionEvent::Ended);
    desk.wait_for_outcome().await;

    let fresh = desk.start_new_call();

    let snapshot = desk.snapshot();
    assert_eq!(snapshot.token, fresh);
    assert_eq!(snapshot.phase, CallPhase::Idle);
    assert!(snapshot.session.is_none());
    assert!(snapshot.details.is_none());
    assert!(snapshot.transcript().is_empty());
    assert!(!desk.handle_event(token, SessionEvent::Started));
    Ok(())
}

#[tokio::test]
async fn test_phone_call_sets_notice_without_polling() -> anyhow::Result<()> {
    let backend = Arc::new(FakeBackend::new());
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);

    let record = desk
        .start_phone_call(&PhoneCallInput {
            agent_configuration_id: "agent-1".to_string(),
            driver_name: "Mike Johnson".to_string(),
            phone_number: "+15551234567".to_string(),
            load_number: "7891-B".to_string(),
        })
        .await?;

    assert_eq!(record.status, CallStatus::Initiated);
    assert_eq!(record.phone_number.as_deref(), Some("+15551234567"));
    assert_eq!(desk.snapshot().notice.as_deref(), Some(NOTICE_PHONE_STARTED));
    assert!(desk.wait_for_outcome().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_failed_web_call_start_keeps_desk_idle() {
    let backend = Arc::new(FakeBackend::new());
    backend.set_fail_all(true);
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);

    let result = desk.start_web_call(&web_input()).await;

    assert!(result.is_err());
    let snapshot = desk.snapshot();
    assert!(snapshot.session.is_none());
    assert!(snapshot.error.is_some_and(|e| e.starts_with("Failed to start web call")));
}

#[tokio::test]
async fn test_drive_session_feeds_scripted_events() -> anyhow::Result<()> {
    let backend = Arc::new(analyzed_backend());
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);
    let talk = conversation();
    let mut session = ScriptedSession::new(vec![
        SessionEvent::Started,
        SessionEvent::TranscriptUpdate(talk[..1].to_vec()),
        SessionEvent::TranscriptUpdate(talk.clone()),
        SessionEvent::Ended,
    ]);

    let (token, response) = desk.start_web_call(&web_input()).await?;
    let mut events = session.take_events().expect("events available once");
    session.start(&response.access_token).await?;
    let end = drive_session(&desk, token, &mut events).await;

    assert_eq!(end, SessionEnd::Ended);
    assert_eq!(session.started_with(), Some("access-call_a"));
    assert_eq!(desk.snapshot().transcript(), talk.as_slice());
    assert!(matches!(
        desk.wait_for_outcome().await,
        Some(PollOutcome::Resolved { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_drive_session_reports_failure() -> anyhow::Result<()> {
    let backend = Arc::new(analyzed_backend());
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);
    let mut session = ScriptedSession::new(vec![
        SessionEvent::Started,
        SessionEvent::Error("network lost".to_string()),
        SessionEvent::Ended,
    ]);

    let token = desk.begin_session("call_a");
    let mut events = session.take_events().expect("events available once");
    session.start("access").await?;
    let end = drive_session(&desk, token, &mut events).await;

    assert_eq!(end, SessionEnd::Failed("network lost".to_string()));
    assert!(desk.wait_for_outcome().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_drive_session_stops_when_source_disappears() -> anyhow::Result<()> {
    let backend = Arc::new(FakeBackend::new());
    let clock = Arc::new(ManualClock::new());
    let desk = desk_for(&backend, &clock);
    let mut session = ScriptedSession::new(vec![SessionEvent::Started]);

    let token = desk.begin_session("call_a");
    let mut events = session.take_events().expect("events available once");
    session.start("access").await?;
    let end = drive_session(&desk, token, &mut events).await;

    assert_eq!(end, SessionEnd::Disconnected);
    assert_eq!(desk.snapshot().phase, CallPhase::InCall);
    Ok(())
}
