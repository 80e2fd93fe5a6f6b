use std::sync::Arc;
use std::time::Duration;

use callboard_runtime::{CallOutcomePoller, PollOutcome, PollPolicy, PollProgress};
use callboard_testing::fixtures::{call_record, checkin_results};
use callboard_testing::{FakeBackend, ManualClock};
use callboard_types::CallStatus;
use tokio_util::sync::CancellationToken;

fn completed_call() -> FakeBackend {
    FakeBackend::new()
        .with_call(call_record("c-1", "call_a", CallStatus::Completed))
        .with_results(checkin_results("c-1"))
}

fn poller(backend: &Arc<FakeBackend>, clock: &Arc<ManualClock>) -> CallOutcomePoller {
    CallOutcomePoller::new(backend.clone(), clock.clone(), PollPolicy::default())
}

#[tokio::test]
async fn test_results_on_third_attempt_take_nine_virtual_seconds() -> anyhow::Result<()> {
    // Given: results land between the second and third full fetch
    let backend = Arc::new(completed_call().with_results_from_fetch(3));
    let clock = Arc::new(ManualClock::new());
    let poller = poller(&backend, &clock);

    // When
    let outcome = poller.run_quiet("call_a", &CancellationToken::new()).await;

    // Then: 5000 initial + 2 x 2000 between attempts, no sleep after the hit
    match outcome {
        PollOutcome::Resolved { details, attempts } => {
            assert_eq!(attempts, 3);
            assert_eq!(details.call.id, "c-1");
            assert!(details.is_analyzed());
        }
        other => panic!("Expected Resolved, got {:?}", other),
    }
    assert_eq!(clock.elapsed(), Duration::from_millis(9000));
    assert_eq!(backend.full_fetches(), 3);
    Ok(())
}

#[tokio::test]
async fn test_progress_reports_each_attempt_and_wait() {
    let backend = Arc::new(completed_call().with_results_from_fetch(3));
    let clock = Arc::new(ManualClock::new());
    let poller = poller(&backend, &clock);

    let mut progress = Vec::new();
    poller
        .run("call_a", &CancellationToken::new(), |p| progress.push(p))
        .await;

    let wait = Duration::from_millis(2000);
    assert_eq!(
        progress,
        vec![
            PollProgress::Attempt { attempt: 1, max_attempts: 5 },
            PollProgress::Waiting { attempt: 1, delay: wait },
            PollProgress::Attempt { attempt: 2, max_attempts: 5 },
            PollProgress::Waiting { attempt: 2, delay: wait },
            PollProgress::Attempt { attempt: 3, max_attempts: 5 },
        ]
    );
}

#[tokio::test]
async fn test_gives_up_after_max_attempts() {
    let backend = Arc::new(completed_call().without_results());
    let clock = Arc::new(ManualClock::new());
    let poller = poller(&backend, &clock);

    let outcome = poller.run_quiet("call_a", &CancellationToken::new()).await;

    match outcome {
        PollOutcome::Exhausted { attempts, last_seen } => {
            assert_eq!(attempts, 5);
            let last_seen = last_seen.expect("record was resolvable");
            assert!(!last_seen.is_analyzed());
        }
        other => panic!("Expected Exhausted, got {:?}", other),
    }
    assert_eq!(backend.full_fetches(), 5);
    assert_eq!(clock.sleeps().len(), 5);
    assert_eq!(clock.elapsed(), PollPolicy::default().give_up_after());
}

#[tokio::test]
async fn test_falls_back_to_list_scan_for_provider_id() {
    // Given: the backend only resolves durable ids directly
    let backend = Arc::new(completed_call().with_provider_id_lookup(false));
    let clock = Arc::new(ManualClock::new());
    let poller = poller(&backend, &clock);

    let outcome = poller.run_quiet("call_a", &CancellationToken::new()).await;

    let details = outcome.details().expect("resolved through the list");
    assert_eq!(details.call.id, "c-1");
    assert_eq!(backend.list_scans(), 1);
    assert_eq!(backend.full_fetches(), 1);
}

#[tokio::test]
async fn test_unknown_call_is_retried_then_exhausted() {
    let backend = Arc::new(FakeBackend::new());
    let clock = Arc::new(ManualClock::new());
    let poller = poller(&backend, &clock);

    let outcome = poller.run_quiet("call_missing", &CancellationToken::new()).await;

    assert_eq!(
        outcome,
        PollOutcome::Exhausted {
            attempts: 5,
            last_seen: None
        }
    );
    assert_eq!(backend.direct_lookups(), 5);
    assert_eq!(backend.full_fetches(), 0);
}

#[tokio::test]
async fn test_failed_fetch_is_retried() {
    let backend = Arc::new(completed_call().with_failing_fetch(1));
    let clock = Arc::new(ManualClock::new());
    let poller = poller(&backend, &clock);

    let outcome = poller.run_quiet("call_a", &CancellationToken::new()).await;

    assert!(matches!(outcome, PollOutcome::Resolved { attempts: 2, .. }));
    assert_eq!(backend.full_fetches(), 2);
}

#[tokio::test]
async fn test_backend_outage_never_exceeds_attempt_budget() {
    let backend = Arc::new(completed_call());
    backend.set_fail_all(true);
    let clock = Arc::new(ManualClock::new());
    let poller = CallOutcomePoller::new(
        backend.clone(),
        clock.clone(),
        PollPolicy {
            max_attempts: 3,
            retry_delay: Duration::from_millis(10),
            initial_delay: Duration::ZERO,
        },
    );

    let outcome = poller.run_quiet("call_a", &CancellationToken::new()).await;

    assert!(matches!(outcome, PollOutcome::Exhausted { attempts: 3, .. }));
    assert_eq!(backend.direct_lookups(), 3);
    assert_eq!(
        clock.sleeps(),
        vec![Duration::ZERO, Duration::from_millis(10), Duration::from_millis(10)]
    );
}

#[tokio::test]
async fn test_cancelled_before_first_attempt() {
    let backend = Arc::new(completed_call());
    let clock = Arc::new(ManualClock::new());
    let poller = poller(&backend, &clock);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = poller.run_quiet("call_a", &cancel).await;

    assert_eq!(outcome, PollOutcome::Cancelled);
    assert_eq!(backend.full_fetches(), 0);
}

#[tokio::test]
async fn test_refresh_is_a_single_fetch() -> anyhow::Result<()> {
    let backend = Arc::new(completed_call());
    let clock = Arc::new(ManualClock::new());
    let poller = poller(&backend, &clock);

    let details = poller.refresh("c-1").await?;

    assert!(details.is_analyzed());
    assert_eq!(backend.full_fetches(), 1);
    assert!(clock.sleeps().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_repeated_refresh_of_unchanged_call_is_identical() -> anyhow::Result<()> {
    // Given
    let backend = Arc::new(completed_call());
    let clock = Arc::new(ManualClock::new());
    let poller = poller(&backend, &clock);

    // When
    let first = poller.refresh("c-1").await?;
    let second = poller.refresh("c-1").await?;

    // Then: same bytes on the wire both times
    assert_eq!(serde_json::to_vec(&first)?, serde_json::to_vec(&second)?);
    assert_eq!(backend.full_fetches(), 2);
    Ok(())
}
