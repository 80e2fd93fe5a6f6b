//! Call Outcome Poller
//!
//! After a live call ends the backend still has to receive the provider's
//! webhook, persist the call and run post-call analysis. The poller bridges
//! that gap with a bounded, strictly sequential retry loop:
//!
//! 1. sleep `initial_delay` once
//! 2. resolve the durable call id (direct lookup, then a list scan)
//! 3. fetch the full detail for that id
//! 4. stop as soon as `results` is present
//! 5. otherwise sleep `retry_delay` and try again, up to `max_attempts`
//!
//! Missing results, unknown ids and transport failures are all treated the
//! same way: as a reason to try again. Running out of attempts is a soft
//! outcome ([`PollOutcome::Exhausted`]), not an error.

use std::sync::Arc;
use std::time::Duration;

use callboard_client::{CallQueries, PollSettings};
use callboard_types::FullCallDetails;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub initial_delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from(PollSettings::default())
    }
}

impl From<PollSettings> for PollPolicy {
    fn from(settings: PollSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            retry_delay: Duration::from_millis(settings.retry_delay_ms),
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
        }
    }
}

impl PollPolicy {
    /// Longest time a loop can take when every attempt settles instantly.
    pub fn give_up_after(&self) -> Duration {
        self.initial_delay + self.retry_delay * self.max_attempts.saturating_sub(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollProgress {
    /// Attempt `attempt` of `max_attempts` is about to be issued.
    Attempt { attempt: u32, max_attempts: u32 },
    /// Attempt `attempt` came back without results; sleeping before the next one.
    Waiting { attempt: u32, delay: Duration },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Results were present on attempt `attempts`.
    Resolved {
        details: FullCallDetails,
        attempts: u32,
    },
    /// Every attempt came back without results. `last_seen` is the most
    /// recent detail that did resolve, if any.
    Exhausted {
        attempts: u32,
        last_seen: Option<FullCallDetails>,
    },
    Cancelled,
}

impl PollOutcome {
    pub fn details(&self) -> Option<&FullCallDetails> {
        match self {
            PollOutcome::Resolved { details, .. } => Some(details),
            PollOutcome::Exhausted { last_seen, .. } => last_seen.as_ref(),
            PollOutcome::Cancelled => None,
        }
    }
}

enum Attempt {
    Unresolved,
    Pending(FullCallDetails),
    Analyzed(FullCallDetails),
}

#[derive(Clone)]
pub struct CallOutcomePoller {
    queries: Arc<dyn CallQueries>,
    clock: Arc<dyn Clock>,
    policy: PollPolicy,
}

impl CallOutcomePoller {
    pub fn new(queries: Arc<dyn CallQueries>, clock: Arc<dyn Clock>, policy: PollPolicy) -> Self {
        Self {
            queries,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Run the automatic loop for `client_call_id` without progress reporting.
    pub async fn run_quiet(&self, client_call_id: &str, cancel: &CancellationToken) -> PollOutcome {
        self.run(client_call_id, cancel, |_| {}).await
    }

    pub async fn run<F>(
        &self,
        client_call_id: &str,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> PollOutcome
    where
        F: FnMut(PollProgress) + Send,
    {
        let max_attempts = self.policy.max_attempts;

        if self.sleep_or_cancel(self.policy.initial_delay, cancel).await {
            return PollOutcome::Cancelled;
        }

        let mut last_seen = None;
        for attempt in 1..=max_attempts {
            if cancel.is_cancelled() {
                return PollOutcome::Cancelled;
            }

            on_progress(PollProgress::Attempt {
                attempt,
                max_attempts,
            });
            debug!(call_id = client_call_id, attempt, max_attempts, "polling call outcome");

            match self.attempt(client_call_id).await {
                Ok(Attempt::Analyzed(details)) => {
                    info!(
                        call_id = client_call_id,
                        durable_id = %details.call.id,
                        attempt,
                        "call results available"
                    );
                    return PollOutcome::Resolved {
                        details,
                        attempts: attempt,
                    };
                }
                Ok(Attempt::Pending(details)) => {
                    debug!(call_id = client_call_id, attempt, "results not yet available");
                    last_seen = Some(details);
                }
                Ok(Attempt::Unresolved) => {
                    debug!(call_id = client_call_id, attempt, "call not yet persisted");
                }
                Err(err) => {
                    debug!(call_id = client_call_id, attempt, error = %err, "poll attempt failed");
                }
            }

            if attempt < max_attempts {
                on_progress(PollProgress::Waiting {
                    attempt,
                    delay: self.policy.retry_delay,
                });
                if self.sleep_or_cancel(self.policy.retry_delay, cancel).await {
                    return PollOutcome::Cancelled;
                }
            }
        }

        info!(
            call_id = client_call_id,
            attempts = max_attempts,
            "gave up waiting for call results"
        );
        PollOutcome::Exhausted {
            attempts: max_attempts,
            last_seen,
        }
    }

    /// Single fetch of the latest full detail, no retry. Failures surface as-is.
    pub async fn refresh(&self, call_id: &str) -> callboard_client::Result<FullCallDetails> {
        self.queries.get_call_full(call_id).await
    }

    /// Map a client-held id (possibly the provider's session id) onto the
    /// backend's durable row id.
    pub async fn resolve_call_id(
        &self,
        client_call_id: &str,
    ) -> callboard_client::Result<Option<String>> {
        match self.queries.get_call(client_call_id).await {
            Ok(record) => Ok(Some(record.id)),
            Err(err) => {
                debug!(call_id = client_call_id, error = %err, "direct lookup failed, scanning call list");
                let calls = self.queries.list_calls().await?;
                Ok(calls
                    .into_iter()
                    .find(|record| record.matches_client_id(client_call_id))
                    .map(|record| record.id))
            }
        }
    }

    async fn attempt(&self, client_call_id: &str) -> callboard_client::Result<Attempt> {
        let Some(durable_id) = self.resolve_call_id(client_call_id).await? else {
            return Ok(Attempt::Unresolved);
        };

        let details = self.queries.get_call_full(&durable_id).await?;
        if details.is_analyzed() {
            Ok(Attempt::Analyzed(details))
        } else {
            Ok(Attempt::Pending(details))
        }
    }

    /// Returns true when cancelled before the delay elapsed.
    async fn sleep_or_cancel(&self, delay: Duration, cancel: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => true,
            _ = self.clock.sleep(delay) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_matches_product_settings() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.retry_delay, Duration::from_millis(2000));
        assert_eq!(policy.initial_delay, Duration::from_millis(5000));
        assert_eq!(policy.give_up_after(), Duration::from_millis(13_000));
    }

    #[test]
    fn test_policy_clamps_zero_attempts() {
        let policy = PollPolicy::from(PollSettings {
            max_attempts: 0,
            retry_delay_ms: 10,
            initial_delay_ms: 0,
        });
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.give_up_after(), Duration::ZERO);
    }
}
