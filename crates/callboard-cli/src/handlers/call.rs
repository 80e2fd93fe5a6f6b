use std::sync::Arc;

use anyhow::Result;
use callboard_client::CallQueries;
use callboard_runtime::desk::{NOTICE_ANALYZED, NOTICE_REFRESHED, NOTICE_UNANALYZED};
use callboard_runtime::{CallOutcomePoller, PollOutcome, PollProgress, TokioClock};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::args::hints::cmd;
use crate::context::ExecutionContext;
use crate::presentation::{calls, hint};

pub async fn list(ctx: &ExecutionContext) -> Result<()> {
    let records = ctx.authed_backend()?.list_calls().await?;
    ctx.emit(&records, |palette| calls::list(&records, palette))
}

pub async fn show(ctx: &ExecutionContext, id: &str) -> Result<()> {
    let details = ctx.authed_backend()?.get_call_full(id).await?;
    ctx.emit(&details, |palette| calls::detail(&details, palette))
}

pub async fn delete(ctx: &ExecutionContext, id: &str) -> Result<()> {
    ctx.authed_backend()?.delete_call(id).await?;
    ctx.emit(&json!({ "deleted": id }), |_| format!("Deleted call {}\n", id))
}

/// Manual refresh: exactly one fetch, no retry.
pub async fn refresh(ctx: &ExecutionContext, id: &str) -> Result<()> {
    let backend = Arc::new(ctx.authed_backend()?);
    let poller = CallOutcomePoller::new(backend, Arc::new(TokioClock), ctx.poll_policy());
    let details = poller
        .refresh(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to refresh call data: {}", e))?;
    ctx.emit(&details, |palette| {
        format!("{}\n\n{}", NOTICE_REFRESHED, calls::detail(&details, palette))
    })
}

/// Run the automatic result loop against an existing call. Ctrl-C stops it.
pub async fn await_results(ctx: &ExecutionContext, id: &str) -> Result<()> {
    let backend = Arc::new(ctx.authed_backend()?);
    let poller = CallOutcomePoller::new(backend, Arc::new(TokioClock), ctx.poll_policy());

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let quiet = ctx.is_json();
    let outcome = poller
        .run(id, &cancel, |progress| {
            if quiet {
                return;
            }
            if let PollProgress::Attempt {
                attempt,
                max_attempts,
            } = progress
            {
                eprintln!("Fetching call results... ({}/{})", attempt, max_attempts);
            }
        })
        .await;
    watcher.abort();

    match outcome {
        PollOutcome::Resolved { details, .. } => ctx.emit(&details, |palette| {
            format!("{}\n\n{}", NOTICE_ANALYZED, calls::detail(&details, palette))
        }),
        PollOutcome::Exhausted {
            attempts,
            last_seen,
        } => {
            info!(call_id = id, attempts, "results still pending");
            let lookup = last_seen
                .as_ref()
                .map(|d| d.call.id.clone())
                .unwrap_or_else(|| id.to_string());
            ctx.emit(
                &json!({ "call_id": lookup, "analyzed": false, "attempts": attempts, "details": last_seen }),
                |palette| {
                    format!(
                        "{}\n{}\n",
                        NOTICE_UNANALYZED,
                        hint(palette, "Refresh", &cmd::call_refresh(&lookup))
                    )
                },
            )
        }
        PollOutcome::Cancelled => {
            ctx.say("Stopped waiting.");
            Ok(())
        }
    }
}
