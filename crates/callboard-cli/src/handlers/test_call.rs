use std::sync::Arc;

use anyhow::{Result, bail};
use callboard_runtime::{
    CallDesk, LiveCallSession, SessionEnd, SessionEvent, TokioClock, drive_session,
};
use callboard_types::{PhoneCallInput, WebCallInput};
use tracing::debug;

use crate::args::hints::cmd;
use crate::console_session::ConsoleSession;
use crate::context::ExecutionContext;
use crate::presentation::desk::{TestCallReport, summary};
use crate::presentation::hint;

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{} must not be empty", field);
    }
    Ok(())
}

pub async fn web(
    ctx: &ExecutionContext,
    agent: String,
    driver: String,
    load: String,
) -> Result<()> {
    require("--agent", &agent)?;
    require("--driver", &driver)?;
    require("--load", &load)?;

    let backend = Arc::new(ctx.authed_backend()?);
    let desk = CallDesk::new(backend, Arc::new(TokioClock), ctx.poll_policy());

    let input = WebCallInput {
        agent_configuration_id: agent,
        driver_name: driver,
        load_number: load,
    };
    let (token, response) = match desk.start_web_call(&input).await {
        Ok(started) => started,
        Err(err) => bail!("{}", desk.snapshot().error.unwrap_or_else(|| err.to_string())),
    };

    let mut session = ConsoleSession::new();
    let Some(mut events) = session.take_events() else {
        bail!("Call session produced no event stream");
    };
    if let Err(err) = session.start(&response.access_token).await {
        desk.handle_event(token, SessionEvent::Error(err.to_string()));
        bail!("Call error: {}", err);
    }

    ctx.say(format!("Web call {} connected.", response.call_id));
    ctx.say("Call started - speak now! Press Enter to end the call.");

    let end = drive_session(&desk, token, &mut events).await;
    session.stop().await?;

    match end {
        SessionEnd::Ended => {}
        SessionEnd::Failed(reason) => bail!("Call error: {}", reason),
        SessionEnd::Disconnected => {
            debug!("session event source closed, treating as hang-up");
            desk.handle_event(token, SessionEvent::Ended);
        }
    }

    if let Some(notice) = desk.snapshot().notice {
        ctx.say(notice);
    }
    desk.wait_for_outcome().await;

    let snapshot = desk.snapshot();
    ctx.emit(&TestCallReport::new(&snapshot), |palette| {
        summary(&snapshot, palette)
    })
}

pub async fn phone(
    ctx: &ExecutionContext,
    agent: String,
    driver: String,
    phone: String,
    load: String,
) -> Result<()> {
    require("--agent", &agent)?;
    require("--driver", &driver)?;
    require("--phone", &phone)?;
    require("--load", &load)?;

    let backend = Arc::new(ctx.authed_backend()?);
    let desk = CallDesk::new(backend, Arc::new(TokioClock), ctx.poll_policy());

    let input = PhoneCallInput {
        agent_configuration_id: agent,
        driver_name: driver,
        phone_number: phone,
        load_number: load,
    };
    let record = match desk.start_phone_call(&input).await {
        Ok(record) => record,
        Err(err) => bail!("{}", desk.snapshot().error.unwrap_or_else(|| err.to_string())),
    };

    let notice = desk.snapshot().notice.unwrap_or_default();
    ctx.emit(&record, |palette| {
        format!(
            "{}\nCall {} is {}.\n{}\n",
            notice,
            record.id,
            record.status,
            hint(palette, "Wait for results", &cmd::call_await(&record.id))
        )
    })
}
