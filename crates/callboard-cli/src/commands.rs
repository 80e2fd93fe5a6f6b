use super::args::{AgentCommand, AuthCommand, CallCommand, Cli, Commands, TestCallCommand};
use super::context::ExecutionContext;
use super::handlers;
use crate::logging;
use anyhow::Result;

pub async fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let ctx = ExecutionContext::new(cli.workspace.as_deref(), cli.backend_url, cli.format)?;

    let Some(command) = cli.command else {
        handlers::guidance::handle(&ctx);
        return Ok(());
    };

    match command {
        Commands::Auth { command } => match command {
            AuthCommand::Login { email, password } => {
                handlers::auth::login(&ctx, email, password).await
            }
            AuthCommand::Register {
                email,
                password,
                full_name,
            } => handlers::auth::register(&ctx, email, password, full_name).await,
            AuthCommand::Whoami => handlers::auth::whoami(&ctx).await,
            AuthCommand::Logout => handlers::auth::logout(&ctx),
        },

        Commands::Agent { command } => match command {
            AgentCommand::List => handlers::agent::list(&ctx).await,
            AgentCommand::Show { id } => handlers::agent::show(&ctx, &id).await,
            AgentCommand::Create { name, fields } => {
                handlers::agent::create(&ctx, name, fields).await
            }
            AgentCommand::Update {
                id,
                name,
                active,
                fields,
            } => handlers::agent::update(&ctx, &id, name, active, fields).await,
            AgentCommand::Delete { id } => handlers::agent::delete(&ctx, &id).await,
        },

        Commands::Call { command } => match command {
            CallCommand::List => handlers::call::list(&ctx).await,
            CallCommand::Show { id } => handlers::call::show(&ctx, &id).await,
            CallCommand::Delete { id } => handlers::call::delete(&ctx, &id).await,
            CallCommand::Refresh { id } => handlers::call::refresh(&ctx, &id).await,
            CallCommand::Await { id } => handlers::call::await_results(&ctx, &id).await,
        },

        Commands::TestCall { command } => match command {
            TestCallCommand::Web {
                agent,
                driver,
                load,
            } => handlers::test_call::web(&ctx, agent, driver, load).await,
            TestCallCommand::Phone {
                agent,
                driver,
                phone,
                load,
            } => handlers::test_call::phone(&ctx, agent, driver, phone, load).await,
        },
    }
}
