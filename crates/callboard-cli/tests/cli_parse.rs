use callboard::{
    AgentCommand, CallCommand, Cli, Commands, LogLevel, OutputFormat, TestCallCommand,
};
use clap::Parser;

#[test]
fn test_global_flags_after_subcommand() -> anyhow::Result<()> {
    let cli = Cli::try_parse_from([
        "callboard",
        "call",
        "await",
        "call_a",
        "--format",
        "json",
        "--log-level",
        "debug",
        "--workspace",
        "/tmp/cb",
    ])?;

    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.log_level, LogLevel::Debug);
    assert_eq!(cli.workspace.as_deref(), Some("/tmp/cb"));
    assert!(matches!(
        cli.command,
        Some(Commands::Call {
            command: CallCommand::Await { ref id }
        }) if id == "call_a"
    ));
    Ok(())
}

#[test]
fn test_defaults_without_subcommand() -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(["callboard"])?;

    assert!(cli.command.is_none());
    assert_eq!(cli.format, OutputFormat::Plain);
    assert_eq!(cli.log_level, LogLevel::Warn);
    Ok(())
}

#[test]
fn test_agent_update_collects_optional_fields() -> anyhow::Result<()> {
    let cli = Cli::try_parse_from([
        "callboard",
        "agent",
        "update",
        "agent-1",
        "--responsiveness",
        "0.5",
        "--filler-words-enabled",
        "false",
    ])?;

    let Some(Commands::Agent {
        command: AgentCommand::Update {
            id, name, fields, ..
        },
    }) = cli.command
    else {
        anyhow::bail!("expected agent update");
    };
    assert_eq!(id, "agent-1");
    assert!(name.is_none());
    assert_eq!(fields.responsiveness, Some(0.5));
    assert_eq!(fields.filler_words_enabled, Some(false));
    assert!(fields.voice.is_none());
    Ok(())
}

#[test]
fn test_web_call_requires_driver_and_load() {
    let result = Cli::try_parse_from(["callboard", "test-call", "web", "--agent", "agent-1"]);
    assert!(result.is_err());
}

#[test]
fn test_phone_call_arguments() -> anyhow::Result<()> {
    let cli = Cli::try_parse_from([
        "callboard",
        "test-call",
        "phone",
        "--agent",
        "agent-1",
        "--driver",
        "Mike",
        "--phone",
        "+15555550100",
        "--load",
        "L-1",
    ])?;

    assert!(matches!(
        cli.command,
        Some(Commands::TestCall {
            command: TestCallCommand::Phone { ref phone, .. }
        }) if phone == "+15555550100"
    ));
    Ok(())
}
