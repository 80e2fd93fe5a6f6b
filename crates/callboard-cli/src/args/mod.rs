mod commands;
mod enums;
pub mod hints;

pub use commands::*;
pub use enums::*;

use clap::Parser;

#[derive(Parser)]
#[command(name = "callboard")]
#[command(about = "Configure dispatch voice agents, run test calls and review call results", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding config.toml and credentials.toml
    #[arg(long, global = true)]
    pub workspace: Option<String>,

    /// Override the backend base URL from the config file
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
