use super::enums::{AmbientSoundArg, ScenarioArg};
use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Log in, register and manage the stored credential")]
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    #[command(about = "Manage agent configuration profiles")]
    Agent {
        #[command(subcommand)]
        command: AgentCommand,
    },

    #[command(about = "Review call records and extracted results")]
    Call {
        #[command(subcommand)]
        command: CallCommand,
    },

    #[command(about = "Place a test call against an agent profile")]
    TestCall {
        #[command(subcommand)]
        command: TestCallCommand,
    },
}

#[derive(Subcommand)]
pub enum AuthCommand {
    #[command(about = "Log in and store the access token")]
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "CALLBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    #[command(about = "Create an account and store the access token")]
    Register {
        #[arg(long)]
        email: String,

        #[arg(long, env = "CALLBOARD_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        full_name: String,
    },

    #[command(about = "Show the logged-in user")]
    Whoami,

    #[command(about = "Forget the stored access token")]
    Logout,
}

#[derive(Subcommand)]
pub enum AgentCommand {
    #[command(about = "List agent profiles")]
    List,

    #[command(about = "Show one agent profile")]
    Show { id: String },

    #[command(about = "Create an agent profile; unset options take the product defaults")]
    Create {
        #[arg(long)]
        name: String,

        #[command(flatten)]
        fields: AgentFieldArgs,
    },

    #[command(about = "Update selected fields of an agent profile")]
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        active: Option<bool>,

        #[command(flatten)]
        fields: AgentFieldArgs,
    },

    #[command(about = "Deactivate an agent profile")]
    Delete { id: String },
}

/// Tuning options shared by `agent create` and `agent update`
#[derive(Debug, Clone, Default, Args)]
pub struct AgentFieldArgs {
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub scenario: Option<ScenarioArg>,

    #[arg(long)]
    pub system_prompt: Option<String>,

    #[arg(long)]
    pub greeting: Option<String>,

    #[arg(long)]
    pub voice: Option<String>,

    #[arg(long)]
    pub language: Option<String>,

    #[arg(long)]
    pub backchannel: Option<bool>,

    /// Comma separated
    #[arg(long)]
    pub backchannel_words: Option<String>,

    #[arg(long)]
    pub filler_words_enabled: Option<bool>,

    /// Comma separated
    #[arg(long)]
    pub filler_words: Option<String>,

    #[arg(long)]
    pub interruption_sensitivity: Option<f64>,

    #[arg(long)]
    pub response_delay_ms: Option<u32>,

    #[arg(long)]
    pub responsiveness: Option<f64>,

    #[arg(long)]
    pub ambient_sound: Option<AmbientSoundArg>,

    #[arg(long)]
    pub ambient_volume: Option<f64>,

    #[arg(long)]
    pub max_duration_secs: Option<u32>,

    #[arg(long)]
    pub auto_end_call: Option<bool>,

    #[arg(long)]
    pub end_after_silence_ms: Option<u32>,

    /// Comma separated
    #[arg(long)]
    pub reminder_keywords: Option<String>,

    #[arg(long)]
    pub reminder: Option<bool>,

    /// Comma separated
    #[arg(long)]
    pub emergency_keywords: Option<String>,
}

#[derive(Subcommand)]
pub enum CallCommand {
    #[command(about = "List calls, newest first")]
    List,

    #[command(about = "Show a call with its transcript and extracted results")]
    Show { id: String },

    #[command(about = "Delete a call record")]
    Delete { id: String },

    #[command(about = "Fetch the latest state of a call once")]
    Refresh { id: String },

    #[command(about = "Wait for a finished call's results to be analyzed")]
    Await { id: String },
}

#[derive(Subcommand)]
pub enum TestCallCommand {
    #[command(about = "Talk to an agent from this terminal; press Enter to hang up")]
    Web {
        #[arg(long)]
        agent: String,

        #[arg(long)]
        driver: String,

        #[arg(long)]
        load: String,
    },

    #[command(about = "Have an agent call a phone number")]
    Phone {
        #[arg(long)]
        agent: String,

        #[arg(long)]
        driver: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        load: String,
    },
}
