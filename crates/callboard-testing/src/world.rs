//! TestWorld pattern for CLI integration tests.
//!
//! Each world owns a temporary workspace with its own `config.toml` and,
//! optionally, stored credentials. Commands run against the built
//! `callboard` binary with the ambient `CALLBOARD_*` variables stripped.

use anyhow::Result;
use assert_cmd::Command;
use callboard_client::{Config, Credentials, PollSettings};
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

const AMBIENT_VARS: &[&str] = &[
    "CALLBOARD_TOKEN",
    "CALLBOARD_BACKEND_URL",
    "CALLBOARD_PATH",
    "CALLBOARD_PASSWORD",
    "RUST_LOG",
];

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use callboard_testing::TestWorld;
///
/// let world = TestWorld::new()?
///     .with_backend("http://127.0.0.1:9000")?
///     .with_token("tok-1")?;
///
/// let result = world.run(&["call", "list"])?;
/// assert!(result.success());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    config: Config,
    env_vars: HashMap<String, String>,
}

impl TestWorld {
    /// Fresh workspace whose poll loop never sleeps.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let config = Config {
            poll: PollSettings {
                max_attempts: 3,
                retry_delay_ms: 0,
                initial_delay_ms: 0,
            },
            ..Config::default()
        };
        let world = Self {
            temp_dir,
            config,
            env_vars: HashMap::new(),
        };
        world.write_config()?;
        Ok(world)
    }

    pub fn workspace(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn with_backend(mut self, url: impl Into<String>) -> Result<Self> {
        self.config.backend_url = url.into();
        self.write_config()?;
        Ok(self)
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Result<Self> {
        self.config.poll.max_attempts = max_attempts;
        self.write_config()?;
        Ok(self)
    }

    /// Store a credential as if `auth login` had run.
    pub fn with_token(self, token: &str) -> Result<Self> {
        Credentials {
            access_token: token.to_string(),
            email: Some("dispatch@example.com".to_string()),
        }
        .save_to(&Credentials::path_in(self.workspace()))?;
        Ok(self)
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    pub fn stored_credentials(&self) -> Result<Option<Credentials>> {
        Ok(Credentials::load_from(&Credentials::path_in(
            self.workspace(),
        ))?)
    }

    fn write_config(&self) -> Result<()> {
        self.config.save_to(&Config::path_in(self.workspace()))?;
        Ok(())
    }

    /// Point `cmd` at this workspace and apply the world's environment.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--workspace").arg(self.workspace());
        for key in AMBIENT_VARS {
            cmd.env_remove(key);
        }
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }
        cmd
    }

    /// Run the CLI with `args`; stdin is closed immediately.
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        self.run_with_stdin(args, "")
    }

    #[allow(deprecated)]
    pub fn run_with_stdin(&self, args: &[&str], input: &str) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("callboard")
            .map_err(|e| anyhow::anyhow!("Failed to find callboard binary: {}", e))?;
        self.configure_command(&mut cmd);
        cmd.args(args).write_stdin(input.to_string());

        let output = cmd.output()?;
        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
