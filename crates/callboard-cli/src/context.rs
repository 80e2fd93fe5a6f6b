use anyhow::{Context, Result, bail};
use callboard_client::{Config, Credentials, HttpBackend, resolve_token, resolve_workspace_path};
use callboard_runtime::PollPolicy;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::args::OutputFormat;
use crate::args::hints::cmd;
use crate::presentation::Palette;

/// Per-invocation state shared by every handler
pub struct ExecutionContext {
    workspace: PathBuf,
    config: Config,
    pub format: OutputFormat,
    pub palette: Palette,
}

impl ExecutionContext {
    pub fn new(
        workspace: Option<&str>,
        backend_url: Option<String>,
        format: OutputFormat,
    ) -> Result<Self> {
        let workspace = resolve_workspace_path(workspace)?;
        let config_path = Config::path_in(&workspace);
        let config = Config::load_from(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?
            .with_env_overrides()
            .with_backend_url(backend_url);
        config.validate()?;

        Ok(Self {
            workspace,
            config,
            format,
            palette: Palette::detect(),
        })
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn credentials_path(&self) -> PathBuf {
        Credentials::path_in(&self.workspace)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::from(self.config.poll)
    }

    /// Backend client carrying the stored token, if there is one.
    pub fn backend(&self) -> Result<HttpBackend> {
        let token = resolve_token(&self.workspace)?;
        Ok(HttpBackend::from_config(&self.config, token)?)
    }

    pub fn authed_backend(&self) -> Result<HttpBackend> {
        let backend = self.backend()?;
        if !backend.has_token() {
            bail!("Not logged in. Run: {}", cmd::AUTH_LOGIN);
        }
        Ok(backend)
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print `value` as JSON, or the plain rendering otherwise.
    pub fn emit<T, F>(&self, value: &T, plain: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce(Palette) -> String,
    {
        if self.is_json() {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", plain(self.palette));
        }
        Ok(())
    }

    /// Plain-mode status line; suppressed for JSON output.
    pub fn say(&self, line: impl AsRef<str>) {
        if !self.is_json() {
            println!("{}", line.as_ref());
        }
    }
}
