use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const CONFIG_FILE: &str = "config.toml";
const CREDENTIALS_FILE: &str = "credentials.toml";

/// Resolve the workspace directory holding `config.toml` and `credentials.toml`:
/// 1. Explicit path (with tilde expansion)
/// 2. CALLBOARD_PATH environment variable (with tilde expansion)
/// 3. XDG config directory
/// 4. ~/.callboard
pub fn resolve_workspace_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("CALLBOARD_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("callboard"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".callboard"));
    }

    Err(Error::Config(
        "Could not determine workspace path: no HOME directory or XDG config directory found"
            .to_string(),
    ))
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// Result polling knobs, in milliseconds on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub initial_delay_ms: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay_ms: 2000,
            initial_delay_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub poll: PollSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: 30,
            poll: PollSettings::default(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn path_in(workspace: &Path) -> PathBuf {
        workspace.join(CONFIG_FILE)
    }

    /// Apply `CALLBOARD_BACKEND_URL` on top of the file contents.
    pub fn with_env_overrides(self) -> Self {
        let backend_url = std::env::var("CALLBOARD_BACKEND_URL").ok();
        self.with_backend_url(backend_url)
    }

    pub fn with_backend_url(mut self, backend_url: Option<String>) -> Self {
        if let Some(url) = backend_url.filter(|u| !u.trim().is_empty()) {
            self.backend_url = url;
        }
        self
    }

    /// Per-request timeout; `request_timeout_secs = 0` means none.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.backend_url)?;
        if self.poll.max_attempts == 0 {
            return Err(Error::Config(
                "poll.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Bearer token persisted after `auth login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Credentials {
    pub fn path_in(workspace: &Path) -> PathBuf {
        workspace.join(CREDENTIALS_FILE)
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(toml::from_str(&content)?))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Returns true when a stored credential was removed.
    pub fn clear(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }
}

/// `CALLBOARD_TOKEN` wins over the stored credential.
pub fn resolve_token(workspace: &Path) -> Result<Option<String>> {
    if let Ok(token) = std::env::var("CALLBOARD_TOKEN")
        && !token.trim().is_empty()
    {
        return Ok(Some(token));
    }
    Ok(Credentials::load_from(&Credentials::path_in(workspace))?.map(|c| c.access_token))
}
