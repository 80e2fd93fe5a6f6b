use std::fmt;

/// Result type for callboard-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur talking to the backend
#[derive(Debug)]
pub enum Error {
    /// Missing or rejected bearer credential (401/403)
    Unauthorized(String),

    /// The requested record does not exist or is not owned by the caller (404)
    NotFound(String),

    /// The backend rejected the payload (400/422), or local validation failed
    InvalidInput(String),

    /// Any other non-success status
    Api { status: u16, detail: String },

    /// Connection, TLS or timeout failure
    Transport(reqwest::Error),

    /// Response body did not match the expected shape
    Decode(String),

    /// Configuration error
    Config(String),

    /// IO operation failed
    Io(std::io::Error),
}

impl Error {
    pub(crate) fn from_status(status: u16, detail: String) -> Self {
        match status {
            401 | 403 => Error::Unauthorized(detail),
            404 => Error::NotFound(detail),
            400 | 422 => Error::InvalidInput(detail),
            _ => Error::Api { status, detail },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::Api { status, detail } => write!(f, "Backend error ({}): {}", status, detail),
            Error::Transport(err) => write!(f, "Transport error: {}", err),
            Error::Decode(msg) => write!(f, "Unexpected response body: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<callboard_types::Error> for Error {
    fn from(err: callboard_types::Error) -> Self {
        Error::InvalidInput(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Config(format!("invalid backend url: {}", err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
