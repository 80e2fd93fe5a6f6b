use std::fmt;

/// Result type for callboard-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Backend request failed
    Backend(callboard_client::Error),

    /// The live call session reported a failure or could not be driven
    Session(String),

    /// An operation needed a call session but none is active
    NoActiveCall,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Backend(err) => write!(f, "{}", err),
            Error::Session(msg) => write!(f, "Call session error: {}", msg),
            Error::NoActiveCall => write!(f, "No call to act on; start a call first"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Backend(err) => Some(err),
            Error::Session(_) | Error::NoActiveCall => None,
        }
    }
}

impl From<callboard_client::Error> for Error {
    fn from(err: callboard_client::Error) -> Self {
        Error::Backend(err)
    }
}
