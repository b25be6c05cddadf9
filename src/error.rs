//! Unified error hierarchy for WellRS
//!
//! Provides a structured error type system covering credential handling,
//! upstream API failures, and configuration, with integration into the
//! tracing system.

use thiserror::Error;

/// Top-level error type for all WellRS operations
#[derive(Debug, Error)]
pub enum WellRsError {
    /// No credential is stored; the user must run `auth set` first
    #[error("No personal access token stored. Run `wellrs auth set <PAT>` to sign in.")]
    MissingCredential,

    /// Upstream API client errors
    #[error("Upstream error: {0}")]
    Client(#[from] ClientError),

    /// Token store errors
    #[error("Token store error: {0}")]
    Token(#[from] TokenError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Chart rendering errors
    #[error("Chart error: {0}")]
    Chart(String),
}

/// Upstream wellness API errors
///
/// Any failure among the credential check and the three data fetches
/// collapses the whole request into a single error; partial results are
/// never surfaced.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Upstream rejected the request (invalid PAT or API error)
    #[error("Upstream rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Network-level failure reaching the upstream API
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Malformed upstream response: {reason}")]
    MalformedResponse { reason: String },
}

/// Token store errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// Could not resolve an application config directory on this platform
    #[error("No config directory available on this platform")]
    NoConfigDir,

    /// Filesystem failure reading or writing the token file
    #[error("Token file error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias for WellRS operations
pub type Result<T> = std::result::Result<T, WellRsError>;

impl WellRsError {
    /// HTTP-style status code associated with this error, matching how the
    /// reference boundary reported failures
    pub fn status_code(&self) -> u16 {
        match self {
            WellRsError::MissingCredential => 400,
            WellRsError::Client(ClientError::Rejected { status, .. }) => *status,
            _ => 500,
        }
    }
}
