use config::ConfigError;
use thiserror::Error;

/// Problems found before any request is sent. These abort the run.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("GITHUB_TOKEN environment variable not set (export GITHUB_TOKEN='your_token_here')")]
    MissingCredential,

    #[error("invalid repository '{0}', expected owner/name")]
    InvalidCollection(String),

    #[error("issue {index} is invalid: {reason}")]
    InvalidPayload { index: usize, reason: String },

    #[error("batch file {0} contains no issues")]
    EmptyBatch(String),

    #[error(transparent)]
    Settings(#[from] ConfigError),
}

/// A single failed create call. The batch keeps going after one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordCreationError {
    #[error("status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("transport error: {message}")]
    Transport { message: String },
}

impl RecordCreationError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message, .. } | Self::Transport { message } => message,
        }
    }
}
