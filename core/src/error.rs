//! Error taxonomy for version store operations.
//!
//! Every variant is fatal for the operation that produced it. The only
//! condition the bump/set loop retries on is a soft publish conflict, and
//! that is reported as [`crate::publish::PublishOutcome::SoftConflict`],
//! never as an error.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error category for structured logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Unknown driver, unparseable identity or initial version
    ConfigError,
    /// Encrypted private key or unwritable credential files
    CredentialError,
    /// Clone, fetch or reset of the working copy failed
    SyncError,
    /// Version content is not a non-negative decimal integer
    FormatError,
    /// Stage, commit or push failed for an unrecognized reason
    PublishError,
    /// Local filesystem failure outside the categories above
    IoError,
}

impl ErrorCategory {
    /// Machine-readable code for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigError => "CONFIG_ERROR",
            Self::CredentialError => "CREDENTIAL_ERROR",
            Self::SyncError => "SYNC_ERROR",
            Self::FormatError => "FORMAT_ERROR",
            Self::PublishError => "PUBLISH_ERROR",
            Self::IoError => "IO_ERROR",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("credential error: {message}")]
    Credential {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("sync error: {message}")]
    Sync {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("format error: {message}")]
    Format {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("publish error: {message}")]
    Publish {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("io error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl StoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. } => ErrorCategory::ConfigError,
            Self::Credential { .. } => ErrorCategory::CredentialError,
            Self::Sync { .. } => ErrorCategory::SyncError,
            Self::Format { .. } => ErrorCategory::FormatError,
            Self::Publish { .. } => ErrorCategory::PublishError,
            Self::Io { .. } => ErrorCategory::IoError,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
            source: None,
        }
    }

    pub fn credential_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Credential {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn sync_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Sync {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
            source: None,
        }
    }

    pub fn format_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Format {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn publish_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Publish {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for version store operations
pub type Result<T> = std::result::Result<T, StoreError>;
