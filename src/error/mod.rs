//! Error types for the Yachtsy MCP server.

use thiserror::Error;

/// Boxed cause carried by [`YachtsyError::Stream`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Primary error type for all crate operations.
#[derive(Error, Debug)]
pub enum YachtsyError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stream error: {message}")]
    Stream {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

/// Where in an invocation a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Startup-time configuration problem. Fatal to process bootstrap.
    Configuration,
    /// The request to open the upstream stream failed.
    Request,
    /// The upstream chunk sequence failed mid-iteration.
    Stream,
}

impl YachtsyError {
    /// Create an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Wrap a failure raised while iterating the upstream sequence.
    ///
    /// A value that already is a stream error is returned unchanged, so
    /// wrapping twice never nests the cause.
    pub fn stream<E>(cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        let cause: BoxError = cause.into();
        match cause.downcast::<YachtsyError>() {
            Ok(inner) => match *inner {
                stream @ Self::Stream { .. } => stream,
                other => Self::Stream {
                    message: other.to_string(),
                    source: Some(Box::new(other)),
                },
            },
            Err(cause) => Self::Stream {
                message: cause.to_string(),
                source: Some(cause),
            },
        }
    }

    /// Stream error without an underlying cause.
    pub fn stream_message(message: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
            source: None,
        }
    }

    /// Classify this error into the invocation failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Configuration(_) => FailureKind::Configuration,
            Self::Stream { .. } => FailureKind::Stream,
            Self::Authentication(_)
            | Self::Api { .. }
            | Self::Network(_)
            | Self::Serialization(_)
            | Self::Io(_) => FailureKind::Request,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, YachtsyError>;
