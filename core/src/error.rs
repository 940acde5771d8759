//! Fault taxonomy and configuration errors.
//!
//! # Design
//! A [`Fault`] is whatever stopped a single call from producing an envelope.
//! It is created where the call fails, classified exactly once by
//! [`crate::classifier::ErrorClassifier`], then dropped. The kinds form a
//! closed set so the classifier can match them in an explicit order.
//!
//! [`ConfigError`] covers the only errors that do reach callers: building a
//! transport from an unusable host configuration.

/// One failed call: where it went and why it failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} ({path})")]
pub struct Fault {
    /// Request path below `/api/v4`, e.g. `/groups/123/invite`. Empty when
    /// the failing operation had no request.
    pub path: String,
    pub kind: FaultKind,
}

impl Fault {
    pub fn new(path: impl Into<String>, kind: FaultKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn http(path: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::new(
            path,
            FaultKind::Http {
                status,
                body: body.into(),
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FaultKind {
    /// Connect, read or write ceiling exceeded.
    #[error("request timed out")]
    Timeout,

    /// Host name could not be resolved.
    #[error("unknown host: {message}")]
    UnknownHost { message: String },

    /// Generic I/O failure while sending or reading.
    #[error("i/o error: {message}")]
    Io { message: String },

    /// Socket-level failure: refused, reset, aborted.
    #[error("socket error: {message}")]
    Socket { message: String },

    /// TLS handshake or certificate failure.
    #[error("tls error: {message}")]
    Tls { message: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}")]
    Http { status: u16, body: String },

    /// A request or response body could not be (de)serialized.
    #[error("malformed payload: {message}")]
    Payload { message: String },

    #[error("{message}")]
    Unclassified { message: String },
}

/// Errors raised while turning host configuration into a transport.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid server address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("invalid port {0:?}")]
    InvalidPort(String),

    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}
