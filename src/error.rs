//! Error types for the berglas webhook
//!
//! The mutation core itself has no fatal conditions - every precondition
//! failure degrades to leaving a container or pod unmodified. The only
//! process-fatal failures live at the edges: configuration and server
//! startup.

use thiserror::Error;

/// Main error type for webhook operations
#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration is missing or malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// Failed to load or apply TLS material
    #[error("TLS config error: {0}")]
    Tls(String),

    /// The HTTPS server failed to bind or serve
    #[error("server error: {0}")]
    Server(String),
}

impl Error {
    /// Create a configuration error with the given message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
