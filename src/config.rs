//! Process configuration from the environment
//!
//! The webhook is configured entirely through environment variables, matching
//! how it is deployed: image reference and TLS material are injected into the
//! webhook Deployment, nothing is read from disk besides the TLS files
//! themselves.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::Error;
use crate::{DEFAULT_BERGLAS_IMAGE, DEFAULT_WEBHOOK_PORT};

/// Configuration for the webhook process
#[derive(Debug, Clone)]
pub struct Config {
    /// Image the provisioning init container copies the berglas binary from
    pub berglas_image: String,
    /// Path to the PEM-encoded TLS certificate
    pub tls_cert_file: PathBuf,
    /// Path to the PEM-encoded TLS private key
    pub tls_private_key_file: PathBuf,
    /// Address for the webhook HTTPS server
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Reads:
    /// - `BERGLAS_IMAGE` (defaults to [`DEFAULT_BERGLAS_IMAGE`])
    /// - `TLS_CERT_FILE` (required)
    /// - `TLS_PRIVATE_KEY_FILE` (required)
    /// - `LISTEN_ADDR` (defaults to `0.0.0.0:8443`)
    pub fn from_env() -> Result<Self, Error> {
        let berglas_image = std::env::var("BERGLAS_IMAGE")
            .unwrap_or_else(|_| DEFAULT_BERGLAS_IMAGE.to_string());

        let tls_cert_file = std::env::var("TLS_CERT_FILE")
            .map(PathBuf::from)
            .map_err(|_| Error::config("TLS_CERT_FILE must be set"))?;

        let tls_private_key_file = std::env::var("TLS_PRIVATE_KEY_FILE")
            .map(PathBuf::from)
            .map_err(|_| Error::config("TLS_PRIVATE_KEY_FILE must be set"))?;

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(addr) => addr
                .parse()
                .map_err(|e| Error::config(format!("invalid LISTEN_ADDR '{}': {}", addr, e)))?,
            Err(_) => Self::default_listen_addr(),
        };

        Ok(Self {
            berglas_image,
            tls_cert_file,
            tls_private_key_file,
            listen_addr,
        })
    }

    /// Default listen address: all interfaces on the webhook port
    pub fn default_listen_addr() -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], DEFAULT_WEBHOOK_PORT))
    }
}
