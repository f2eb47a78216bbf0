//! berglas-webhook - Kubernetes admission-time secret injection for pods
//!
//! A mutating admission webhook that rewrites pod specs so containers whose
//! environment variables carry `berglas://` secret references exec the berglas
//! binary at startup. The binary resolves the references and execs the
//! original command with the resolved environment merged in; the container
//! image never needs to know berglas exists.
//!
//! # Modules
//!
//! - [`mutate`] - Pod mutation engine (reference detection + container rewriting)
//! - [`webhook`] - Admission review handler and HTTP routes
//! - [`server`] - HTTPS server startup
//! - [`config`] - Process configuration from the environment
//! - [`error`] - Error types for the webhook

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod mutate;
pub mod server;
pub mod webhook;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Well-Known Names
// =============================================================================
// These constants define the contract between the webhook and the berglas
// binary it injects. Centralizing them here ensures the rewritten containers,
// the provisioning init container, and the shared volume always agree.

/// Name of the shared volume where the berglas binary is stored
pub const BIN_VOLUME_NAME: &str = "berglas-bin";

/// Mount path where the berglas binary can be found
pub const BIN_VOLUME_MOUNT_PATH: &str = "/berglas/bin/";

/// Name of the init container that copies the berglas binary into the volume
pub const BIN_INIT_CONTAINER_NAME: &str = "copy-berglas-bin";

/// Invocation prefix for the berglas binary: execute the wrapped command
/// using the already-resolved local binary, end of flags
pub const BERGLAS_EXEC_ARGS: [&str; 3] = ["exec", "--local", "--"];

/// Prefix identifying an environment-variable value as a berglas reference
///
/// The reference grammar is owned by berglas itself; the webhook only needs
/// this predicate-level check.
pub const BERGLAS_REFERENCE_PREFIX: &str = "berglas://";

/// Annotation that opts a pod out of injection when set to `"false"`
pub const INJECT_ANNOTATION: &str = "berglas/inject";

/// Annotation recording that injection was performed on a pod
pub const INJECTED_ANNOTATION: &str = "berglas/injected";

/// Default image the provisioning init container copies the binary from
pub const DEFAULT_BERGLAS_IMAGE: &str = "gcr.io/berglas/berglas:latest";

/// Default port for the webhook HTTPS server
pub const DEFAULT_WEBHOOK_PORT: u16 = 8443;
