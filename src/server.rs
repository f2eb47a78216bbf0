//! Webhook HTTPS server
//!
//! The API server only talks TLS to admission webhooks, so there is no
//! plaintext listener. Certificate material is provided through the files
//! named in [`Config`]; rotation is handled by redeploying, not by watching
//! the files.

use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use tracing::info;

use crate::config::Config;
use crate::error::Error;
use crate::webhook::{webhook_router, AppState};

/// Start the webhook HTTPS server and serve until shutdown
pub async fn serve(config: Config) -> Result<(), Error> {
    let state = Arc::new(AppState::new(config.berglas_image.clone()));
    let app = webhook_router(state);

    let tls_config = RustlsConfig::from_pem_file(&config.tls_cert_file, &config.tls_private_key_file)
        .await
        .map_err(|e| Error::Tls(e.to_string()))?;

    info!(addr = %config.listen_addr, image = %config.berglas_image, "Starting admission webhook server");

    axum_server::bind_rustls(config.listen_addr, tls_config)
        .serve(app.into_make_service())
        .await
        .map_err(|e| Error::Server(e.to_string()))?;

    Ok(())
}
