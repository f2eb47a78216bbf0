//! berglas-webhook - admission-time berglas secret injection for pods

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use berglas_webhook::config::Config;
use berglas_webhook::server;

/// Mutating admission webhook that injects berglas secret resolution into pods
///
/// All runtime configuration comes from the environment: BERGLAS_IMAGE,
/// TLS_CERT_FILE, TLS_PRIVATE_KEY_FILE, and LISTEN_ADDR.
#[derive(Parser, Debug)]
#[command(name = "berglas-webhook", version, about, long_about = None)]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install the default crypto provider before any TLS configuration is
    // built; rustls panics at first use otherwise.
    if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
        anyhow::bail!("failed to install default crypto provider: {:?}", e);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let _cli = Cli::parse();

    let config = Config::from_env()?;
    server::serve(config).await?;

    Ok(())
}
