//! Registry auth server.
//!
//! Resolves callers through the credential middlewares and answers identity,
//! permission, and registration requests.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod config;
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use registry_auth::Service;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "registry-auth-server", version, about = "Package registry auth server")]
struct Args {
    /// YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address; overrides `server.bind`.
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Emit logs as JSON lines; overrides `server.json_logs`.
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = AppConfig::load(args.config.as_deref())?;
    init_tracing(args.json_logs || cfg.server.json_logs);

    // No external providers are wired into this binary yet; the chain is
    // static users followed by deny-all.
    let auth = Arc::new(Service::from_config(&cfg.auth, Vec::new())?);
    let app = routes::router(auth);

    let bind = args.bind.unwrap_or(cfg.server.bind);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "Registry auth server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
