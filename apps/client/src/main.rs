mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use client::config::Config;
use client::errors::ApiError;
use client::http::ApiClient;
use client::session::FileSessionStorage;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Load configuration first (errors out on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let storage = Arc::new(FileSessionStorage::new(&config.state_dir));
    let client = ApiClient::new(&config, storage)?;
    info!(
        "client ready (base {}, {})",
        config.api_base_url,
        if client.session().is_logged_in() {
            "signed in"
        } else {
            "signed out"
        }
    );

    match cli::run(args, config, client).await {
        Ok(()) => Ok(()),
        Err(e) => {
            if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::SessionExpired)) {
                eprintln!("session expired, sign in again with `client login <token>`");
                std::process::exit(1);
            }
            Err(e)
        }
    }
}
