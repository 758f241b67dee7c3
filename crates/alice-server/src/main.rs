//! Alice Chess session server, entry point.
//!
//! # Usage
//!
//! ```text
//! alice-server [OPTIONS]
//!
//! Options:
//!   --port  <PORT>   TCP port to listen on [env: PORT] [default: 3000]
//!   --host  <HOST>   IP address to bind to [env: HOST] [default: 0.0.0.0]
//!   --rules <RULES>  basic | alice [env: ALICE_RULES] [default: basic]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod config;

use alice::ServerBuilder;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config()?;

    let server = ServerBuilder::new()
        .bind(config.bind_addr.to_string())
        .rules(config.rules)
        .build()
        .await?;

    tokio::select! {
        result = server.run() => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
