//! Command-line and environment configuration.

use std::net::SocketAddr;

use alice_board::RuleSet;
use anyhow::Context;
use clap::Parser;

/// Alice Chess session server.
///
/// Pairs browser connections into two-player games over WebSocket.
/// Every option can also be set through the environment; command-line
/// arguments take precedence.
#[derive(Debug, Parser)]
#[command(name = "alice-server", version)]
pub struct Cli {
    /// TCP port to listen on.
    #[arg(long, default_value_t = 3000, env = "PORT")]
    pub port: u16,

    /// IP address to bind to. `0.0.0.0` accepts connections on every
    /// interface, `127.0.0.1` only local ones.
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Move validation: `basic` only checks the source square holds a
    /// piece, `alice` enforces piece movement and the board transfer.
    #[arg(long, default_value_t = RuleSet::Basic, env = "ALICE_RULES")]
    pub rules: RuleSet,
}

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub rules: RuleSet,
}

impl Cli {
    /// Converts the parsed arguments into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--host` is not an IP address.
    pub fn into_config(self) -> anyhow::Result<ServerConfig> {
        let bind_addr: SocketAddr = format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address: '{}:{}'", self.host, self.port))?;

        Ok(ServerConfig {
            bind_addr,
            rules: self.rules,
        })
    }
}
