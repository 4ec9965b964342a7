//! Command-line options.
//!
//! Every option can also be set through a `CERTINFO_*` environment variable
//! (or a `.env` file loaded at startup).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_PORT, TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS,
};
use crate::config::types::{Config, LogFormat, LogLevel};

/// Command-line options and configuration.
///
/// # Examples
///
/// ```bash
/// # Serve POST /certs on port 9000
/// certinfo serve --port 9000
///
/// # Describe a live endpoint
/// certinfo fetch https://example.com --pretty
///
/// # Describe a local PEM bundle
/// certinfo describe chain.pem
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "certinfo",
    version,
    about = "Describes the TLS certificate chain presented by an HTTPS endpoint."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(
        long,
        global = true,
        value_enum,
        env = "CERTINFO_LOG_LEVEL",
        default_value_t = LogLevel::Info
    )]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(
        long,
        global = true,
        value_enum,
        env = "CERTINFO_LOG_FORMAT",
        default_value_t = LogFormat::Plain
    )]
    pub log_format: LogFormat,

    /// TCP connect timeout in seconds
    #[arg(
        long,
        global = true,
        env = "CERTINFO_CONNECT_TIMEOUT_SECS",
        default_value_t = TCP_CONNECT_TIMEOUT_SECS
    )]
    pub connect_timeout_secs: u64,

    /// TLS handshake timeout in seconds
    #[arg(
        long,
        global = true,
        env = "CERTINFO_HANDSHAKE_TIMEOUT_SECS",
        default_value_t = TLS_HANDSHAKE_TIMEOUT_SECS
    )]
    pub handshake_timeout_secs: u64,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve `POST /certs` over HTTP
    Serve {
        /// Address to bind
        #[arg(long, env = "CERTINFO_BIND", default_value = DEFAULT_BIND_ADDRESS)]
        bind: String,

        /// Port to listen on
        #[arg(long, env = "CERTINFO_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Allow targets on loopback and private networks
        #[arg(long, env = "CERTINFO_ALLOW_PRIVATE_HOSTS")]
        allow_private_hosts: bool,
    },

    /// Fetch and describe the chain of a live HTTPS endpoint
    Fetch {
        /// Target URL, e.g. https://example.com or https://example.com:8443
        url: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Allow targets on loopback and private networks
        #[arg(long, env = "CERTINFO_ALLOW_PRIVATE_HOSTS")]
        allow_private_hosts: bool,
    },

    /// Describe the certificates in a local PEM file
    Describe {
        /// PEM file holding one or more CERTIFICATE blocks
        #[arg(value_parser)]
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

impl Cli {
    /// Builds the library configuration from the parsed options.
    ///
    /// Server options keep their defaults for subcommands that do not take
    /// them.
    pub fn to_config(&self) -> Config {
        let mut config = Config {
            log_level: self.log_level,
            log_format: self.log_format,
            connect_timeout_secs: self.connect_timeout_secs,
            handshake_timeout_secs: self.handshake_timeout_secs,
            ..Default::default()
        };

        match &self.command {
            Command::Serve {
                bind,
                port,
                allow_private_hosts,
            } => {
                config.bind_address = bind.clone();
                config.port = *port;
                config.allow_private_hosts = *allow_private_hosts;
            }
            Command::Fetch {
                allow_private_hosts,
                ..
            } => {
                config.allow_private_hosts = *allow_private_hosts;
            }
            Command::Describe { .. } => {}
        }

        config
    }
}
