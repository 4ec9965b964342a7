//! `certinfo` binary.
//!
//! Loads `.env`, parses the command line, sets up logging and dispatches to
//! the library. Exit codes: 0 on success, 1 when the command fails, 2 when the
//! configuration is invalid.

use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use certinfo::config::{Cli, Command};
use certinfo::initialization::init_logger_with;
use certinfo::server::start_server;
use certinfo::{describe_pem, describe_url, ChainFetcher, Config};

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let cli = Cli::parse();

    let config = cli.to_config();
    init_logger_with(config.log_level.into(), config.log_format)
        .context("Failed to initialize logger")?;

    if let Err(e) = config.validate() {
        eprintln!("certinfo error: {e}");
        process::exit(2);
    }

    let result = match &cli.command {
        Command::Serve { .. } => start_server(&config).await,
        Command::Fetch { url, pretty, .. } => fetch(&config, url, *pretty).await,
        Command::Describe { file, pretty } => describe_file(file, *pretty),
    };

    if let Err(e) = result {
        eprintln!("certinfo error: {e:#}");
        process::exit(1);
    }
    Ok(())
}

/// Loads `.env` from the working directory, falling back to the one next to
/// the executable. A missing file is not an error.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(".env")))
        .filter(|path| path.exists());
    if let Some(path) = beside_exe {
        let _ = dotenvy::from_path(path);
    }
}

async fn fetch(config: &Config, url: &str, pretty: bool) -> Result<()> {
    let fetcher = ChainFetcher::new(config).context("Failed to initialize TLS client")?;
    let chain = describe_url(&fetcher, url, config.allow_private_hosts)
        .await
        .with_context(|| format!("Failed to describe {url}"))?;
    print_json(&chain, pretty)
}

fn describe_file(path: &Path, pretty: bool) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let chain = describe_pem(&text).with_context(|| format!("Failed to describe {}", path.display()))?;
    print_json(&chain, pretty)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
