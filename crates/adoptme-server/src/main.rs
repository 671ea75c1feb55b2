//! adoptme server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API under `/api`.
//!
//! # Password hash generation
//!
//! ```sh
//! cargo run -p adoptme-server --bin server -- --hash-password
//! ```
//!
//! To check a password against an existing hash (exits non-zero on mismatch):
//!
//! ```sh
//! cargo run -p adoptme-server --bin server -- --check-password '$argon2id$...'
//! ```

use std::{path::PathBuf, sync::Arc};

use adoptme_core::password::{hash_password, verify_password};
use adoptme_server::{ServerConfig, expand_tilde};
use adoptme_store_sqlite::SqliteStore;
use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Pet adoption API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Check a password entered on stdin against this argon2 hash and exit.
  #[arg(long, value_name = "HASH", conflicts_with = "hash_password")]
  check_password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let hash = hash_password(&password).context("failed to hash password")?;
    println!("{hash}");
    return Ok(());
  }

  if let Some(hash) = cli.check_password {
    let password = read_password()?;
    if !verify_password(&password, &hash) {
      anyhow::bail!("password does not match");
    }
    println!("password matches");
    return Ok(());
  }

  let server_cfg =
    ServerConfig::load(&cli.config).context("failed to load configuration")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let app = adoptme_server::app(Arc::new(store), &server_cfg);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}/api");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("shut down");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let cli = Cli::try_parse_from(["server"]).unwrap();
    assert_eq!(cli.config, PathBuf::from("config.toml"));
    assert!(!cli.hash_password);
    assert!(cli.check_password.is_none());
  }

  #[test]
  fn check_password_takes_a_hash() {
    let hash = hash_password("coder123").unwrap();
    let cli =
      Cli::try_parse_from(["server", "--check-password", hash.as_str()]).unwrap();
    let parsed = cli.check_password.unwrap();
    assert!(verify_password("coder123", &parsed));
    assert!(!verify_password("coder124", &parsed));
  }

  #[test]
  fn helper_modes_are_exclusive() {
    let result = Cli::try_parse_from([
      "server",
      "--hash-password",
      "--check-password",
      "$argon2id$x",
    ]);
    assert!(result.is_err());
  }
}
