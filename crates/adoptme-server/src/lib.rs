//! Server wiring: configuration and the top-level router.
//!
//! The binary in `main.rs` loads a [`ServerConfig`], opens the SQLite store
//! and serves [`app`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use adoptme_core::store::ShelterStore;
use adoptme_mock::{MockGenerator, generator::DEFAULT_MAX_COUNT};
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Prefix for environment variable overrides, e.g. `ADOPTME_PORT=9000`.
pub const ENV_PREFIX: &str = "ADOPTME";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// Fixed seed for the mock generator; random batches when unset.
  pub mock_seed:      Option<u64>,
  /// Largest batch a single mock request may ask for.
  pub mock_max_count: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:           "127.0.0.1".to_string(),
      port:           8080,
      store_path:     PathBuf::from("adoptme.db"),
      mock_seed:      None,
      mock_max_count: DEFAULT_MAX_COUNT,
    }
  }
}

impl ServerConfig {
  /// Layer an optional TOML file under `ADOPTME_*` environment variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn mock_generator(&self) -> MockGenerator {
    MockGenerator::new(self.mock_seed).with_max_count(self.mock_max_count)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the JSON API under `/api`, with request tracing.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: ShelterStore + 'static,
{
  Router::new()
    .nest("/api", adoptme_api::api_router(store, config.mock_generator()))
    .fallback(adoptme_api::not_found)
    .layer(TraceLayer::new_for_http())
}
