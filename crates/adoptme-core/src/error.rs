//! Error types for `adoptme-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid identifier: {0:?}")]
  InvalidIdentifier(String),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("pet not found: {0}")]
  PetNotFound(Uuid),

  #[error("adoption not found: {0}")]
  AdoptionNotFound(Uuid),

  #[error("pet {0} is already adopted")]
  AlreadyAdopted(Uuid),

  #[error("validation error: {0}")]
  Validation(String),

  #[error("password hash error: {0}")]
  PasswordHash(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
