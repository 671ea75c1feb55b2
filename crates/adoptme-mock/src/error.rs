//! Error types for `adoptme-mock`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("at least one of `users` or `pets` must be a positive count")]
  EmptyRequest,

  #[error("cannot generate {requested} records, the limit is {max}")]
  CountTooLarge { requested: usize, max: usize },

  #[error(transparent)]
  Core(#[from] adoptme_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
