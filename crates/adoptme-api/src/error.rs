//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message sent for every 500; the details only go to the log.
pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("method not allowed")]
  MethodNotAllowed,

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn not_found(message: impl Into<String>) -> Self {
    Self::NotFound(message.into())
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::BadRequest(message.into())
  }

  pub fn internal<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Internal(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::MethodNotAllowed => {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_owned())
      }
      ApiError::Internal(e) => {
        error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_owned())
      }
    };
    (status, Json(json!({ "status": "error", "error": message })))
      .into_response()
  }
}

// ─── Conversions ─────────────────────────────────────────────────────────────

impl From<adoptme_core::Error> for ApiError {
  fn from(e: adoptme_core::Error) -> Self {
    use adoptme_core::Error as E;
    match e {
      E::InvalidIdentifier(_) => Self::bad_request("Invalid id format"),
      E::UserNotFound(_) => Self::not_found("User not found"),
      E::PetNotFound(_) => Self::not_found("Pet not found"),
      E::AdoptionNotFound(_) => Self::not_found("Adoption not found"),
      E::AlreadyAdopted(_) => Self::bad_request("Pet is already adopted"),
      E::Validation(m) => Self::BadRequest(m),
      e @ (E::PasswordHash(_) | E::Store(_)) => Self::internal(e),
    }
  }
}

impl From<adoptme_mock::Error> for ApiError {
  fn from(e: adoptme_mock::Error) -> Self {
    match e {
      adoptme_mock::Error::Core(e) => e.into(),
      e => Self::BadRequest(e.to_string()),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl From<tokio::task::JoinError> for ApiError {
  fn from(e: tokio::task::JoinError) -> Self { Self::internal(e) }
}
