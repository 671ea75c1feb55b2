//! The `{"status": ...}` envelope wrapped around every response body.
//!
//! Success: `{"status":"success","payload":...,"message":"..."}` with either
//! field optional. Errors are rendered by [`crate::ApiError`] as
//! `{"status":"error","error":"..."}`.

use axum::{
  Json,
  response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Success<T> {
  status:  &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  payload: Option<T>,
}

impl<T> Success<T> {
  pub fn payload(payload: T) -> Self {
    Self {
      status:  "success",
      message: None,
      payload: Some(payload),
    }
  }

  pub fn with_message(mut self, message: impl Into<String>) -> Self {
    self.message = Some(message.into());
    self
  }
}

impl Success<()> {
  /// A success with a message and no payload.
  pub fn message(message: impl Into<String>) -> Self {
    Self {
      status:  "success",
      message: Some(message.into()),
      payload: None,
    }
  }
}

impl<T: Serialize> IntoResponse for Success<T> {
  fn into_response(self) -> Response { Json(self).into_response() }
}
