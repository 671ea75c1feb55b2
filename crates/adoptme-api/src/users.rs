//! Handlers for `/users` endpoints.
//!
//! | Method   | Path          | Notes |
//! |----------|---------------|-------|
//! | `GET`    | `/users`      | All users |
//! | `POST`   | `/users`      | Body: `{"first_name","last_name","email","password","role"?}` |
//! | `GET`    | `/users/:id`  | 404 if malformed or not found |
//! | `PUT`    | `/users/:id`  | Partial update; 400 if the email belongs to someone else |
//! | `DELETE` | `/users/:id`  | |
//!
//! Passwords are hashed on a blocking thread before they reach the store and
//! never appear in a response.

use adoptme_core::{
  id::parse_id,
  password::hash_password,
  store::ShelterStore,
  user::{NewUser, Role, User, UserPatch},
};
use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, envelope::Success, error::ApiError};

const NOT_FOUND: &str = "User not found";
const DUPLICATE_EMAIL: &str = "User already exists";

fn user_id(raw: &str) -> Result<Uuid, ApiError> {
  parse_id(raw).map_err(|_| ApiError::not_found(NOT_FOUND))
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

async fn hash(password: String) -> Result<String, ApiError> {
  let hashed = tokio::task::spawn_blocking(move || hash_password(&password)).await??;
  Ok(hashed)
}

/// Fail if `email` is taken by anyone other than `except`.
async fn ensure_email_free<S: ShelterStore>(
  store: &S,
  email: &str,
  except: Option<Uuid>,
) -> Result<(), ApiError> {
  let existing = store
    .get_user_by_email(email.to_owned())
    .await
    .map_err(ApiError::internal)?;
  match existing {
    Some(user) if Some(user.user_id) != except => {
      Err(ApiError::bad_request(DUPLICATE_EMAIL))
    }
    _ => Ok(()),
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S: ShelterStore>(
  State(state): State<ApiState<S>>,
) -> Result<Success<Vec<User>>, ApiError> {
  let users = state.store.list_users().await.map_err(ApiError::internal)?;
  Ok(Success::payload(users))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      Option<String>,
  pub password:   Option<String>,
  pub role:       Option<Role>,
}

/// `POST /users`
pub async fn create<S: ShelterStore>(
  State(state): State<ApiState<S>>,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<Success<User>, ApiError> {
  let Json(body) = body?;
  let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
    non_empty(body.first_name),
    non_empty(body.last_name),
    non_empty(body.email),
    non_empty(body.password),
  ) else {
    return Err(ApiError::bad_request("Incomplete values"));
  };

  ensure_email_free(state.store.as_ref(), &email, None).await?;

  let input = NewUser {
    first_name,
    last_name,
    email,
    password_hash: hash(password).await?,
    role: body.role.unwrap_or_default(),
  };
  let user = state
    .store
    .create_user(input)
    .await
    .map_err(ApiError::internal)?;
  Ok(Success::payload(user))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/:id`
pub async fn get_one<S: ShelterStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Success<User>, ApiError> {
  let id = user_id(&id)?;
  let user = state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
  Ok(Success::payload(user))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// Editable fields. `pets` and `_id` are ignored if sent.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      Option<String>,
  pub password:   Option<String>,
  pub role:       Option<Role>,
}

/// `PUT /users/:id`
pub async fn update<S: ShelterStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  body: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Success<User>, ApiError> {
  let id = user_id(&id)?;
  let Json(body) = body?;

  let current = state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

  let email = non_empty(body.email);
  if let Some(email) = &email {
    ensure_email_free(state.store.as_ref(), email, Some(id)).await?;
  }
  let password_hash = match non_empty(body.password) {
    Some(password) => Some(hash(password).await?),
    None => None,
  };

  let patch = UserPatch {
    first_name: non_empty(body.first_name),
    last_name: non_empty(body.last_name),
    email,
    password_hash,
    role: body.role,
  };
  if patch.is_empty() {
    return Ok(Success::payload(current).with_message("User updated"));
  }
  let user = state
    .store
    .update_user(id, patch)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
  Ok(Success::payload(user).with_message("User updated"))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/:id`
pub async fn remove<S: ShelterStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Success<()>, ApiError> {
  let id = user_id(&id)?;
  if !state.store.delete_user(id).await.map_err(ApiError::internal)? {
    return Err(ApiError::not_found(NOT_FOUND));
  }
  Ok(Success::message("User deleted"))
}
