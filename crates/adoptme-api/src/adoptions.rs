//! Handlers for `/adoptions` endpoints.
//!
//! | Method | Path                     | Notes |
//! |--------|--------------------------|-------|
//! | `GET`  | `/adoptions`             | In creation order |
//! | `GET`  | `/adoptions/:id`         | 400 if malformed, 404 if not found |
//! | `POST` | `/adoptions/:uid/:pid`   | Runs the adoption coordinator |

use adoptme_core::{Error, adoption::Adoption, id::parse_id, store::ShelterStore};
use axum::extract::{Path, State};

use crate::{ApiState, envelope::Success, error::ApiError};

/// `GET /adoptions`
pub async fn list<S: ShelterStore>(
  State(state): State<ApiState<S>>,
) -> Result<Success<Vec<Adoption>>, ApiError> {
  let adoptions = state
    .store
    .list_adoptions()
    .await
    .map_err(ApiError::internal)?;
  Ok(Success::payload(adoptions))
}

/// `GET /adoptions/:id`
pub async fn get_one<S: ShelterStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Success<Adoption>, ApiError> {
  let id = parse_id(&id)?;
  let adoption = state
    .store
    .get_adoption(id)
    .await
    .map_err(ApiError::internal)?
    .ok_or(Error::AdoptionNotFound(id))?;
  Ok(Success::payload(adoption))
}

/// `POST /adoptions/:uid/:pid`
pub async fn create<S: ShelterStore>(
  State(state): State<ApiState<S>>,
  Path((uid, pid)): Path<(String, String)>,
) -> Result<Success<Adoption>, ApiError> {
  let adoption = state.coordinator.adopt(&uid, &pid).await?;
  Ok(Success::payload(adoption).with_message("Pet adopted"))
}
