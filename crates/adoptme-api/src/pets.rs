//! Handlers for `/pets` endpoints.
//!
//! | Method   | Path         | Notes |
//! |----------|--------------|-------|
//! | `GET`    | `/pets`      | All pets |
//! | `POST`   | `/pets`      | Body: `{"name","specie","birthDate","image"?}` |
//! | `GET`    | `/pets/:id`  | 404 if malformed or not found |
//! | `PUT`    | `/pets/:id`  | Partial update; `adopted`/`owner` and blank fields are ignored |
//! | `DELETE` | `/pets/:id`  | Also detaches the pet from its owner |

use adoptme_core::{
  id::parse_id,
  pet::{NewPet, Pet, PetPatch, parse_birth_date},
  store::ShelterStore,
};
use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, envelope::Success, error::ApiError};

const NOT_FOUND: &str = "Pet not found";

fn pet_id(raw: &str) -> Result<Uuid, ApiError> {
  parse_id(raw).map_err(|_| ApiError::not_found(NOT_FOUND))
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /pets`
pub async fn list<S: ShelterStore>(
  State(state): State<ApiState<S>>,
) -> Result<Success<Vec<Pet>>, ApiError> {
  let pets = state.store.list_pets().await.map_err(ApiError::internal)?;
  Ok(Success::payload(pets))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:       Option<String>,
  pub specie:     Option<String>,
  #[serde(rename = "birthDate")]
  pub birth_date: Option<String>,
  pub image:      Option<String>,
}

impl CreateBody {
  fn into_new_pet(self) -> Result<NewPet, ApiError> {
    let (Some(name), Some(species), Some(birth_date)) = (
      non_empty(self.name),
      non_empty(self.specie),
      non_empty(self.birth_date),
    ) else {
      return Err(ApiError::bad_request("Incomplete values"));
    };
    Ok(NewPet {
      name,
      species,
      birth_date: parse_birth_date(&birth_date)?,
      image: non_empty(self.image),
    })
  }
}

/// `POST /pets`
pub async fn create<S: ShelterStore>(
  State(state): State<ApiState<S>>,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<Success<Pet>, ApiError> {
  let Json(body) = body?;
  let pet = state
    .store
    .create_pet(body.into_new_pet()?)
    .await
    .map_err(ApiError::internal)?;
  Ok(Success::payload(pet))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /pets/:id`
pub async fn get_one<S: ShelterStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Success<Pet>, ApiError> {
  let id = pet_id(&id)?;
  let pet = state
    .store
    .get_pet(id)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
  Ok(Success::payload(pet))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
  pub name:       Option<String>,
  pub specie:     Option<String>,
  #[serde(rename = "birthDate")]
  pub birth_date: Option<String>,
  pub image:      Option<String>,
}

impl UpdateBody {
  fn into_patch(self) -> Result<PetPatch, ApiError> {
    Ok(PetPatch {
      name:       non_empty(self.name),
      species:    non_empty(self.specie),
      birth_date: non_empty(self.birth_date)
        .map(|raw| parse_birth_date(&raw))
        .transpose()?,
      image:      non_empty(self.image),
    })
  }
}

/// `PUT /pets/:id`
pub async fn update<S: ShelterStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  body: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Success<Pet>, ApiError> {
  let id = pet_id(&id)?;
  let Json(body) = body?;
  let patch = body.into_patch()?;
  let found = if patch.is_empty() {
    state.store.get_pet(id).await
  } else {
    state.store.update_pet(id, patch).await
  };
  let pet = found
    .map_err(ApiError::internal)?
    .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
  Ok(Success::payload(pet).with_message("pet updated"))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /pets/:id`
pub async fn remove<S: ShelterStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Success<()>, ApiError> {
  let id = pet_id(&id)?;
  if !state.store.delete_pet(id).await.map_err(ApiError::internal)? {
    return Err(ApiError::not_found(NOT_FOUND));
  }
  Ok(Success::message("pet deleted"))
}
