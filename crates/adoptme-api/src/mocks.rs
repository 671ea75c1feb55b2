//! Handlers for `/mocks` endpoints.
//!
//! | Method       | Path                      | Notes |
//! |--------------|---------------------------|-------|
//! | `GET`/`POST` | `/mocks/mockingpets`      | `?count=N`, default 100; unadopted, nothing is stored |
//! | `GET`/`POST` | `/mocks/mockingusers`     | `?count=N`, default 50; nothing is stored |
//! | `POST`       | `/mocks/generateData`     | Body: `{"users"?: N, "pets"?: N}`; 201 |

use adoptme_core::{store::ShelterStore, user::NewUser};
use adoptme_mock::{
  MockPet, MockReport, MockRequest,
  generator::{DEFAULT_PET_COUNT, DEFAULT_USER_COUNT},
  insert_mock_data,
};
use axum::{
  Json,
  extract::{
    Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
};
use serde::Deserialize;

use crate::{ApiState, envelope::Success, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CountParams {
  pub count: Option<usize>,
}

/// `GET|POST /mocks/mockingpets[?count=N]`
pub async fn mocking_pets<S: ShelterStore>(
  State(state): State<ApiState<S>>,
  params: Result<Query<CountParams>, QueryRejection>,
) -> Result<Success<Vec<MockPet>>, ApiError> {
  let Query(params) = params?;
  let pets = state
    .mocks
    .generate_pets(params.count.unwrap_or(DEFAULT_PET_COUNT))?;
  Ok(Success::payload(pets.into_iter().map(MockPet::from).collect()))
}

/// `GET|POST /mocks/mockingusers[?count=N]`
pub async fn mocking_users<S: ShelterStore>(
  State(state): State<ApiState<S>>,
  params: Result<Query<CountParams>, QueryRejection>,
) -> Result<Success<Vec<NewUser>>, ApiError> {
  let Query(params) = params?;
  let count = state
    .mocks
    .check_count(params.count.unwrap_or(DEFAULT_USER_COUNT))?;
  let mocks = state.mocks.clone();
  let users =
    tokio::task::spawn_blocking(move || mocks.generate_users(count)).await??;
  Ok(Success::payload(users))
}

/// `POST /mocks/generateData`
pub async fn generate_data<S: ShelterStore>(
  State(state): State<ApiState<S>>,
  body: Result<Json<MockRequest>, JsonRejection>,
) -> Result<(StatusCode, Success<MockReport>), ApiError> {
  let Json(request) = body?;
  let (user_count, pet_count) = request.counts(&state.mocks)?;

  let mocks = state.mocks.clone();
  let (users, pets) = tokio::task::spawn_blocking(move || {
    Ok::<_, adoptme_mock::Error>((
      mocks.generate_users(user_count)?,
      mocks.generate_pets(pet_count)?,
    ))
  })
  .await??;

  let report = insert_mock_data(state.store.as_ref(), users, pets).await;
  let message = format!(
    "Inserted {} users and {} pets into the database",
    report.users_inserted, report.pets_inserted
  );
  Ok((StatusCode::CREATED, Success::payload(report).with_message(message)))
}
