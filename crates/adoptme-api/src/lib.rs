//! JSON REST API for the adoption service.
//!
//! Exposes an axum [`Router`] backed by any [`ShelterStore`]. Every response
//! body is wrapped in the envelope from [`envelope`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", adoptme_api::api_router(store.clone(), MockGenerator::default()))
//! ```

pub mod adoptions;
pub mod envelope;
pub mod error;
pub mod mocks;
pub mod pets;
pub mod users;

use std::sync::Arc;

use adoptme_core::{coordinator::AdoptionCoordinator, store::ShelterStore};
use adoptme_mock::MockGenerator;
use axum::{
  Router,
  routing::{get, post},
};

pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:       Arc<S>,
  pub coordinator: AdoptionCoordinator<S>,
  pub mocks:       Arc<MockGenerator>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:       Arc::clone(&self.store),
      coordinator: self.coordinator.clone(),
      mocks:       Arc::clone(&self.mocks),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, mocks: MockGenerator) -> Router<()>
where
  S: ShelterStore + 'static,
{
  let state = ApiState {
    coordinator: AdoptionCoordinator::new(Arc::clone(&store)),
    store,
    mocks: Arc::new(mocks),
  };

  Router::new()
    // Pets
    .route("/pets", get(pets::list::<S>).post(pets::create::<S>))
    .route(
      "/pets/{id}",
      get(pets::get_one::<S>)
        .put(pets::update::<S>)
        .delete(pets::remove::<S>),
    )
    // Users
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::remove::<S>),
    )
    // Adoptions
    .route("/adoptions", get(adoptions::list::<S>))
    .route("/adoptions/{id}", get(adoptions::get_one::<S>))
    .route("/adoptions/{uid}/{pid}", post(adoptions::create::<S>))
    // Mock data
    .route(
      "/mocks/mockingpets",
      get(mocks::mocking_pets::<S>).post(mocks::mocking_pets::<S>),
    )
    .route(
      "/mocks/mockingusers",
      get(mocks::mocking_users::<S>).post(mocks::mocking_users::<S>),
    )
    .route("/mocks/generateData", post(mocks::generate_data::<S>))
    // Unmatched paths and methods
    .method_not_allowed_fallback(method_not_allowed)
    .fallback(not_found)
    .with_state(state)
}

/// Fallback handler for unmatched paths.
pub async fn not_found() -> ApiError { ApiError::not_found("Not found") }

async fn method_not_allowed() -> ApiError { ApiError::MethodNotAllowed }

#[cfg(test)]
mod tests;
