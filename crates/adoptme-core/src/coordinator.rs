//! The adoption coordinator.
//!
//! Adopting a pet writes three documents that the store cannot update
//! atomically together. The coordinator runs them as a saga, in this order:
//!
//! 1. append the pet id to the user's `pets`;
//! 2. claim the pet (`adopted = true`, `owner = user`), conditional on the
//!    pet still being unadopted;
//! 3. create the [`Adoption`] record.
//!
//! Each completed step registers a compensating action. If a later step
//! fails, the registered compensations run in reverse order and the original
//! error is returned. A compensation that itself fails is logged; there is no
//! further recovery.
//!
//! The conditional claim in step 2 is what stops two concurrent adoptions of
//! the same pet from both succeeding: the loser sees
//! [`PetClaim::AlreadyAdopted`], undoes step 1 and reports
//! [`Error::AlreadyAdopted`].

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  adoption::Adoption,
  id::parse_id,
  store::{PetClaim, ShelterStore},
};

// ─── Compensation ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compensation {
  RemoveUserPet { user_id: Uuid, pet_id: Uuid },
  ReleasePet { pet_id: Uuid, owner: Uuid },
}

/// Compensations for the steps completed so far.
#[derive(Debug, Default)]
struct Saga {
  done: Vec<Compensation>,
}

impl Saga {
  fn push(&mut self, step: Compensation) { self.done.push(step); }

  fn len(&self) -> usize { self.done.len() }

  async fn compensate<S: ShelterStore>(self, store: &S) {
    for step in self.done.into_iter().rev() {
      debug!(?step, "compensating");
      let outcome = match step {
        Compensation::RemoveUserPet { user_id, pet_id } => store
          .remove_user_pet(user_id, pet_id)
          .await
          .map(|user| user.is_some()),
        Compensation::ReleasePet { pet_id, owner } => {
          store.release_pet(pet_id, owner).await
        }
      };
      match outcome {
        Ok(true) => {}
        Ok(false) => warn!(?step, "compensation found nothing to undo"),
        Err(e) => error!(?step, error = %e, "compensation failed"),
      }
    }
  }
}

// ─── Coordinator ─────────────────────────────────────────────────────────────

/// Runs adoptions against a [`ShelterStore`].
///
/// Holds no state of its own besides the store handle; cloning is cheap.
pub struct AdoptionCoordinator<S> {
  store: Arc<S>,
}

impl<S> Clone for AdoptionCoordinator<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store) }
  }
}

impl<S: ShelterStore> AdoptionCoordinator<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Adopt `pet_id` on behalf of `user_id`, both given as raw identifiers.
  ///
  /// Fails with [`Error::InvalidIdentifier`] before touching the store if
  /// either identifier is malformed.
  pub async fn adopt(&self, user_id: &str, pet_id: &str) -> Result<Adoption> {
    let user_id = parse_id(user_id)?;
    let pet_id = parse_id(pet_id)?;
    self.adopt_ids(user_id, pet_id).await
  }

  /// Adopt with already-validated identifiers.
  ///
  /// Nothing is written unless the user exists, the pet exists and the pet is
  /// unadopted.
  pub async fn adopt_ids(&self, user_id: Uuid, pet_id: Uuid) -> Result<Adoption> {
    let store = self.store.as_ref();

    store
      .get_user(user_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::UserNotFound(user_id))?;

    let pet = store
      .get_pet(pet_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::PetNotFound(pet_id))?;

    if pet.adopted {
      warn!(%user_id, %pet_id, "pet is already adopted");
      return Err(Error::AlreadyAdopted(pet_id));
    }

    let mut saga = Saga::default();
    match execute(store, &mut saga, user_id, pet_id).await {
      Ok(adoption) => {
        info!(
          adoption_id = %adoption.adoption_id,
          %user_id,
          %pet_id,
          "adoption completed"
        );
        Ok(adoption)
      }
      Err(e) => {
        warn!(%user_id, %pet_id, error = %e, steps = saga.len(), "adoption failed");
        saga.compensate(store).await;
        Err(e)
      }
    }
  }
}

async fn execute<S: ShelterStore>(
  store: &S,
  saga: &mut Saga,
  user_id: Uuid,
  pet_id: Uuid,
) -> Result<Adoption> {
  store
    .append_user_pet(user_id, pet_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::UserNotFound(user_id))?;
  saga.push(Compensation::RemoveUserPet { user_id, pet_id });

  match store.claim_pet(pet_id, user_id).await.map_err(Error::store)? {
    PetClaim::Claimed(_) => {
      saga.push(Compensation::ReleasePet { pet_id, owner: user_id });
    }
    PetClaim::AlreadyAdopted => return Err(Error::AlreadyAdopted(pet_id)),
    PetClaim::NotFound => return Err(Error::PetNotFound(pet_id)),
  }

  store
    .create_adoption(user_id, pet_id)
    .await
    .map_err(Error::store)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
