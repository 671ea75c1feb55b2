//! The `ShelterStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g.
//! `adoptme-store-sqlite`). Higher layers (`adoptme-api`, `adoptme-mock`) and
//! the [`AdoptionCoordinator`](crate::coordinator::AdoptionCoordinator) depend
//! on this abstraction, not on any concrete backend.
//!
//! Every write is atomic for a single document (one user, one pet, or one
//! adoption). Nothing here is atomic across documents; multi-document
//! consistency is the coordinator's job.

use std::future::Future;

use uuid::Uuid;

use crate::{
  adoption::Adoption,
  pet::{NewPet, Pet, PetPatch},
  user::{NewUser, User, UserPatch},
};

// ─── Claim outcome ───────────────────────────────────────────────────────────

/// Result of [`ShelterStore::claim_pet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetClaim {
  /// The pet was unadopted and is now owned by the claimant.
  Claimed(Pet),
  /// The pet exists but someone already owns it; nothing was written.
  AlreadyAdopted,
  /// No pet with that identifier.
  NotFound,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the users, pets and adoptions collections.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ShelterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user with a store-assigned id and an empty pet list.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Retrieve the first user with exactly this email address.
  fn get_user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// List all users in creation order.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Merge `patch` into a user. Returns `None` if the user does not exist.
  fn update_user(
    &self,
    id: Uuid,
    patch: UserPatch,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Delete a user. Returns `false` if there was nothing to delete.
  fn delete_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Append one occurrence of `pet_id` to a user's pet list.
  /// Returns the updated user, or `None` if the user does not exist.
  fn append_user_pet(
    &self,
    user_id: Uuid,
    pet_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Remove the last occurrence of `pet_id` from a user's pet list, if any.
  /// Returns the updated user, or `None` if the user does not exist.
  fn remove_user_pet(
    &self,
    user_id: Uuid,
    pet_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Pets ──────────────────────────────────────────────────────────────

  /// Persist a new, unadopted pet.
  fn create_pet(
    &self,
    input: NewPet,
  ) -> impl Future<Output = Result<Pet, Self::Error>> + Send + '_;

  /// Retrieve a pet by id. Returns `None` if not found.
  fn get_pet(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Pet>, Self::Error>> + Send + '_;

  /// List all pets in creation order.
  fn list_pets(
    &self,
  ) -> impl Future<Output = Result<Vec<Pet>, Self::Error>> + Send + '_;

  /// Merge `patch` into a pet. Returns `None` if the pet does not exist.
  fn update_pet(
    &self,
    id: Uuid,
    patch: PetPatch,
  ) -> impl Future<Output = Result<Option<Pet>, Self::Error>> + Send + '_;

  /// Delete a pet and drop its id from its owner's pet list.
  /// Returns `false` if there was nothing to delete.
  fn delete_pet(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Conditionally mark a pet as adopted by `owner`.
  ///
  /// The write only happens if the pet is still unadopted at the moment of
  /// the write; this is the single serialization point between concurrent
  /// adoptions of the same pet.
  fn claim_pet(
    &self,
    pet_id: Uuid,
    owner: Uuid,
  ) -> impl Future<Output = Result<PetClaim, Self::Error>> + Send + '_;

  /// Undo a claim: reset `adopted`/`owner`, but only if the pet is still
  /// owned by `owner`. Returns whether anything changed.
  fn release_pet(
    &self,
    pet_id: Uuid,
    owner: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Adoptions (append-only) ───────────────────────────────────────────

  /// Record a completed adoption. The id and timestamp are store-assigned.
  fn create_adoption(
    &self,
    owner: Uuid,
    pet: Uuid,
  ) -> impl Future<Output = Result<Adoption, Self::Error>> + Send + '_;

  /// Retrieve an adoption by id. Returns `None` if not found.
  fn get_adoption(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Adoption>, Self::Error>> + Send + '_;

  /// List all adoptions in insertion order.
  fn list_adoptions(
    &self,
  ) -> impl Future<Output = Result<Vec<Adoption>, Self::Error>> + Send + '_;
}
