//! Adoption records.
//!
//! An adoption is written exactly once, after the owner and the pet have both
//! been updated. Records are append-only history: there is no un-adopt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adoption {
  #[serde(rename = "_id")]
  pub adoption_id: Uuid,
  /// The adopting user.
  pub owner:       Uuid,
  /// The adopted pet.
  pub pet:         Uuid,
  /// Server-assigned; never changes after creation.
  #[serde(rename = "createdAt")]
  pub created_at:  DateTime<Utc>,
}
