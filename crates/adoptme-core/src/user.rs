//! Users, the people who adopt pets.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access level of a user account.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[default]
  User,
  Admin,
}

/// A stored user.
///
/// `pets` lists the pets this user has adopted, in adoption order. It is only
/// appended to by the adoption coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  #[serde(rename = "_id")]
  pub user_id:       Uuid,
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  /// Argon2 PHC string. Never sent over the wire.
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub role:          Role,
  pub pets:          Vec<Uuid>,
}

/// Input to [`crate::store::ShelterStore::create_user`]. The store assigns
/// the identifier and starts with an empty pet list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub role:          Role,
}

/// A partial update. `None` fields are left untouched.
///
/// `pets` is not editable through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub email:         Option<String>,
  pub password_hash: Option<String>,
  pub role:          Option<Role>,
}

impl UserPatch {
  pub fn is_empty(&self) -> bool {
    self.first_name.is_none()
      && self.last_name.is_none()
      && self.email.is_none()
      && self.password_hash.is_none()
      && self.role.is_none()
  }

  /// Merge this patch into `user`.
  pub fn apply(self, user: &mut User) {
    if let Some(v) = self.first_name {
      user.first_name = v;
    }
    if let Some(v) = self.last_name {
      user.last_name = v;
    }
    if let Some(v) = self.email {
      user.email = v;
    }
    if let Some(v) = self.password_hash {
      user.password_hash = v;
    }
    if let Some(v) = self.role {
      user.role = v;
    }
  }
}
