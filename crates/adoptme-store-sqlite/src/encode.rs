//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates as `YYYY-MM-DD`, UUIDs as
//! hyphenated lowercase strings and a user's pet list as a compact JSON array
//! of such strings.

use adoptme_core::{
  adoption::Adoption,
  pet::Pet,
  user::{Role, User},
};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ─────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::User => "user",
    Role::Admin => "admin",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "user" => Ok(Role::User),
    "admin" => Ok(Role::Admin),
    other => Err(Error::Corrupt {
      column: "role",
      value:  other.to_owned(),
    }),
  }
}

// ─── Pet list ────────────────────────────────────────────────────────────────

pub fn decode_pet_list(s: &str) -> Result<Vec<Uuid>> {
  let raw: Vec<String> = serde_json::from_str(s)?;
  raw.iter().map(|id| decode_uuid(id)).collect()
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str =
  "user_id, first_name, last_name, email, password_hash, role, pets";

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  pub password_hash: String,
  pub role:          String,
  pub pets:          String,
}

impl RawUser {
  /// Row mapper for queries selecting [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      first_name:    row.get(1)?,
      last_name:     row.get(2)?,
      email:         row.get(3)?,
      password_hash: row.get(4)?,
      role:          row.get(5)?,
      pets:          row.get(6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      first_name:    self.first_name,
      last_name:     self.last_name,
      email:         self.email,
      password_hash: self.password_hash,
      role:          decode_role(&self.role)?,
      pets:          decode_pet_list(&self.pets)?,
    })
  }
}

pub const PET_COLUMNS: &str =
  "pet_id, name, specie, birth_date, adopted, owner, image";

/// Raw values read directly from a `pets` row.
pub struct RawPet {
  pub pet_id:     String,
  pub name:       String,
  pub specie:     String,
  pub birth_date: String,
  pub adopted:    bool,
  pub owner:      Option<String>,
  pub image:      Option<String>,
}

impl RawPet {
  /// Row mapper for queries selecting [`PET_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      pet_id:     row.get(0)?,
      name:       row.get(1)?,
      specie:     row.get(2)?,
      birth_date: row.get(3)?,
      adopted:    row.get(4)?,
      owner:      row.get(5)?,
      image:      row.get(6)?,
    })
  }

  pub fn into_pet(self) -> Result<Pet> {
    Ok(Pet {
      pet_id:     decode_uuid(&self.pet_id)?,
      name:       self.name,
      species:    self.specie,
      birth_date: decode_date(&self.birth_date)?,
      adopted:    self.adopted,
      owner:      self.owner.as_deref().map(decode_uuid).transpose()?,
      image:      self.image,
    })
  }
}

pub const ADOPTION_COLUMNS: &str = "adoption_id, owner, pet, created_at";

/// Raw strings read directly from an `adoptions` row.
pub struct RawAdoption {
  pub adoption_id: String,
  pub owner:       String,
  pub pet:         String,
  pub created_at:  String,
}

impl RawAdoption {
  /// Row mapper for queries selecting [`ADOPTION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      adoption_id: row.get(0)?,
      owner:       row.get(1)?,
      pet:         row.get(2)?,
      created_at:  row.get(3)?,
    })
  }

  pub fn into_adoption(self) -> Result<Adoption> {
    Ok(Adoption {
      adoption_id: decode_uuid(&self.adoption_id)?,
      owner:       decode_uuid(&self.owner)?,
      pet:         decode_uuid(&self.pet)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
