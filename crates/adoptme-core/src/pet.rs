//! Pets up for adoption.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A stored pet.
///
/// `adopted` and `owner` always agree: either the pet is adopted and has an
/// owner, or it is neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
  #[serde(rename = "_id")]
  pub pet_id:     Uuid,
  pub name:       String,
  #[serde(rename = "specie")]
  pub species:    String,
  #[serde(rename = "birthDate")]
  pub birth_date: NaiveDate,
  pub adopted:    bool,
  pub owner:      Option<Uuid>,
  /// Path or URL of a picture, if any.
  pub image:      Option<String>,
}

/// Input to [`crate::store::ShelterStore::create_pet`]. New pets are never
/// adopted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPet {
  pub name:       String,
  #[serde(rename = "specie")]
  pub species:    String,
  #[serde(rename = "birthDate")]
  pub birth_date: NaiveDate,
  pub image:      Option<String>,
}

/// A partial update. `adopted` and `owner` are not part of it: they only
/// change through an adoption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetPatch {
  pub name:       Option<String>,
  pub species:    Option<String>,
  pub birth_date: Option<NaiveDate>,
  pub image:      Option<String>,
}

impl PetPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.species.is_none()
      && self.birth_date.is_none()
      && self.image.is_none()
  }

  /// Merge this patch into `pet`.
  pub fn apply(self, pet: &mut Pet) {
    if let Some(v) = self.name {
      pet.name = v;
    }
    if let Some(v) = self.species {
      pet.species = v;
    }
    if let Some(v) = self.birth_date {
      pet.birth_date = v;
    }
    if let Some(v) = self.image {
      pet.image = Some(v);
    }
  }
}

/// Parse a birth date as sent by clients.
///
/// Accepts a plain calendar date (`2020-01-15`), an RFC 3339 timestamp
/// (`2020-01-15T00:00:00Z`) or an RFC 2822 timestamp
/// (`Mon, 18 Dec 2023 00:00:00 GMT`). Timestamps keep their own calendar
/// date; the time of day is dropped.
pub fn parse_birth_date(raw: &str) -> Result<NaiveDate> {
  let raw = raw.trim();
  if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    return Ok(date);
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(dt.date_naive());
  }
  if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
    return Ok(dt.date_naive());
  }
  Err(Error::Validation(format!("invalid birthDate: {raw:?}")))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn birth_date_formats() {
    assert_eq!(parse_birth_date("2020-01-15").unwrap(), ymd(2020, 1, 15));
    assert_eq!(
      parse_birth_date("2020-01-15T10:30:00Z").unwrap(),
      ymd(2020, 1, 15)
    );
    assert_eq!(
      parse_birth_date("Mon, 18 Dec 2023 00:00:00 GMT").unwrap(),
      ymd(2023, 12, 18)
    );
  }

  #[test]
  fn birth_date_rejects_garbage() {
    for raw in ["", "yesterday", "2020-13-40", "15/01/2020"] {
      assert!(
        matches!(parse_birth_date(raw), Err(Error::Validation(_))),
        "accepted {raw:?}"
      );
    }
  }

  #[test]
  fn wire_names() {
    let pet = Pet {
      pet_id:     Uuid::new_v4(),
      name:       "Max".into(),
      species:    "dog".into(),
      birth_date: ymd(2020, 1, 15),
      adopted:    false,
      owner:      None,
      image:      None,
    };
    let json = serde_json::to_value(&pet).unwrap();
    assert_eq!(json["specie"], "dog");
    assert_eq!(json["birthDate"], "2020-01-15");
    assert_eq!(json["adopted"], false);
    assert!(json["owner"].is_null());
  }

  #[test]
  fn patch_keeps_unset_fields() {
    let mut pet = Pet {
      pet_id:     Uuid::new_v4(),
      name:       "Max".into(),
      species:    "dog".into(),
      birth_date: ymd(2020, 1, 15),
      adopted:    false,
      owner:      None,
      image:      None,
    };
    PetPatch { name: Some("Rocky".into()), ..Default::default() }.apply(&mut pet);
    assert_eq!(pet.name, "Rocky");
    assert_eq!(pet.species, "dog");
    assert!(!pet.adopted);
  }
}
