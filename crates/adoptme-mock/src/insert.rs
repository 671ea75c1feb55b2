//! Bulk insertion of generated records.

use adoptme_core::{pet::NewPet, store::ShelterStore, user::NewUser};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{Error, MockGenerator, Result};

/// How many records of each kind to generate and insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct MockRequest {
  #[serde(default)]
  pub users: Option<usize>,
  #[serde(default)]
  pub pets:  Option<usize>,
}

impl MockRequest {
  /// Resolve to `(users, pets)` counts, rejecting empty or oversized requests.
  pub fn counts(&self, generator: &MockGenerator) -> Result<(usize, usize)> {
    let users = self.users.unwrap_or(0);
    let pets = self.pets.unwrap_or(0);
    if users == 0 && pets == 0 {
      return Err(Error::EmptyRequest);
    }
    Ok((generator.check_count(users)?, generator.check_count(pets)?))
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockReport {
  pub users_inserted: usize,
  pub pets_inserted:  usize,
}

/// Insert generated users and pets one by one.
///
/// A user whose email is already taken, or any record the store refuses, is
/// logged and skipped; only the successful inserts are counted.
pub async fn insert_mock_data<S: ShelterStore>(
  store: &S,
  users: Vec<NewUser>,
  pets: Vec<NewPet>,
) -> MockReport {
  let mut report = MockReport::default();

  for user in users {
    match store.get_user_by_email(user.email.clone()).await {
      Ok(Some(_)) => {
        warn!(email = %user.email, "skipping mock user with duplicate email");
        continue;
      }
      Ok(None) => {}
      Err(e) => {
        warn!(email = %user.email, error = %e, "skipping mock user");
        continue;
      }
    }
    match store.create_user(user).await {
      Ok(_) => report.users_inserted += 1,
      Err(e) => warn!(error = %e, "failed to insert mock user"),
    }
  }

  for pet in pets {
    match store.create_pet(pet).await {
      Ok(_) => report.pets_inserted += 1,
      Err(e) => warn!(error = %e, "failed to insert mock pet"),
    }
  }

  info!(
    users = report.users_inserted,
    pets = report.pets_inserted,
    "inserted mock data"
  );
  report
}

#[cfg(test)]
mod tests {
  use adoptme_core::store::ShelterStore;
  use adoptme_store_sqlite::SqliteStore;

  use super::*;

  async fn store() -> SqliteStore {
    SqliteStore::open_in_memory()
      .await
      .expect("in-memory store")
  }

  #[test]
  fn empty_requests_are_rejected() {
    let generator = MockGenerator::default();
    for request in [
      MockRequest::default(),
      MockRequest { users: Some(0), pets: Some(0) },
      MockRequest { users: Some(0), pets: None },
    ] {
      assert!(matches!(request.counts(&generator), Err(Error::EmptyRequest)));
    }
  }

  #[test]
  fn counts_respect_limit() {
    let generator = MockGenerator::default().with_max_count(5);
    let ok = MockRequest { users: Some(5), pets: None };
    assert_eq!(ok.counts(&generator).unwrap(), (5, 0));

    let big = MockRequest { users: Some(1), pets: Some(6) };
    assert!(matches!(
      big.counts(&generator),
      Err(Error::CountTooLarge { requested: 6, max: 5 })
    ));
  }

  #[test]
  fn request_deserializes_partial_bodies() {
    let request: MockRequest = serde_json::from_str(r#"{"pets": 3}"#).unwrap();
    assert_eq!(request, MockRequest { users: None, pets: Some(3) });
  }

  #[test]
  fn report_uses_camel_case() {
    let json = serde_json::to_value(MockReport {
      users_inserted: 1,
      pets_inserted:  2,
    })
    .unwrap();
    assert_eq!(json, serde_json::json!({ "usersInserted": 1, "petsInserted": 2 }));
  }

  #[tokio::test]
  async fn inserts_everything_generated() {
    let s = store().await;
    let generator = MockGenerator::new(Some(5));
    let users = generator.generate_users(4).unwrap();
    let pets = generator.generate_pets(6).unwrap();

    let report = insert_mock_data(&s, users, pets).await;
    assert_eq!(report, MockReport {
      users_inserted: 4,
      pets_inserted:  6,
    });
    assert_eq!(s.list_users().await.unwrap().len(), 4);
    let pets = s.list_pets().await.unwrap();
    assert_eq!(pets.len(), 6);
    assert!(pets.iter().all(|p| !p.adopted && p.owner.is_none()));
  }

  #[tokio::test]
  async fn duplicate_emails_are_skipped() {
    let s = store().await;
    let generator = MockGenerator::new(Some(9));
    let users = generator.generate_users(3).unwrap();
    s.create_user(users[1].clone()).await.unwrap();

    let report = insert_mock_data(&s, users, Vec::new()).await;
    assert_eq!(report.users_inserted, 2);
    assert_eq!(report.pets_inserted, 0);
    assert_eq!(s.list_users().await.unwrap().len(), 3);
  }
}
