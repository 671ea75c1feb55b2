//! Random pet and user generation.
//!
//! A generator built with a seed produces the same batch for the same seed
//! and count (on a given day: birth dates are relative to today). Without a
//! seed every call draws a fresh one.

use adoptme_core::{
  password::hash_password,
  pet::NewPet,
  user::{NewUser, Role},
};
use chrono::{Days, NaiveDate, Utc};
use fake::{
  Fake,
  faker::name::raw::{FirstName, LastName},
  locales::EN,
};
use rand::{Rng, SeedableRng, seq::IndexedRandom};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::{Error, Result};

/// Species a generated pet can have.
pub const SPECIES: &[&str] = &["dog", "cat", "bird", "rabbit", "hamster", "fish"];

/// Plain-text password shared by every generated user.
pub const MOCK_PASSWORD: &str = "coder123";

pub const DEFAULT_PET_COUNT: usize = 100;
pub const DEFAULT_USER_COUNT: usize = 50;
pub const DEFAULT_MAX_COUNT: usize = 1000;

/// Birth dates fall within this many days before today.
const MAX_AGE_DAYS: u64 = 3650;

/// A generated pet as shown to clients, with the `adopted: false` every new
/// pet starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MockPet {
  #[serde(flatten)]
  pub pet:     NewPet,
  pub adopted: bool,
}

impl From<NewPet> for MockPet {
  fn from(pet: NewPet) -> Self { Self { pet, adopted: false } }
}

#[derive(Debug, Clone)]
pub struct MockGenerator {
  seed:      Option<u64>,
  max_count: usize,
}

impl Default for MockGenerator {
  fn default() -> Self { Self::new(None) }
}

impl MockGenerator {
  pub fn new(seed: Option<u64>) -> Self {
    Self {
      seed,
      max_count: DEFAULT_MAX_COUNT,
    }
  }

  pub fn with_max_count(mut self, max_count: usize) -> Self {
    self.max_count = max_count;
    self
  }

  /// Reject batch sizes above the configured limit.
  pub fn check_count(&self, requested: usize) -> Result<usize> {
    if requested > self.max_count {
      return Err(Error::CountTooLarge {
        requested,
        max: self.max_count,
      });
    }
    Ok(requested)
  }

  fn rng(&self) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(self.seed.unwrap_or_else(rand::random))
  }

  /// Generate `count` unadopted pets.
  pub fn generate_pets(&self, count: usize) -> Result<Vec<NewPet>> {
    self.check_count(count)?;
    let mut rng = self.rng();
    let today = Utc::now().date_naive();
    Ok((0..count).map(|_| generate_pet(&mut rng, today)).collect())
  }

  /// Generate `count` users, all with the password [`MOCK_PASSWORD`].
  ///
  /// The password is hashed once per batch, so this is CPU-bound only for
  /// that single hash.
  pub fn generate_users(&self, count: usize) -> Result<Vec<NewUser>> {
    self.check_count(count)?;
    if count == 0 {
      return Ok(Vec::new());
    }
    let password_hash = hash_password(MOCK_PASSWORD)?;
    let mut rng = self.rng();
    Ok(
      (0..count)
        .map(|_| generate_user(&mut rng, &password_hash))
        .collect(),
    )
  }
}

fn generate_pet(rng: &mut ChaCha8Rng, today: NaiveDate) -> NewPet {
  let name: String = FirstName(EN).fake_with_rng(rng);
  let species = SPECIES.choose(rng).copied().unwrap_or("dog");
  let age = Days::new(rng.random_range(0..MAX_AGE_DAYS));
  let birth_date = today.checked_sub_days(age).unwrap_or(today);
  let image = format!(
    "https://picsum.photos/seed/{}/640/480",
    rng.random::<u32>()
  );

  NewPet {
    name,
    species: species.to_owned(),
    birth_date,
    image: Some(image),
  }
}

fn generate_user(rng: &mut ChaCha8Rng, password_hash: &str) -> NewUser {
  let first_name: String = FirstName(EN).fake_with_rng(rng);
  let last_name: String = LastName(EN).fake_with_rng(rng);
  let email = format!(
    "{}.{}{}@example.com",
    email_part(&first_name),
    email_part(&last_name),
    rng.random_range(1..10_000u32),
  );
  let role = if rng.random_ratio(1, 2) {
    Role::Admin
  } else {
    Role::User
  };

  NewUser {
    first_name,
    last_name,
    email,
    password_hash: password_hash.to_owned(),
    role,
  }
}

fn email_part(name: &str) -> String {
  name
    .chars()
    .filter(char::is_ascii_alphanumeric)
    .map(|c| c.to_ascii_lowercase())
    .collect()
}
