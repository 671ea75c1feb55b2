//! [`SqliteStore`], the SQLite implementation of [`ShelterStore`].

use std::path::Path;

use adoptme_core::{
  adoption::Adoption,
  id::new_id,
  pet::{NewPet, Pet, PetPatch},
  store::{PetClaim, ShelterStore},
  user::{NewUser, User, UserPatch},
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    ADOPTION_COLUMNS, PET_COLUMNS, RawAdoption, RawPet, RawUser, USER_COLUMNS,
    encode_date, encode_dt, encode_role, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn select_user(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<RawUser>> {
  conn
    .query_row(
      &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
      rusqlite::params![id],
      RawUser::from_row,
    )
    .optional()
}

fn select_pet(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<RawPet>> {
  conn
    .query_row(
      &format!("SELECT {PET_COLUMNS} FROM pets WHERE pet_id = ?1"),
      rusqlite::params![id],
      RawPet::from_row,
    )
    .optional()
}

/// Outcome of the claim closure, before decoding.
enum RawClaim {
  Claimed(RawPet),
  AlreadyAdopted,
  NotFound,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An adoption store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ShelterStore impl ───────────────────────────────────────────────────────

impl ShelterStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:       new_id(),
      first_name:    input.first_name,
      last_name:     input.last_name,
      email:         input.email,
      password_hash: input.password_hash,
      role:          input.role,
      pets:          Vec::new(),
    };

    let id_str     = encode_uuid(user.user_id);
    let first_name = user.first_name.clone();
    let last_name  = user.last_name.clone();
    let email      = user.email.clone();
    let hash       = user.password_hash.clone();
    let role_str   = encode_role(user.role);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, first_name, last_name, email, password_hash, role, pets)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, '[]')",
          rusqlite::params![id_str, first_name, last_name, email, hash, role_str],
        )?;
        Ok(())
      })
      .await?;

    debug!(user_id = %user.user_id, "user created");
    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_user(conn, &id_str)?))
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_email(&self, email: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {USER_COLUMNS} FROM users WHERE email = ?1 ORDER BY rowid LIMIT 1"
              ),
              rusqlite::params![email],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>> {
    let id_str = encode_uuid(id);
    let role_str = patch.role.map(encode_role);
    let UserPatch { first_name, last_name, email, password_hash, .. } = patch;

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE users SET
             first_name    = COALESCE(?2, first_name),
             last_name     = COALESCE(?3, last_name),
             email         = COALESCE(?4, email),
             password_hash = COALESCE(?5, password_hash),
             role          = COALESCE(?6, role)
           WHERE user_id = ?1",
          rusqlite::params![id_str, first_name, last_name, email, password_hash, role_str],
        )?;
        let raw = if changed == 0 { None } else { select_user(&tx, &id_str)? };
        tx.commit()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  async fn delete_user(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM users WHERE user_id = ?1", rusqlite::params![id_str])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn append_user_pet(&self, user_id: Uuid, pet_id: Uuid) -> Result<Option<User>> {
    let user_str = encode_uuid(user_id);
    let pet_str  = encode_uuid(pet_id);

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE users SET pets = json_insert(pets, '$[#]', ?2) WHERE user_id = ?1",
          rusqlite::params![user_str, pet_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_user(conn, &user_str)?)
      })
      .await?;

    debug!(%user_id, %pet_id, found = raw.is_some(), "appended pet to user");
    raw.map(RawUser::into_user).transpose()
  }

  async fn remove_user_pet(&self, user_id: Uuid, pet_id: Uuid) -> Result<Option<User>> {
    let user_str = encode_uuid(user_id);
    let pet_str  = encode_uuid(pet_id);

    // Removes the last occurrence only, so two in-flight adoptions by the same
    // user each own one entry.
    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users
              SET pets = json_remove(pets, '$[' || (
                    SELECT MAX(key) FROM json_each(users.pets) WHERE value = ?2
                  ) || ']')
            WHERE user_id = ?1
              AND EXISTS (SELECT 1 FROM json_each(users.pets) WHERE value = ?2)",
          rusqlite::params![user_str, pet_str],
        )?;
        Ok(select_user(conn, &user_str)?)
      })
      .await?;

    debug!(%user_id, %pet_id, "removed pet from user");
    raw.map(RawUser::into_user).transpose()
  }

  // ── Pets ──────────────────────────────────────────────────────────────────

  async fn create_pet(&self, input: NewPet) -> Result<Pet> {
    let pet = Pet {
      pet_id:     new_id(),
      name:       input.name,
      species:    input.species,
      birth_date: input.birth_date,
      adopted:    false,
      owner:      None,
      image:      input.image,
    };

    let id_str   = encode_uuid(pet.pet_id);
    let name     = pet.name.clone();
    let specie   = pet.species.clone();
    let date_str = encode_date(pet.birth_date);
    let image    = pet.image.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO pets (pet_id, name, specie, birth_date, adopted, owner, image)
           VALUES (?1, ?2, ?3, ?4, 0, NULL, ?5)",
          rusqlite::params![id_str, name, specie, date_str, image],
        )?;
        Ok(())
      })
      .await?;

    debug!(pet_id = %pet.pet_id, "pet created");
    Ok(pet)
  }

  async fn get_pet(&self, id: Uuid) -> Result<Option<Pet>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_pet(conn, &id_str)?))
      .await?;
    raw.map(RawPet::into_pet).transpose()
  }

  async fn list_pets(&self) -> Result<Vec<Pet>> {
    let raws: Vec<RawPet> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {PET_COLUMNS} FROM pets ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], RawPet::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawPet::into_pet).collect()
  }

  async fn update_pet(&self, id: Uuid, patch: PetPatch) -> Result<Option<Pet>> {
    let id_str   = encode_uuid(id);
    let date_str = patch.birth_date.map(encode_date);
    let PetPatch { name, species, image, .. } = patch;

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE pets SET
             name       = COALESCE(?2, name),
             specie     = COALESCE(?3, specie),
             birth_date = COALESCE(?4, birth_date),
             image      = COALESCE(?5, image)
           WHERE pet_id = ?1",
          rusqlite::params![id_str, name, species, date_str, image],
        )?;
        let raw = if changed == 0 { None } else { select_pet(&tx, &id_str)? };
        tx.commit()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawPet::into_pet).transpose()
  }

  async fn delete_pet(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let owner: Option<Option<String>> = tx
          .query_row(
            "SELECT owner FROM pets WHERE pet_id = ?1",
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?;
        let Some(owner) = owner else {
          return Ok(false);
        };

        tx.execute("DELETE FROM pets WHERE pet_id = ?1", rusqlite::params![id_str])?;
        if let Some(owner) = owner {
          tx.execute(
            "UPDATE users
                SET pets = (SELECT json_group_array(value)
                              FROM json_each(users.pets)
                             WHERE value != ?2)
              WHERE user_id = ?1",
            rusqlite::params![owner, id_str],
          )?;
        }
        tx.commit()?;
        Ok(true)
      })
      .await?;
    Ok(deleted)
  }

  async fn claim_pet(&self, pet_id: Uuid, owner: Uuid) -> Result<PetClaim> {
    let pet_str   = encode_uuid(pet_id);
    let owner_str = encode_uuid(owner);

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE pets SET adopted = 1, owner = ?2 WHERE pet_id = ?1 AND adopted = 0",
          rusqlite::params![pet_str, owner_str],
        )?;
        let current = select_pet(conn, &pet_str)?;
        Ok(match (changed, current) {
          (_, None) => RawClaim::NotFound,
          (0, Some(_)) => RawClaim::AlreadyAdopted,
          (_, Some(pet)) => RawClaim::Claimed(pet),
        })
      })
      .await?;

    let claim = match raw {
      RawClaim::Claimed(pet) => PetClaim::Claimed(pet.into_pet()?),
      RawClaim::AlreadyAdopted => PetClaim::AlreadyAdopted,
      RawClaim::NotFound => PetClaim::NotFound,
    };
    debug!(%pet_id, %owner, ?claim, "pet claim");
    Ok(claim)
  }

  async fn release_pet(&self, pet_id: Uuid, owner: Uuid) -> Result<bool> {
    let pet_str   = encode_uuid(pet_id);
    let owner_str = encode_uuid(owner);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE pets SET adopted = 0, owner = NULL WHERE pet_id = ?1 AND owner = ?2",
          rusqlite::params![pet_str, owner_str],
        )?)
      })
      .await?;

    debug!(%pet_id, %owner, released = changed > 0, "pet release");
    Ok(changed > 0)
  }

  // ── Adoptions ─────────────────────────────────────────────────────────────

  async fn create_adoption(&self, owner: Uuid, pet: Uuid) -> Result<Adoption> {
    let adoption = Adoption {
      adoption_id: new_id(),
      owner,
      pet,
      created_at: Utc::now(),
    };

    let id_str    = encode_uuid(adoption.adoption_id);
    let owner_str = encode_uuid(owner);
    let pet_str   = encode_uuid(pet);
    let at_str    = encode_dt(adoption.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO adoptions (adoption_id, owner, pet, created_at) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, owner_str, pet_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(adoption)
  }

  async fn get_adoption(&self, id: Uuid) -> Result<Option<Adoption>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawAdoption> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ADOPTION_COLUMNS} FROM adoptions WHERE adoption_id = ?1"),
              rusqlite::params![id_str],
              RawAdoption::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawAdoption::into_adoption).transpose()
  }

  async fn list_adoptions(&self) -> Result<Vec<Adoption>> {
    let raws: Vec<RawAdoption> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {ADOPTION_COLUMNS} FROM adoptions ORDER BY seq"))?;
        let rows = stmt
          .query_map([], RawAdoption::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawAdoption::into_adoption).collect()
  }
}
