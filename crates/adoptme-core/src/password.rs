//! Password hashing.
//!
//! Passwords are stored as argon2 PHC strings (`$argon2id$v=19$…`) with a
//! random salt per hash.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result};

/// Hash `plain` with a fresh salt.
pub fn hash_password(plain: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(plain.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check `plain` against a stored PHC string. A malformed hash never matches.
pub fn verify_password(plain: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(plain.as_bytes(), &parsed)
    .is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let hash = hash_password("coder123").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("coder123", &hash));
    assert!(!verify_password("wrong", &hash));
  }

  #[test]
  fn salts_differ() {
    let a = hash_password("pw").unwrap();
    let b = hash_password("pw").unwrap();
    assert_ne!(a, b);
  }

  #[test]
  fn garbage_hash_never_matches() {
    assert!(!verify_password("pw", "not-a-phc-string"));
  }
}
