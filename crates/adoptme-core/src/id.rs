//! Entity identifiers.
//!
//! Users, pets and adoptions are all keyed by v4 UUIDs. Identifiers that come
//! from outside (URL path segments) must be in the canonical hyphenated form;
//! anything else is rejected here, before it can reach a store.

use uuid::Uuid;

use crate::{Error, Result};

/// Length of the canonical hyphenated form, e.g.
/// `67e55044-10b1-426f-9247-bb680e5fe0c8`.
pub const ID_LEN: usize = 36;

/// Generate a fresh identifier for a new entity.
pub fn new_id() -> Uuid { Uuid::new_v4() }

/// Validate and parse an externally supplied identifier.
pub fn parse_id(raw: &str) -> Result<Uuid> {
  if raw.len() != ID_LEN {
    return Err(Error::InvalidIdentifier(raw.to_owned()));
  }
  Uuid::parse_str(raw).map_err(|_| Error::InvalidIdentifier(raw.to_owned()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_hyphenated() {
    let id = new_id();
    assert_eq!(parse_id(&id.to_string()).unwrap(), id);
  }

  #[test]
  fn accepts_uppercase_hex() {
    let id = new_id();
    let upper = id.to_string().to_uppercase();
    assert_eq!(parse_id(&upper).unwrap(), id);
  }

  #[test]
  fn rejects_other_shapes() {
    let id = new_id();
    for raw in [
      String::new(),
      "123".to_owned(),
      "usuario-invalido".to_owned(),
      "user@123".to_owned(),
      "a".repeat(30),
      id.simple().to_string(),
      id.braced().to_string(),
      id.urn().to_string(),
      // right length, not hex
      "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz".to_owned(),
    ] {
      assert!(
        matches!(parse_id(&raw), Err(Error::InvalidIdentifier(_))),
        "accepted {raw:?}"
      );
    }
  }
}
