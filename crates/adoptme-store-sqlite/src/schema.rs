//! SQL schema for the SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    email         TEXT NOT NULL,   -- lookup key; uniqueness checked by callers
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    role          TEXT NOT NULL DEFAULT 'user',   -- 'user' | 'admin'
    pets          TEXT NOT NULL DEFAULT '[]'      -- JSON array of pet ids
);

CREATE TABLE IF NOT EXISTS pets (
    pet_id     TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    specie     TEXT NOT NULL,
    birth_date TEXT NOT NULL,               -- YYYY-MM-DD
    adopted    INTEGER NOT NULL DEFAULT 0,
    owner      TEXT,                        -- user_id once adopted
    image      TEXT,
    CHECK ((adopted = 0 AND owner IS NULL) OR (adopted = 1 AND owner IS NOT NULL))
);

-- Adoptions are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS adoptions (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,   -- insertion order
    adoption_id TEXT NOT NULL UNIQUE,
    owner       TEXT NOT NULL,
    pet         TEXT NOT NULL,
    created_at  TEXT NOT NULL                        -- ISO 8601 UTC
);

CREATE INDEX IF NOT EXISTS users_email_idx ON users(email);
CREATE INDEX IF NOT EXISTS pets_owner_idx  ON pets(owner);

PRAGMA user_version = 1;
";
