//! Core types and trait definitions for the adoption service.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends implement [`store::ShelterStore`]; the HTTP layer drives
//! the [`coordinator::AdoptionCoordinator`] through that trait.

pub mod adoption;
pub mod coordinator;
pub mod error;
pub mod id;
pub mod password;
pub mod pet;
pub mod store;
pub mod user;

pub use error::{Error, Result};
