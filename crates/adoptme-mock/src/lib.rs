//! Fake shelter data for demos and load testing.
//!
//! [`MockGenerator`] produces plausible pets and users; [`insert_mock_data`]
//! pushes a generated batch through any [`ShelterStore`].
//!
//! [`ShelterStore`]: adoptme_core::store::ShelterStore

pub mod error;
pub mod generator;
pub mod insert;

pub use error::{Error, Result};
pub use generator::{MockGenerator, MockPet};
pub use insert::{MockReport, MockRequest, insert_mock_data};
