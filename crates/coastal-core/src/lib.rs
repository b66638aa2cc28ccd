//! Coastal Core - Domain models, validation, and request specifications
//!
//! This crate contains the domain logic for the coastal land cover
//! classification service: drawn-region geometry, imagery collection
//! queries, the classifier training specification, and export tasks.

pub mod error;
pub mod models;

pub use error::{CoastalError, Result};
