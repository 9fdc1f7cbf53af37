//! # Feature: Plant Catalog
//!
//! Static list of known plant species for browsing and adopting.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod loader;

pub use loader::{PlantCatalog, PlantData};
