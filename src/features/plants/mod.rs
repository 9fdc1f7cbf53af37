//! # Feature: Plants
//!
//! The user's own plants: names, moods, watering history and care tips,
//! persisted as one JSON array.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Writers serialised behind one lock per collection
//! - 1.1.0: Optional catalog link for adopted plants
//! - 1.0.0: Initial release

pub mod model;
pub mod repository;

pub use model::{Plant, PlantMood};
pub use repository::PlantRepository;
