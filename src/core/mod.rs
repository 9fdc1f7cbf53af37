//! # Core Module
//!
//! Configuration and input validation shared by every feature.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod config;
pub mod validation;

pub use config::Config;
pub use validation::ValidationError;
