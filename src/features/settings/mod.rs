//! # Feature: Settings
//!
//! Profile fields, theme choice and the onboarding flag.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

pub mod manager;

pub use manager::{Profile, SettingsStore, ThemeSetting};
