//! # Feature: Garden
//!
//! Which catalog species the user has added, and adoption of catalog
//! entries into owned plants.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Adopted species create linked plants
//! - 1.0.0: Membership set over the key-value store

#[allow(clippy::module_inception)]
pub mod garden;
pub mod membership;

pub use garden::Garden;
pub use membership::MembershipStore;
