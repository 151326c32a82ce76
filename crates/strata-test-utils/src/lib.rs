//! Shared test utilities for the strata workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixture`] - [`ConfigFixture`] builder for temporary configuration roots
//! - [`scenario`] - ready-made configuration roots used across test suites

pub mod fixture;
pub mod scenario;

pub use fixture::ConfigFixture;
