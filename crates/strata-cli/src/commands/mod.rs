//! Command implementations for strata-cli

pub mod env;
pub mod get;
pub mod keys;

pub use env::run_env;
pub use get::run_get;
pub use keys::run_keys;
