//! Source providers for strata
//!
//! Every provider implements [`strata_core::Source`] and turns some external
//! resource into a configuration tree:
//!
//! - [`DirectorySource`] / [`FilesSource`] - one file per top-level key, in
//!   JSON, JSON5/JSONC, TOML or YAML (plus opt-in scripts)
//! - [`EnvSource`] - `CONFIG__section__key=value` variables
//! - [`LiteralSource`] - an explicit tree supplied by the caller
//! - [`ObjectStoreSource`] - files kept in a remote object store
//!
//! [`ConfigOptions`] wires the standard layers together.

pub mod directory;
pub mod env;
pub mod error;
pub mod format;
pub mod literal;
pub mod options;
pub mod script;
pub mod store;
mod yaml;

pub use directory::{DirectorySource, FilesSource};
pub use env::{DEFAULT_PREFIX, EnvSource, NESTING_SEPARATOR};
pub use error::{Error, Result};
pub use format::FileFormat;
pub use literal::LiteralSource;
pub use options::{CONFIG_DIR_VAR, ConfigOptions, DEFAULT_CONFIG_DIR, DEFAULT_ENV, ENV_VAR};
pub use script::ScriptOptions;
pub use store::{MemoryStore, ObjectStore, ObjectStoreSource};
