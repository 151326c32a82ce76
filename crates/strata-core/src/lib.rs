//! Layered configuration core for strata
//!
//! This crate owns the parts of configuration resolution that do no I/O:
//!
//! - [`Value`], the tree every source produces
//! - [`merge`], the deep-merge engine that folds trees in precedence order
//! - [`Config`] and [`ConfigBuilder`], the immutable resolved configuration
//! - [`ConfigLoader`], the incremental variant that locks after the first read
//! - [`Source`], the contract implemented by source providers
//!
//! # Precedence
//!
//! Trees are folded least to most overriding:
//!
//! 1. **Default** - base settings shared by every environment
//! 2. **Environment** - overrides for the selected environment
//! 3. **Local** - developer overrides
//! 4. **Explicit** - structured data passed in by the caller
//! 5. **Environment variables** - `CONFIG__section__key=value`
//!
//! # Example
//!
//! ```
//! use strata_core::{Config, Layer, Settings, Value};
//! use serde_json::json;
//!
//! # fn main() -> strata_core::Result<()> {
//! let config = Config::builder("development", true)?
//!     .layer(Layer::Default, Value::from(json!({"database": {"host": "default.db", "port": 3306}})))
//!     .layer(Layer::Environment, Value::from(json!({"database": {"host": "dev.db"}})))
//!     .build();
//!
//! assert_eq!(config.get_string("database.host")?, "dev.db");
//! assert_eq!(config.keys_at("database"), Some(vec!["host".into(), "port".into()]));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod layer;
pub mod loader;
pub mod merge;
pub mod settings;
pub mod source;
pub mod value;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use layer::{DEFAULT_LAYER, LOCAL_LAYER, Layer, validate_env_name};
pub use loader::{ConfigLoader, LoadState};
pub use merge::{fold, merge, merge_into};
pub use settings::Settings;
pub use source::Source;
pub use value::{Mapping, PATH_SEPARATOR, Value};
