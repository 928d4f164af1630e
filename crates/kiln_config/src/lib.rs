//! Parsing and validation of `kiln.toml` workspace descriptions.
//!
//! A workspace description lists the projects of a multi-module build, the
//! configurations and dependencies each one declares, and the modules that
//! are eligible for artifact substitution.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
