#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Configuration for bitgrant.
//!
//! A single [`Config`] holds the logging setup, the gate's default denial
//! message and the declared capability families.
//!
//! # Usage
//!
//! ```rust
//! use bitgrant_config::Config;
//!
//! let config = Config::from_toml_str(
//!     r#"
//!     [[families]]
//!     on = "post"
//!     capabilities = ["create", "review", "update", "delete"]
//!     default = ["create", "update"]
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.family("post").unwrap().default, vec!["create", "update"]);
//! ```
//!
//! # Design
//!
//! This crate has **no dependencies on other internal bitgrant crates**.
//! Conversion to domain types (`FamilyDecl`, `LogConfig`) happens at the
//! integration boundary, in the CLI's config bridge.

/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigSource, LoadedConfig};
pub use types::*;

impl Config {
    /// Discover and load the configuration.
    ///
    /// See [`loader::load`] for the search order.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a config file is malformed or the
    /// configuration fails validation.
    pub fn load(
        explicit: Option<&std::path::Path>,
        workspace_root: Option<&std::path::Path>,
    ) -> ConfigResult<LoadedConfig> {
        loader::load(explicit, workspace_root, None)
    }

    /// Load configuration from a single file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the text does not parse or validate.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        loader::load_str(content)
    }
}
