//! Selftest Configuration
//!
//! Controls how the inline test runner reports results:
//! - Report order (reverse registration order or declaration order)
//! - Colour of the pass/fail markers
//! - Optional elapsed-time line after the summary
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Harness config (`selftest.toml`, searched upwards from the working directory)
//! 3. Environment variables (`SELFTEST_*`, `NO_COLOR`)
//!
//! # Example
//!
//! ```no_run
//! use selftest_config::ConfigLoader;
//! use std::path::Path;
//!
//! let loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("order: {}", config.report.order);
//! ```

pub mod harness;
pub mod loader;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use harness::{ColorChoice, HarnessConfig, Order, ReportConfig, ReportSection};
pub use loader::{Config, ConfigLoader, CONFIG_FILE_NAME};
