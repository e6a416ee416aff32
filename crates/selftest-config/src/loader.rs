//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::harness::{ColorChoice, HarnessConfig, Order, ReportConfig};
use crate::ConfigResult;
use std::env;
use std::path::{Path, PathBuf};

/// Name of the harness configuration file
pub const CONFIG_FILE_NAME: &str = "selftest.toml";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Built-in defaults - lowest priority
/// 2. Harness config (./selftest.toml or any parent directory) - overrides defaults
/// 3. Environment variables (SELFTEST_*, NO_COLOR) - overrides the file
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Skip environment overrides (used when the caller wants file-only settings)
    ignore_env: bool,
}

/// Merged configuration result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Resolved report settings
    pub report: ReportConfig,

    /// The `selftest.toml` that contributed, if any
    pub source: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { ignore_env: false }
    }

    /// Do not apply environment variable overrides
    pub fn without_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find selftest.toml. A missing file is not
    /// an error; the defaults (plus environment overrides) are returned.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let (source, harness) = self.find_harness_config(start_dir)?;
        self.finish(harness, source)
    }

    /// Load configuration from a specific selftest.toml
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let harness = HarnessConfig::load_from_file(config_path)?;
        self.finish(harness, Some(config_path.to_path_buf()))
    }

    fn finish(&self, harness: HarnessConfig, source: Option<PathBuf>) -> ConfigResult<Config> {
        let mut report = harness.resolve();
        if !self.ignore_env {
            report = apply_env_overrides(report)?;
        }
        tracing::debug!(
            source = ?source,
            order = %report.order,
            color = %report.color,
            timing = report.timing,
            "resolved selftest configuration"
        );
        Ok(Config { report, source })
    }

    /// Find selftest.toml by walking up the directory tree
    fn find_harness_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, HarnessConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.is_file() {
                let harness = HarnessConfig::load_from_file(&config_path)?;
                return Ok((Some(config_path), harness));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, HarnessConfig::default())),
            }
        }
    }
}

/// Apply environment variable overrides
///
/// SELFTEST_ORDER, SELFTEST_COLOR and SELFTEST_TIMING replace the file values.
/// NO_COLOR (any value) forces colour off and wins over SELFTEST_COLOR.
fn apply_env_overrides(mut report: ReportConfig) -> ConfigResult<ReportConfig> {
    if let Ok(order) = env::var("SELFTEST_ORDER") {
        report.order = order.parse::<Order>()?;
    }

    if let Ok(color) = env::var("SELFTEST_COLOR") {
        report.color = color.parse::<ColorChoice>()?;
    }

    if let Ok(timing) = env::var("SELFTEST_TIMING") {
        report.timing = matches!(timing.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if env::var_os("NO_COLOR").is_some() {
        report.color = ColorChoice::Never;
    }

    Ok(report)
}

impl Config {
    /// Whether any settings came from a file
    pub fn has_file(&self) -> bool {
        self.source.is_some()
    }
}
