//! Harness Configuration (selftest.toml)
//!
//! Handles the `[report]` table of `selftest.toml` and the resolved settings
//! the runner consumes.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Order in which file groups and test cases are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Most recently registered first (the registration chain order)
    #[default]
    Reverse,
    /// Source order: files and cases as they were declared
    Declaration,
}

impl FromStr for Order {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "reverse" => Ok(Order::Reverse),
            "declaration" => Ok(Order::Declaration),
            other => Err(ConfigError::InvalidValue {
                field: "report.order".to_string(),
                reason: format!("must be 'reverse' or 'declaration', got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Reverse => write!(f, "reverse"),
            Order::Declaration => write!(f, "declaration"),
        }
    }
}

/// When to colour the pass/fail markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Colour only when the diagnostic stream is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolve to a yes/no decision given whether the stream is a terminal
    pub fn should_color(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl FromStr for ColorChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            other => Err(ConfigError::InvalidValue {
                field: "report.color".to_string(),
                reason: format!("must be 'auto', 'always', or 'never', got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorChoice::Auto => write!(f, "auto"),
            ColorChoice::Always => write!(f, "always"),
            ColorChoice::Never => write!(f, "never"),
        }
    }
}

/// Contents of a `selftest.toml` file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Report settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportSection>,
}

/// The `[report]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorChoice>,

    /// Print the elapsed time after the summary line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<bool>,
}

/// Fully resolved report settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportConfig {
    pub order: Order,
    pub color: ColorChoice,
    pub timing: bool,
}

impl HarnessConfig {
    /// Load harness configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        Self::parse(&content).map_err(|error| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error,
        })
    }

    /// Parse harness configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolve file settings on top of the built-in defaults
    pub fn resolve(&self) -> ReportConfig {
        let mut resolved = ReportConfig::default();
        if let Some(report) = &self.report {
            if let Some(order) = report.order {
                resolved.order = order;
            }
            if let Some(color) = report.color {
                resolved.color = color;
            }
            if let Some(timing) = report.timing {
                resolved.timing = timing;
            }
        }
        resolved
    }
}
