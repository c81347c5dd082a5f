//! Run configuration.
//!
//! Read from `minimize.toml` in the destination folder, or from the file given
//! with `--config`. Every field has a default, so a missing file is the same as
//! an empty one. Command line flags are applied on top afterwards.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MinimizeError, Result};

/// Default config file name inside the destination folder
pub const CONFIG_FILE_NAME: &str = "minimize.toml";

/// minimize-codebase configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MinimizeConfig {
    /// Resolver settings
    #[serde(default)]
    pub resolve: ResolveConfig,

    /// External tool settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Number of failing files whose diagnostics are resolved per run
    #[serde(default = "default_file_limit")]
    pub file_limit: usize,

    /// Leading lines scanned for a package declaration
    #[serde(default = "default_package_scan_lines")]
    pub package_scan_lines: usize,
}

fn default_file_limit() -> usize {
    10
}

fn default_package_scan_lines() -> usize {
    crate::tree::DEFAULT_PACKAGE_SCAN_LINES
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            file_limit: default_file_limit(),
            package_scan_lines: default_package_scan_lines(),
        }
    }
}

/// External tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_javac")]
    pub javac: String,

    #[serde(default = "default_javap")]
    pub javap: String,

    #[serde(default = "default_mvn")]
    pub mvn: String,

    #[serde(default = "default_compile_timeout")]
    pub compile_timeout_secs: u64,

    #[serde(default = "default_inspect_timeout")]
    pub inspect_timeout_secs: u64,

    #[serde(default = "default_harvest_timeout")]
    pub harvest_timeout_secs: u64,

    /// Extra javac options, placed before the file list
    #[serde(default)]
    pub javac_args: Vec<String>,
}

fn default_javac() -> String {
    "javac".to_string()
}

fn default_javap() -> String {
    "javap".to_string()
}

fn default_mvn() -> String {
    "mvn".to_string()
}

fn default_compile_timeout() -> u64 {
    600
}

fn default_inspect_timeout() -> u64 {
    30
}

fn default_harvest_timeout() -> u64 {
    600
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            javac: default_javac(),
            javap: default_javap(),
            mvn: default_mvn(),
            compile_timeout_secs: default_compile_timeout(),
            inspect_timeout_secs: default_inspect_timeout(),
            harvest_timeout_secs: default_harvest_timeout(),
            javac_args: Vec::new(),
        }
    }
}

impl ToolsConfig {
    pub fn compile_timeout(&self) -> Duration {
        Duration::from_secs(self.compile_timeout_secs)
    }

    pub fn inspect_timeout(&self) -> Duration {
        Duration::from_secs(self.inspect_timeout_secs)
    }

    pub fn harvest_timeout(&self) -> Duration {
        Duration::from_secs(self.harvest_timeout_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl MinimizeConfig {
    /// Load configuration from a specific path; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| MinimizeError::io(path, e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| MinimizeError::ConfigError {
            message: format!("Failed to parse config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run can work with.
    pub fn validate(&self) -> Result<()> {
        if self.resolve.package_scan_lines == 0 {
            return Err(MinimizeError::ConfigError {
                message: "resolve.package_scan_lines must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
