//! CLI argument definitions using clap
//!
//! Flags override the values loaded from `minimize.toml`.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{MinimizeConfig, CONFIG_FILE_NAME};

/// Shrink a Java code base to the files a seed set needs to compile
#[derive(Parser, Debug)]
#[command(name = "minimize-codebase")]
#[command(about = "Copy seed files, compile them and suggest the missing files and archives")]
#[command(version)]
pub struct Cli {
    /// Folder holding the full code base
    #[arg(value_name = "ORIGINAL")]
    pub original: PathBuf,

    /// Folder holding the listings; receives the copies
    #[arg(value_name = "DESTINATION", default_value = ".")]
    pub destination: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (defaults to DESTINATION/minimize.toml)
    #[arg(long, value_name = "FILE", env = "MINIMIZE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of failing files to resolve per run
    #[arg(long, value_name = "N", env = "MINIMIZE_FILE_LIMIT")]
    pub file_limit: Option<usize>,

    /// Lines scanned for a package declaration
    #[arg(long, value_name = "N", env = "MINIMIZE_PACKAGE_SCAN_LINES")]
    pub package_scan_lines: Option<usize>,

    /// Seconds allowed for one archive inspection
    #[arg(long, value_name = "SECS", env = "MINIMIZE_INSPECT_TIMEOUT")]
    pub inspect_timeout: Option<u64>,

    /// Seconds allowed for the compilation
    #[arg(long, value_name = "SECS", env = "MINIMIZE_COMPILE_TIMEOUT")]
    pub compile_timeout: Option<u64>,

    /// Java compiler to run
    #[arg(long, value_name = "PROGRAM", env = "MINIMIZE_JAVAC")]
    pub javac: Option<String>,

    /// Class file disassembler used to inspect archives
    #[arg(long, value_name = "PROGRAM", env = "MINIMIZE_JAVAP")]
    pub javap: Option<String>,

    /// Copy maven dependencies into target/dependency first and report unlisted archives
    #[arg(long)]
    pub harvest: bool,

    /// Report average decoding time per diagnostic pattern
    #[arg(long)]
    pub profile_patterns: bool,
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    #[value(alias = "pretty")]
    Text,
    /// JSON - standard JSON output for machine parsing
    Json,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Config file to load: the explicit one, else the destination default
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.destination.join(CONFIG_FILE_NAME))
    }

    /// Apply flag overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut MinimizeConfig) {
        if let Some(limit) = self.file_limit {
            config.resolve.file_limit = limit;
        }
        if let Some(lines) = self.package_scan_lines {
            config.resolve.package_scan_lines = lines;
        }
        if let Some(secs) = self.inspect_timeout {
            config.tools.inspect_timeout_secs = secs;
        }
        if let Some(secs) = self.compile_timeout {
            config.tools.compile_timeout_secs = secs;
        }
        if let Some(javac) = &self.javac {
            config.tools.javac = javac.clone();
        }
        if let Some(javap) = &self.javap {
            config.tools.javap = javap.clone();
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
    }
}
