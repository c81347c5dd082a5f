//! Error types and exit codes for minimize-codebase

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

use crate::minimizer::RunOutcome;

/// Main error type for minimize-codebase operations
#[derive(Error, Debug)]
pub enum MinimizeError {
    #[error("Missing {description} file: {path}")]
    MissingListing { description: String, path: PathBuf },

    #[error("Wrong type ({kind}) for {description}: {path}")]
    WrongPathType {
        kind: String,
        description: String,
        path: PathBuf,
    },

    #[error("{role} is not a folder: {path}")]
    NotAFolder { role: String, path: PathBuf },

    #[error("original and destination are the same: {path}")]
    SameFolder { path: PathBuf },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("does not end with \"{extension}\": {path}")]
    WrongExtension { extension: String, path: PathBuf },

    #[error("path has a \".\" in a folder name: {path}")]
    IllegalNameSegment { path: PathBuf },

    #[error("diagnostic source is not part of the managed tree\nsource: {source_path}\nroot:   {root}")]
    OutsideManagedTree { source_path: PathBuf, root: PathBuf },

    #[error("expected one decoded diagnostic, found {count}\n{dump}")]
    AmbiguousDecoding { count: usize, dump: String },

    #[error("decoded diagnostic does not match any known shape\n{dump}")]
    UnmatchedDecoding { dump: String },

    #[error("{tool} failed: {message}")]
    ToolError { tool: String, message: String },

    #[error("{tool} timed out after {secs}s")]
    ToolTimeout { tool: String, secs: u64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Resolution stopped after staging and compiling; `outcome` holds what
    /// the run had already found.
    #[error("{source}")]
    Aborted {
        outcome: Box<RunOutcome>,
        source: Box<MinimizeError>,
    },

    #[error("IO error at {path}: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MinimizeError {
    /// Convert error to an exit code:
    /// - 1: configuration or IO problem, nothing was resolved
    /// - 2: an external tool could not be run
    /// - 3: the managed tree is structurally inconsistent
    /// - 4: a diagnostic could not be decoded unambiguously
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    /// Numeric form of [`MinimizeError::exit_code`].
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::MissingListing { .. }
            | Self::WrongPathType { .. }
            | Self::NotAFolder { .. }
            | Self::SameFolder { .. }
            | Self::ConfigError { .. }
            | Self::Serialization(_)
            | Self::IoError { .. }
            | Self::Io(_) => 1,
            Self::ToolError { .. } | Self::ToolTimeout { .. } => 2,
            Self::WrongExtension { .. }
            | Self::IllegalNameSegment { .. }
            | Self::OutsideManagedTree { .. } => 3,
            Self::AmbiguousDecoding { .. } | Self::UnmatchedDecoding { .. } => 4,
            Self::Aborted { source, .. } => source.exit_status(),
        }
    }

    /// The partial outcome of an aborted run, if any.
    pub fn outcome(&self) -> Option<&RunOutcome> {
        match self {
            Self::Aborted { outcome, .. } => Some(&**outcome),
            _ => None,
        }
    }

    /// Wrap an `std::io::Error` with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for minimize-codebase operations
pub type Result<T> = std::result::Result<T, MinimizeError>;
