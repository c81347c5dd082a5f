//! Compiler diagnostics and their structured decodings.

pub mod decoder;
pub mod patterns;
pub mod timing;

pub use decoder::{DecodedDiagnostic, DiagnosticDecoder};
pub use patterns::{NamedPattern, PatternRegistry};
pub use timing::{NoopTimer, PatternTimer, PatternTimings};

use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

/// Diagnostic severity as reported by the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
}

/// Compiler error key (`compiler.err.*`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    /// `cannot find symbol` with a location
    CantResolveLocation,
    /// `cannot find symbol` without a location
    CantResolve,
    /// `package ... does not exist`
    DoesntExist,
    Other(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::CantResolveLocation => "compiler.err.cant.resolve.location",
            Self::CantResolve => "compiler.err.cant.resolve",
            Self::DoesntExist => "compiler.err.doesnt.exist",
            Self::Other(code) => code,
        }
    }

    pub fn from_text(text: &str) -> Self {
        match text {
            "compiler.err.cant.resolve.location" => Self::CantResolveLocation,
            "compiler.err.cant.resolve" => Self::CantResolve,
            "compiler.err.doesnt.exist" => Self::DoesntExist,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One diagnostic produced by a compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    /// Absolute source path, `None` for global diagnostics
    pub source: Option<PathBuf>,
    pub line: Option<u32>,
    /// Message without the echoed source line and caret
    pub message: String,
    /// Full text as the compiler printed it
    pub rendered: String,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Rendered text with every line prefixed by `> `, for dumps.
    pub fn quoted(&self) -> String {
        self.rendered
            .lines()
            .map(|line| format!("> {}", line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Family of diagnostic messages the resolver knows how to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    CannotFindSymbol,
    PackageDoesNotExist,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CannotFindSymbol => write!(f, "cannot find symbol"),
            Self::PackageDoesNotExist => write!(f, "package does not exist"),
        }
    }
}

/// Kind word printed by javac in `symbol:` and `location:` lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    Class,
    Variable,
    Package,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Variable => "variable",
            Self::Package => "package",
        }
    }

    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            "class" => Some(Self::Class),
            "variable" => Some(Self::Variable),
            "package" => Some(Self::Package),
            _ => None,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
