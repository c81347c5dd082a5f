//! Compilation step: request, result and the driver seam.

pub mod javac;
pub mod parse;

pub use javac::JavacDriver;
pub use parse::parse_javac_output;

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::diagnostics::{Diagnostic, ErrorCode};
use crate::error::Result;

/// Everything a compiler run needs
#[derive(Debug, Clone, Default)]
pub struct CompileRequest {
    /// Absolute source files, in listing order
    pub files: Vec<PathBuf>,
    /// Absolute source search roots
    pub search_roots: Vec<PathBuf>,
    /// Absolute archive paths for the class path
    pub archives: Vec<PathBuf>,
    /// Folder receiving compiled classes
    pub class_output: PathBuf,
    /// Extra options passed through unchanged
    pub options: Vec<String>,
}

/// Error counts keyed by error code, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorStatistics {
    counts: IndexMap<ErrorCode, usize>,
}

impl ErrorStatistics {
    pub fn add(&mut self, code: &ErrorCode) {
        *self.counts.entry(code.clone()).or_insert(0) += 1;
    }

    pub fn get(&self, code: &ErrorCode) -> usize {
        self.counts.get(code).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Counts sorted by descending count, ties by code text.
    pub fn sorted(&self) -> Vec<(&ErrorCode, usize)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(code, n)| (code, *n)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        entries
    }
}

/// Outcome of one compilation
#[derive(Debug, Clone, Default)]
pub struct CompilationResult {
    pub success: bool,
    /// Error-severity diagnostics in compiler order
    pub errors: Vec<Diagnostic>,
    /// Errors grouped by source, sources in first-reported order
    pub errors_by_source: IndexMap<Option<PathBuf>, Vec<Diagnostic>>,
    pub statistics: ErrorStatistics,
    pub statistics_by_source: IndexMap<Option<PathBuf>, ErrorStatistics>,
}

impl CompilationResult {
    /// Build the grouped views from the raw diagnostic list.
    pub fn from_diagnostics(success: bool, diagnostics: Vec<Diagnostic>) -> Self {
        let mut result = Self {
            success,
            ..Self::default()
        };
        for diagnostic in diagnostics.into_iter().filter(Diagnostic::is_error) {
            result.statistics.add(&diagnostic.code);
            result
                .statistics_by_source
                .entry(diagnostic.source.clone())
                .or_default()
                .add(&diagnostic.code);
            result
                .errors_by_source
                .entry(diagnostic.source.clone())
                .or_default()
                .push(diagnostic.clone());
            result.errors.push(diagnostic);
        }
        result
    }
}

/// Compiles a file set and reports diagnostics.
pub trait CompilationDriver {
    fn compile(&self, request: &CompileRequest) -> Result<CompilationResult>;
}
