//! Candidate resolution over real trees
//!
//! Diagnostics are written in javac's text format, parsed, grouped by source
//! and handed to the resolver, the same way a run does it.

pub mod scenario_tests;
pub mod search_order_tests;

use std::path::Path;

use minimize_codebase::archive::ArchiveInspector;
use minimize_codebase::compile::{parse_javac_output, CompilationResult};
use minimize_codebase::diagnostics::DiagnosticDecoder;
use minimize_codebase::name::QualifiedName;
use minimize_codebase::resolver::{failing_sources, CandidateResolver, Resolution, SearchContext};

use crate::common::TestTree;

/// Resolve the failing sources of `output` with the javac patterns.
pub fn resolve(
    tree: &TestTree,
    output: &str,
    inspector: &dyn ArchiveInspector,
    context: SearchContext,
) -> minimize_codebase::Result<Resolution> {
    let decoder = DiagnosticDecoder::javac()?;
    resolve_with(tree, output, &decoder, inspector, context)
}

pub fn resolve_with(
    tree: &TestTree,
    output: &str,
    decoder: &DiagnosticDecoder,
    inspector: &dyn ArchiveInspector,
    context: SearchContext,
) -> minimize_codebase::Result<Resolution> {
    let result = CompilationResult::from_diagnostics(false, parse_javac_output(output));
    let mut table = tree.table();
    let mut resolver = CandidateResolver::new(&mut table, decoder, inspector, context);
    resolver.resolve(&failing_sources(&result, 10))
}

/// Inspector for trees without archives
pub fn no_archives(_: &Path, _: &QualifiedName) -> bool {
    false
}

pub fn qn(name: &str) -> QualifiedName {
    QualifiedName::parse(name)
}
