//! Candidate resolution driven by decoded diagnostics.
//!
//! Each failing file is decoded and classified into missing symbols and
//! missing imports. Needs are pooled per package folder (or per file without a
//! package) and searched with escalating cost:
//!
//! 1. cheap lookups next to the scope and under the listed search roots
//! 2. one walk over the whole original tree, for imports only
//! 3. archive inspection, for imports the tree could not supply

pub mod candidates;
pub mod classify;
pub mod scope;
pub mod search;

pub use candidates::{Candidate, CandidateMap};
pub use classify::FileNeeds;
pub use scope::{Scope, ScopeKey, ScopePhase};
pub use search::ArchivePool;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::archive::ArchiveInspector;
use crate::compile::CompilationResult;
use crate::diagnostics::decoder::dump;
use crate::diagnostics::{Diagnostic, DiagnosticDecoder};
use crate::error::{MinimizeError, Result};
use crate::name::QualifiedName;
use crate::tree::{path_for_listing, SourceFileId, SourceFileTable};

/// Inputs of the search that do not come from diagnostics
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    /// Listed search roots, relative to the original folder
    pub search_roots: Vec<PathBuf>,
    /// Absolute original folders that supplied a declared archive
    pub archive_folders: Vec<PathBuf>,
    /// File names of the declared archives
    pub selected_archives: HashSet<String>,
    /// Subtree of the original folder the tree walk must not enter
    pub skip: Option<PathBuf>,
}

/// Needs and leftovers of one failing file
#[derive(Debug, Clone, Serialize)]
pub struct FileResolution {
    pub file: String,
    pub package: Option<QualifiedName>,
    pub missing_symbols: Vec<QualifiedName>,
    pub missing_imports: Vec<QualifiedName>,
    pub still_missing: Vec<QualifiedName>,
}

/// Outcome of one resolution pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
    pub files: Vec<FileResolution>,
    /// import -> files that need it
    pub imports: IndexMap<QualifiedName, Vec<String>>,
    pub candidates: CandidateMap,
    /// Archives that supplied a name, most recent first
    pub proven_archives: Vec<String>,
}

impl Resolution {
    pub fn still_missing(&self) -> impl Iterator<Item = &FileResolution> {
        self.files.iter().filter(|f| !f.still_missing.is_empty())
    }
}

/// First `limit` entries of the per-source error groups, in compiler order.
pub fn failing_sources(
    result: &CompilationResult,
    limit: usize,
) -> Vec<(Option<&Path>, &[Diagnostic])> {
    result
        .errors_by_source
        .iter()
        .take(limit)
        .map(|(source, errors)| (source.as_deref(), errors.as_slice()))
        .collect()
}

pub struct CandidateResolver<'a> {
    table: &'a mut SourceFileTable,
    decoder: &'a DiagnosticDecoder,
    inspector: &'a dyn ArchiveInspector,
    context: SearchContext,
}

impl<'a> CandidateResolver<'a> {
    pub fn new(
        table: &'a mut SourceFileTable,
        decoder: &'a DiagnosticDecoder,
        inspector: &'a dyn ArchiveInspector,
        context: SearchContext,
    ) -> Self {
        Self {
            table,
            decoder,
            inspector,
            context,
        }
    }

    /// Decode, classify and search for the given failing sources.
    ///
    /// Fails without searching anything if any diagnostic does not decode to
    /// exactly one known shape.
    pub fn resolve(&mut self, sources: &[(Option<&Path>, &[Diagnostic])]) -> Result<Resolution> {
        let needs = self.collect_needs(sources)?;

        let mut scopes: IndexMap<ScopeKey, Scope> = IndexMap::new();
        for (id, file_needs) in &needs {
            let file = self.table.get(*id);
            let scope = scopes
                .entry(ScopeKey::for_file(file))
                .and_modify(|scope| scope.files.push(*id))
                .or_insert_with(|| Scope::for_file(*id, file));
            scope.symbols.extend(file_needs.missing_symbols.iter().cloned());
            scope.imports.extend(file_needs.missing_imports.iter().cloned());
        }

        let mut candidates = CandidateMap::default();
        self.search_cheap(&mut scopes, &mut candidates)?;
        self.search_tree(&mut scopes, &mut candidates)?;
        let pool = self.search_archives(&mut scopes, &mut candidates);

        let mut resolution = Resolution {
            candidates,
            proven_archives: pool.proven().iter().map(|a| pool.for_listing(a)).collect(),
            ..Resolution::default()
        };
        for (id, file_needs) in &needs {
            let file = self.table.get(*id);
            let scope = &scopes[&ScopeKey::for_file(file)];
            let still_missing = file_needs
                .missing_symbols
                .iter()
                .chain(file_needs.missing_imports.iter())
                .filter(|name| scope.is_missing(name))
                .cloned()
                .collect();
            for import in &file_needs.missing_imports {
                resolution
                    .imports
                    .entry(import.clone())
                    .or_default()
                    .push(file.for_listing());
            }
            resolution.files.push(FileResolution {
                file: file.for_listing(),
                package: file.package().cloned(),
                missing_symbols: file_needs.missing_symbols.iter().cloned().collect(),
                missing_imports: file_needs.missing_imports.iter().cloned().collect(),
                still_missing,
            });
        }
        Ok(resolution)
    }

    fn collect_needs(
        &mut self,
        sources: &[(Option<&Path>, &[Diagnostic])],
    ) -> Result<IndexMap<SourceFileId, FileNeeds>> {
        let mut needs: IndexMap<SourceFileId, FileNeeds> = IndexMap::new();
        for (source, errors) in sources {
            let Some(source) = source else {
                tracing::warn!("skipping {} diagnostics without a source file", errors.len());
                continue;
            };
            let id = self.table.lookup_reported(source)?;
            let file_needs = needs.entry(id).or_default();
            for error in errors.iter().filter(|d| d.is_error()) {
                let decodings = self.decoder.decode(error);
                if decodings.len() != 1 {
                    return Err(MinimizeError::AmbiguousDecoding {
                        count: decodings.len(),
                        dump: dump(error, &decodings),
                    });
                }
                file_needs.classify(&decodings[0])?;
            }
        }
        needs.retain(|_, file_needs| !file_needs.is_empty());
        Ok(needs)
    }

    fn search_cheap(
        &mut self,
        scopes: &mut IndexMap<ScopeKey, Scope>,
        candidates: &mut CandidateMap,
    ) -> Result<()> {
        let original = self.table.roots().original.clone();
        for scope in scopes.values_mut() {
            let symbols: Vec<QualifiedName> = scope
                .symbols
                .iter()
                .filter(|s| s.is_simple())
                .cloned()
                .collect();
            for symbol in symbols {
                let location = search::symbol_location(scope, &symbol);
                if original.join(&location).is_file() {
                    self.table.lookup(&location)?;
                    candidates.insert(
                        symbol.clone(),
                        Candidate::SourceFile(path_for_listing(&location)),
                    );
                    scope.symbols.shift_remove(&symbol);
                }
            }

            let imports: Vec<QualifiedName> = scope.imports.iter().cloned().collect();
            for import in imports {
                let found = search::import_locations(scope, &import, &self.context.search_roots)
                    .into_iter()
                    .find(|location| original.join(location).is_file());
                if let Some(location) = found {
                    self.table.lookup(&location)?;
                    candidates.insert(import.clone(), Candidate::SourceFile(path_for_listing(&location)));
                    scope.imports.shift_remove(&import);
                }
            }
            scope.settle(ScopePhase::SearchingTree);
        }
        Ok(())
    }

    fn search_tree(
        &mut self,
        scopes: &mut IndexMap<ScopeKey, Scope>,
        candidates: &mut CandidateMap,
    ) -> Result<()> {
        let wanted: IndexSet<QualifiedName> = scopes
            .values()
            .filter(|s| s.phase() == ScopePhase::SearchingTree)
            .flat_map(|s| s.imports.iter().cloned())
            .collect();
        let found = search::walk_for_imports(self.table, &wanted, self.context.skip.as_deref())?;

        for scope in scopes.values_mut() {
            if scope.phase() != ScopePhase::SearchingTree {
                continue;
            }
            for (import, location) in &found {
                if scope.imports.shift_remove(import) {
                    candidates.insert(import.clone(), Candidate::SourceFile(path_for_listing(location)));
                }
            }
            scope.settle(ScopePhase::SearchingArchives);
        }
        Ok(())
    }

    fn search_archives(
        &mut self,
        scopes: &mut IndexMap<ScopeKey, Scope>,
        candidates: &mut CandidateMap,
    ) -> ArchivePool {
        let mut pool = ArchivePool::new(
            &self.table.roots().original,
            &self.context.archive_folders,
            &self.context.selected_archives,
        );
        for scope in scopes.values_mut() {
            if scope.phase() != ScopePhase::SearchingArchives {
                continue;
            }
            let imports: Vec<QualifiedName> = scope.imports.iter().cloned().collect();
            for import in imports {
                if let Some(archive) = pool.locate(&import, self.inspector) {
                    candidates.insert(import.clone(), Candidate::Archive(pool.for_listing(&archive)));
                    scope.imports.shift_remove(&import);
                }
            }
            scope.advance(ScopePhase::Exhausted);
            if !scope.is_resolved() {
                tracing::debug!(
                    "{:?}: {} symbols and {} imports left",
                    scope.key,
                    scope.symbols.len(),
                    scope.imports.len()
                );
            }
        }
        pool
    }
}
