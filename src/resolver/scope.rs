use std::path::PathBuf;

use indexmap::IndexSet;
use serde::Serialize;

use crate::name::QualifiedName;
use crate::tree::{CopiedSourceFile, SourceFileId};

/// Aggregation unit: a package folder, or a single file when no package is known
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeKey {
    Package(PathBuf),
    File(PathBuf),
}

/// Search escalation; a scope only ever moves down this list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopePhase {
    SearchingCheap,
    SearchingTree,
    SearchingArchives,
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub key: ScopeKey,
    pub package: Option<QualifiedName>,
    /// Folder holding the scope's files, relative to the original root
    pub folder: PathBuf,
    pub search_root: Option<PathBuf>,
    pub files: Vec<SourceFileId>,
    /// Still-missing simple symbols
    pub symbols: IndexSet<QualifiedName>,
    /// Still-missing imports
    pub imports: IndexSet<QualifiedName>,
    phase: ScopePhase,
}

impl ScopeKey {
    pub fn for_file(file: &CopiedSourceFile) -> Self {
        match file.package_folder() {
            Some(pf) => Self::Package(pf.folder.relative().to_path_buf()),
            None => Self::File(file.relative().to_path_buf()),
        }
    }
}

impl Scope {
    pub fn for_file(id: SourceFileId, file: &CopiedSourceFile) -> Self {
        let (package, folder, search_root) = match file.package_folder() {
            Some(pf) => (
                Some(pf.package.clone()),
                pf.folder.relative().to_path_buf(),
                pf.search_root.as_ref().map(|r| r.relative().to_path_buf()),
            ),
            None => (None, file.folder(), None),
        };
        Self {
            key: ScopeKey::for_file(file),
            package,
            folder,
            search_root,
            files: vec![id],
            symbols: IndexSet::new(),
            imports: IndexSet::new(),
            phase: ScopePhase::SearchingCheap,
        }
    }

    pub fn phase(&self) -> ScopePhase {
        self.phase
    }

    /// Move forward to `next`; requests to go back are ignored.
    pub fn advance(&mut self, next: ScopePhase) {
        if next > self.phase {
            tracing::debug!("{:?}: {:?} -> {:?}", self.key, self.phase, next);
            self.phase = next;
        }
    }

    /// Leave the current phase: escalate if imports remain, else finish.
    pub fn settle(&mut self, next: ScopePhase) {
        if self.imports.is_empty() {
            self.advance(ScopePhase::Exhausted);
        } else {
            self.advance(next);
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.symbols.is_empty() && self.imports.is_empty()
    }

    pub fn is_missing(&self, name: &QualifiedName) -> bool {
        self.symbols.contains(name) || self.imports.contains(name)
    }
}
