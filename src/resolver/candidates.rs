use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::name::QualifiedName;

/// A file whose addition would resolve a missing name.
///
/// Paths are relative to the original folder with `/` separators, ready to be
/// pasted into a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "kebab-case")]
pub enum Candidate {
    SourceFile(String),
    Archive(String),
}

impl Candidate {
    pub fn path(&self) -> &str {
        match self {
            Self::SourceFile(path) | Self::Archive(path) => path,
        }
    }
}

/// name -> candidates, both in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CandidateMap {
    entries: IndexMap<QualifiedName, IndexSet<Candidate>>,
}

impl CandidateMap {
    /// Returns false when the pair was already recorded.
    pub fn insert(&mut self, name: QualifiedName, candidate: Candidate) -> bool {
        tracing::debug!("candidate for {}: {:?}", name, candidate);
        self.entries.entry(name).or_default().insert(candidate)
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&IndexSet<Candidate>> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedName, &IndexSet<Candidate>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct source file paths, sorted.
    pub fn source_files(&self) -> Vec<&str> {
        self.distinct(|c| matches!(c, Candidate::SourceFile(_)))
    }

    /// Distinct archive paths, sorted.
    pub fn archives(&self) -> Vec<&str> {
        self.distinct(|c| matches!(c, Candidate::Archive(_)))
    }

    fn distinct(&self, keep: impl Fn(&Candidate) -> bool) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .entries
            .values()
            .flatten()
            .filter(|c| keep(c))
            .map(Candidate::path)
            .collect();
        paths.sort_unstable();
        paths.dedup();
        paths
    }
}
