//! Search strategies, cheapest first.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;

use super::scope::Scope;
use crate::archive::ArchiveInspector;
use crate::error::Result;
use crate::name::QualifiedName;
use crate::tree::{is_archive, is_source_file, path_for_listing, SourceFileTable};

/// Where a missing simple symbol would live in its scope.
pub fn symbol_location(scope: &Scope, symbol: &QualifiedName) -> PathBuf {
    match (&scope.package, &scope.search_root) {
        (Some(package), Some(root)) => root.join(package.qualify(symbol).as_source_file_path()),
        _ => scope.folder.join(symbol.source_file_name()),
    }
}

/// Relative paths an import may live at: the scope's own search root first,
/// then every listed search root.
pub fn import_locations(
    scope: &Scope,
    import: &QualifiedName,
    search_roots: &[PathBuf],
) -> Vec<PathBuf> {
    let relative = import.as_source_file_path();
    let mut locations = Vec::with_capacity(search_roots.len() + 1);
    if let Some(root) = &scope.search_root {
        locations.push(root.join(&relative));
    }
    for root in search_roots {
        let location = root.join(&relative);
        if !locations.contains(&location) {
            locations.push(location);
        }
    }
    locations
}

/// Walk the whole original tree once looking for the files declaring `wanted`.
///
/// Entries are visited sorted by name; the first file whose declared package
/// plus simple name equals a wanted name wins. `skip` prunes one subtree,
/// typically a destination nested inside the original tree.
pub fn walk_for_imports(
    table: &mut SourceFileTable,
    wanted: &IndexSet<QualifiedName>,
    skip: Option<&Path>,
) -> Result<IndexMap<QualifiedName, PathBuf>> {
    let mut found = IndexMap::new();
    if wanted.is_empty() {
        return Ok(found);
    }
    let file_names: HashSet<String> = wanted.iter().map(QualifiedName::source_file_name).collect();
    let root = table.roots().original.clone();

    let mut builder = WalkBuilder::new(&root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));
    if let Some(skip) = skip {
        let skip = skip.to_path_buf();
        builder.filter_entry(move |entry| entry.path() != skip);
    }

    tracing::info!("walking {} for {} imports", root.display(), wanted.len());
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("walk error: {}", e);
                continue;
            }
        };
        if !entry.file_type().map_or(false, |t| t.is_file()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !file_names.contains(name.as_ref()) || !is_source_file(entry.path()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&root) else {
            continue;
        };
        let id = table.lookup(relative)?;
        if let Some(qualified) = table.get(id).qualified_name() {
            if wanted.contains(qualified) && !found.contains_key(qualified) {
                tracing::debug!("found {} at {}", qualified, relative.display());
                found.insert(qualified.clone(), relative.to_path_buf());
            }
        }
        if found.len() == wanted.len() {
            break;
        }
    }
    Ok(found)
}

/// Archives that may define missing imports.
///
/// The pool holds `.jar` files sitting next to declared archives that were not
/// declared themselves. Archives that answered once are kept in a
/// most-recently-successful-first list and asked before the pool.
#[derive(Debug, Clone)]
pub struct ArchivePool {
    original_root: PathBuf,
    pool: Vec<PathBuf>,
    proven: Vec<PathBuf>,
    /// Names no archive defines
    absent: HashSet<QualifiedName>,
}

impl ArchivePool {
    /// `folders` are absolute; archives named in `exclude` are left out.
    pub fn new(original_root: &Path, folders: &[PathBuf], exclude: &HashSet<String>) -> Self {
        let mut pool = Vec::new();
        for folder in folders {
            let entries = match fs::read_dir(folder) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("cannot list {}: {}", folder.display(), e);
                    continue;
                }
            };
            let mut archives: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && is_archive(path))
                .filter(|path| {
                    path.file_name()
                        .map(|n| !exclude.contains(n.to_string_lossy().as_ref()))
                        .unwrap_or(false)
                })
                .collect();
            archives.sort();
            for archive in archives {
                if !pool.contains(&archive) {
                    pool.push(archive);
                }
            }
        }
        tracing::debug!("archive pool has {} entries", pool.len());
        Self {
            original_root: original_root.to_path_buf(),
            pool,
            proven: Vec::new(),
            absent: HashSet::new(),
        }
    }

    pub fn pool(&self) -> &[PathBuf] {
        &self.pool
    }

    pub fn proven(&self) -> &[PathBuf] {
        &self.proven
    }

    /// Find an archive defining `name`, updating the proven list.
    ///
    /// A name no archive defined is not asked about again.
    pub fn locate(
        &mut self,
        name: &QualifiedName,
        inspector: &dyn ArchiveInspector,
    ) -> Option<PathBuf> {
        if self.absent.contains(name) {
            return None;
        }
        if let Some(index) = self
            .proven
            .iter()
            .position(|archive| inspector.defines(archive, name))
        {
            let archive = self.proven.remove(index);
            self.proven.insert(0, archive.clone());
            return Some(archive);
        }

        let Some(winner) = self
            .pool
            .par_iter()
            .find_first(|archive| inspector.defines(archive, name))
            .cloned()
        else {
            self.absent.insert(name.clone());
            return None;
        };
        self.pool.retain(|archive| archive != &winner);
        self.proven.insert(0, winner.clone());
        Some(winner)
    }

    /// Listing form of an archive path, relative to the original root when possible.
    pub fn for_listing(&self, archive: &Path) -> String {
        archive
            .strip_prefix(&self.original_root)
            .map(path_for_listing)
            .unwrap_or_else(|_| archive.display().to_string())
    }
}
