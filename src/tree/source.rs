//! Java source files and the package layout derived from them.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::patterns::PACKAGE_REGEX;
use crate::error::{MinimizeError, Result};
use crate::name::{QualifiedName, SOURCE_EXTENSION};
use crate::tree::path::{CopiedFile, CopiedFolder, CopiedPath, TreeRoots};

/// Number of leading lines scanned for a package declaration
pub const DEFAULT_PACKAGE_SCAN_LINES: usize = 10;

static PACKAGE_STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\bpackage\s+(?P<package>{})\s*;", PACKAGE_REGEX))
        .expect("package statement regex")
});

/// Stable handle into a [`SourceFileTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceFileId(usize);

/// Folder holding the sources of one package, and the search root above it.
#[derive(Debug, Clone)]
pub struct PackageFolder {
    pub package: QualifiedName,
    pub folder: CopiedFolder,
    /// `None` when the folder path does not end with the package path
    pub search_root: Option<CopiedFolder>,
}

/// A `.java` file copied from the original tree into the destination sources.
#[derive(Debug, Clone)]
pub struct CopiedSourceFile {
    file: CopiedFile,
    simple_name: QualifiedName,
    package: Option<QualifiedName>,
    qualified_name: Option<QualifiedName>,
    package_folder: Option<PackageFolder>,
}

impl CopiedSourceFile {
    fn new(roots: Arc<TreeRoots>, relative: &Path, scan_lines: usize) -> Result<Self> {
        if !is_source_file(relative) {
            return Err(MinimizeError::WrongExtension {
                extension: SOURCE_EXTENSION.to_string(),
                path: relative.to_path_buf(),
            });
        }
        let path = CopiedPath::new(roots.clone(), relative);
        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let simple_name =
            QualifiedName::parse(&file_name[..file_name.len() - SOURCE_EXTENSION.len()]);

        let package = scan_package_declaration(&path.original_resolved(), scan_lines);
        let qualified_name = package.as_ref().map(|p| p.qualify(&simple_name));
        let package_folder = package
            .as_ref()
            .map(|p| derive_package_folder(&roots, relative, p));

        Ok(Self {
            file: CopiedFile::new(path),
            simple_name,
            package,
            qualified_name,
            package_folder,
        })
    }

    pub fn file(&self) -> &CopiedFile {
        &self.file
    }

    pub fn relative(&self) -> &Path {
        self.file.path().original_relative()
    }

    pub fn simple_name(&self) -> &QualifiedName {
        &self.simple_name
    }

    pub fn package(&self) -> Option<&QualifiedName> {
        self.package.as_ref()
    }

    pub fn qualified_name(&self) -> Option<&QualifiedName> {
        self.qualified_name.as_ref()
    }

    pub fn package_folder(&self) -> Option<&PackageFolder> {
        self.package_folder.as_ref()
    }

    /// Folder containing the file, relative to the roots.
    pub fn folder(&self) -> PathBuf {
        self.relative()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    pub fn for_listing(&self) -> String {
        self.file.path().for_listing()
    }
}

fn derive_package_folder(
    roots: &Arc<TreeRoots>,
    relative: &Path,
    package: &QualifiedName,
) -> PackageFolder {
    let folder_relative = relative.parent().map(Path::to_path_buf).unwrap_or_default();
    let package_path = package.as_package_path();
    let search_root = if folder_relative.ends_with(&package_path) {
        let keep = folder_relative.components().count() - package_path.components().count();
        let root: PathBuf = folder_relative.components().take(keep).collect();
        Some(CopiedFolder::new(CopiedPath::new(roots.clone(), root)))
    } else {
        tracing::warn!(
            "{} declares package {} but lives in {}",
            relative.display(),
            package,
            folder_relative.display()
        );
        None
    };
    PackageFolder {
        package: package.clone(),
        folder: CopiedFolder::new(CopiedPath::new(roots.clone(), folder_relative)),
        search_root,
    }
}

/// Read at most `scan_lines` lines and return the first declared package.
///
/// Unreadable files and files without a declaration are package-less.
pub fn scan_package_declaration(path: &Path, scan_lines: usize) -> Option<QualifiedName> {
    let file = File::open(path).ok()?;
    BufReader::new(file)
        .lines()
        .take(scan_lines)
        .map_while(|line| line.ok())
        .find_map(|line| {
            PACKAGE_STATEMENT
                .captures(&line)
                .map(|caps| QualifiedName::parse(&caps["package"]))
        })
}

pub fn is_source_file(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(SOURCE_EXTENSION))
        .unwrap_or(false)
}

/// Memoized arena of source files, keyed by relative path.
///
/// Every file is built once on first lookup; ids stay valid for the lifetime
/// of the table.
#[derive(Debug)]
pub struct SourceFileTable {
    roots: Arc<TreeRoots>,
    scan_lines: usize,
    files: IndexMap<PathBuf, CopiedSourceFile>,
}

impl SourceFileTable {
    /// `roots.destination` is the destination *sources* folder.
    pub fn new(roots: Arc<TreeRoots>, scan_lines: usize) -> Self {
        Self {
            roots,
            scan_lines,
            files: IndexMap::new(),
        }
    }

    pub fn roots(&self) -> &Arc<TreeRoots> {
        &self.roots
    }

    pub fn lookup(&mut self, relative: &Path) -> Result<SourceFileId> {
        if let Some(index) = self.files.get_index_of(relative) {
            return Ok(SourceFileId(index));
        }
        let file = CopiedSourceFile::new(self.roots.clone(), relative, self.scan_lines)?;
        let (index, _) = self.files.insert_full(relative.to_path_buf(), file);
        Ok(SourceFileId(index))
    }

    /// Map a path reported by the compiler back into the table.
    pub fn lookup_reported(&mut self, reported: &Path) -> Result<SourceFileId> {
        let relative = reported
            .strip_prefix(&self.roots.destination)
            .map_err(|_| MinimizeError::OutsideManagedTree {
                source_path: reported.to_path_buf(),
                root: self.roots.destination.clone(),
            })?
            .to_path_buf();
        self.lookup(&relative)
    }

    pub fn get(&self, id: SourceFileId) -> &CopiedSourceFile {
        &self.files[id.0]
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
