//! Paths known in both the original and the destination tree.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The two roots every copied object is known under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRoots {
    /// Read-only source of truth
    pub original: PathBuf,
    /// Minimized working tree
    pub destination: PathBuf,
}

impl TreeRoots {
    pub fn new(original: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            original: original.into(),
            destination: destination.into(),
        })
    }
}

/// One object identified by a relative path in each tree.
///
/// Sources keep the same relative path in both trees; archives are flattened
/// to their file name in the destination.
#[derive(Debug, Clone)]
pub struct CopiedPath {
    roots: Arc<TreeRoots>,
    original_relative: PathBuf,
    destination_relative: PathBuf,
}

impl CopiedPath {
    pub fn new(roots: Arc<TreeRoots>, relative: impl Into<PathBuf>) -> Self {
        let relative = relative.into();
        Self {
            roots,
            destination_relative: relative.clone(),
            original_relative: relative,
        }
    }

    pub fn with_destination(
        roots: Arc<TreeRoots>,
        original_relative: impl Into<PathBuf>,
        destination_relative: impl Into<PathBuf>,
    ) -> Self {
        Self {
            roots,
            original_relative: original_relative.into(),
            destination_relative: destination_relative.into(),
        }
    }

    pub fn roots(&self) -> &Arc<TreeRoots> {
        &self.roots
    }

    pub fn original_relative(&self) -> &Path {
        &self.original_relative
    }

    pub fn destination_relative(&self) -> &Path {
        &self.destination_relative
    }

    pub fn original_resolved(&self) -> PathBuf {
        self.roots.original.join(&self.original_relative)
    }

    pub fn destination_resolved(&self) -> PathBuf {
        self.roots.destination.join(&self.destination_relative)
    }

    pub fn original_exists(&self) -> bool {
        self.original_resolved().exists()
    }

    pub fn destination_exists(&self) -> bool {
        self.destination_resolved().exists()
    }

    /// Relative original path with `/` separators, as written in listings.
    pub fn for_listing(&self) -> String {
        path_for_listing(&self.original_relative)
    }
}

/// A copied path that must be a regular file.
#[derive(Debug, Clone)]
pub struct CopiedFile {
    path: CopiedPath,
}

impl CopiedFile {
    pub fn new(path: CopiedPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &CopiedPath {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .original_relative()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn original_exists(&self) -> bool {
        self.path.original_resolved().is_file()
    }

    pub fn destination_exists(&self) -> bool {
        self.path.destination_resolved().is_file()
    }
}

/// A copied path that must be a directory.
#[derive(Debug, Clone)]
pub struct CopiedFolder {
    path: CopiedPath,
}

impl CopiedFolder {
    pub fn new(path: CopiedPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &CopiedPath {
        &self.path
    }

    pub fn relative(&self) -> &Path {
        self.path.original_relative()
    }

    pub fn original_exists(&self) -> bool {
        self.path.original_resolved().is_dir()
    }

    pub fn destination_exists(&self) -> bool {
        self.path.destination_resolved().is_dir()
    }
}

/// Render a relative path with `/` separators regardless of platform.
pub fn path_for_listing(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
