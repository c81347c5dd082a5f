//! Archives copied flat into the destination archive folder.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::archive::ArchiveInspector;
use crate::error::{MinimizeError, Result};
use crate::name::QualifiedName;
use crate::tree::path::{CopiedFile, CopiedPath, TreeRoots};

/// Extension of dependency archives, including the dot
pub const ARCHIVE_EXTENSION: &str = ".jar";

/// A `.jar` from the original tree, copied flat into the destination archive folder.
#[derive(Debug, Clone)]
pub struct CopiedArchive {
    file: CopiedFile,
}

impl CopiedArchive {
    /// `roots.destination` is the destination archive folder.
    pub fn new(roots: Arc<TreeRoots>, original_relative: &Path) -> Result<Self> {
        if !is_archive(original_relative) {
            return Err(MinimizeError::WrongExtension {
                extension: ARCHIVE_EXTENSION.to_string(),
                path: original_relative.to_path_buf(),
            });
        }
        let file_name: PathBuf = original_relative
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_default();
        Ok(Self {
            file: CopiedFile::new(CopiedPath::with_destination(
                roots,
                original_relative,
                file_name,
            )),
        })
    }

    pub fn file(&self) -> &CopiedFile {
        &self.file
    }

    pub fn file_name(&self) -> String {
        self.file.file_name()
    }

    pub fn original_resolved(&self) -> PathBuf {
        self.file.path().original_resolved()
    }

    pub fn destination_resolved(&self) -> PathBuf {
        self.file.path().destination_resolved()
    }

    pub fn for_listing(&self) -> String {
        self.file.path().for_listing()
    }

    pub fn defines(&self, inspector: &dyn ArchiveInspector, name: &QualifiedName) -> bool {
        inspector.defines(&self.original_resolved(), name)
    }
}

pub fn is_archive(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(ARCHIVE_EXTENSION))
        .unwrap_or(false)
}
