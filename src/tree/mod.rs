//! Files and folders known in both the original and the destination tree.
//!
//! Source files keep their relative path when copied; archives are flattened
//! into the destination archive folder. Source files are interned in a
//! [`SourceFileTable`] and referred to by [`SourceFileId`].

pub mod archive;
pub mod path;
pub mod source;

pub use archive::{is_archive, CopiedArchive, ARCHIVE_EXTENSION};
pub use path::{path_for_listing, CopiedFile, CopiedFolder, CopiedPath, TreeRoots};
pub use source::{
    is_source_file, scan_package_declaration, CopiedSourceFile, PackageFolder, SourceFileId,
    SourceFileTable, DEFAULT_PACKAGE_SCAN_LINES,
};
