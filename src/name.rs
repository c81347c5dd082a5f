//! Dot-qualified Java names.
//!
//! A [`QualifiedName`] is either simple (`Bar`) or compound (`a.b.Bar`). Names
//! convert to relative paths the way javac lays out a source path: every
//! segment is a folder, and for source files the last segment becomes
//! `<segment>.java`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::error::{MinimizeError, Result};

/// Separator between name segments
pub const SEPARATOR: char = '.';

/// Extension of Java source files, including the dot
pub const SOURCE_EXTENSION: &str = ".java";

/// A dot-qualified symbol, package, or type name.
///
/// Equality and hashing use the full dotted string only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    name: String,
}

impl QualifiedName {
    /// Build a name from one or more segments.
    ///
    /// The name is compound when `first` already contains a separator or when
    /// `more` is non-empty.
    pub fn new<S: AsRef<str>>(first: &str, more: &[S]) -> Self {
        let mut name = first.to_string();
        for segment in more {
            name.push(SEPARATOR);
            name.push_str(segment.as_ref());
        }
        Self { name }
    }

    /// Build a name from its dotted text form.
    pub fn parse(text: &str) -> Self {
        Self {
            name: text.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// True when the name has exactly one segment.
    pub fn is_simple(&self) -> bool {
        !self.name.contains(SEPARATOR)
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.name.split(SEPARATOR)
    }

    /// Last segment (`Bar` for `a.b.Bar`).
    pub fn simple_segment(&self) -> &str {
        self.name
            .rsplit_once(SEPARATOR)
            .map(|(_, last)| last)
            .unwrap_or(&self.name)
    }

    /// Everything before the last segment, if the name is compound.
    pub fn prefix(&self) -> Option<QualifiedName> {
        self.name
            .rsplit_once(SEPARATOR)
            .map(|(prefix, _)| QualifiedName::parse(prefix))
    }

    /// Append `other` as a suffix: `a.b` qualified by `Bar` is `a.b.Bar`.
    pub fn qualify(&self, other: &QualifiedName) -> QualifiedName {
        QualifiedName::new(&self.name, &[other.as_str()])
    }

    /// Relative path of the source file that declares this name
    /// (`a.b.Bar` -> `a/b/Bar.java`).
    pub fn as_source_file_path(&self) -> PathBuf {
        let mut path = self.as_package_path();
        path.set_file_name(format!("{}{}", self.simple_segment(), SOURCE_EXTENSION));
        path
    }

    /// Relative folder path with one level per segment (`a.b` -> `a/b`).
    pub fn as_package_path(&self) -> PathBuf {
        self.segments().collect()
    }

    /// File name of the source file that declares this name (`Bar.java`).
    pub fn source_file_name(&self) -> String {
        format!("{}{}", self.simple_segment(), SOURCE_EXTENSION)
    }

    /// Rebuild a name from a relative folder path (`a/b` -> `a.b`).
    ///
    /// Returns `Ok(None)` for an empty path. A folder whose name contains the
    /// separator cannot be part of a package layout and is rejected.
    pub fn from_folder_path(path: &Path) -> Result<Option<QualifiedName>> {
        let mut segments = Vec::new();
        for component in path.components() {
            let segment = component.as_os_str().to_string_lossy();
            if segment.contains(SEPARATOR) {
                return Err(MinimizeError::IllegalNameSegment {
                    path: path.to_path_buf(),
                });
            }
            segments.push(segment.into_owned());
        }
        match segments.split_first() {
            Some((first, more)) => Ok(Some(QualifiedName::new(first, more))),
            None => Ok(None),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}
