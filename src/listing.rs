//! Listing files kept in the destination folder.
//!
//! One entry per line; blank lines and lines starting with `#` are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MinimizeError, Result};

pub const FILES_LISTING: &str = "files.lst";
pub const SOURCEPATHS_LISTING: &str = "sourcepaths.lst";
pub const DEPENDENCIES_LISTING: &str = "dependencies.lst";

/// The three listings driving one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listings {
    /// Seed source files, relative to the original folder
    pub files: Vec<PathBuf>,
    /// Search roots, relative to the original folder
    pub sourcepaths: Vec<PathBuf>,
    /// Dependency strings; `.jar` entries are archives relative to the original folder
    pub dependencies: Vec<String>,
}

impl Listings {
    pub fn load(destination: &Path) -> Result<Self> {
        Ok(Self {
            files: read_listing(&destination.join(FILES_LISTING), "files", true)?
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            sourcepaths: read_listing(&destination.join(SOURCEPATHS_LISTING), "sourcepaths", false)?
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            dependencies: read_listing(
                &destination.join(DEPENDENCIES_LISTING),
                "dependencies",
                false,
            )?,
        })
    }
}

/// Read one listing; an absent optional listing is empty.
pub fn read_listing(path: &Path, description: &str, required: bool) -> Result<Vec<String>> {
    if !path.exists() {
        if required {
            return Err(MinimizeError::MissingListing {
                description: description.to_string(),
                path: path.to_path_buf(),
            });
        }
        tracing::debug!("no {} listing at {}", description, path.display());
        return Ok(Vec::new());
    }
    if !path.is_file() {
        return Err(MinimizeError::WrongPathType {
            kind: "folder".to_string(),
            description: format!("{} listing", description),
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| MinimizeError::io(path, e))?;
    Ok(parse_listing(&content))
}

pub fn parse_listing(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
