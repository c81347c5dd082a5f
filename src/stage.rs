//! Staging: copying seeds and archives, layout checks, and the maven harvest.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::error::{MinimizeError, Result};
use crate::name::QualifiedName;
use crate::process::run_tool;
use crate::tree::{is_archive, path_for_listing, CopiedArchive, CopiedSourceFile, TreeRoots};

/// One row of the copy table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyEntry {
    pub path: String,
    /// Target was already present
    pub existed: bool,
    pub copied: bool,
    /// Intermediate folders were created
    pub parents: bool,
}

impl CopyEntry {
    /// `ecp` flag column, `.` for unset flags.
    pub fn flags(&self) -> String {
        [
            if self.existed { 'e' } else { '.' },
            if self.copied { 'c' } else { '.' },
            if self.parents { 'p' } else { '.' },
        ]
        .iter()
        .collect()
    }
}

/// Copy `files` from `source_folder` into `target_folder` without overwriting.
///
/// With `preserve_folders` the relative path is kept, otherwise only the file
/// name is used.
pub fn copy_files(
    source_folder: &Path,
    target_folder: &Path,
    files: &[PathBuf],
    preserve_folders: bool,
    description: &str,
) -> Result<Vec<CopyEntry>> {
    let mut entries = Vec::with_capacity(files.len());
    for file in files {
        let source = source_folder.join(file);
        if !source.exists() {
            return Err(MinimizeError::MissingListing {
                description: description.to_string(),
                path: source,
            });
        }
        if !source.is_file() {
            return Err(MinimizeError::WrongPathType {
                kind: "folder".to_string(),
                description: description.to_string(),
                path: source,
            });
        }

        let target_relative = if preserve_folders {
            file.clone()
        } else {
            file.file_name().map(PathBuf::from).unwrap_or_default()
        };
        let target = target_folder.join(&target_relative);
        let existed = target.exists();
        if existed && !target.is_file() {
            return Err(MinimizeError::WrongPathType {
                kind: "folder".to_string(),
                description: format!("target {}", description),
                path: target,
            });
        }

        let copied = !existed;
        let mut parents = false;
        if preserve_folders && copied {
            if let Some(parent) = target.parent().filter(|p| !p.is_dir()) {
                fs::create_dir_all(parent).map_err(|e| MinimizeError::io(parent, e))?;
                parents = true;
            }
        }
        if copied {
            fs::copy(&source, &target).map_err(|e| MinimizeError::io(&target, e))?;
        }
        tracing::debug!("copy {} existed={} copied={}", file.display(), existed, copied);

        entries.push(CopyEntry {
            path: path_for_listing(file),
            existed,
            copied,
            parents,
        });
    }
    Ok(entries)
}

/// Declared dependencies split into what gets copied and what is only reported
#[derive(Debug, Clone, Default)]
pub struct DependencyPlan {
    pub archives: Vec<CopiedArchive>,
    /// Archives skipped because their file name is already taken
    pub collisions: Vec<String>,
    /// Dependency strings that are not archives
    pub non_archives: Vec<String>,
}

impl DependencyPlan {
    /// `roots.destination` is the destination archive folder.
    pub fn new(roots: &std::sync::Arc<TreeRoots>, dependencies: &[String]) -> Self {
        let mut plan = Self::default();
        let mut names = HashSet::new();
        for dependency in dependencies {
            let relative = Path::new(dependency);
            if !is_archive(relative) {
                plan.non_archives.push(dependency.clone());
                continue;
            }
            match CopiedArchive::new(roots.clone(), relative) {
                Ok(archive) => {
                    if names.insert(archive.file_name()) {
                        plan.archives.push(archive);
                    } else {
                        tracing::warn!("archive name collision: {}", dependency);
                        plan.collisions.push(dependency.clone());
                    }
                }
                Err(_) => plan.non_archives.push(dependency.clone()),
            }
        }
        plan
    }

    pub fn original_relatives(&self) -> Vec<PathBuf> {
        self.archives
            .iter()
            .map(|a| a.file().path().original_relative().to_path_buf())
            .collect()
    }

    /// Original folders that supplied at least one declared archive, deduplicated.
    pub fn archive_folders(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        self.archives
            .iter()
            .filter_map(|a| a.original_resolved().parent().map(Path::to_path_buf))
            .filter(|folder| seen.insert(folder.clone()))
            .collect()
    }

    pub fn selected_names(&self) -> HashSet<String> {
        self.archives.iter().map(CopiedArchive::file_name).collect()
    }
}

/// Layout problem found for one seed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LayoutWarning {
    NoSearchRoot {
        file: String,
    },
    MultipleSearchRoots {
        file: String,
        search_roots: Vec<String>,
    },
    PackageMismatch {
        file: String,
        declared: Option<String>,
        implied: Option<String>,
    },
}

/// Match a seed file against the listed search roots.
pub fn check_seed_layout(
    file: &CopiedSourceFile,
    search_roots: &[PathBuf],
) -> Result<Option<LayoutWarning>> {
    let relative = file.relative();
    let matching: Vec<&PathBuf> = search_roots
        .iter()
        .filter(|root| relative.starts_with(root))
        .collect();

    match matching.as_slice() {
        [] => Ok(Some(LayoutWarning::NoSearchRoot {
            file: file.for_listing(),
        })),
        [root] => {
            let folder = file.folder();
            let inside = folder.strip_prefix(root).unwrap_or(&folder);
            let implied = QualifiedName::from_folder_path(inside)?;
            if implied.as_ref() == file.package() {
                Ok(None)
            } else {
                Ok(Some(LayoutWarning::PackageMismatch {
                    file: file.for_listing(),
                    declared: file.package().map(|p| p.to_string()),
                    implied: implied.map(|p| p.to_string()),
                }))
            }
        }
        several => Ok(Some(LayoutWarning::MultipleSearchRoots {
            file: file.for_listing(),
            search_roots: several.iter().map(|r| path_for_listing(r)).collect(),
        })),
    }
}

/// Run `mvn -q dependency:copy-dependencies` when `original` has a `pom.xml`.
///
/// Returns the harvested archives (relative to `original`, `/`-separated) that
/// are not listed in `listed` yet. Without a `pom.xml` nothing runs.
pub fn harvest_maven_dependencies(
    mvn: &str,
    original: &Path,
    listed: &[String],
    timeout: Duration,
) -> Result<Vec<String>> {
    if !original.join("pom.xml").is_file() {
        tracing::info!("no pom.xml in {}, skipping harvest", original.display());
        return Ok(Vec::new());
    }
    let args = vec!["-q".to_string(), "dependency:copy-dependencies".to_string()];
    let output = run_tool(mvn, &args, Some(original), timeout)?;
    if !output.success {
        return Err(MinimizeError::ToolError {
            tool: mvn.to_string(),
            message: output.stderr.trim().to_string(),
        });
    }
    harvested_archives(original, listed)
}

/// Archives in `target/dependency` that are not listed yet, sorted.
pub fn harvested_archives(original: &Path, listed: &[String]) -> Result<Vec<String>> {
    let folder = original.join("target").join("dependency");
    if !folder.is_dir() {
        return Ok(Vec::new());
    }
    let listed: HashSet<&str> = listed.iter().map(String::as_str).collect();
    let mut found = Vec::new();
    for entry in fs::read_dir(&folder).map_err(|e| MinimizeError::io(&folder, e))? {
        let path = entry.map_err(|e| MinimizeError::io(&folder, e))?.path();
        if !path.is_file() || !is_archive(&path) {
            continue;
        }
        if let Ok(relative) = path.strip_prefix(original) {
            let line = path_for_listing(relative);
            if !listed.contains(line.as_str()) {
                found.push(line);
            }
        }
    }
    found.sort();
    Ok(found)
}
