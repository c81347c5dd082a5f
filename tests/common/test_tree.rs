//! Temporary original/destination folder pair

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use minimize_codebase::config::MinimizeConfig;
use minimize_codebase::listing::{DEPENDENCIES_LISTING, FILES_LISTING, SOURCEPATHS_LISTING};
use minimize_codebase::minimizer::{MinimizerOptions, SOURCES_FOLDER};
use minimize_codebase::tree::{SourceFileTable, TreeRoots, DEFAULT_PACKAGE_SCAN_LINES};

/// Builder for an original code base and the destination it is minimized into.
///
/// Both paths are canonical so they compare equal to what a run reports.
pub struct TestTree {
    _original_dir: TempDir,
    _destination_dir: TempDir,
    original: PathBuf,
    destination: PathBuf,
}

impl TestTree {
    pub fn new() -> Self {
        let original_dir = TempDir::new().expect("Failed to create temp dir");
        let destination_dir = TempDir::new().expect("Failed to create temp dir");
        let original = original_dir.path().canonicalize().expect("canonical original");
        let destination = destination_dir
            .path()
            .canonicalize()
            .expect("canonical destination");
        Self {
            _original_dir: original_dir,
            _destination_dir: destination_dir,
            original,
            destination,
        }
    }

    pub fn original(&self) -> &Path {
        &self.original
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Destination sources folder
    pub fn sources(&self) -> PathBuf {
        self.destination.join(SOURCES_FOLDER)
    }

    /// Where the compiler sees a copied seed
    pub fn copied(&self, relative: &str) -> PathBuf {
        self.sources().join(relative)
    }

    /// Add a file to the original tree
    pub fn add_file(&self, relative: &str, content: &str) -> &Self {
        write(&self.original.join(relative), content);
        self
    }

    /// Add a class declared in `package` (or in no package)
    pub fn add_class(&self, relative: &str, package: Option<&str>) -> &Self {
        let name = Path::new(relative)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.add_file(relative, &java_class(package, &name))
    }

    pub fn list_files(&self, files: &[&str]) -> &Self {
        write(&self.destination.join(FILES_LISTING), &listing(files));
        self
    }

    pub fn list_sourcepaths(&self, roots: &[&str]) -> &Self {
        write(&self.destination.join(SOURCEPATHS_LISTING), &listing(roots));
        self
    }

    pub fn list_dependencies(&self, dependencies: &[&str]) -> &Self {
        write(&self.destination.join(DEPENDENCIES_LISTING), &listing(dependencies));
        self
    }

    /// Table over the original tree and the destination sources folder
    pub fn table(&self) -> SourceFileTable {
        SourceFileTable::new(
            TreeRoots::new(&self.original, self.sources()),
            DEFAULT_PACKAGE_SCAN_LINES,
        )
    }

    pub fn options(&self) -> MinimizerOptions {
        MinimizerOptions {
            original: self.original.clone(),
            destination: self.destination.clone(),
            config: MinimizeConfig::default(),
            harvest: false,
            profile_patterns: false,
        }
    }
}

pub fn java_class(package: Option<&str>, name: &str) -> String {
    match package {
        Some(package) => format!("package {};\n\npublic class {} {{\n}}\n", package, name),
        None => format!("public class {} {{\n}}\n", name),
    }
}

fn listing(lines: &[&str]) -> String {
    let mut content = String::from("# generated by the test\n");
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    content
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    fs::write(path, content).expect("Failed to write file");
}
