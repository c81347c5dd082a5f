//! One minimization run: stage, compile, decode, resolve.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::archive::{ArchiveInspector, JavapInspector};
use crate::compile::{CompilationDriver, CompileRequest, ErrorStatistics, JavacDriver};
use crate::config::MinimizeConfig;
use crate::diagnostics::timing::PatternTiming;
use crate::diagnostics::{DiagnosticDecoder, PatternTimings};
use crate::error::{MinimizeError, Result};
use crate::listing::Listings;
use crate::process::locate_tool;
use crate::report::write_error_details;
use crate::resolver::{failing_sources, CandidateResolver, Resolution, SearchContext};
use crate::stage::{
    check_seed_layout, copy_files, harvest_maven_dependencies, CopyEntry, DependencyPlan,
    LayoutWarning,
};
use crate::tree::{is_source_file, path_for_listing, SourceFileTable, TreeRoots};

pub const SOURCES_FOLDER: &str = "sources";
pub const CLASSES_FOLDER: &str = "classes";
pub const ARCHIVES_FOLDER: &str = "jars";
pub const ERRORS_FILE: &str = "errors.txt";

/// Label used for diagnostics that have no source file
pub const GLOBAL_SOURCE: &str = "<global>";

/// Everything a run needs besides the external tools
#[derive(Debug, Clone)]
pub struct MinimizerOptions {
    pub original: PathBuf,
    pub destination: PathBuf,
    pub config: MinimizeConfig,
    /// Run the maven harvest before staging
    pub harvest: bool,
    /// Record per-pattern decoding latency
    pub profile_patterns: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeCount {
    pub code: String,
    pub count: usize,
}

/// Error code counts of one failing file
#[derive(Debug, Clone, Serialize)]
pub struct FileErrorCounts {
    pub file: String,
    pub counts: Vec<CodeCount>,
}

/// What a run did and found
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub original: PathBuf,
    pub destination: PathBuf,
    pub copied_sources: Vec<CopyEntry>,
    pub copied_archives: Vec<CopyEntry>,
    pub archive_collisions: Vec<String>,
    pub non_archive_dependencies: Vec<String>,
    pub layout_warnings: Vec<LayoutWarning>,
    /// Harvested archives not yet listed
    pub harvested: Vec<String>,
    pub compiled: bool,
    pub error_counts: Vec<FileErrorCounts>,
    pub totals: Vec<CodeCount>,
    pub resolution: Option<Resolution>,
    pub pattern_timings: Vec<PatternTiming>,
}

pub struct Minimizer {
    options: MinimizerOptions,
}

impl Minimizer {
    pub fn new(options: MinimizerOptions) -> Self {
        Self { options }
    }

    /// Run with `javac` and `javap` from the configuration.
    pub fn run(&self) -> Result<RunOutcome> {
        let tools = &self.options.config.tools;
        let driver = JavacDriver::new(locate_tool(&tools.javac), tools.compile_timeout());
        let inspector = JavapInspector::new(locate_tool(&tools.javap), tools.inspect_timeout());
        self.run_with(&driver, &inspector)
    }

    pub fn run_with(
        &self,
        driver: &dyn CompilationDriver,
        inspector: &dyn ArchiveInspector,
    ) -> Result<RunOutcome> {
        let (original, destination) = self.check_folders()?;
        let config = &self.options.config;
        let listings = Listings::load(&destination)?;
        tracing::info!(
            "{} files, {} search roots, {} dependencies listed",
            listings.files.len(),
            listings.sourcepaths.len(),
            listings.dependencies.len()
        );

        let harvested = if self.options.harvest {
            harvest_maven_dependencies(
                &locate_tool(&config.tools.mvn),
                &original,
                &listings.dependencies,
                config.tools.harvest_timeout(),
            )?
        } else {
            Vec::new()
        };

        let sources = destination.join(SOURCES_FOLDER);
        let classes = destination.join(CLASSES_FOLDER);
        let jars = destination.join(ARCHIVES_FOLDER);

        fs::create_dir_all(&sources).map_err(|e| MinimizeError::io(&sources, e))?;
        let copied_sources = copy_files(&original, &sources, &listings.files, true, "source")?;

        let plan = DependencyPlan::new(&TreeRoots::new(&original, &jars), &listings.dependencies);
        let copied_archives = if plan.archives.is_empty() {
            Vec::new()
        } else {
            fs::create_dir_all(&jars).map_err(|e| MinimizeError::io(&jars, e))?;
            copy_files(&original, &jars, &plan.original_relatives(), false, "source jar")?
        };

        let mut table = SourceFileTable::new(
            TreeRoots::new(&original, &sources),
            config.resolve.package_scan_lines,
        );
        let mut seeds = Vec::new();
        let mut layout_warnings = Vec::new();
        for file in listings.files.iter().filter(|f| is_source_file(f)) {
            let id = table.lookup(file)?;
            if !listings.sourcepaths.is_empty() {
                if let Some(warning) = check_seed_layout(table.get(id), &listings.sourcepaths)? {
                    tracing::warn!("seed layout: {:?}", warning);
                    layout_warnings.push(warning);
                }
            }
            seeds.push(table.get(id).file().path().destination_resolved());
        }

        let request = CompileRequest {
            files: seeds,
            search_roots: listings.sourcepaths.iter().map(|p| sources.join(p)).collect(),
            archives: plan.archives.iter().map(|a| a.destination_resolved()).collect(),
            class_output: classes.clone(),
            options: config.tools.javac_args.clone(),
        };
        let result = driver.compile(&request)?;

        let mut outcome = RunOutcome {
            original: original.clone(),
            destination: destination.clone(),
            copied_sources,
            copied_archives,
            archive_collisions: plan.collisions.clone(),
            non_archive_dependencies: plan.non_archives.clone(),
            layout_warnings,
            harvested,
            compiled: result.success,
            error_counts: Vec::new(),
            totals: Vec::new(),
            resolution: None,
            pattern_timings: Vec::new(),
        };
        if result.success {
            tracing::info!("compilation succeeded");
            return Ok(outcome);
        }

        let selected = failing_sources(&result, config.resolve.file_limit);
        tracing::info!(
            "compilation failed with {} errors in {} sources, resolving {}",
            result.errors.len(),
            result.errors_by_source.len(),
            selected.len()
        );
        fs::create_dir_all(&classes).map_err(|e| MinimizeError::io(&classes, e))?;
        write_error_details(&classes.join(ERRORS_FILE), &selected)?;

        outcome.error_counts = selected
            .iter()
            .map(|(source, _)| {
                let key = source.map(Path::to_path_buf);
                FileErrorCounts {
                    file: source_label(*source, &sources),
                    counts: result
                        .statistics_by_source
                        .get(&key)
                        .map(code_counts)
                        .unwrap_or_default(),
                }
            })
            .collect();
        outcome.totals = code_counts(&result.statistics);

        let timings = Arc::new(PatternTimings::new());
        let mut decoder = DiagnosticDecoder::javac()?;
        if self.options.profile_patterns {
            decoder = decoder.with_timer(timings.clone());
        }
        let context = SearchContext {
            search_roots: listings.sourcepaths.clone(),
            archive_folders: plan.archive_folders(),
            selected_archives: plan.selected_names(),
            skip: destination
                .starts_with(&original)
                .then(|| destination.clone()),
        };
        let mut resolver = CandidateResolver::new(&mut table, &decoder, inspector, context);
        let resolved = resolver.resolve(&selected);
        outcome.pattern_timings = timings.averages();
        match resolved {
            Ok(resolution) => {
                outcome.resolution = Some(resolution);
                Ok(outcome)
            }
            Err(e) => Err(MinimizeError::Aborted {
                outcome: Box::new(outcome),
                source: Box::new(e),
            }),
        }
    }

    fn check_folders(&self) -> Result<(PathBuf, PathBuf)> {
        let original = canonical_folder(&self.options.original, "original")?;
        let destination = canonical_folder(&self.options.destination, "destination")?;
        if original == destination {
            return Err(MinimizeError::SameFolder { path: original });
        }
        Ok((original, destination))
    }
}

fn canonical_folder(path: &Path, role: &str) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(MinimizeError::NotAFolder {
            role: role.to_string(),
            path: path.to_path_buf(),
        });
    }
    path.canonicalize().map_err(|e| MinimizeError::io(path, e))
}

fn code_counts(statistics: &ErrorStatistics) -> Vec<CodeCount> {
    statistics
        .sorted()
        .into_iter()
        .map(|(code, count)| CodeCount {
            code: code.to_string(),
            count,
        })
        .collect()
}

/// Listing form of a compiler-reported source, relative to the sources folder.
pub fn source_label(source: Option<&Path>, sources: &Path) -> String {
    match source {
        Some(path) => path
            .strip_prefix(sources)
            .map(path_for_listing)
            .unwrap_or_else(|_| path.display().to_string()),
        None => GLOBAL_SOURCE.to_string(),
    }
}
