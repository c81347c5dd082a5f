//! Text and JSON rendering of a run, plus the error detail file.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::error::{MinimizeError, Result};
use crate::minimizer::{CodeCount, RunOutcome};
use crate::resolver::{Candidate, Resolution};
use crate::stage::{CopyEntry, LayoutWarning};

const SEPARATOR_LINE: &str = "----------------";

/// Write one block per error of the selected sources.
pub fn write_error_details(path: &Path, sources: &[(Option<&Path>, &[Diagnostic])]) -> Result<()> {
    fs::write(path, format_error_details(sources)).map_err(|e| MinimizeError::io(path, e))
}

pub fn format_error_details(sources: &[(Option<&Path>, &[Diagnostic])]) -> String {
    let mut out = String::new();
    for (_, errors) in sources {
        for error in errors.iter() {
            let _ = write!(
                out,
                "{}\n{}\n\n{}\n\n",
                SEPARATOR_LINE,
                error.code,
                error.rendered.replacen(": error: ", ":\nerror: ", 1)
            );
        }
    }
    out
}

/// Human-readable report
pub fn render_text(outcome: &RunOutcome) -> String {
    let mut out = String::new();

    write_copy_table(&mut out, "sources", &outcome.copied_sources);
    if !outcome.copied_archives.is_empty() {
        write_copy_table(&mut out, "archives", &outcome.copied_archives);
    }
    write_list(&mut out, "archive name collisions", &outcome.archive_collisions);
    write_list(&mut out, "non-archive dependencies", &outcome.non_archive_dependencies);
    if !outcome.layout_warnings.is_empty() {
        let _ = writeln!(out, "-- seed layout warnings --");
        for warning in &outcome.layout_warnings {
            let _ = writeln!(out, "{}", describe_warning(warning));
        }
        out.push('\n');
    }
    write_list(&mut out, "harvested dependencies", &outcome.harvested);

    if outcome.compiled {
        let _ = writeln!(out, "compilation succeeded");
        return out;
    }

    let _ = writeln!(out, "-- error code counts --");
    for file in &outcome.error_counts {
        let _ = writeln!(out, "{}", file.file);
        write_counts(&mut out, &file.counts);
    }
    if outcome.error_counts.len() > 1 {
        let _ = writeln!(out, "totals");
        write_counts(&mut out, &outcome.totals);
    }
    out.push('\n');

    if let Some(resolution) = &outcome.resolution {
        write_resolution(&mut out, resolution);
    }

    if !outcome.pattern_timings.is_empty() {
        let _ = writeln!(out, "-- pattern timing --");
        for timing in &outcome.pattern_timings {
            let _ = writeln!(
                out,
                "{:>10.1}us  x{:<5} {} / {}",
                timing.average_micros, timing.attempts, timing.category, timing.pattern
            );
        }
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    outcome: &'a RunOutcome,
}

/// Machine-readable report, stamped with the generation time
pub fn render_json(outcome: &RunOutcome) -> Result<String> {
    let report = JsonReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        outcome,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn write_copy_table(out: &mut String, title: &str, entries: &[CopyEntry]) {
    let _ = writeln!(out, "-- copied {} --", title);
    let _ = writeln!(out, "ecp  path");
    for entry in entries {
        let _ = writeln!(out, "{}  {}", entry.flags(), entry.path);
    }
    out.push('\n');
}

fn write_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "-- {} --", title);
    for item in items {
        let _ = writeln!(out, "{}", item);
    }
    out.push('\n');
}

fn write_counts(out: &mut String, counts: &[CodeCount]) {
    for count in counts {
        let _ = writeln!(out, "{:4}  {}", count.count, count.code);
    }
}

fn describe_warning(warning: &LayoutWarning) -> String {
    match warning {
        LayoutWarning::NoSearchRoot { file } => format!("no search root for {}", file),
        LayoutWarning::MultipleSearchRoots { file, search_roots } => format!(
            "multiple search roots for {}: {}",
            file,
            search_roots.join(", ")
        ),
        LayoutWarning::PackageMismatch {
            file,
            declared,
            implied,
        } => format!(
            "{} declares package {} but its folder implies {}",
            file,
            declared.as_deref().unwrap_or("(none)"),
            implied.as_deref().unwrap_or("(none)")
        ),
    }
}

fn write_resolution(out: &mut String, resolution: &Resolution) {
    let with_symbols: Vec<_> = resolution
        .files
        .iter()
        .filter(|f| !f.missing_symbols.is_empty())
        .collect();
    if !with_symbols.is_empty() {
        let _ = writeln!(out, "-- missing symbols by source file --");
        for file in with_symbols {
            let _ = writeln!(out, "{}", file.file);
            for symbol in &file.missing_symbols {
                let _ = writeln!(out, "    {}", symbol);
            }
        }
        out.push('\n');
    }

    if !resolution.imports.is_empty() {
        let _ = writeln!(out, "-- missing imports --");
        for (import, files) in &resolution.imports {
            let _ = writeln!(out, "{}", import);
            for file in files {
                let _ = writeln!(out, "    {}", file);
            }
        }
        out.push('\n');
    }

    for (title, want_archive) in [("candidate source files", false), ("candidate archives", true)] {
        let entries: Vec<_> = resolution
            .candidates
            .iter()
            .map(|(name, candidates)| {
                let paths: Vec<&str> = candidates
                    .iter()
                    .filter(|c| matches!(c, Candidate::Archive(_)) == want_archive)
                    .map(Candidate::path)
                    .collect();
                (name, paths)
            })
            .filter(|(_, paths)| !paths.is_empty())
            .collect();
        if entries.is_empty() {
            continue;
        }
        let _ = writeln!(out, "-- {} --", title);
        for (name, paths) in entries {
            let _ = writeln!(out, "{}", name);
            for path in paths {
                let _ = writeln!(out, "    {}", path);
            }
        }
        out.push('\n');
    }

    let still_missing: Vec<_> = resolution.still_missing().collect();
    if !still_missing.is_empty() {
        let _ = writeln!(out, "-- still missing --");
        for file in still_missing {
            let _ = writeln!(out, "{}", file.file);
            for name in &file.still_missing {
                let _ = writeln!(out, "    {}", name);
            }
        }
        out.push('\n');
    }

    let files = resolution.candidates.source_files();
    if !files.is_empty() {
        let _ = writeln!(out, "-- suggested files.lst lines --");
        for file in files {
            let _ = writeln!(out, "{}", file);
        }
        out.push('\n');
    }
    let archives = resolution.candidates.archives();
    if !archives.is_empty() {
        let _ = writeln!(out, "-- suggested dependencies.lst lines --");
        for archive in archives {
            let _ = writeln!(out, "{}", archive);
        }
        out.push('\n');
    }
}
