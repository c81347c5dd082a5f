//! End-to-end resolution scenarios

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use minimize_codebase::diagnostics::{DiagnosticDecoder, ErrorCategory, ErrorCode, PatternRegistry};
use minimize_codebase::name::QualifiedName;
use minimize_codebase::resolver::{Candidate, SearchContext};
use minimize_codebase::MinimizeError;

use super::{no_archives, qn, resolve, resolve_with};
use crate::common::{
    cannot_find_class, error_count, incompatible_types, missing_package_import, TestTree,
};

fn packaged_tree() -> TestTree {
    let tree = TestTree::new();
    tree.add_class("src/a/b/Foo.java", Some("a.b"));
    tree
}

fn listed_roots() -> SearchContext {
    SearchContext {
        search_roots: vec![PathBuf::from("src")],
        ..SearchContext::default()
    }
}

// ============================================================================
// SIMPLE SYMBOLS
// ============================================================================

#[test]
fn test_missing_symbol_found_in_same_package() {
    let tree = packaged_tree();
    tree.add_class("src/a/b/Bar.java", Some("a.b"));
    let output = cannot_find_class(&tree.copied("src/a/b/Foo.java"), 5, "Bar", "Foo")
        + &error_count(1);

    let resolution = resolve(&tree, &output, &no_archives, listed_roots()).unwrap();

    assert_eq!(resolution.candidates.len(), 1);
    let found: Vec<_> = resolution
        .candidates
        .get(&qn("Bar"))
        .expect("candidate for Bar")
        .iter()
        .cloned()
        .collect();
    assert_eq!(found, vec![Candidate::SourceFile("src/a/b/Bar.java".to_string())]);

    let file = &resolution.files[0];
    assert_eq!(file.file, "src/a/b/Foo.java");
    assert_eq!(file.missing_symbols, vec![qn("Bar")]);
    assert!(file.still_missing.is_empty());
    assert_eq!(resolution.still_missing().count(), 0);
}

#[test]
fn test_two_files_of_one_package_share_a_candidate() {
    let tree = packaged_tree();
    tree.add_class("src/a/b/Qux.java", Some("a.b"));
    tree.add_class("src/a/b/Bar.java", Some("a.b"));
    let output = cannot_find_class(&tree.copied("src/a/b/Foo.java"), 5, "Bar", "Foo")
        + &cannot_find_class(&tree.copied("src/a/b/Qux.java"), 8, "Bar", "Qux")
        + &error_count(2);

    let resolution = resolve(&tree, &output, &no_archives, listed_roots()).unwrap();

    assert_eq!(resolution.candidates.len(), 1);
    assert_eq!(resolution.candidates.get(&qn("Bar")).unwrap().len(), 1);
    assert_eq!(resolution.candidates.source_files(), vec!["src/a/b/Bar.java"]);
    assert_eq!(resolution.files.len(), 2);
    for file in &resolution.files {
        assert_eq!(file.missing_symbols, vec![qn("Bar")]);
        assert!(file.still_missing.is_empty());
    }
}

#[test]
fn test_absent_symbol_stays_missing() {
    let tree = packaged_tree();
    let output = cannot_find_class(&tree.copied("src/a/b/Foo.java"), 5, "Nope", "Foo")
        + &error_count(1);

    let resolution = resolve(&tree, &output, &no_archives, listed_roots()).unwrap();

    assert!(resolution.candidates.is_empty());
    let still: Vec<_> = resolution.still_missing().collect();
    assert_eq!(still.len(), 1);
    assert_eq!(still[0].still_missing, vec![qn("Nope")]);
}

// ============================================================================
// IMPORTS
// ============================================================================

#[test]
fn test_import_found_under_listed_search_root() {
    let tree = packaged_tree();
    tree.add_class("src/x/y/Baz.java", Some("x.y"));
    let foo = tree.copied("src/a/b/Foo.java");
    let output = missing_package_import(&foo, 3, "x.y.Baz")
        + &cannot_find_class(&foo, 7, "Baz", "Foo")
        + &error_count(2);

    let resolution = resolve(&tree, &output, &no_archives, listed_roots()).unwrap();

    let file = &resolution.files[0];
    assert_eq!(file.missing_imports, vec![qn("x.y.Baz")]);
    assert!(file.missing_symbols.is_empty());
    assert_eq!(resolution.candidates.source_files(), vec!["src/x/y/Baz.java"]);
    assert_eq!(resolution.imports[&qn("x.y.Baz")], vec!["src/a/b/Foo.java"]);
}

#[test]
fn test_import_found_by_tree_walk() {
    let tree = packaged_tree();
    tree.add_class("modules/util/src/x/y/Baz.java", Some("x.y"));
    let output = missing_package_import(&tree.copied("src/a/b/Foo.java"), 3, "x.y.Baz")
        + &error_count(1);

    let asked = Mutex::new(Vec::new());
    let inspector = |archive: &Path, _: &QualifiedName| {
        asked.lock().unwrap().push(archive.to_path_buf());
        false
    };
    let resolution = resolve(&tree, &output, &inspector, listed_roots()).unwrap();

    assert_eq!(
        resolution.candidates.source_files(),
        vec!["modules/util/src/x/y/Baz.java"]
    );
    assert!(asked.lock().unwrap().is_empty());
}

#[test]
fn test_import_found_in_sibling_archive() {
    let tree = packaged_tree();
    tree.add_file("lib/declared.jar", "")
        .add_file("lib/other.jar", "")
        .add_file("lib/unrelated.jar", "");
    let foo = tree.copied("src/a/b/Foo.java");
    let output = missing_package_import(&foo, 3, "x.y.Baz")
        + &cannot_find_class(&foo, 7, "Baz", "Foo")
        + &error_count(2);

    let asked = Mutex::new(HashSet::new());
    let inspector = |archive: &Path, name: &QualifiedName| {
        let file_name = archive.file_name().unwrap().to_string_lossy().into_owned();
        asked.lock().unwrap().insert(file_name.clone());
        file_name == "other.jar" && name.as_str() == "x.y.Baz"
    };
    let context = SearchContext {
        search_roots: vec![PathBuf::from("src")],
        archive_folders: vec![tree.original().join("lib")],
        selected_archives: ["declared.jar".to_string()].into_iter().collect(),
        skip: None,
    };
    let resolution = resolve(&tree, &output, &inspector, context).unwrap();

    let found: Vec<_> = resolution.candidates.get(&qn("x.y.Baz")).unwrap().iter().cloned().collect();
    assert_eq!(found, vec![Candidate::Archive("lib/other.jar".to_string())]);
    assert_eq!(resolution.candidates.archives(), vec!["lib/other.jar"]);
    assert_eq!(resolution.proven_archives, vec!["lib/other.jar"]);
    assert!(!asked.lock().unwrap().contains("declared.jar"));
    assert_eq!(resolution.still_missing().count(), 0);
}

#[test]
fn test_import_without_any_source_stays_missing() {
    let tree = packaged_tree();
    let output = missing_package_import(&tree.copied("src/a/b/Foo.java"), 3, "z.Gone")
        + &error_count(1);

    let resolution = resolve(&tree, &output, &no_archives, listed_roots()).unwrap();

    assert!(resolution.candidates.is_empty());
    assert_eq!(resolution.files[0].still_missing, vec![qn("z.Gone")]);
}

// ============================================================================
// PACKAGE-LESS FILES
// ============================================================================

#[test]
fn test_package_less_file_resolves_per_file() {
    let tree = TestTree::new();
    tree.add_class("Main.java", None)
        .add_class("Helper.java", None)
        .add_class("vendor/x/y/Baz.java", Some("x.y"));
    let main = tree.copied("Main.java");
    let output = cannot_find_class(&main, 4, "Helper", "Main")
        + &missing_package_import(&main, 1, "x.y.Baz")
        + &error_count(2);

    let resolution = resolve(&tree, &output, &no_archives, SearchContext::default()).unwrap();

    let file = &resolution.files[0];
    assert_eq!(file.package, None);
    assert!(file.still_missing.is_empty());
    let helper: Vec<_> = resolution.candidates.get(&qn("Helper")).unwrap().iter().cloned().collect();
    assert_eq!(helper, vec![Candidate::SourceFile("Helper.java".to_string())]);
    assert_eq!(
        resolution.candidates.source_files(),
        vec!["Helper.java", "vendor/x/y/Baz.java"]
    );
}

// ============================================================================
// DETERMINISM
// ============================================================================

#[test]
fn test_repeated_resolution_is_stable() {
    let tree = packaged_tree();
    tree.add_class("src/a/b/Bar.java", Some("a.b"))
        .add_class("other/x/y/Baz.java", Some("x.y"))
        .add_class("zzz/x/y/Baz.java", Some("x.y"));
    let foo = tree.copied("src/a/b/Foo.java");
    let output = cannot_find_class(&foo, 5, "Bar", "Foo")
        + &missing_package_import(&foo, 3, "x.y.Baz")
        + &error_count(2);

    let first = resolve(&tree, &output, &no_archives, listed_roots()).unwrap();
    let second = resolve(&tree, &output, &no_archives, listed_roots()).unwrap();

    assert_eq!(first.candidates, second.candidates);
    assert_eq!(
        first.candidates.source_files(),
        vec!["other/x/y/Baz.java", "src/a/b/Bar.java"]
    );
}

// ============================================================================
// FATAL DECODING PROBLEMS
// ============================================================================

#[test]
fn test_two_decodings_abort_before_searching() {
    let tree = packaged_tree();
    tree.add_class("src/x/y/Baz.java", Some("x.y"));
    let output = missing_package_import(&tree.copied("src/a/b/Foo.java"), 3, "x.y.Baz")
        + &error_count(1);
    let registry = PatternRegistry::javac()
        .unwrap()
        .register(
            ErrorCode::DoesntExist,
            ErrorCategory::CannotFindSymbol,
            "overlapping",
            r"package\s+\S+\s+does not exist",
        )
        .unwrap();
    let decoder = DiagnosticDecoder::new(registry);

    let err = resolve_with(&tree, &output, &decoder, &no_archives, listed_roots()).unwrap_err();

    assert_eq!(err.exit_status(), 4);
    match err {
        MinimizeError::AmbiguousDecoding { count, dump } => {
            assert_eq!(count, 2);
            assert!(dump.contains("decoding #1"));
            assert!(dump.contains("decoding #2"));
            assert!(dump.contains("> import x.y.Baz;"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_unknown_error_shape_aborts() {
    let tree = packaged_tree();
    let output = incompatible_types(&tree.copied("src/a/b/Foo.java"), 9) + &error_count(1);

    let err = resolve(&tree, &output, &no_archives, listed_roots()).unwrap_err();
    assert!(matches!(err, MinimizeError::AmbiguousDecoding { count: 0, .. }));
}

#[test]
fn test_diagnostic_outside_destination_is_fatal() {
    let tree = packaged_tree();
    let output = cannot_find_class(Path::new("/elsewhere/Foo.java"), 5, "Bar", "Foo")
        + &error_count(1);

    let err = resolve(&tree, &output, &no_archives, listed_roots()).unwrap_err();
    assert!(matches!(err, MinimizeError::OutsideManagedTree { .. }));
    assert_eq!(err.exit_status(), 3);
}

#[test]
fn test_global_diagnostic_is_skipped() {
    let tree = packaged_tree();
    let output = "error: file not found: Missing.java\n1 error\n";

    let resolution = resolve(&tree, output, &no_archives, listed_roots()).unwrap();
    assert!(resolution.files.is_empty());
    assert!(resolution.candidates.is_empty());
}
