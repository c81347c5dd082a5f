//! Staging, compiling and reporting through a scripted compiler

use std::fs;
use std::path::{Path, PathBuf};

use minimize_codebase::minimizer::{Minimizer, ARCHIVES_FOLDER, CLASSES_FOLDER, ERRORS_FILE};
use minimize_codebase::name::QualifiedName;
use minimize_codebase::report::{render_json, render_text};
use minimize_codebase::stage::LayoutWarning;
use minimize_codebase::MinimizeError;

use crate::common::{
    cannot_find_class, error_count, incompatible_types, missing_package_import, ScriptedCompiler,
    TestTree,
};

fn never(_: &Path, _: &QualifiedName) -> bool {
    false
}

fn seeded_tree() -> TestTree {
    let tree = TestTree::new();
    tree.add_class("src/a/b/Foo.java", Some("a.b"))
        .add_class("src/a/b/Bar.java", Some("a.b"))
        .add_file("lib/dep.jar", "not really a jar")
        .list_files(&["src/a/b/Foo.java"])
        .list_sourcepaths(&["src"])
        .list_dependencies(&["lib/dep.jar"]);
    tree
}

#[test]
fn test_successful_compile_stages_everything() {
    let tree = seeded_tree();
    let compiler = ScriptedCompiler::succeeding();

    let outcome = Minimizer::new(tree.options()).run_with(&compiler, &never).unwrap();

    assert!(outcome.compiled);
    assert!(outcome.resolution.is_none());
    assert_eq!(outcome.copied_sources.len(), 1);
    assert_eq!(outcome.copied_sources[0].flags(), ".cp");
    assert_eq!(outcome.copied_sources[0].path, "src/a/b/Foo.java");
    assert!(outcome.layout_warnings.is_empty());
    assert!(tree.copied("src/a/b/Foo.java").is_file());
    assert!(tree.destination().join(ARCHIVES_FOLDER).join("dep.jar").is_file());
    assert!(!tree.destination().join(CLASSES_FOLDER).join(ERRORS_FILE).exists());

    let requests = compiler.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].files, vec![tree.copied("src/a/b/Foo.java")]);
    assert_eq!(requests[0].search_roots, vec![tree.sources().join("src")]);
    assert_eq!(
        requests[0].archives,
        vec![tree.destination().join(ARCHIVES_FOLDER).join("dep.jar")]
    );
    assert_eq!(requests[0].class_output, tree.destination().join(CLASSES_FOLDER));

    assert!(render_text(&outcome).ends_with("compilation succeeded\n"));
}

#[test]
fn test_failing_compile_suggests_candidates() {
    let tree = seeded_tree();
    let foo = tree.copied("src/a/b/Foo.java");
    let compiler = ScriptedCompiler::failing(
        cannot_find_class(&foo, 5, "Bar", "Foo")
            + &missing_package_import(&foo, 3, "x.y.Gone")
            + &error_count(2),
    );

    let outcome = Minimizer::new(tree.options()).run_with(&compiler, &never).unwrap();

    assert!(!outcome.compiled);
    assert_eq!(outcome.error_counts.len(), 1);
    assert_eq!(outcome.error_counts[0].file, "src/a/b/Foo.java");
    let codes: Vec<_> = outcome.error_counts[0]
        .counts
        .iter()
        .map(|c| (c.code.as_str(), c.count))
        .collect();
    assert_eq!(
        codes,
        vec![
            ("compiler.err.cant.resolve.location", 1),
            ("compiler.err.doesnt.exist", 1)
        ]
    );

    let resolution = outcome.resolution.as_ref().unwrap();
    assert_eq!(resolution.candidates.source_files(), vec!["src/a/b/Bar.java"]);
    assert_eq!(
        resolution.files[0].still_missing,
        vec![QualifiedName::parse("x.y.Gone")]
    );

    let errors = fs::read_to_string(tree.destination().join(CLASSES_FOLDER).join(ERRORS_FILE)).unwrap();
    assert_eq!(errors.matches("----------------\n").count(), 2);
    assert!(errors.contains("compiler.err.cant.resolve.location\n\n"));
    assert!(errors.contains(":5:\nerror: cannot find symbol"));

    let text = render_text(&outcome);
    assert!(text.contains("   1  compiler.err.doesnt.exist"));
    assert!(text.contains("-- suggested files.lst lines --\nsrc/a/b/Bar.java\n"));
    assert!(text.contains("-- still missing --\nsrc/a/b/Foo.java\n    x.y.Gone\n"));
}

#[test]
fn test_aborted_resolution_keeps_error_counts() {
    let tree = seeded_tree();
    tree.add_class("src/a/b/Qux.java", Some("a.b"))
        .list_files(&["src/a/b/Foo.java", "src/a/b/Qux.java"]);
    let foo = tree.copied("src/a/b/Foo.java");
    let compiler = ScriptedCompiler::failing(
        cannot_find_class(&foo, 5, "Bar", "Foo")
            + &incompatible_types(&tree.copied("src/a/b/Qux.java"), 9)
            + &error_count(2),
    );

    let err = Minimizer::new(tree.options()).run_with(&compiler, &never).unwrap_err();

    assert_eq!(err.exit_status(), 4);
    assert!(err.to_string().contains("found 0"));
    let outcome = err.outcome().expect("partial outcome");
    assert!(!outcome.compiled);
    assert!(outcome.resolution.is_none());
    assert_eq!(outcome.copied_sources[1].flags(), ".c.");
    assert_eq!(outcome.error_counts.len(), 2);
    assert_eq!(outcome.error_counts[1].file, "src/a/b/Qux.java");
    assert_eq!(outcome.error_counts[1].counts[0].code, "compiler.err.prob.found.req");
    assert!(tree.destination().join(CLASSES_FOLDER).join(ERRORS_FILE).is_file());

    let text = render_text(outcome);
    assert!(text.contains("   1  compiler.err.prob.found.req"));
    assert!(text.contains("totals\n   1  compiler.err.cant.resolve.location\n   1  compiler.err.prob.found.req\n"));
    assert!(!text.contains("suggested files.lst"));
}

#[test]
fn test_json_report_carries_candidates() {
    let tree = seeded_tree();
    let foo = tree.copied("src/a/b/Foo.java");
    let compiler =
        ScriptedCompiler::failing(cannot_find_class(&foo, 5, "Bar", "Foo") + &error_count(1));

    let outcome = Minimizer::new(tree.options()).run_with(&compiler, &never).unwrap();
    let json: serde_json::Value = serde_json::from_str(&render_json(&outcome).unwrap()).unwrap();

    assert!(json["generated_at"].is_string());
    assert_eq!(json["compiled"], false);
    let entry = &json["resolution"]["candidates"]["Bar"][0];
    assert_eq!(entry["kind"], "source-file");
    assert_eq!(entry["path"], "src/a/b/Bar.java");
}

#[test]
fn test_second_run_keeps_existing_copies() {
    let tree = seeded_tree();
    let compiler = ScriptedCompiler::succeeding();
    let minimizer = Minimizer::new(tree.options());

    minimizer.run_with(&compiler, &never).unwrap();
    fs::write(tree.copied("src/a/b/Foo.java"), "// edited in place\n").unwrap();
    let outcome = minimizer.run_with(&compiler, &never).unwrap();

    assert_eq!(outcome.copied_sources[0].flags(), "e..");
    assert_eq!(outcome.copied_archives[0].flags(), "e..");
    assert_eq!(
        fs::read_to_string(tree.copied("src/a/b/Foo.java")).unwrap(),
        "// edited in place\n"
    );
}

#[test]
fn test_dependency_collisions_and_non_archives_are_reported() {
    let tree = seeded_tree();
    tree.add_file("vendor/dep.jar", "")
        .list_dependencies(&["lib/dep.jar", "vendor/dep.jar", "org.acme:core:1.0"]);

    let outcome = Minimizer::new(tree.options())
        .run_with(&ScriptedCompiler::succeeding(), &never)
        .unwrap();

    assert_eq!(outcome.copied_archives.len(), 1);
    assert_eq!(outcome.copied_archives[0].path, "lib/dep.jar");
    assert_eq!(outcome.archive_collisions, vec!["vendor/dep.jar"]);
    assert_eq!(outcome.non_archive_dependencies, vec!["org.acme:core:1.0"]);
}

#[test]
fn test_seed_in_wrong_folder_is_warned() {
    let tree = seeded_tree();
    tree.add_class("src/a/c/Moved.java", Some("a.b"))
        .list_files(&["src/a/b/Foo.java", "src/a/c/Moved.java"]);

    let outcome = Minimizer::new(tree.options())
        .run_with(&ScriptedCompiler::succeeding(), &never)
        .unwrap();

    assert_eq!(
        outcome.layout_warnings,
        vec![LayoutWarning::PackageMismatch {
            file: "src/a/c/Moved.java".to_string(),
            declared: Some("a.b".to_string()),
            implied: Some("a.c".to_string()),
        }]
    );
}

#[test]
fn test_pattern_profiling_records_timings() {
    let tree = seeded_tree();
    let foo = tree.copied("src/a/b/Foo.java");
    let compiler =
        ScriptedCompiler::failing(cannot_find_class(&foo, 5, "Bar", "Foo") + &error_count(1));
    let mut options = tree.options();
    options.profile_patterns = true;

    let outcome = Minimizer::new(options).run_with(&compiler, &never).unwrap();

    assert!(!outcome.pattern_timings.is_empty());
    assert!(render_text(&outcome).contains("-- pattern timing --"));
}

#[test]
fn test_missing_files_listing_fails_before_compiling() {
    let tree = TestTree::new();
    tree.add_class("src/a/b/Foo.java", Some("a.b"));
    let compiler = ScriptedCompiler::succeeding();

    let err = Minimizer::new(tree.options()).run_with(&compiler, &never).unwrap_err();

    assert!(matches!(err, MinimizeError::MissingListing { .. }));
    assert_eq!(err.exit_status(), 1);
    assert!(compiler.requests().is_empty());
}

#[test]
fn test_listed_seed_must_exist() {
    let tree = seeded_tree();
    tree.list_files(&["src/a/b/Absent.java"]);

    let err = Minimizer::new(tree.options())
        .run_with(&ScriptedCompiler::succeeding(), &never)
        .unwrap_err();

    match err {
        MinimizeError::MissingListing { path, .. } => {
            assert_eq!(path, tree.original().join("src/a/b/Absent.java"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_original_must_be_a_folder() {
    let tree = seeded_tree();
    let mut options = tree.options();
    options.original = PathBuf::from("/definitely/not/here");

    let err = Minimizer::new(options)
        .run_with(&ScriptedCompiler::succeeding(), &never)
        .unwrap_err();
    assert!(matches!(err, MinimizeError::NotAFolder { .. }));
}
