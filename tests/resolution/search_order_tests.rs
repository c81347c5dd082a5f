//! Which candidate wins when several could

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use minimize_codebase::compile::{parse_javac_output, CompilationResult};
use minimize_codebase::name::QualifiedName;
use minimize_codebase::resolver::{failing_sources, Candidate, SearchContext};

use super::{no_archives, qn, resolve};
use crate::common::{cannot_find_class, error_count, missing_package_import, TestTree};

#[test]
fn test_own_search_root_wins_over_listed_roots() {
    let tree = TestTree::new();
    tree.add_class("src/a/b/Foo.java", Some("a.b"))
        .add_class("src/x/y/Baz.java", Some("x.y"))
        .add_class("other/x/y/Baz.java", Some("x.y"));
    let output = missing_package_import(&tree.copied("src/a/b/Foo.java"), 3, "x.y.Baz")
        + &error_count(1);
    let context = SearchContext {
        search_roots: vec![PathBuf::from("other"), PathBuf::from("src")],
        ..SearchContext::default()
    };

    let resolution = resolve(&tree, &output, &no_archives, context).unwrap();

    let found: Vec<_> = resolution.candidates.get(&qn("x.y.Baz")).unwrap().iter().cloned().collect();
    assert_eq!(found, vec![Candidate::SourceFile("src/x/y/Baz.java".to_string())]);
}

#[test]
fn test_tree_walk_ignores_files_declaring_another_package() {
    let tree = TestTree::new();
    tree.add_class("src/a/b/Foo.java", Some("a.b"))
        .add_class("aaa/x/y/Baz.java", Some("not.x.y"))
        .add_class("bbb/x/y/Baz.java", Some("x.y"));
    let output = missing_package_import(&tree.copied("src/a/b/Foo.java"), 3, "x.y.Baz")
        + &error_count(1);

    let resolution = resolve(&tree, &output, &no_archives, SearchContext::default()).unwrap();

    assert_eq!(resolution.candidates.source_files(), vec!["bbb/x/y/Baz.java"]);
}

#[test]
fn test_proven_archive_is_asked_first() {
    let tree = TestTree::new();
    tree.add_class("src/a/b/Foo.java", Some("a.b"))
        .add_file("lib/declared.jar", "")
        .add_file("lib/a.jar", "")
        .add_file("lib/b.jar", "");
    let foo = tree.copied("src/a/b/Foo.java");
    let output = missing_package_import(&foo, 3, "x.y.First")
        + &missing_package_import(&foo, 4, "x.y.Second")
        + &error_count(2);

    let asked = Mutex::new(Vec::new());
    let inspector = |archive: &Path, name: &QualifiedName| {
        asked.lock().unwrap().push(name.to_string());
        archive.ends_with("b.jar") && name.as_str().starts_with("x.y.")
    };
    let context = SearchContext {
        archive_folders: vec![tree.original().join("lib")],
        selected_archives: ["declared.jar".to_string()].into_iter().collect(),
        ..SearchContext::default()
    };

    let resolution = resolve(&tree, &output, &inspector, context).unwrap();

    assert_eq!(resolution.candidates.archives(), vec!["lib/b.jar"]);
    assert_eq!(resolution.candidates.len(), 2);
    let second_asks = asked
        .lock()
        .unwrap()
        .iter()
        .filter(|name| name.as_str() == "x.y.Second")
        .count();
    assert_eq!(second_asks, 1);
}

#[test]
fn test_import_no_archive_defines_is_asked_once() {
    let tree = TestTree::new();
    tree.add_class("src/a/b/Foo.java", Some("a.b"))
        .add_class("src/c/d/Qux.java", Some("c.d"))
        .add_file("lib/declared.jar", "")
        .add_file("lib/one.jar", "");
    let output = missing_package_import(&tree.copied("src/a/b/Foo.java"), 3, "z.Gone")
        + &missing_package_import(&tree.copied("src/c/d/Qux.java"), 3, "z.Gone")
        + &error_count(2);

    let asked = Mutex::new(0usize);
    let inspector = |_: &Path, name: &QualifiedName| {
        if name.as_str() == "z.Gone" {
            *asked.lock().unwrap() += 1;
        }
        false
    };
    let context = SearchContext {
        archive_folders: vec![tree.original().join("lib")],
        selected_archives: ["declared.jar".to_string()].into_iter().collect(),
        ..SearchContext::default()
    };

    let resolution = resolve(&tree, &output, &inspector, context).unwrap();

    assert_eq!(resolution.still_missing().count(), 2);
    assert_eq!(*asked.lock().unwrap(), 1);
}

#[test]
fn test_file_limit_selects_first_failing_sources() {
    let tree = TestTree::new();
    tree.add_class("src/a/b/Foo.java", Some("a.b"))
        .add_class("src/a/b/Qux.java", Some("a.b"));
    let output = cannot_find_class(&tree.copied("src/a/b/Foo.java"), 5, "Bar", "Foo")
        + &cannot_find_class(&tree.copied("src/a/b/Qux.java"), 6, "Bar", "Qux")
        + &cannot_find_class(&tree.copied("src/a/b/Foo.java"), 9, "Other", "Foo")
        + &error_count(3);
    let result = CompilationResult::from_diagnostics(false, parse_javac_output(&output));

    let selected = failing_sources(&result, 1);

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].0, Some(tree.copied("src/a/b/Foo.java").as_path()));
    assert_eq!(selected[0].1.len(), 2);
    assert_eq!(result.statistics.total(), 3);
}
