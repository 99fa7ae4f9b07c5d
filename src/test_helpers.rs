//! Shared test utilities for the sketch-index test suite.
//!
//! Provides record builders, lookup helpers and tree-shape assertions that
//! work with scan output (`Manifest`) and the filtering core (`CategoryNode`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tree = build_tree(&sample_records());
//! assert_tree_shape(&tree, &[
//!     ("Basics", &["Arrays", "Shape"]),
//!     ("Topics", &["Motion"]),
//! ]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::Manifest;
use crate::types::{
    CategoryNode, ExampleRecord, LibraryContribution, ReferenceClass, ReferenceEntry,
};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Builders
// =========================================================================

/// An example whose title equals its name.
pub fn example(name: &str, path: &[&str]) -> ExampleRecord {
    example_titled(name, name, path)
}

pub fn example_titled(name: &str, title: &str, path: &[&str]) -> ExampleRecord {
    ExampleRecord {
        name: name.to_string(),
        path: path.iter().map(|s| s.to_string()).collect(),
        title: title.to_string(),
        image: None,
    }
}

/// Four examples across two top-level categories.
pub fn sample_records() -> Vec<ExampleRecord> {
    vec![
        example("Array2D", &["Basics", "Arrays"]),
        example("ArrayObjects", &["Basics", "Arrays"]),
        example("Star", &["Basics", "Shape"]),
        example("Bounce", &["Topics", "Motion"]),
    ]
}

fn contribution(name: &str, sentence: &str, categories: &[&str]) -> LibraryContribution {
    LibraryContribution {
        name: name.to_string(),
        url: format!("https://example.org/{name}"),
        authors: vec![format!("[{name} Author](https://example.org/{name}/author)")],
        sentence: sentence.to_string(),
        categories: categories.iter().map(|s| s.to_string()).collect(),
    }
}

/// Four contributions; categories overlap, and none mention "physics".
pub fn sample_contributions() -> Vec<LibraryContribution> {
    vec![
        contribution("Fisica", "A 2D rigid body simulation library", &["Simulation"]),
        contribution(
            "toxiclibs",
            "Computational design classes for geometry and color",
            &["Simulation", "Math"],
        ),
        contribution(
            "oscP5",
            "An OSC implementation for the programming environment",
            &["I/O"],
        ),
        contribution(
            "Minim",
            "An audio library that provides easy to use classes for playback",
            &["I/O", "Sound"],
        ),
    ]
}

fn reference_entry(name: &str, category: &str, subcategory: &str) -> ReferenceEntry {
    ReferenceEntry {
        name: name.to_string(),
        kind: "class".to_string(),
        description: format!("<p>{name} description</p>"),
        category: category.to_string(),
        subcategory: subcategory.to_string(),
        constructors: vec![format!("{name}()")],
        class_fields: Vec::new(),
        methods: Vec::new(),
        related: Vec::new(),
    }
}

fn reference_class(
    library: &str,
    entry: Option<ReferenceEntry>,
    english: ReferenceEntry,
) -> ReferenceClass {
    ReferenceClass {
        library: library.to_string(),
        name: english.name.clone(),
        entry,
        english: Some(english),
        examples: Vec::new(),
    }
}

/// Reference classes as scanned for a non-English locale: two translated
/// core classes, one untranslated core class (PShape), one member page and
/// one class from another library.
pub fn sample_reference() -> Vec<ReferenceClass> {
    let pvector = reference_entry("PVector", "Math", "");
    let pshape = reference_entry("PShape", "Shape", "");
    let pimage = reference_entry("PImage", "Image", "Pixels");
    let mut add = reference_entry("PVector_add_", "Math", "");
    add.kind = "method".to_string();
    let sinosc = reference_entry("SinOsc", "Oscillators", "");

    vec![
        reference_class("processing", Some(pvector.clone()), pvector),
        reference_class("processing", None, pshape),
        reference_class("processing", Some(pimage.clone()), pimage),
        reference_class("processing", Some(add.clone()), add),
        reference_class("sound", Some(sinosc.clone()), sinosc),
    ]
}

// =========================================================================
// Lookups — panic with a clear message on miss
// =========================================================================

/// Find a scanned example by name. Panics if not found.
pub fn find_example<'a>(manifest: &'a Manifest, name: &str) -> &'a ExampleRecord {
    manifest
        .examples
        .iter()
        .find(|e| e.name == name)
        .unwrap_or_else(|| {
            let names = example_names(manifest);
            panic!("example '{name}' not found. Available: {names:?}")
        })
}

/// Find a reference class by name. Panics if not found.
pub fn find_class<'a>(manifest: &'a Manifest, name: &str) -> &'a ReferenceClass {
    manifest
        .reference
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = manifest.reference.iter().map(|c| c.name.as_str()).collect();
            panic!("reference class '{name}' not found. Available: {names:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All example names in manifest order.
pub fn example_names(manifest: &Manifest) -> Vec<&str> {
    manifest.examples.iter().map(|e| e.name.as_str()).collect()
}

/// Names of a node's own items (not descendants).
pub fn item_names(node: &CategoryNode) -> Vec<&str> {
    node.items.iter().map(|i| i.name.as_str()).collect()
}

pub fn contribution_names<'a>(records: &[&'a LibraryContribution]) -> Vec<&'a str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

// =========================================================================
// Tree assertions
// =========================================================================

/// Assert the first two levels of a category tree.
///
/// Each entry is `(category, subcategories)`. Use `&[]` for categories with
/// no children.
pub fn assert_tree_shape(tree: &CategoryNode, expected: &[(&str, &[&str])]) {
    let actual: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
    let expected_names: Vec<&str> = expected.iter().map(|(n, _)| *n).collect();
    assert_eq!(actual, expected_names, "top-level categories mismatch");

    for (name, children) in expected {
        let node = tree
            .children
            .iter()
            .find(|c| c.name == *name)
            .unwrap_or_else(|| panic!("category '{name}' not found"));
        let actual_children: Vec<&str> = node.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            actual_children,
            children.to_vec(),
            "subcategories of '{name}' mismatch"
        );
    }
}
