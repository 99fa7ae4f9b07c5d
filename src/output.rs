//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (category, example, library, class) is its semantic
//! identity — positional index and title — with file names shown as secondary
//! context via indented `Source:` lines.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Examples
//! 001 Basics
//!     001 Arrays (2 examples)
//!         001 Array 2D
//!             Source: Array2D
//!         002 Array Objects
//!             Source: ArrayObjects
//!
//! Libraries
//!     2 core, 2 contributions in 3 categories
//!
//! Reference
//! 001 processing (2 classes)
//!     001 PImage
//!     002 PVector
//! ```
//!
//! ## Search
//!
//! ```text
//! 001 Basics
//!     001 Arrays (2 examples)
//!         001 Array 2D
//!         002 Array Objects
//! 2 examples match "array"
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure — no I/O, no side effects.

use crate::contributions::{Author, CategoryGroup};
use crate::generate::GenerateSummary;
use crate::scan::Manifest;
use crate::types::CategoryNode;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Format a category header: index + name, with the item count for
/// categories that hold items directly.
///
/// ```text
/// 001 Basics
/// 002 Arrays (2 examples)
/// ```
fn category_header(index: usize, name: &str, count: usize) -> String {
    if count == 0 {
        format!("{} {}", format_index(index), name)
    } else {
        format!(
            "{} {} ({})",
            format_index(index),
            name,
            plural(count, "example", "examples")
        )
    }
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

// ============================================================================
// Tree walker
// ============================================================================

/// Format a category tree: categories with positional indices per sibling
/// level, items listed under their category before its subcategories.
///
/// `with_sources` adds a `Source:` line naming each example.
pub fn format_tree(root: &CategoryNode, with_sources: bool) -> Vec<String> {
    let mut lines = Vec::new();
    format_items(root, 0, with_sources, &mut lines);
    for (i, child) in root.children.iter().enumerate() {
        format_category(child, i + 1, 0, with_sources, &mut lines);
    }
    lines
}

fn format_category(
    node: &CategoryNode,
    position: usize,
    depth: usize,
    with_sources: bool,
    lines: &mut Vec<String>,
) {
    lines.push(format!(
        "{}{}",
        indent(depth),
        category_header(position, &node.name, node.items.len())
    ));
    format_items(node, depth + 1, with_sources, lines);
    for (i, child) in node.children.iter().enumerate() {
        format_category(child, i + 1, depth + 1, with_sources, lines);
    }
}

fn format_items(node: &CategoryNode, depth: usize, with_sources: bool, lines: &mut Vec<String>) {
    for (i, item) in node.items.iter().enumerate() {
        lines.push(format!(
            "{}{} {}",
            indent(depth),
            format_index(i + 1),
            item.title
        ));
        if with_sources {
            lines.push(format!("{}    Source: {}", indent(depth), item.name));
        }
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Format scan output: examples tree, libraries summary, reference classes.
pub fn format_scan_output(
    manifest: &Manifest,
    tree: &CategoryNode,
    source_root: &Path,
) -> Vec<String> {
    let mut lines = vec!["Examples".to_string()];
    if tree.is_empty() {
        lines.push("    (none)".to_string());
    } else {
        lines.extend(format_tree(tree, true));
    }

    lines.push(String::new());
    lines.push("Libraries".to_string());
    let category_count = {
        let refs: Vec<_> = manifest.contributions.iter().collect();
        crate::contributions::unique_categories(&refs).len()
    };
    lines.push(format!(
        "    {} core, {} in {}",
        manifest.core_libraries.len(),
        plural(
            manifest.contributions.len(),
            "contribution",
            "contributions"
        ),
        plural(category_count, "category", "categories")
    ));

    if !manifest.reference.is_empty() {
        lines.push(String::new());
        lines.push("Reference".to_string());

        let mut libraries: Vec<&str> = Vec::new();
        for class in &manifest.reference {
            if !libraries.contains(&class.library.as_str()) {
                libraries.push(&class.library);
            }
        }
        for (i, library) in libraries.iter().enumerate() {
            let classes: Vec<_> = manifest
                .reference
                .iter()
                .filter(|c| c.library == *library)
                .collect();
            lines.push(format!(
                "{} {} ({})",
                format_index(i + 1),
                library,
                plural(classes.len(), "class", "classes")
            ));
            for (j, class) in classes.iter().enumerate() {
                let marker = if class.entry.is_none() {
                    " (untranslated)"
                } else {
                    ""
                };
                lines.push(format!(
                    "    {} {}{}",
                    format_index(j + 1),
                    class.name,
                    marker
                ));
                if !class.examples.is_empty() {
                    lines.push(format!(
                        "        {}",
                        plural(class.examples.len(), "sketch", "sketches")
                    ));
                }
            }
        }
    }

    if let Some(overview) = &manifest.overview {
        lines.push(String::new());
        lines.push("Pages".to_string());
        lines.push(format!("    001 {}", overview.title));
        lines.push("        Source: overview.md".to_string());
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push("    config.toml".to_string());
    }
    lines.push(format!("    locale: {}", manifest.config.locale));

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, tree: &CategoryNode, source_root: &Path) {
    for line in format_scan_output(manifest, tree, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Search
// ============================================================================

/// Format a filtered examples tree. `None` is the no-match state.
pub fn format_search_output(term: &str, result: Option<&CategoryNode>) -> Vec<String> {
    match result {
        None => vec![format!("No examples match \"{}\"", term.trim())],
        Some(tree) => {
            let mut lines = format_tree(tree, false);
            let count = plural(tree.item_count(), "example", "examples");
            if term.trim().is_empty() {
                lines.push(count);
            } else {
                let verb = if tree.item_count() == 1 { "matches" } else { "match" };
                lines.push(format!("{} {} \"{}\"", count, verb, term.trim()));
            }
            lines
        }
    }
}

pub fn print_search_output(term: &str, result: Option<&CategoryNode>) {
    for line in format_search_output(term, result) {
        println!("{}", line);
    }
}

// ============================================================================
// Libraries
// ============================================================================

/// Format contributions grouped by category. `None` is the no-match state.
pub fn format_libraries_output(term: &str, groups: Option<&[CategoryGroup<'_>]>) -> Vec<String> {
    let Some(groups) = groups else {
        return vec![format!("No libraries match \"{}\"", term.trim())];
    };

    let mut lines = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(group.category.clone());
        for (j, contribution) in group.contributions.iter().enumerate() {
            let authors: Vec<String> = contribution
                .authors
                .iter()
                .map(|a| Author::parse(a).name)
                .collect();
            if authors.is_empty() {
                lines.push(format!("    {} {}", format_index(j + 1), contribution.name));
            } else {
                lines.push(format!(
                    "    {} {} by {}",
                    format_index(j + 1),
                    contribution.name,
                    authors.join(", ")
                ));
            }
            let sentence = truncate_desc(strip_html_tags(&contribution.sentence).trim(), 60);
            if !sentence.is_empty() {
                lines.push(format!("        {}", sentence));
            }
        }
    }
    lines
}

pub fn print_libraries_output(term: &str, groups: Option<&[CategoryGroup<'_>]>) {
    for line in format_libraries_output(term, groups) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format the list of generated pages.
///
/// ```text
/// Home → index.html
/// Examples → examples/index.html (5 examples)
/// Libraries → libraries/index.html
///     001 pdf → reference/libraries/pdf/index.html
/// Overview → overview/index.html
/// Reference
///     001 PImage → reference/PImage.html
///
/// Generated 6 pages
/// ```
pub fn format_generate_output(summary: &GenerateSummary) -> Vec<String> {
    let mut lines = vec!["Home → index.html".to_string()];

    match summary.examples_shown {
        Some(n) => lines.push(format!(
            "Examples → examples/index.html ({})",
            plural(n, "example", "examples")
        )),
        None => lines.push("Examples → examples/index.html (no matches)".to_string()),
    }
    lines.push("Libraries → libraries/index.html".to_string());
    for (i, (name, path)) in summary.library_indexes.iter().enumerate() {
        lines.push(format!("    {} {} → {}", format_index(i + 1), name, path));
    }
    if summary.overview {
        lines.push("Overview → overview/index.html".to_string());
    }

    if !summary.reference_pages.is_empty() {
        lines.push("Reference".to_string());
        for (i, (name, path)) in summary.reference_pages.iter().enumerate() {
            lines.push(format!(
                "    {} {} → {}",
                format_index(i + 1),
                name,
                path
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, copied {}",
        plural(summary.page_count(), "page", "pages"),
        plural(summary.images_copied, "image", "images")
    ));
    lines
}

pub fn print_generate_output(summary: &GenerateSummary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}
