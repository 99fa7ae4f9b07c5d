//! # Sketch Index
//!
//! Browsing and search for a creative-coding documentation site. The content
//! directory holds example sketches, library listings and API reference
//! entries as JSON files; this crate turns them into a category tree that can
//! be searched from the terminal and rendered into a static HTML site.
//!
//! # Architecture: Scan, Filter, Generate
//!
//! ```text
//! 1. Scan      content/  →  Manifest          (filesystem → structured data)
//! 2. Filter    Manifest  →  CategoryNode      (tree of examples, pruned by a term)
//! 3. Generate  Manifest  →  dist/             (final HTML site)
//! ```
//!
//! Scan output is plain serde data, printable as JSON with `scan --json`.
//! Filtering is pure and never touches the filesystem, so the interactive
//! search and the build share the same code path.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the content directory and produces the [`scan::Manifest`] |
//! | [`tree`] | Builds the category tree from flat example records |
//! | [`filter`] | Case-insensitive search over the tree and the contributions list |
//! | [`sections`] | Expand/collapse state for category sections and sidebar labels |
//! | [`contributions`] | Library contribution preparation, localization and grouping |
//! | [`reference`] | Reference page paths, link labels and the sidebar layout |
//! | [`generate`] | Renders the HTML site using Maud |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Shared serde types (`ExampleRecord`, `CategoryNode`, `ReferenceEntry`) |
//! | [`naming`] | `name[.lang].ext` filename convention parser |
//! | [`output`] | CLI output formatting — tree-based display of results |
//!
//! # Design Decisions
//!
//! ## Pruning Instead of Flattening
//!
//! A search keeps the category structure: a match deep in the tree keeps every
//! ancestor, and categories with no match below them disappear. The result is
//! either a tree with at least one example or `None`, never an empty tree, so
//! callers have one "no results" case to handle.
//!
//! ## Locale Fallback
//!
//! Every content file may have localized siblings (`Array2D.es.json`). The
//! example tree is always built from the English files. Contributions take a
//! translated sentence when one exists, while reference pages without a
//! translation link to the English page instead of silently showing English
//! text.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Malformed markup is a build error and all interpolation is
//! auto-escaped; only authored reference descriptions are inserted raw.

pub mod config;
pub mod contributions;
pub mod filter;
pub mod generate;
pub mod naming;
pub mod output;
pub mod reference;
pub mod scan;
pub mod sections;
pub mod tree;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
