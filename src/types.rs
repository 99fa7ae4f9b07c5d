//! Shared data types passed between scan, the filtering core and generation.
//!
//! Everything here is plain data: built once per scan, never mutated after,
//! serialized to JSON by the `scan --json` inspection output.

use serde::{Deserialize, Serialize};

/// Content-relative path to an image file (e.g. a sketch preview).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub source_path: String,
}

/// One example sketch, tagged with the category path it lives under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleRecord {
    /// File name stem, also the sketch identifier (`Array2D`).
    pub name: String,
    /// Category segments, outermost first (`["Basics", "Arrays"]`).
    #[serde(default)]
    pub path: Vec<String>,
    /// Display title from the example's JSON (`Array 2D`).
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

/// A category in the examples tree.
///
/// The root is a node with an empty name. Child names are unique among
/// siblings and keep the order in which they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ExampleRecord>,
}

/// A third-party library contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryContribution {
    pub name: String,
    pub url: String,
    /// Markdown-style author links: `[Name](https://url)`.
    #[serde(default)]
    pub authors: Vec<String>,
    /// One-line description.
    #[serde(default)]
    pub sentence: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A library shipped with the core distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreLibrary {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A class field or method listed on a reference page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub anchor: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
}

/// A class reference entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    pub name: String,
    /// `class` (or blank) for class pages; `method` and `field` entries are
    /// member pages and never listed as classes.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Trusted HTML.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub constructors: Vec<String>,
    #[serde(default)]
    pub class_fields: Vec<Member>,
    #[serde(default)]
    pub methods: Vec<Member>,
    #[serde(default)]
    pub related: Vec<String>,
}

impl ReferenceEntry {
    pub fn is_member(&self) -> bool {
        matches!(self.kind.trim(), "method" | "field")
    }
}

/// A markdown page (the overview).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Title from first `# heading` in markdown, or the file stem as fallback
    pub title: String,
    /// Raw markdown content
    pub body: String,
}

/// An example sketch shown on a reference page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SketchExample {
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

/// A reference class as resolved for the site locale.
///
/// `entry` is `None` when the class has no translation for the configured
/// locale. `english` is always the English entry, used for sidebar grouping
/// and for the fallback page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceClass {
    /// Library the class belongs to (`processing` for the core API).
    pub library: String,
    pub name: String,
    pub entry: Option<ReferenceEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<ReferenceEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<SketchExample>,
}
