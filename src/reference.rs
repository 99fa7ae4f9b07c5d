//! Reference page helpers: link targets, labels and the sidebar layout.
//!
//! Core-library classes live at `/reference/<name>.html`; classes from other
//! libraries at `/reference/libraries/<library>/<name>.html`. Member links
//! (fields, methods) and related links are relative to the class page.
//!
//! On a non-English site, the English page of an untranslated class is
//! written under `/en/`, mirroring the localized path.

use std::path::{Path, PathBuf};

use crate::naming::DEFAULT_LANG;
use crate::sections::Section;
use crate::types::ReferenceClass;

/// Site-relative output path of a class page.
pub fn class_page_path(library: &str, name: &str, core_library: &str) -> PathBuf {
    if library == core_library {
        PathBuf::from("reference").join(format!("{name}.html"))
    } else {
        PathBuf::from("reference")
            .join("libraries")
            .join(library)
            .join(format!("{name}.html"))
    }
}

/// Site-relative output path of the English fallback page.
pub fn english_page_path(library: &str, name: &str, core_library: &str) -> PathBuf {
    Path::new(DEFAULT_LANG).join(class_page_path(library, name, core_library))
}

/// Absolute URL of the English page, linked from untranslated pages.
pub fn english_page_url(library: &str, name: &str, core_library: &str) -> String {
    site_url(&english_page_path(library, name, core_library))
}

/// Site-relative path of a library's class index.
pub fn library_index_path(library: &str) -> PathBuf {
    PathBuf::from("reference")
        .join("libraries")
        .join(library)
        .join("index.html")
}

/// Absolute URL for a site-relative path, `/`-separated on every platform.
pub fn site_url(rel: &Path) -> String {
    let segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("/{}", segments.join("/"))
}

/// Link to a field or method page.
pub fn member_href(anchor: &str) -> String {
    format!("{anchor}.html")
}

/// Display label of a related entry: `_` stands for `()`.
///
/// `size_` → `size()`, `PVector_add_` → `PVector()add()`.
pub fn related_label(related: &str) -> String {
    related.replace('_', "()")
}

/// Split example source into lines, accepting `\n` and `\r\n`.
pub fn code_lines(code: &str) -> Vec<&str> {
    code.lines().collect()
}

/// A subcategory group in the reference sidebar.
#[derive(Debug)]
pub struct SidebarGroup<'a> {
    pub section: Section,
    pub classes: Vec<&'a ReferenceClass>,
}

/// A category in the reference sidebar.
#[derive(Debug)]
pub struct SidebarCategory<'a> {
    pub section: Section,
    pub groups: Vec<SidebarGroup<'a>>,
}

/// Group core-library classes by category, then subcategory.
///
/// Grouping uses the English entry, so untranslated classes are listed too.
/// Method and field entries are skipped. Categories and subcategories keep
/// first-seen order; a blank subcategory becomes an unlabelled (always
/// expanded) group.
pub fn sidebar<'a>(classes: &'a [ReferenceClass], core_library: &str) -> Vec<SidebarCategory<'a>> {
    let mut categories: Vec<SidebarCategory<'a>> = Vec::new();

    for class in classes.iter().filter(|c| c.library == core_library) {
        let Some(entry) = class.english.as_ref().or(class.entry.as_ref()) else {
            continue;
        };
        if entry.is_member() {
            continue;
        }
        let category_label = entry.category.trim();
        let sub_label = entry.subcategory.trim();

        let idx = match categories
            .iter()
            .position(|c| c.section.label().unwrap_or("") == category_label)
        {
            Some(idx) => idx,
            None => {
                categories.push(SidebarCategory {
                    section: Section::new(Some(category_label)),
                    groups: Vec::new(),
                });
                categories.len() - 1
            }
        };
        let groups = &mut categories[idx].groups;

        let gidx = match groups
            .iter()
            .position(|g| g.section.label().unwrap_or("") == sub_label)
        {
            Some(gidx) => gidx,
            None => {
                groups.push(SidebarGroup {
                    section: Section::new(Some(sub_label)),
                    classes: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[gidx].classes.push(class);
    }

    categories
}
