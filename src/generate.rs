//! HTML site generation.
//!
//! Takes the scan [`Manifest`], builds the examples tree, applies the optional
//! build-time filter and writes the final static HTML site.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): Links to every section and the core
//!   reference classes
//! - **Examples page** (`/examples/index.html`): Category tree; each category
//!   is a collapsible section
//! - **Libraries page** (`/libraries/index.html`): Core libraries, then
//!   contributions grouped by category
//! - **Overview page** (`/overview/index.html`): Markdown converted to HTML
//! - **Reference pages** (`/reference/<Class>.html`, or
//!   `/reference/libraries/<lib>/<Class>.html` for other libraries)
//! - **Library indexes** (`/reference/libraries/<lib>/index.html`): One per
//!   core library, listing its classes
//! - **English fallbacks** (`/en/reference/...`): On a non-English site, the
//!   English page of each untranslated class
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── examples/
//! │   ├── index.html
//! │   └── Basics/Arrays/Array2D/Array2D.png    # Preview images (copied)
//! ├── libraries/index.html
//! ├── overview/index.html
//! └── reference/
//!     ├── PVector.html
//!     ├── processing/examples/PVector.png      # Sketch images (copied)
//!     └── libraries/sound/
//!         ├── index.html
//!         └── SinOsc.html
//! ```
//!
//! ## Filtering
//!
//! A build-time search term narrows both the examples tree and the
//! contributions list. When nothing matches, the page shows a "no results"
//! message instead of an empty list.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. Reference
//! descriptions are the one exception: they are authored HTML and inserted
//! verbatim.

use crate::config::{self, SiteConfig};
use crate::contributions::{Author, CategoryGroup, group_by_category};
use crate::filter::{filter_array, filter_tree};
use crate::naming::DEFAULT_LANG;
use crate::reference::{
    SidebarCategory, class_page_path, code_lines, english_page_path, english_page_url,
    library_index_path, member_href, related_label, sidebar, site_url,
};
use crate::scan::Manifest;
use crate::sections::Section;
use crate::tree::build_tree;
use crate::types::{CategoryNode, CoreLibrary, ExampleRecord, Page, ReferenceClass};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build-time choices that are not part of the site config.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Search term applied to examples and contributions. Blank = no filter.
    pub filter: String,
    /// Top-level example categories to render expanded.
    pub open: Vec<String>,
}

/// What was written, for CLI output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Examples on the examples page; `None` when the filter matched nothing.
    pub examples_shown: Option<usize>,
    pub overview: bool,
    /// `(class name, site-relative path)` per reference page, English
    /// fallbacks included.
    pub reference_pages: Vec<(String, String)>,
    /// `(library name, site-relative path)` per core library index.
    pub library_indexes: Vec<(String, String)>,
    pub images_copied: usize,
}

impl GenerateSummary {
    /// Home, examples and libraries always exist.
    pub fn page_count(&self) -> usize {
        3 + usize::from(self.overview) + self.reference_pages.len() + self.library_indexes.len()
    }
}

const CSS_STATIC: &str = include_str!("../static/style.css");

pub fn generate(
    manifest: &Manifest,
    source_root: &Path,
    output_dir: &Path,
    options: &GenerateOptions,
) -> Result<GenerateSummary, GenerateError> {
    let config = &manifest.config;
    let css = format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        config::generate_theme_css(&config.theme),
        CSS_STATIC
    );

    fs::create_dir_all(output_dir)?;
    let has_overview = manifest.overview.is_some();
    let core_sidebar = sidebar(&manifest.reference, &config.core_library);

    // Index page
    let index_html = render_index(manifest, &css);
    fs::write(output_dir.join("index.html"), index_html.into_string())?;

    // Examples page
    let tree = build_tree(&manifest.examples);
    let filtered = filter_tree(&tree, &options.filter);
    let examples_html = render_examples_page(
        filtered.as_deref(),
        &options.filter,
        &options.open,
        config,
        has_overview,
        &css,
    );
    let examples_dir = output_dir.join("examples");
    fs::create_dir_all(&examples_dir)?;
    fs::write(examples_dir.join("index.html"), examples_html.into_string())?;
    let examples_shown = filtered.as_ref().map(|t| t.item_count());

    let mut images_copied = 0;
    if let Some(shown) = filtered.as_deref() {
        for record in shown.iter_items() {
            if let Some(image) = &record.image {
                copy_asset(source_root, output_dir, &image.source_path)?;
                images_copied += 1;
            }
        }
    }

    // Libraries page
    let matched = filter_array(&manifest.contributions, &options.filter);
    let groups = matched.as_deref().map(group_by_category);
    let libraries_html = render_libraries_page(
        &manifest.core_libraries,
        groups.as_deref(),
        &options.filter,
        config,
        has_overview,
        &css,
    );
    let libraries_dir = output_dir.join("libraries");
    fs::create_dir_all(&libraries_dir)?;
    fs::write(libraries_dir.join("index.html"), libraries_html.into_string())?;

    // Overview page
    if let Some(overview) = &manifest.overview {
        let overview_dir = output_dir.join("overview");
        fs::create_dir_all(&overview_dir)?;
        let overview_html = render_overview_page(overview, config, &css);
        fs::write(overview_dir.join("index.html"), overview_html.into_string())?;
    }

    // Reference pages, rendered in parallel
    let english_config = SiteConfig {
        locale: DEFAULT_LANG.to_string(),
        ..config.clone()
    };
    let reference_pages = manifest
        .reference
        .par_iter()
        .map(|class| -> Result<(Vec<(String, String)>, usize), GenerateError> {
            let rel = class_page_path(&class.library, &class.name, &config.core_library);
            let page_sidebar =
                (class.library == config.core_library).then_some(core_sidebar.as_slice());
            let page_html = render_class_page(class, page_sidebar, config, has_overview, &css);
            write_page(output_dir, &rel, page_html)?;
            debug!("wrote {}", rel.display());
            let mut pages = vec![(class.name.clone(), relative_url(&rel))];

            if class.entry.is_none()
                && config.locale != DEFAULT_LANG
                && let Some(english) = &class.english
            {
                let fallback = ReferenceClass {
                    entry: Some(english.clone()),
                    ..class.clone()
                };
                let rel = english_page_path(&class.library, &class.name, &config.core_library);
                let page_html =
                    render_class_page(&fallback, page_sidebar, &english_config, has_overview, &css);
                write_page(output_dir, &rel, page_html)?;
                debug!("wrote English fallback {}", rel.display());
                pages.push((format!("{} ({DEFAULT_LANG})", class.name), relative_url(&rel)));
            }

            let mut copied = 0;
            for sketch in &class.examples {
                if let Some(image) = &sketch.image {
                    copy_asset(source_root, output_dir, &image.source_path)?;
                    copied += 1;
                }
            }
            Ok((pages, copied))
        })
        .collect::<Result<Vec<_>, GenerateError>>()?;

    // Core library indexes
    let mut library_indexes = Vec::new();
    for library in &manifest.core_libraries {
        let classes: Vec<&ReferenceClass> = manifest
            .reference
            .iter()
            .filter(|c| c.library == library.name)
            .collect();
        let rel = library_index_path(&library.name);
        let page_html = render_library_index(library, &classes, config, has_overview, &css);
        write_page(output_dir, &rel, page_html)?;
        library_indexes.push((library.name.clone(), relative_url(&rel)));
    }

    let images_copied = images_copied + reference_pages.iter().map(|(_, n)| n).sum::<usize>();
    let summary = GenerateSummary {
        examples_shown,
        overview: has_overview,
        reference_pages: reference_pages.into_iter().flat_map(|(pages, _)| pages).collect(),
        library_indexes,
        images_copied,
    };

    info!(
        pages = summary.page_count(),
        images = summary.images_copied,
        "site generated at {}",
        output_dir.display()
    );
    Ok(summary)
}

fn write_page(output_dir: &Path, rel: &Path, page: Markup) -> std::io::Result<()> {
    let path = output_dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, page.into_string())
}

/// Site-relative path as shown in CLI output (`reference/PVector.html`).
fn relative_url(rel: &Path) -> String {
    site_url(rel).trim_start_matches('/').to_string()
}

/// Copy a content-relative file to the same relative path under `output_dir`.
fn copy_asset(source_root: &Path, output_dir: &Path, rel: &str) -> std::io::Result<()> {
    let dst = output_dir.join(rel);
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source_root.join(rel), dst)?;
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    title: &str,
    config: &SiteConfig,
    css: &str,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(config.locale) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · " (config.site_title) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Renders the site header with the section links
fn site_header(config: &SiteConfig, current: &str, has_overview: bool) -> Markup {
    let link = |href: &str, label: &str, key: &str| {
        html! {
            li class=[(current == key).then_some("current")] {
                a href=(href) { (label) }
            }
        }
    };
    html! {
        header.site-header {
            a.site-title href="/" { (config.site_title) }
            nav.site-nav {
                ul {
                    (link("/examples/", "Examples", "examples"))
                    (link("/libraries/", "Libraries", "libraries"))
                    @if has_overview {
                        (link("/overview/", "Overview", "overview"))
                    }
                }
            }
        }
    }
}

/// A collapsible section: `<details>` open when the section is expanded.
fn section_block(section: &Section, heading: Markup, body: Markup) -> Markup {
    html! {
        details.section open[section.is_expanded()] {
            summary { (heading) }
            (body)
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the index page: section links and the core reference classes.
fn render_index(manifest: &Manifest, css: &str) -> Markup {
    let config = &manifest.config;
    let core: Vec<&ReferenceClass> = manifest
        .reference
        .iter()
        .filter(|c| c.library == config.core_library)
        .collect();

    let content = html! {
        (site_header(config, "", manifest.overview.is_some()))
        main.index-page {
            h1 { (config.site_title) }
            ul.section-links {
                li { a href="/examples/" { "Examples" } }
                li { a href="/libraries/" { "Libraries" } }
                @if manifest.overview.is_some() {
                    li { a href="/overview/" { "Overview" } }
                }
            }
            @if !core.is_empty() {
                h2 { "Reference" }
                ul.reference-index {
                    @for class in &core {
                        li {
                            a href=(site_url(&class_page_path(&class.library, &class.name, &config.core_library))) {
                                (class.name)
                            }
                        }
                    }
                }
            }
        }
    };

    base_document("Home", config, css, Some("index"), content)
}

/// Renders the examples page from an already filtered tree.
///
/// `None` renders the no-results state.
pub fn render_examples_page(
    tree: Option<&CategoryNode>,
    term: &str,
    open: &[String],
    config: &SiteConfig,
    has_overview: bool,
    css: &str,
) -> Markup {
    let term = term.trim();
    let content = html! {
        (site_header(config, "examples", has_overview))
        main.examples-page {
            h1 { "Examples" }
            @if !term.is_empty() {
                p.filter-term { "Showing examples matching “" (term) "”" }
            }
            @match tree {
                None => {
                    p.no-results { "No examples match “" (term) "”" }
                }
                Some(root) => {
                    @if !root.items.is_empty() {
                        (section_block(&Section::new(None), html! {}, example_grid(&root.items)))
                    }
                    @for category in &root.children {
                        (render_category(category, open, !term.is_empty(), 2))
                    }
                }
            }
        }
    };

    base_document("Examples", config, css, Some("examples"), content)
}

/// One category section. Top-level sections named in `open` start expanded,
/// and every section does when the page shows search results.
fn render_category(node: &CategoryNode, open: &[String], expand_all: bool, level: u8) -> Markup {
    let mut section = Section::new(Some(&node.name));
    let requested = expand_all || (level == 2 && open.iter().any(|o| o == &node.name));
    if requested && !section.is_expanded() {
        section.toggle();
    }

    let heading = html! {
        @if level == 2 {
            h2 { (node.name) }
        } @else {
            h3 { (node.name) }
        }
    };
    let body = html! {
        @if !node.items.is_empty() {
            (example_grid(&node.items))
        }
        @for child in &node.children {
            (render_category(child, open, expand_all, level.saturating_add(1)))
        }
    };

    section_block(&section, heading, body)
}

fn example_grid(items: &[ExampleRecord]) -> Markup {
    html! {
        ul.example-grid {
            @for item in items {
                li.example-card {
                    @if let Some(image) = &item.image {
                        img src={ "/" (image.source_path) } alt=(item.title) loading="lazy";
                    }
                    span.example-title { (item.title) }
                }
            }
        }
    }
}

/// Renders the libraries page.
///
/// `groups` is `None` when the filter matched no contribution.
pub fn render_libraries_page(
    core: &[CoreLibrary],
    groups: Option<&[CategoryGroup<'_>]>,
    term: &str,
    config: &SiteConfig,
    has_overview: bool,
    css: &str,
) -> Markup {
    let term = term.trim();
    let content = html! {
        (site_header(config, "libraries", has_overview))
        main.libraries-page {
            h1 { "Libraries" }
            @if !core.is_empty() {
                h2.category { "Core" }
                ul.library-list {
                    @for library in core {
                        li.library {
                            a href=(site_url(&library_index_path(&library.name))) {
                                h3 { (library.title) }
                            }
                            p.library-description { (library.description) }
                        }
                    }
                }
            }
            h1 { "Contributions" }
            @if !term.is_empty() {
                p.filter-term { "Showing libraries matching “" (term) "”" }
            }
            @match groups {
                None => {
                    p.no-results { "No libraries match “" (term) "”" }
                }
                Some(groups) => {
                    nav.category-nav {
                        ul {
                            @for group in groups {
                                li { a href={ "#" (group.category) } { (group.category) } }
                            }
                        }
                    }
                    @for group in groups {
                        h2.category id=(group.category) { (group.category) }
                        ul.library-list {
                            @for contribution in &group.contributions {
                                li.library {
                                    a href=(contribution.url) target="_blank" rel="noreferrer" {
                                        h3 { (contribution.name) }
                                    }
                                    @for author in contribution.authors.iter().map(|a| Author::parse(a)) {
                                        @if let Some(url) = &author.url {
                                            a.contribution-author href=(url) target="_blank" rel="noreferrer" {
                                                (author.name)
                                            }
                                        } @else {
                                            span.contribution-author { (author.name) }
                                        }
                                    }
                                    p.library-description { (contribution.sentence) }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base_document("Libraries", config, css, Some("libraries"), content)
}

/// Renders the overview page from markdown.
fn render_overview_page(page: &Page, config: &SiteConfig, css: &str) -> Markup {
    let parser = Parser::new(&page.body);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);

    let content = html! {
        (site_header(config, "overview", true))
        main.overview-page {
            article.overview-content {
                (PreEscaped(body_html))
            }
        }
    };

    base_document(&page.title, config, css, Some("overview"), content)
}

/// Renders a core library's class index.
fn render_library_index(
    library: &CoreLibrary,
    classes: &[&ReferenceClass],
    config: &SiteConfig,
    has_overview: bool,
    css: &str,
) -> Markup {
    let content = html! {
        (site_header(config, "libraries", has_overview))
        main.library-index {
            h1 { (library.title) }
            p.library-description { (library.description) }
            @if classes.is_empty() {
                p.no-results { "No reference entries for this library." }
            } @else {
                ul.ref-list {
                    @for class in classes {
                        li {
                            a href=(site_url(&class_page_path(&class.library, &class.name, &config.core_library))) {
                                (class.name)
                            }
                        }
                    }
                }
            }
        }
    };

    base_document(&library.title, config, css, Some("library-index"), content)
}

/// Renders the reference sidebar for core-library pages.
fn render_sidebar(categories: &[SidebarCategory<'_>], core_library: &str) -> Markup {
    let visible = Section::new(Some("Reference"));
    html! {
        aside.sidebar {
            details.sidebar-toggle open[visible.is_expanded()] {
                summary { "Reference" }
                @for category in categories {
                    (section_block(
                        &category.section,
                        html! { h3.sidebar-label { (category.section.label().unwrap_or_default()) } },
                        html! {
                            @for group in &category.groups {
                                (section_block(
                                    &group.section,
                                    html! {
                                        @if let Some(label) = group.section.label() {
                                            div.secondary-wrapper {
                                                span.expand-button { (group.section.marker()) }
                                                h4.sidebar-label { (label) }
                                            }
                                        }
                                    },
                                    html! {
                                        ul {
                                            @for class in &group.classes {
                                                li {
                                                    a href=(site_url(&class_page_path(&class.library, &class.name, core_library))) {
                                                        (class.name)
                                                    }
                                                }
                                            }
                                        }
                                    },
                                ))
                            }
                        },
                    ))
                }
            }
        }
    }
}

/// Renders one reference class page.
///
/// Sections with nothing to list are left out. A class without an entry in
/// the site locale links to its English page instead.
pub fn render_class_page(
    class: &ReferenceClass,
    sidebar: Option<&[SidebarCategory<'_>]>,
    config: &SiteConfig,
    has_overview: bool,
    css: &str,
) -> Markup {
    let content = html! {
        (site_header(config, "", has_overview))
        @if let Some(categories) = sidebar {
            (render_sidebar(categories, &config.core_library))
        }
        main.reference-page {
            @if let Some(entry) = &class.entry {
                div.ref-section {
                    h4 { "Class name" }
                    h3 { (entry.name) }
                }
                div.ref-section {
                    h4 { "Description" }
                    p.description { (PreEscaped(&entry.description)) }
                }
                @if !class.examples.is_empty() {
                    div.ref-section {
                        h4 { "Examples" }
                        ul.ref-list {
                            @for sketch in &class.examples {
                                li.example {
                                    pre.code-block {
                                        @for line in code_lines(&sketch.code) {
                                            code { (line) }
                                        }
                                    }
                                    @if let Some(image) = &sketch.image {
                                        img.example-image src={ "/" (image.source_path) } alt=(sketch.name);
                                    }
                                }
                            }
                        }
                    }
                }
                @if !entry.constructors.is_empty() {
                    div.ref-section {
                        h4 { "Constructors" }
                        ul.ref-list {
                            @for constructor in &entry.constructors {
                                li { code { (constructor) } }
                            }
                        }
                    }
                }
                @if !entry.class_fields.is_empty() {
                    div.ref-section {
                        h4 { "Fields" }
                        ul.ref-list {
                            @for field in &entry.class_fields {
                                li {
                                    a.item href=(member_href(&field.anchor)) { code { (field.name) } }
                                    span.item-description { (field.desc) }
                                }
                            }
                        }
                    }
                }
                @if !entry.methods.is_empty() {
                    div.ref-section {
                        h4 { "Methods" }
                        ul.ref-list {
                            @for method in &entry.methods {
                                li {
                                    a.item href=(member_href(&method.anchor)) { code { (method.name) } }
                                    span.item-description { (PreEscaped(&method.desc)) }
                                }
                            }
                        }
                    }
                }
                @if !entry.related.is_empty() {
                    div.ref-section {
                        h4 { "Related" }
                        ul.ref-list {
                            @for related in &entry.related {
                                li { a href={ (related) ".html" } { (related_label(related)) } }
                            }
                        }
                    }
                }
            } @else {
                div.untranslated {
                    @if class.english.is_some() {
                        "This page is not translated, please refer to the "
                        a href=(english_page_url(&class.library, &class.name, &config.core_library)) {
                            "english page"
                        }
                    } @else {
                        "This page is not translated."
                    }
                }
            }
        }
    };

    base_document(&class.name, config, css, Some("reference"), content)
}
