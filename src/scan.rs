//! Content directory scanning and manifest generation.
//!
//! Walks the content tree and collects everything the site is built from into
//! a [`Manifest`]. Scanning only reads and reshapes data; building the
//! examples tree and filtering happen later.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                                 # Content root
//! ├── config.toml                          # Site configuration (optional)
//! ├── overview.md                          # Overview page (optional)
//! ├── examples/
//! │   ├── Basics/Arrays/Array2D/
//! │   │   ├── Array2D.json                 # {"name": ..., "title": ...}
//! │   │   ├── Array2D.es.json              # Translation (ignored for the tree)
//! │   │   ├── Array2D.png                  # Preview image (same stem)
//! │   │   └── data/                        # Sketch assets, never scanned
//! │   └── Topics/Motion/Bounce/
//! │       └── Bounce.json
//! ├── contributions/
//! │   ├── en/fisica.json                   # {"type": "library", "name", "url", ...}
//! │   └── es/fisica.json                   # {"sentence": ...}
//! ├── libraries/
//! │   └── core.json                        # [{"name", "title", "description"}]
//! └── reference/
//!     ├── processing/                      # One directory per library
//!     │   ├── PVector.json
//!     │   ├── PVector.es.json
//!     │   ├── PVector_add_.json             # "type": "method", not a class
//!     │   └── examples/
//!     │       ├── PVector.pde
//!     │       ├── PVector.png
//!     │       └── PVector_1.pde
//!     └── sound/
//!         └── SinOsc.json
//! ```
//!
//! ## Example Paths
//!
//! An example's category path is its directory relative to `examples/`, split
//! into segments. Sketches conventionally live in a folder named after
//! themselves; that last segment is dropped, so `Basics/Arrays/Array2D/
//! Array2D.json` is filed under `Basics / Arrays`.
//!
//! Every optional directory may be missing; the matching manifest field is
//! then empty.

use crate::config::{self, SiteConfig};
use crate::contributions::{self, ContributionFile, RawContribution};
use crate::naming::{DEFAULT_LANG, parse_file_name, sketch_belongs_to};
use crate::types::{
    CoreLibrary, ExampleRecord, ImageRef, LibraryContribution, Page, ReferenceClass,
    ReferenceEntry, SketchExample,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Everything the site is built from.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub examples: Vec<ExampleRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub core_libraries: Vec<CoreLibrary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contributions: Vec<LibraryContribution>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference: Vec<ReferenceClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<Page>,
    pub config: SiteConfig,
}

/// Fields read from an example's JSON file.
#[derive(Debug, Default, Deserialize)]
struct ExampleJson {
    #[serde(default)]
    name: String,
    #[serde(default)]
    title: String,
}

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    // Load site config (uses defaults if config.toml doesn't exist)
    let config = config::load_config(root)?;

    let examples = scan_examples(root)?;
    let core_libraries = scan_core_libraries(root)?;
    let contributions = scan_contributions(root, &config.locale)?;
    let reference = scan_reference(root, &config.locale)?;
    let overview = parse_overview(root)?;

    info!(
        examples = examples.len(),
        contributions = contributions.len(),
        reference = reference.len(),
        "scanned {}",
        root.display()
    );

    Ok(Manifest {
        examples,
        core_libraries,
        contributions,
        reference,
        overview,
        config,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ScanError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| ScanError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Join path components with `/`, independent of the host separator.
fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// First image in `dir` whose stem is `stem`, as a content-relative path.
fn find_image(dir: &Path, stem: &str, root: &Path) -> Result<Option<ImageRef>, ScanError> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name().is_some_and(|name| {
                    let parsed = parse_file_name(&name.to_string_lossy());
                    parsed.stem == stem && IMAGE_EXTENSIONS.contains(&parsed.extension.as_str())
                })
        })
        .collect();
    candidates.sort();

    Ok(candidates.first().and_then(|p| {
        p.strip_prefix(root).ok().map(|rel| ImageRef {
            source_path: slash_path(rel),
        })
    }))
}

// ============================================================================
// Examples
// ============================================================================

/// Collect English example records, ordered by their relative directory.
pub fn scan_examples(root: &Path) -> Result<Vec<ExampleRecord>, ScanError> {
    let dir = root.join("examples");
    if !dir.is_dir() {
        debug!("no examples directory in {}", root.display());
        return Ok(Vec::new());
    }

    // Keyed by (directory, stem): `Name.json` and `Name.en.json` are one example.
    let mut found: BTreeMap<(String, String), ExampleRecord> = BTreeMap::new();

    let walker = WalkDir::new(&dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            e.depth() == 0 || (!is_hidden(&name) && !(e.file_type().is_dir() && name == "data"))
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let parsed = parse_file_name(&entry.file_name().to_string_lossy());
        if parsed.extension != "json" || !parsed.is_lang(DEFAULT_LANG) {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(&dir) else {
            continue;
        };
        let rel_dir = rel.parent().map(slash_path).unwrap_or_default();
        let key = (rel_dir.clone(), parsed.stem.clone());
        if parsed.lang.is_some() && found.contains_key(&key) {
            continue;
        }
        let mut path: Vec<String> = rel_dir
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if path.last() == Some(&parsed.stem) {
            path.pop();
        }

        let data: ExampleJson = read_json(entry.path())?;
        let name = if data.name.trim().is_empty() {
            parsed.stem.clone()
        } else {
            data.name
        };
        let title = if data.title.trim().is_empty() {
            warn!("example {} has no title, using its name", entry.path().display());
            name.clone()
        } else {
            data.title
        };

        let image = match entry.path().parent() {
            Some(parent) => find_image(parent, &parsed.stem, root)?,
            None => None,
        };

        debug!(name = %name, path = %path.join("/"), "found example");
        found.insert(
            key,
            ExampleRecord {
                name,
                path,
                title,
                image,
            },
        );
    }

    Ok(found.into_values().collect())
}

// ============================================================================
// Libraries and contributions
// ============================================================================

fn scan_core_libraries(root: &Path) -> Result<Vec<CoreLibrary>, ScanError> {
    let path = root.join("libraries").join("core.json");
    if !path.is_file() {
        return Ok(Vec::new());
    }
    read_json(&path)
}

fn read_contribution_dir(dir: &Path) -> Result<Vec<ContributionFile>, ScanError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("json"))
                    .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut files = Vec::new();
    for path in paths {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let data: RawContribution = read_json(&path)?;
        files.push(ContributionFile { stem, data });
    }
    Ok(files)
}

fn scan_contributions(root: &Path, locale: &str) -> Result<Vec<LibraryContribution>, ScanError> {
    let dir = root.join("contributions");
    let english = read_contribution_dir(&dir.join(DEFAULT_LANG))?;
    let localized = if locale == DEFAULT_LANG {
        Vec::new()
    } else {
        read_contribution_dir(&dir.join(locale))?
    };
    Ok(contributions::prepare_contributions(
        &english, &localized, locale,
    ))
}

// ============================================================================
// Reference
// ============================================================================

/// Per-class entries found in one library directory, keyed by class name.
#[derive(Default)]
struct ClassFiles {
    english: Option<ReferenceEntry>,
    localized: Option<ReferenceEntry>,
}

fn scan_reference(root: &Path, locale: &str) -> Result<Vec<ReferenceClass>, ScanError> {
    let dir = root.join("reference");
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut libraries: Vec<PathBuf> = fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    libraries.sort();

    let mut classes = Vec::new();
    for library_dir in libraries {
        let library = library_dir
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if is_hidden(&library) {
            continue;
        }
        classes.extend(scan_library_reference(root, &library_dir, &library, locale)?);
    }
    Ok(classes)
}

fn scan_library_reference(
    root: &Path,
    library_dir: &Path,
    library: &str,
    locale: &str,
) -> Result<Vec<ReferenceClass>, ScanError> {
    let mut by_name: BTreeMap<String, ClassFiles> = BTreeMap::new();

    let mut paths: Vec<PathBuf> = fs::read_dir(library_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    for path in paths {
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        let parsed = parse_file_name(&file_name);
        if parsed.extension != "json" || is_hidden(&file_name) {
            continue;
        }

        let is_english = parsed.is_lang(DEFAULT_LANG);
        let is_locale = parsed.is_lang(locale);
        if !is_english && !is_locale {
            continue;
        }

        let entry: ReferenceEntry = read_json(&path)?;
        let files = by_name.entry(parsed.stem).or_default();
        if is_english {
            files.english = Some(entry.clone());
        }
        if is_locale {
            files.localized = Some(entry);
        }
    }

    let examples_dir = library_dir.join("examples");
    let sketches = collect_sketches(root, &examples_dir)?;

    let mut classes = Vec::new();
    for (name, files) in by_name {
        let is_member = files
            .english
            .iter()
            .chain(files.localized.iter())
            .any(ReferenceEntry::is_member);
        if is_member {
            debug!("{library}/{name} is a member page, not a class");
            continue;
        }

        let english = files.english;
        let entry = if locale == DEFAULT_LANG {
            english.clone()
        } else {
            if files.localized.is_none() {
                debug!("{library}/{name} has no {locale} translation");
            }
            files.localized
        };
        let examples = sketches
            .iter()
            .filter(|s| sketch_belongs_to(&s.name, &name))
            .cloned()
            .collect();
        classes.push(ReferenceClass {
            library: library.to_string(),
            name,
            entry,
            english,
            examples,
        });
    }
    Ok(classes)
}

/// All `.pde` sketches in a reference examples directory, sorted by name.
fn collect_sketches(root: &Path, dir: &Path) -> Result<Vec<SketchExample>, ScanError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("pde"))
                    .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut sketches = Vec::new();
    for path in paths {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let code = fs::read_to_string(&path)?;
        let image = find_image(dir, &name, root)?;
        sketches.push(SketchExample { name, code, image });
    }
    Ok(sketches)
}

// ============================================================================
// Overview page
// ============================================================================

/// Parse `overview.md` from the content root, if present.
///
/// The title comes from the first `# heading`, falling back to "Overview".
fn parse_overview(root: &Path) -> Result<Option<Page>, ScanError> {
    let path = root.join("overview.md");
    if !path.is_file() {
        return Ok(None);
    }

    let body = fs::read_to_string(&path)?;
    let title = body
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .unwrap_or_else(|| "Overview".to_string());

    Ok(Some(Page { title, body }))
}
