//! Centralized filename parsing for localized content files.
//!
//! Every data file in the content tree (examples, contributions, reference
//! entries) follows the same pattern: a stem, an optional language tag and an
//! extension. English is the default language and may be written either way:
//!
//! - `Array2D.json` → stem="Array2D", lang=None (English)
//! - `Array2D.en.json` → stem="Array2D", lang=Some("en")
//! - `Array2D.es.json` → stem="Array2D", lang=Some("es")
//! - `PVector_add_.json` → stem="PVector_add_", lang=None
//!
//! Example sketches attached to reference entries use a numbered suffix:
//! `PVector.pde`, `PVector_1.pde`, `PVector_2.pde` all belong to `PVector`.

/// The language every translation falls back to.
pub const DEFAULT_LANG: &str = "en";

/// Result of parsing a content filename like `Array2D.es.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// File name without language tag and extension.
    pub stem: String,
    /// Language tag if present (`es`, `zh-CN`).
    pub lang: Option<String>,
    /// Lowercased extension, empty when the file has none.
    pub extension: String,
}

impl ParsedName {
    /// Effective language: the explicit tag, or English.
    pub fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or(DEFAULT_LANG)
    }

    pub fn is_lang(&self, lang: &str) -> bool {
        self.lang() == lang
    }
}

/// Parse a filename following the `stem[.lang].ext` convention.
pub fn parse_file_name(file_name: &str) -> ParsedName {
    let (rest, extension) = match file_name.rsplit_once('.') {
        Some((rest, ext)) if !rest.is_empty() => (rest, ext.to_lowercase()),
        _ => (file_name, String::new()),
    };

    if let Some((stem, tag)) = rest.rsplit_once('.')
        && !stem.is_empty()
        && is_lang_tag(tag)
    {
        return ParsedName {
            stem: stem.to_string(),
            lang: Some(tag.to_string()),
            extension,
        };
    }

    ParsedName {
        stem: rest.to_string(),
        lang: None,
        extension,
    }
}

/// `xx` or `xx-YY`, lowercase language plus optional uppercase region.
fn is_lang_tag(tag: &str) -> bool {
    let (lang, region) = match tag.split_once('-') {
        Some((l, r)) => (l, Some(r)),
        None => (tag, None),
    };
    let lang_ok = lang.len() == 2 && lang.chars().all(|c| c.is_ascii_lowercase());
    let region_ok = region
        .map(|r| r.len() == 2 && r.chars().all(|c| c.is_ascii_uppercase()))
        .unwrap_or(true);
    lang_ok && region_ok
}

/// Whether a sketch file stem belongs to the reference entry `name`.
///
/// Matches `name` itself and `name_<digits>`.
pub fn sketch_belongs_to(stem: &str, name: &str) -> bool {
    match stem.strip_prefix(name) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('_')
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit())),
        None => false,
    }
}
