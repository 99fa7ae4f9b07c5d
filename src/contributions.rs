//! Library contributions: locale merging, category grouping, author links.
//!
//! Contributions are authored in English. A translation file carries only a
//! localized `sentence`; every other field comes from the English record.
//! The libraries page lists contributions under each of their categories, so
//! one library may appear several times.

use serde::Deserialize;

use crate::naming::DEFAULT_LANG;
use crate::types::LibraryContribution;

/// A contribution file as read from disk, before locale merging.
#[derive(Debug, Clone, Deserialize)]
pub struct RawContribution {
    /// Only `"library"` entries are listed on the libraries page.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub sentence: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A raw contribution paired with its file stem, used to match translations.
#[derive(Debug, Clone)]
pub struct ContributionFile {
    pub stem: String,
    pub data: RawContribution,
}

/// Merge English contributions with a locale's translated sentences.
///
/// Non-library entries are dropped. For a non-English locale, a translation
/// with the same file stem and a non-empty sentence replaces the English one.
pub fn prepare_contributions(
    english: &[ContributionFile],
    localized: &[ContributionFile],
    locale: &str,
) -> Vec<LibraryContribution> {
    english
        .iter()
        .filter(|f| f.data.kind == "library")
        .map(|f| {
            let sentence = if locale == DEFAULT_LANG {
                None
            } else {
                localized
                    .iter()
                    .find(|l| l.stem == f.stem && !l.data.sentence.trim().is_empty())
                    .map(|l| l.data.sentence.clone())
            };
            LibraryContribution {
                name: f.data.name.clone(),
                url: f.data.url.clone(),
                authors: f.data.authors.clone(),
                sentence: sentence.unwrap_or_else(|| f.data.sentence.clone()),
                categories: dedup_preserving_order(f.data.categories.iter()),
            }
        })
        .collect()
}

fn dedup_preserving_order<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.contains(value) {
            seen.push(value.clone());
        }
    }
    seen
}

/// Every category used by `contributions`, first-seen order, no duplicates.
pub fn unique_categories(contributions: &[&LibraryContribution]) -> Vec<String> {
    dedup_preserving_order(contributions.iter().flat_map(|c| c.categories.iter()))
}

/// Contributions listed under one category heading.
#[derive(Debug)]
pub struct CategoryGroup<'a> {
    pub category: String,
    pub contributions: Vec<&'a LibraryContribution>,
}

/// Group contributions under each of their categories.
///
/// Categories appear in [`unique_categories`] order; within a category the
/// contributions keep their input order.
pub fn group_by_category<'a>(contributions: &[&'a LibraryContribution]) -> Vec<CategoryGroup<'a>> {
    unique_categories(contributions)
        .into_iter()
        .map(|category| {
            let members = contributions
                .iter()
                .copied()
                .filter(|c| c.categories.contains(&category))
                .collect();
            CategoryGroup {
                category,
                contributions: members,
            }
        })
        .collect()
}

/// An author parsed from a `[Name](https://url)` link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub url: Option<String>,
}

impl Author {
    /// Parse a markdown-style author link. Text that is not a link becomes a
    /// name with no URL.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let link = raw.strip_prefix('[').and_then(|rest| {
            let (name, rest) = rest.split_once("](")?;
            let url = rest.strip_suffix(')')?;
            Some((name, url))
        });

        match link {
            Some((name, url)) => Self {
                name: name.trim().to_string(),
                url: Some(url.trim().to_string()).filter(|u| !u.is_empty()),
            },
            None => Self {
                name: raw.to_string(),
                url: None,
            },
        }
    }
}
