//! Search-term filtering for the examples tree and the contributions list.
//!
//! Both filters use the same rule: a case-insensitive substring match of the
//! trimmed term. Both use the same "no results" representation: `None`. An
//! empty result is never returned as an empty root or an empty list, so a
//! caller can always tell "nothing matched" apart from "nothing to show yet".
//!
//! | Term | [`filter_tree`] | [`filter_array`] |
//! |------|-----------------|------------------|
//! | empty / whitespace | `Some(Cow::Borrowed(root))` | `Some(all records)` |
//! | matches somewhere | `Some(Cow::Owned(pruned))` | `Some(matching records)` |
//! | matches nothing | `None` | `None` |
//!
//! ## What an example matches on
//!
//! An example matches when the term is found in its name, its title, or any
//! segment of its category path. Searching for `"array"` therefore keeps every
//! example filed under `Arrays`, not only those whose own name says so.

use std::borrow::Cow;

use crate::types::{CategoryNode, ExampleRecord, LibraryContribution};

/// A normalized search term. `None` when the raw term is blank.
fn normalize(term: &str) -> Option<String> {
    let trimmed = term.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Whether an example matches an already-normalized term.
fn example_matches(record: &ExampleRecord, needle: &str) -> bool {
    contains(&record.name, needle)
        || contains(&record.title, needle)
        || record.path.iter().any(|segment| contains(segment, needle))
}

/// Whether a contribution matches an already-normalized term.
fn contribution_matches(record: &LibraryContribution, needle: &str) -> bool {
    contains(&record.name, needle) || contains(&record.sentence, needle)
}

/// Whether `record` matches `term`. A blank term matches everything.
pub fn matches_example(record: &ExampleRecord, term: &str) -> bool {
    normalize(term).is_none_or(|needle| example_matches(record, &needle))
}

/// Filter the examples tree down to matching items and their ancestors.
///
/// Returns the input unchanged for a blank term and `None` when nothing in
/// the tree matches.
pub fn filter_tree<'a>(root: &'a CategoryNode, term: &str) -> Option<Cow<'a, CategoryNode>> {
    let Some(needle) = normalize(term) else {
        return Some(Cow::Borrowed(root));
    };
    prune(root, &needle).map(Cow::Owned)
}

/// Children are decided first; a node survives if any child survived or any
/// of its own items matches.
fn prune(node: &CategoryNode, needle: &str) -> Option<CategoryNode> {
    let children: Vec<CategoryNode> = node
        .children
        .iter()
        .filter_map(|child| prune(child, needle))
        .collect();

    let items: Vec<ExampleRecord> = node
        .items
        .iter()
        .filter(|item| example_matches(item, needle))
        .cloned()
        .collect();

    if children.is_empty() && items.is_empty() {
        return None;
    }

    Some(CategoryNode {
        name: node.name.clone(),
        children,
        items,
    })
}

/// Filter contributions by name and description, keeping their order.
///
/// Returns every record for a blank term and `None` when nothing matches.
pub fn filter_array<'a>(
    records: &'a [LibraryContribution],
    term: &str,
) -> Option<Vec<&'a LibraryContribution>> {
    let Some(needle) = normalize(term) else {
        return Some(records.iter().collect());
    };
    let matched: Vec<&LibraryContribution> = records
        .iter()
        .filter(|r| contribution_matches(r, &needle))
        .collect();
    (!matched.is_empty()).then_some(matched)
}

/// Memo of the most recent filter result over one tree.
///
/// Interactive search re-runs the filter on every input; asking again for
/// the term that was just computed returns the stored result instead.
#[derive(Debug)]
pub struct SearchCache<'a> {
    tree: &'a CategoryNode,
    last: Option<(String, Option<CategoryNode>)>,
    hits: usize,
}

impl<'a> SearchCache<'a> {
    pub fn new(tree: &'a CategoryNode) -> Self {
        Self {
            tree,
            last: None,
            hits: 0,
        }
    }

    /// Filtered view for `term`; `None` means no matches.
    pub fn search(&mut self, term: &str) -> Option<&CategoryNode> {
        let Some(needle) = normalize(term) else {
            return Some(self.tree);
        };

        let cached = matches!(&self.last, Some((last, _)) if *last == needle);
        if cached {
            self.hits += 1;
        } else {
            let result = prune(self.tree, &needle);
            self.last = Some((needle, result));
        }

        self.last.as_ref().and_then(|(_, result)| result.as_ref())
    }

    /// Number of searches answered from the memo.
    pub fn hits(&self) -> usize {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::tree::build_tree;

    fn scenario_tree() -> CategoryNode {
        build_tree(&[
            example("Bounce", &["Arrays"]),
            example("Array2D", &["Arrays"]),
            example("Logo", &["Shape"]),
        ])
    }

    // =========================================================================
    // filter_tree
    // =========================================================================

    #[test]
    fn category_match_keeps_its_items() {
        let tree = scenario_tree();
        let filtered = filter_tree(&tree, "array").unwrap();

        assert_tree_shape(&filtered, &[("Arrays", &[])]);
        assert_eq!(
            item_names(filtered.find(&["Arrays"]).unwrap()),
            vec!["Bounce", "Array2D"]
        );
        assert!(filtered.find(&["Shape"]).is_none());
    }

    #[test]
    fn no_match_is_none() {
        let tree = scenario_tree();
        assert!(filter_tree(&tree, "zzz").is_none());
    }

    #[test]
    fn empty_term_is_identity() {
        let tree = scenario_tree();

        for term in ["", "   ", "\t\n"] {
            let filtered = filter_tree(&tree, term).unwrap();
            assert!(matches!(filtered, Cow::Borrowed(_)));
            assert_eq!(*filtered, tree);
        }
    }

    #[test]
    fn match_is_case_insensitive() {
        let tree = scenario_tree();
        let filtered = filter_tree(&tree, "LOGO").unwrap();

        assert_eq!(item_names(filtered.find(&["Shape"]).unwrap()), vec!["Logo"]);
        assert!(filtered.find(&["Arrays"]).is_none());
    }

    #[test]
    fn term_is_trimmed() {
        let tree = scenario_tree();
        let filtered = filter_tree(&tree, "  logo ").unwrap();
        assert_eq!(filtered.item_count(), 1);
    }

    #[test]
    fn matches_on_title() {
        let records = vec![example_titled("Bounce", "Bouncing Ball", &["Motion"])];
        let tree = build_tree(&records);

        let filtered = filter_tree(&tree, "ball").unwrap();
        assert_eq!(filtered.item_count(), 1);
    }

    #[test]
    fn deep_match_keeps_ancestors_only() {
        let tree = build_tree(&sample_records());
        let filtered = filter_tree(&tree, "star").unwrap();

        assert_tree_shape(&filtered, &[("Basics", &["Shape"])]);
        assert_eq!(
            item_names(filtered.find(&["Basics", "Shape"]).unwrap()),
            vec!["Star"]
        );
    }

    #[test]
    fn unmatched_siblings_are_dropped() {
        let records = vec![
            example("Star", &["Basics", "Shape"]),
            example("Circle", &["Basics", "Shape"]),
        ];
        let tree = build_tree(&records);

        let filtered = filter_tree(&tree, "star").unwrap();
        assert_eq!(
            item_names(filtered.find(&["Basics", "Shape"]).unwrap()),
            vec!["Star"]
        );
    }

    #[test]
    fn every_result_item_matches_and_every_match_is_kept() {
        let tree = build_tree(&sample_records());

        for term in ["a", "array", "mot", "basics", "o"] {
            let expected: Vec<&ExampleRecord> = tree
                .iter_items()
                .filter(|r| matches_example(r, term))
                .collect();
            let filtered = filter_tree(&tree, term).unwrap();
            let kept: Vec<&ExampleRecord> = filtered.iter_items().collect();

            assert!(kept.iter().all(|r| matches_example(r, term)), "term {term}");
            assert_eq!(kept, expected, "term {term}");
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let tree = build_tree(&sample_records());

        for term in ["array", "shape", "b"] {
            let once = filter_tree(&tree, term).unwrap();
            let twice = filter_tree(&once, term).unwrap();
            assert_eq!(*twice, *once, "term {term}");
        }
    }

    #[test]
    fn root_items_filtered_too() {
        let records = vec![example("Loose", &[]), example("Other", &[])];
        let tree = build_tree(&records);

        let filtered = filter_tree(&tree, "loose").unwrap();
        assert_eq!(item_names(&filtered), vec!["Loose"]);
    }

    #[test]
    fn empty_tree_with_term_is_none() {
        let tree = CategoryNode::default();
        assert!(filter_tree(&tree, "x").is_none());
        assert!(filter_tree(&tree, "").is_some());
    }

    // =========================================================================
    // filter_array
    // =========================================================================

    #[test]
    fn array_matches_name_and_sentence() {
        let records = sample_contributions();

        let by_name = filter_array(&records, "fisica").unwrap();
        assert_eq!(contribution_names(&by_name), vec!["Fisica"]);

        let by_sentence = filter_array(&records, "OSC").unwrap();
        assert_eq!(contribution_names(&by_sentence), vec!["oscP5"]);
    }

    #[test]
    fn array_keeps_original_order() {
        let records = sample_contributions();
        let matched = filter_array(&records, "a").unwrap();

        let expected: Vec<&str> = records
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains('a') || r.sentence.to_lowercase().contains('a')
            })
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(contribution_names(&matched), expected);
    }

    #[test]
    fn array_empty_term_returns_all() {
        let records = sample_contributions();
        let all = filter_array(&records, " ").unwrap();
        assert_eq!(all.len(), records.len());

        assert_eq!(filter_array(&[], ""), Some(vec![]));
    }

    #[test]
    fn array_no_match_is_none() {
        let records = sample_contributions();
        assert!(filter_array(&records, "zzz").is_none());
    }

    #[test]
    fn array_ignores_categories_and_authors() {
        let records = sample_contributions();
        assert!(filter_array(&records, "Physics").is_none());
    }

    // =========================================================================
    // SearchCache
    // =========================================================================

    #[test]
    fn cache_reuses_same_term() {
        let tree = scenario_tree();
        let mut cache = SearchCache::new(&tree);

        assert_eq!(cache.search("array").unwrap().item_count(), 2);
        assert_eq!(cache.search(" ARRAY ").unwrap().item_count(), 2);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn cache_recomputes_on_new_term() {
        let tree = scenario_tree();
        let mut cache = SearchCache::new(&tree);

        assert!(cache.search("logo").is_some());
        assert!(cache.search("zzz").is_none());
        assert!(cache.search("zzz").is_none());
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.search("").unwrap(), &tree);
    }
}
