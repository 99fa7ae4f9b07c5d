//! Category tree construction.
//!
//! Turns the flat list of examples produced by the scan into a nested
//! [`CategoryNode`] tree keyed by each record's path segments:
//!
//! ```text
//! Basics/Arrays   Array2D        (root)
//! Basics/Arrays   ArrayObjects   └── Basics
//! Basics/Shape    Star               ├── Arrays: Array2D, ArrayObjects
//! Topics/Motion   Bounce             └── Shape: Star
//!                                └── Topics
//!                                    └── Motion: Bounce
//! ```
//!
//! Siblings keep the order in which their name was first seen, so callers
//! control ordering by sorting records before building.

use crate::types::{CategoryNode, ExampleRecord};

impl CategoryNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Number of leaf items in this node and all descendants.
    pub fn item_count(&self) -> usize {
        self.items.len() + self.children.iter().map(|c| c.item_count()).sum::<usize>()
    }

    /// Whether the node holds neither items nor children.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.children.is_empty()
    }

    /// Look up a descendant by category path. The empty path is `self`.
    pub fn find(&self, path: &[&str]) -> Option<&CategoryNode> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self
                .children
                .iter()
                .find(|c| c.name == *head)
                .and_then(|c| c.find(rest)),
        }
    }

    /// Depth-first walk over every leaf item, parents' items before children's.
    pub fn iter_items(&self) -> impl Iterator<Item = &ExampleRecord> + '_ {
        let mut out = Vec::new();
        collect_items(self, &mut out);
        out.into_iter()
    }

    fn child_mut(&mut self, name: &str) -> &mut CategoryNode {
        let idx = match self.children.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.children.push(CategoryNode::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }
}

fn collect_items<'a>(node: &'a CategoryNode, out: &mut Vec<&'a ExampleRecord>) {
    out.extend(node.items.iter());
    for child in &node.children {
        collect_items(child, out);
    }
}

/// Build the category tree for a set of records.
///
/// Blank path segments are skipped, so a record with an empty (or all-blank)
/// path lands directly under the root.
pub fn build_tree(records: &[ExampleRecord]) -> CategoryNode {
    let mut root = CategoryNode::default();

    for record in records {
        let mut node = &mut root;
        for segment in record.path.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            node = node.child_mut(segment);
        }
        node.items.push(record.clone());
    }

    root
}
