//! Flattening of the category tree into labeled entries

use tracing::debug;

use crate::knowledge::types::{join_path, CategoryNode, Entry, KnowledgeTree, SkippedNode};

/// Result of flattening a tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flattened {
    /// Entries in traversal order
    pub entries: Vec<Entry>,
    /// Nodes that produced no entries: conversion anomalies first, then
    /// unsupported subcategory values in traversal order
    pub skipped: Vec<SkippedNode>,
}

/// Flatten a knowledge tree.
///
/// Labels are `category - subcategory` for flat lists and
/// `category - subcategory - group` for nested ones. Order follows the tree;
/// nothing is sorted or deduplicated.
pub fn flatten(tree: &KnowledgeTree) -> Flattened {
    let mut entries = Vec::with_capacity(tree.leaf_count());
    let mut skipped = tree.anomalies().to_vec();

    for category in tree.categories() {
        for (sub_name, node) in &category.subcategories {
            match node {
                CategoryNode::Leaf(items) => {
                    let label = join_path(&[category.name.as_str(), sub_name.as_str()]);
                    entries.extend(items.iter().map(|text| Entry::new(label.as_str(), text.as_str())));
                }
                CategoryNode::Nested(groups) => {
                    for (group, items) in groups {
                        let label = join_path(&[category.name.as_str(), sub_name.as_str(), group.as_str()]);
                        entries.extend(
                            items.iter().map(|text| Entry::new(label.as_str(), text.as_str())),
                        );
                    }
                }
                CategoryNode::Unsupported { found } => {
                    let path = join_path(&[category.name.as_str(), sub_name.as_str()]);
                    debug!(path = %path, found = *found, "skipping unsupported knowledge node");
                    skipped.push(SkippedNode { path, found: *found });
                }
            }
        }
    }

    Flattened { entries, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::types::Category;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use serde_json::json;

    fn labels_and_texts(flattened: &Flattened) -> Vec<(&str, &str)> {
        flattened
            .entries
            .iter()
            .map(|e| (e.label(), e.text()))
            .collect()
    }

    #[test]
    fn test_flatten_simple_list_category() {
        let tree = KnowledgeTree::new().with_category(Category::new("sleeping").leaf(
            "newborn",
            ["Sleeps 14 to 17 hours a day", "Has 45 to 60 minute wake windows"],
        ));

        let flattened = flatten(&tree);
        assert_eq!(
            labels_and_texts(&flattened),
            vec![
                ("sleeping - newborn", "Sleeps 14 to 17 hours a day"),
                ("sleeping - newborn", "Has 45 to 60 minute wake windows"),
            ]
        );
        assert!(flattened.skipped.is_empty());
    }

    #[test]
    fn test_flatten_nested_categories() {
        let tree = KnowledgeTree::new().with_category(Category::new("milestones").nested(
            "4 months",
            [
                ("social_emotional", vec!["Smiles on their own", "Tries to get your attention"]),
                ("movement_physical", vec!["Brings hands to mouth"]),
            ],
        ));

        assert_eq!(
            labels_and_texts(&flatten(&tree)),
            vec![
                ("milestones - 4 months - social_emotional", "Smiles on their own"),
                ("milestones - 4 months - social_emotional", "Tries to get your attention"),
                ("milestones - 4 months - movement_physical", "Brings hands to mouth"),
            ]
        );
    }

    #[test]
    fn test_flatten_mixed_structure() {
        let tree = KnowledgeTree::from_value(json!({
            "sleeping": {
                "5 to 6 months": ["sleeps about 13 to 15 hours per day"],
                "10 to 12 months": {
                    "naps": ["2 naps per day"],
                    "awake_windows": ["3 to 4 hour wake windows"]
                }
            }
        }))
        .unwrap();

        assert_eq!(
            labels_and_texts(&flatten(&tree)),
            vec![
                ("sleeping - 5 to 6 months", "sleeps about 13 to 15 hours per day"),
                ("sleeping - 10 to 12 months - naps", "2 naps per day"),
                ("sleeping - 10 to 12 months - awake_windows", "3 to 4 hour wake windows"),
            ]
        );
    }

    #[test]
    fn test_flatten_skips_unsupported_nodes() {
        let tree = KnowledgeTree::from_value(json!({
            "feeding": {
                "6 months": ["Introduce solids"],
                "notes": 7,
                "12 months": ["Offer whole milk", null]
            }
        }))
        .unwrap();

        let flattened = flatten(&tree);
        assert_eq!(flattened.entries.len(), 2);
        assert_eq!(flattened.skipped.len(), 2);
        assert_eq!(flattened.skipped[0].path, "feeding - 12 months[1]");
        assert_eq!(flattened.skipped[1].path, "feeding - notes");
        assert_eq!(flattened.skipped[1].found, "number");
    }

    #[test]
    fn test_flatten_empty_tree() {
        let flattened = flatten(&KnowledgeTree::new());
        assert!(flattened.entries.is_empty());
        assert!(flattened.skipped.is_empty());
    }

    #[test]
    fn test_flatten_keeps_duplicates() {
        let tree = KnowledgeTree::new()
            .with_category(Category::new("feeding").leaf("6 months", ["Continue milk", "Continue milk"]));
        assert_eq!(flatten(&tree).entries.len(), 2);
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let tree = KnowledgeTree::new()
            .with_category(Category::new("sleeping").leaf("newborn", ["a", "b"]))
            .with_category(Category::new("milestones").nested("2 months", [("language", ["Coos"])]));

        assert_eq!(flatten(&tree), flatten(&tree));
    }

    /// Small random trees mixing flat and nested subcategories
    #[derive(Debug, Clone)]
    struct MixedTree(KnowledgeTree);

    impl Arbitrary for MixedTree {
        fn arbitrary(g: &mut Gen) -> Self {
            let small = |g: &mut Gen| usize::arbitrary(g) % 4;
            let mut tree = KnowledgeTree::new();
            for _ in 0..small(g) {
                let mut category = Category::new(String::arbitrary(g));
                for _ in 0..small(g) {
                    if bool::arbitrary(g) {
                        let items: Vec<String> = (0..small(g)).map(|_| String::arbitrary(g)).collect();
                        category = category.leaf(String::arbitrary(g), items);
                    } else {
                        let groups: Vec<(String, Vec<String>)> = (0..small(g))
                            .map(|_| {
                                let items = (0..small(g)).map(|_| String::arbitrary(g)).collect();
                                (String::arbitrary(g), items)
                            })
                            .collect();
                        category = category.nested(String::arbitrary(g), groups);
                    }
                }
                tree = tree.with_category(category);
            }
            MixedTree(tree)
        }
    }

    #[quickcheck]
    fn prop_flatten_emits_every_leaf_once(tree: MixedTree) -> bool {
        let flattened = flatten(&tree.0);
        let expected: Vec<&String> = tree
            .0
            .categories()
            .iter()
            .flat_map(|c| c.subcategories.iter())
            .flat_map(|(_, node)| match node {
                CategoryNode::Leaf(items) => items.iter().collect::<Vec<_>>(),
                CategoryNode::Nested(groups) => groups.iter().flat_map(|(_, i)| i.iter()).collect(),
                CategoryNode::Unsupported { .. } => Vec::new(),
            })
            .collect();

        flattened.entries.len() == tree.0.leaf_count()
            && flattened
                .entries
                .iter()
                .zip(expected)
                .all(|(entry, text)| entry.text() == text)
    }
}
