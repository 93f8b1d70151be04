//! Selector evaluation against a widget tree

use std::collections::HashSet;

use super::token::Combinator;
use super::Selector;
use crate::inspector::{WidgetNode, WidgetTree};

/// Evaluate a selector against a tree.
///
/// Candidates are seeded from the first simple selector and restricted
/// through each (combinator, simple) pair. Every pass filters the tree's
/// depth-first pre-order sequence, so the result is already deduplicated
/// and ordered stably.
pub fn match_all<'t>(selector: &Selector, tree: &'t WidgetTree) -> Vec<&'t WidgetNode> {
    if tree.is_empty() {
        return Vec::new();
    }

    let dfs = tree.walk();

    let mut current: Vec<&WidgetNode> = dfs
        .iter()
        .copied()
        .filter(|node| selector.first.matches(node))
        .collect();

    for (combinator, simple) in &selector.rest {
        if current.is_empty() {
            return Vec::new();
        }

        let prev: HashSet<&str> = current.iter().map(|n| n.id.as_str()).collect();

        current = dfs
            .iter()
            .copied()
            .filter(|node| {
                simple.matches(node)
                    && match combinator {
                        Combinator::DirectChild => {
                            !node.parent_id.is_empty() && prev.contains(node.parent_id.as_str())
                        }
                        Combinator::Descendant => has_ancestor_in(tree, node, &prev),
                    }
            })
            .collect();
    }

    current
}

/// Whether any node on the parent chain is in the candidate set
fn has_ancestor_in(tree: &WidgetTree, node: &WidgetNode, candidates: &HashSet<&str>) -> bool {
    let mut parent_id = node.parent_id.as_str();
    while !parent_id.is_empty() {
        if candidates.contains(parent_id) {
            return true;
        }
        match tree.get(parent_id) {
            Some(parent) => parent_id = parent.parent_id.as_str(),
            None => return false,
        }
    }
    false
}
