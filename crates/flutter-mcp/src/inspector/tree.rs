//! Widget tree container and serializations

use std::collections::HashMap;

use serde_json::{Value, json};

use super::error::InspectorError;
use super::node::WidgetNode;

/// An immutable snapshot of the target's widget hierarchy.
///
/// Maps ids to nodes with one distinguished root. Construction goes through
/// [`WidgetTree::insert`] while capturing; afterwards the tree is read-only
/// and safe to share across threads without locking.
#[derive(Debug, Clone, Default)]
pub struct WidgetTree {
    root_id: String,
    nodes: HashMap<String, WidgetNode>,
}

impl WidgetTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. The first node inserted becomes the root.
    pub fn insert(&mut self, node: WidgetNode) {
        if self.nodes.is_empty() {
            self.root_id = node.id.clone();
        }
        self.nodes.insert(node.id.clone(), node);
    }

    /// Append a child id to an already-inserted parent
    pub(super) fn link_child(&mut self, parent_id: &str, child_id: &str) {
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.children_ids.push(child_id.to_string());
        }
    }

    /// The root node id (empty for an empty tree)
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// The root node
    pub fn root(&self) -> Option<&WidgetNode> {
        self.nodes.get(&self.root_id)
    }

    /// Look up a node by id
    pub fn get(&self, id: &str) -> Option<&WidgetNode> {
        self.nodes.get(id)
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first pre-order traversal.
    ///
    /// Children are visited in `children_ids` order, so the sequence is
    /// deterministic for a given tree. This is the order the selector
    /// engine uses to keep matches stable.
    pub fn walk(&self) -> Vec<&WidgetNode> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let Some(root) = self.root() else {
            return out;
        };

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            out.push(node);
            for child_id in node.children_ids.iter().rev() {
                if let Some(child) = self.nodes.get(child_id) {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Depth of a node below the root (root is 0); `None` for unknown ids
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        let mut depth = 0;
        let mut current = self.nodes.get(id)?;
        while !current.parent_id.is_empty() {
            current = self.nodes.get(&current.parent_id)?;
            depth += 1;
        }
        Some(depth)
    }

    /// Whether `ancestor_id` lies on the parent chain of `id`
    pub fn is_ancestor(&self, ancestor_id: &str, id: &str) -> bool {
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            if node.parent_id.is_empty() {
                return false;
            }
            if node.parent_id == ancestor_id {
                return true;
            }
            current = self.nodes.get(&node.parent_id);
        }
        false
    }

    /// Full-fidelity JSON dump
    pub fn to_json(&self) -> Value {
        let nodes: serde_json::Map<String, Value> = self
            .nodes
            .iter()
            .map(|(id, node)| {
                (
                    id.clone(),
                    serde_json::to_value(node).unwrap_or(Value::Null),
                )
            })
            .collect();

        json!({
            "root_id": self.root_id,
            "node_count": self.node_count(),
            "nodes": nodes,
        })
    }

    /// Indented text dump for human or LLM reading.
    ///
    /// Two spaces per level, one node per line as `Type` or `Type['text']`;
    /// depth is cut at `max_depth` when non-zero (root is depth 0).
    pub fn to_text(&self, max_depth: usize) -> String {
        let mut out = String::new();
        let Some(root) = self.root() else {
            return out;
        };

        let mut stack = vec![(root, 0_usize)];
        while let Some((node, depth)) = stack.pop() {
            if max_depth != 0 && depth >= max_depth {
                continue;
            }

            out.push_str(&"  ".repeat(depth));
            out.push_str(&node.label());
            out.push('\n');

            for child_id in node.children_ids.iter().rev() {
                if let Some(child) = self.nodes.get(child_id) {
                    stack.push((child, depth + 1));
                }
            }
        }
        out
    }

    /// Check the structural invariants: the root is present, parent/child
    /// references are bidirectionally consistent, every referenced id
    /// exists, and the traversal reaches every node exactly once.
    pub fn validate(&self) -> super::Result<()> {
        if self.nodes.is_empty() {
            return Ok(());
        }

        if !self.nodes.contains_key(&self.root_id) {
            return Err(InspectorError::Malformed(format!(
                "root id {} names no node",
                self.root_id
            )));
        }

        for node in self.nodes.values() {
            if node.parent_id.is_empty() {
                if node.id != self.root_id {
                    return Err(InspectorError::Malformed(format!(
                        "node {} has no parent but is not the root",
                        node.id
                    )));
                }
            } else {
                let parent = self.nodes.get(&node.parent_id).ok_or_else(|| {
                    InspectorError::Malformed(format!(
                        "node {} references missing parent {}",
                        node.id, node.parent_id
                    ))
                })?;
                if !parent.children_ids.contains(&node.id) {
                    return Err(InspectorError::Malformed(format!(
                        "node {} is not listed among its parent's children",
                        node.id
                    )));
                }
            }

            for child_id in &node.children_ids {
                let child = self.nodes.get(child_id).ok_or_else(|| {
                    InspectorError::Malformed(format!(
                        "node {} references missing child {child_id}",
                        node.id
                    ))
                })?;
                if child.parent_id != node.id {
                    return Err(InspectorError::Malformed(format!(
                        "child {child_id} does not point back to {}",
                        node.id
                    )));
                }
            }
        }

        if self.walk().len() != self.nodes.len() {
            return Err(InspectorError::Malformed(
                "tree is not fully reachable from the root".to_string(),
            ));
        }

        Ok(())
    }
}
