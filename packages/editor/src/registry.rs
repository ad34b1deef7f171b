//! # Node Registry
//!
//! Associates live document nodes with their outline entries in both
//! directions. Keys are generational `NodeId`s, so the registry owns nothing
//! in the document: once a node is removed its id is dead and lookups fail
//! even before the next rebuild. The registry is never patched; every
//! outline build produces a fresh one.

use livepage_dom::{Document, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of an entry in an [`Outline`](crate::outline::Outline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutlineId(pub usize);

#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    by_node: HashMap<NodeId, OutlineId>,
    by_outline: Vec<NodeId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the next outline entry. Entries must be inserted in outline
    /// order so that `OutlineId(n)` maps to the n-th insert.
    pub(crate) fn insert(&mut self, node: NodeId) -> OutlineId {
        let id = OutlineId(self.by_outline.len());
        self.by_outline.push(node);
        self.by_node.insert(node, id);
        id
    }

    /// Outline entry for a node, if the node is still alive in `doc`.
    pub fn outline_for(&self, doc: &Document, node: NodeId) -> Option<OutlineId> {
        if !doc.contains(node) {
            return None;
        }
        self.by_node.get(&node).copied()
    }

    /// Live node behind an outline entry.
    pub fn node_for(&self, doc: &Document, outline: OutlineId) -> Option<NodeId> {
        self.by_outline
            .get(outline.0)
            .copied()
            .filter(|node| doc.contains(*node))
    }

    pub fn len(&self) -> usize {
        self.by_outline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_outline.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_ids_are_rejected() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.create_element("div");
        doc.append_child(root, div).unwrap();

        let mut registry = NodeRegistry::new();
        let outline = registry.insert(div);
        assert_eq!(registry.outline_for(&doc, div), Some(outline));
        assert_eq!(registry.node_for(&doc, outline), Some(div));

        doc.remove(div).unwrap();
        assert_eq!(registry.outline_for(&doc, div), None);
        assert_eq!(registry.node_for(&doc, outline), None);
    }
}
