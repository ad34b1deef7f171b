//! # Document Arena
//!
//! The live document is a tree of nodes stored in a generational arena.
//! A `NodeId` is a generational index: once a subtree is removed its ids are
//! dead and every lookup through them fails, so tables keyed by `NodeId`
//! (the editor's node registry, the current selection) can never resurrect
//! or keep alive a removed node.
//!
//! ```text
//! Document (root)
//!   └─ <html>
//!        ├─ <head> ...
//!        └─ <body> ...
//! ```

use crate::error::{DomError, DomResult};
use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Handle to a node in a [`Document`].
pub type NodeId = Index;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Element payload: lowercase tag plus attributes in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag: String,
    pub attributes: Vec<Attribute>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(attr) => attr.value = value,
            None => self
                .attributes
                .push(Attribute::new(name.to_ascii_lowercase(), value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self
            .attributes
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(pos).value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Document,
    Element(ElementData),
    /// Raw text, kept exactly as it appeared in the source (entities undecoded)
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub data: NodeData,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|el| el.tag.as_str())
    }

    fn is_container(&self) -> bool {
        matches!(self.data, NodeData::Document | NodeData::Element(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctype {
    pub name: String,
    pub public_id: Option<String>,
    pub system_id: Option<String>,
}

impl Doctype {
    pub fn html5() -> Self {
        Self {
            name: "html".to_string(),
            public_id: None,
            system_id: None,
        }
    }

    pub fn to_markup(&self) -> String {
        let mut out = format!("<!DOCTYPE {}", self.name);
        if let Some(public_id) = &self.public_id {
            out.push_str(&format!(" PUBLIC \"{}\"", public_id));
        }
        if let Some(system_id) = &self.system_id {
            out.push_str(&format!(" \"{}\"", system_id));
        }
        out.push('>');
        out
    }
}

impl Default for Doctype {
    fn default() -> Self {
        Self::html5()
    }
}

/// A mutable document tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Arena<Node>,
    root: NodeId,
    pub doctype: Option<Doctype>,
}

impl Default for Document {
    fn default() -> Self {
        let mut nodes = Arena::new();
        let root = nodes.insert(Node::new(NodeData::Document));
        Self {
            nodes,
            root,
            doctype: None,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable access to a text node's content.
    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match self.nodes.get_mut(id) {
            Some(Node {
                data: NodeData::Text(text),
                ..
            }) => Some(text),
            _ => None,
        }
    }

    fn node_or_err(&self, id: NodeId) -> DomResult<&Node> {
        self.nodes.get(id).ok_or(DomError::NodeNotFound(id))
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes
            .insert(Node::new(NodeData::Element(ElementData::new(tag))))
    }

    pub fn create_element_with(&mut self, tag: &str, attributes: Vec<Attribute>) -> NodeId {
        let mut data = ElementData::new(tag);
        data.attributes = attributes;
        self.nodes.insert(Node::new(NodeData::Element(data)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(NodeData::Text(text.into())))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(NodeData::Comment(text.into())))
    }

    // ------------------------------------------------------------------
    // Element accessors
    // ------------------------------------------------------------------

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.nodes.get(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        match self.nodes.get_mut(id) {
            Some(Node {
                data: NodeData::Element(el),
                ..
            }) => Ok(el),
            Some(_) => Err(DomError::NotAnElement(id)),
            None => Err(DomError::NodeNotFound(id)),
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id)
            .map(|t| t.eq_ignore_ascii_case(tag))
            .unwrap_or(false)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.get(name))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> DomResult<()> {
        self.element_mut(id)?.set(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        Ok(self.element_mut(id)?.remove(name))
    }

    /// The element's `id` attribute, if present and non-empty.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "id")
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// First whitespace-separated token of the `class` attribute.
    pub fn first_class(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "class")
            .and_then(|v| v.split_whitespace().next())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attribute(id, "class")
            .map(|v| v.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let idx = self.index_in_parent(id)?;
        self.children(parent).get(idx + 1).copied()
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let idx = self.index_in_parent(id)?;
        self.children(parent)[..idx]
            .iter()
            .rev()
            .copied()
            .find(|c| self.is_element(*c))
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let idx = self.index_in_parent(id)?;
        self.children(parent)[idx + 1..]
            .iter()
            .copied()
            .find(|c| self.is_element(*c))
    }

    /// True when `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// A node is connected when its parent chain reaches the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_inclusive_ancestor(self.root, id)
    }

    /// Child-index path from the root; only meaningful for connected nodes.
    fn path_from_root(&self, id: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(self.index_in_parent(current).unwrap_or(0));
            current = parent;
        }
        path.reverse();
        path
    }

    /// Document-order comparison: does `a` come before `b` in a pre-order walk?
    pub fn precedes(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.path_from_root(a) < self.path_from_root(b)
    }

    /// Pre-order walk of every descendant of `id` (excluding `id`).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    // ------------------------------------------------------------------
    // Well-known elements
    // ------------------------------------------------------------------

    /// The `<html>` element (or the first top-level element).
    pub fn document_element(&self) -> Option<NodeId> {
        let top = self.element_children(self.root);
        top.iter()
            .copied()
            .find(|c| self.is_tag(*c, "html"))
            .or_else(|| top.first().copied())
    }

    pub fn head(&self) -> Option<NodeId> {
        self.child_of_document_element("head")
    }

    pub fn body(&self) -> Option<NodeId> {
        self.child_of_document_element("body")
    }

    fn child_of_document_element(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .copied()
            .find(|c| self.is_tag(*c, tag))
    }

    /// The outermost container edits happen in: `<body>`, else the document element.
    pub fn top_container(&self) -> Option<NodeId> {
        self.body().or_else(|| self.document_element())
    }

    pub fn get_element_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .find(|id| self.attribute(*id, "id") == Some(value))
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .filter(|id| self.is_tag(*id, tag))
            .collect()
    }

    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(NodeData::Text(t)) = self.nodes.get(id).map(|n| &n.data) {
            out.push_str(t);
        }
        for desc in self.descendants(id) {
            if let Some(NodeData::Text(t)) = self.nodes.get(desc).map(|n| &n.data) {
                out.push_str(t);
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Move or insert `child` into `parent` before `reference` (append when `None`).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        if !self.node_or_err(parent)?.is_container() {
            return Err(DomError::NotAContainer(parent));
        }
        self.node_or_err(child)?;
        if child == self.root {
            return Err(DomError::RootImmutable);
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        let reference = match reference {
            Some(r) if r == child => self.next_sibling(child),
            other => other,
        };
        if let Some(r) = reference {
            if self.parent(r) != Some(parent) {
                return Err(DomError::ReferenceNotAChild {
                    parent,
                    reference: r,
                });
            }
        }

        self.unlink(child);
        let children = &mut self.nodes[parent].children;
        let idx = reference
            .and_then(|r| children.iter().position(|c| *c == r))
            .unwrap_or(children.len());
        children.insert(idx, child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Detach a node from its parent, keeping it (and its subtree) alive.
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        self.node_or_err(id)?;
        if id == self.root {
            return Err(DomError::RootImmutable);
        }
        self.unlink(id);
        Ok(())
    }

    /// Detach and free a node with its whole subtree; its ids become dead.
    pub fn remove(&mut self, id: NodeId) -> DomResult<()> {
        self.detach(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    /// Take over the tree of `other`, reusing this document's arena.
    ///
    /// Every id handed out before the call is dead afterwards, even where
    /// `other` was parsed into a fresh arena whose indices would otherwise
    /// collide with them. Nodes of `other` not connected to its root are
    /// dropped.
    pub fn replace_with(&mut self, other: Document) {
        let Document {
            nodes: mut incoming,
            root: other_root,
            doctype,
        } = other;
        // clearing a non-empty arena bumps its generation
        self.nodes.clear();

        let mut remapped = HashMap::new();
        let mut stack = vec![other_root];
        while let Some(old) = stack.pop() {
            let Some(node) = incoming.remove(old) else {
                continue;
            };
            let parent = node.parent.and_then(|p| remapped.get(&p).copied());
            let new = self.nodes.insert(Node::new(node.data));
            if let Some(parent) = parent {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.children.push(new);
                }
            }
            if let Some(n) = self.nodes.get_mut(new) {
                n.parent = parent;
            }
            remapped.insert(old, new);
            stack.extend(node.children.into_iter().rev());
        }

        self.root = match remapped.get(&other_root) {
            Some(root) => *root,
            None => self.nodes.insert(Node::new(NodeData::Document)),
        };
        self.doctype = doctype;
    }

    /// Remove (and free) every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) -> DomResult<()> {
        let children = self.node_or_err(id)?.children.clone();
        for child in children {
            self.remove(child)?;
        }
        Ok(())
    }

    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        self.clear_children(id)?;
        if !text.is_empty() {
            let text = self.create_text(text);
            self.append_child(id, text)?;
        }
        Ok(())
    }

    fn unlink(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
    }
}

/// Pre-order iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let next = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(next).iter().rev().copied());
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let html = doc.create_element("html");
        let body = doc.create_element("body");
        let div = doc.create_element("div");
        doc.append_child(root, html).unwrap();
        doc.append_child(html, body).unwrap();
        doc.append_child(body, div).unwrap();
        (doc, html, body, div)
    }

    #[test]
    fn test_insert_before_reorders_children() {
        let (mut doc, _, body, a) = sample();
        let b = doc.create_element("p");
        doc.append_child(body, b).unwrap();
        doc.insert_before(body, b, Some(a)).unwrap();

        assert_eq!(doc.children(body), &[b, a]);
        assert_eq!(doc.parent(b), Some(body));
    }

    #[test]
    fn test_insert_into_descendant_is_rejected() {
        let (mut doc, html, _, div) = sample();
        let err = doc.append_child(div, html).unwrap_err();
        assert_eq!(err, DomError::HierarchyRequest { parent: div, child: html });
        // tree untouched
        assert_eq!(doc.parent(html), Some(doc.root()));
    }

    #[test]
    fn test_reference_must_be_child() {
        let (mut doc, html, body, div) = sample();
        let p = doc.create_element("p");
        let err = doc.insert_before(html, p, Some(div)).unwrap_err();
        assert!(matches!(err, DomError::ReferenceNotAChild { .. }));
        assert!(doc.parent(p).is_none());
        assert_eq!(doc.children(body), &[div]);
    }

    #[test]
    fn test_remove_invalidates_subtree_ids() {
        let (mut doc, _, body, div) = sample();
        let span = doc.create_element("span");
        doc.append_child(div, span).unwrap();

        doc.remove(div).unwrap();

        assert!(!doc.contains(div));
        assert!(!doc.contains(span));
        assert!(doc.children(body).is_empty());
        // A fresh node never aliases the dead id
        let fresh = doc.create_element("div");
        assert_ne!(fresh, div);
        assert!(!doc.contains(div));
    }

    #[test]
    fn test_detached_node_is_not_connected() {
        let (mut doc, _, _, div) = sample();
        assert!(doc.is_connected(div));
        doc.detach(div).unwrap();
        assert!(doc.contains(div));
        assert!(!doc.is_connected(div));
    }

    #[test]
    fn test_precedes_follows_document_order() {
        let (mut doc, html, body, div) = sample();
        let head = doc.create_element("head");
        doc.insert_before(html, head, Some(body)).unwrap();
        let p = doc.create_element("p");
        doc.append_child(body, p).unwrap();

        assert!(doc.precedes(head, div));
        assert!(doc.precedes(body, div));
        assert!(doc.precedes(div, p));
        assert!(!doc.precedes(p, div));
        assert!(!doc.precedes(div, div));
    }

    #[test]
    fn test_element_siblings_skip_text() {
        let (mut doc, _, body, div) = sample();
        let text = doc.create_text("\n");
        let p = doc.create_element("p");
        doc.append_child(body, text).unwrap();
        doc.append_child(body, p).unwrap();

        assert_eq!(doc.next_element_sibling(div), Some(p));
        assert_eq!(doc.previous_element_sibling(p), Some(div));
        assert_eq!(doc.previous_element_sibling(div), None);
    }

    #[test]
    fn test_attribute_helpers() {
        let (mut doc, _, _, div) = sample();
        doc.set_attribute(div, "ID", "hero").unwrap();
        doc.set_attribute(div, "class", "  card wide ").unwrap();

        assert_eq!(doc.element_id(div), Some("hero"));
        assert_eq!(doc.first_class(div), Some("card"));
        assert!(doc.has_class(div, "wide"));
        assert_eq!(doc.get_element_by_id("hero"), Some(div));

        assert_eq!(doc.remove_attribute(div, "id").unwrap(), Some("hero".to_string()));
        assert_eq!(doc.element_id(div), None);
    }

    #[test]
    fn test_well_known_elements() {
        let (doc, html, body, _) = sample();
        assert_eq!(doc.document_element(), Some(html));
        assert_eq!(doc.body(), Some(body));
        assert_eq!(doc.top_container(), Some(body));
        assert_eq!(doc.head(), None);
    }

    #[test]
    fn test_replace_with_kills_previous_ids() {
        let (mut doc, html, body, div) = sample();
        // built the same way, so its fresh arena hands out the same indices
        let (mut fresh, fresh_html, _, _) = sample();
        assert_eq!(fresh_html, html);
        fresh.doctype = Some(Doctype::html5());
        let span = fresh.create_element("span");
        let fresh_body = fresh.body().unwrap();
        fresh.append_child(fresh_body, span).unwrap();

        doc.replace_with(fresh);

        for old in [html, body, div] {
            assert!(!doc.contains(old));
        }
        let body = doc.body().unwrap();
        let tags: Vec<_> = doc
            .element_children(body)
            .into_iter()
            .filter_map(|id| doc.tag_name(id))
            .collect();
        assert_eq!(tags, ["div", "span"]);
        assert_eq!(doc.parent(doc.document_element().unwrap()), Some(doc.root()));
        assert_eq!(doc.doctype, Some(Doctype::html5()));
        assert_eq!(doc.len(), 5);
    }
}
