//! # Outline Builder
//!
//! Projects the document's top container (`<body>`, or the document
//! element) into a flat, pre-ordered list of outline entries. Overlay
//! subtrees are skipped; everything else gets exactly one entry whose
//! children follow the element's child order.
//!
//! ```text
//! <body>
//!   <header> .site-header
//!     <h1> .site-title
//!   <section> #about .content-card
//! ```

use crate::overlay::OverlayMatcher;
use crate::registry::{NodeRegistry, OutlineId};
use livepage_dom::{Document, NodeId};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineNode {
    pub id: OutlineId,
    pub node: NodeId,
    pub label: String,
    pub depth: usize,
    pub parent: Option<OutlineId>,
    pub children: Vec<OutlineId>,
}

#[derive(Debug, Clone, Default)]
pub struct Outline {
    nodes: Vec<OutlineNode>,
    marked: Option<OutlineId>,
}

/// `<tag>`, then ` #id` when present, then ` .firstclass` when present.
pub fn label_for(doc: &Document, node: NodeId) -> String {
    let mut label = format!("<{}>", doc.tag_name(node).unwrap_or("#node"));
    if let Some(id) = doc.element_id(node) {
        label.push_str(" #");
        label.push_str(id);
    }
    if let Some(class) = doc.first_class(node) {
        label.push_str(" .");
        label.push_str(class);
    }
    label
}

/// Build a fresh outline and registry for the subtree at `root`.
pub fn build(doc: &Document, root: NodeId, overlays: &OverlayMatcher) -> (Outline, NodeRegistry) {
    let mut outline = Outline::default();
    let mut registry = NodeRegistry::new();

    if doc.is_element(root) && !overlays.is_overlay(doc, root) {
        // (node, parent entry, depth)
        let mut stack = vec![(root, None, 0)];
        while let Some((node, parent, depth)) = stack.pop() {
            let id = registry.insert(node);
            outline.nodes.push(OutlineNode {
                id,
                node,
                label: label_for(doc, node),
                depth,
                parent,
                children: Vec::new(),
            });
            if let Some(parent) = parent {
                outline.nodes[parent.0].children.push(id);
            }
            let children: Vec<NodeId> = doc
                .element_children(node)
                .into_iter()
                .filter(|c| !overlays.is_overlay(doc, *c))
                .collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(id), depth + 1));
            }
        }
    }

    debug!(entries = outline.nodes.len(), "built outline");
    (outline, registry)
}

impl Outline {
    pub fn root(&self) -> Option<&OutlineNode> {
        self.nodes.first()
    }

    pub fn get(&self, id: OutlineId) -> Option<&OutlineNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Entries in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &OutlineNode> {
        self.nodes.iter()
    }

    /// First entry (pre-order) with exactly this label.
    pub fn find_by_label(&self, label: &str) -> Option<OutlineId> {
        self.nodes.iter().find(|n| n.label == label).map(|n| n.id)
    }

    /// Selection marker; at most one entry carries it.
    pub fn mark(&mut self, id: Option<OutlineId>) {
        self.marked = id.filter(|id| id.0 < self.nodes.len());
    }

    pub fn marked(&self) -> Option<OutlineId> {
        self.marked
    }

    /// Indented text form, one entry per line, `*` on the marked entry.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            let marker = if self.marked == Some(node.id) { "* " } else { "  " };
            out.push_str(marker);
            out.push_str(&"  ".repeat(node.depth));
            out.push_str(&node.label);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livepage_dom::parse;

    const PAGE: &str = r#"<body><header class="site-header top"><h1 id="title">T</h1></header><div id="__editor_highlight_overlay"><p>x</p></div><main><p>a</p><p class="b">b</p></main><script>1</script></body>"#;

    #[test]
    fn test_build_labels_and_order() {
        let doc = parse(PAGE).unwrap();
        let (outline, registry) = build(&doc, doc.body().unwrap(), &OverlayMatcher::default());

        let labels: Vec<&str> = outline.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "<body>",
                "<header> .site-header",
                "<h1> #title",
                "<main>",
                "<p>",
                "<p> .b",
                "<script>",
            ]
        );
        assert_eq!(registry.len(), outline.len());

        let root = outline.root().unwrap();
        assert_eq!(root.children.len(), 3);
        assert_eq!(outline.get(OutlineId(4)).unwrap().depth, 2);
    }

    #[test]
    fn test_overlays_have_no_entry() {
        let doc = parse(PAGE).unwrap();
        let (_, registry) = build(&doc, doc.body().unwrap(), &OverlayMatcher::default());
        let overlay = doc.get_element_by_id("__editor_highlight_overlay").unwrap();
        let inside = doc.children(overlay)[0];
        assert!(registry.outline_for(&doc, overlay).is_none());
        assert!(registry.outline_for(&doc, inside).is_none());
    }

    #[test]
    fn test_render_marks_selection() {
        let doc = parse("<body><p id=\"a\"></p></body>").unwrap();
        let (mut outline, _) = build(&doc, doc.body().unwrap(), &OverlayMatcher::default());
        outline.mark(outline.find_by_label("<p> #a"));
        assert_eq!(outline.render(), "  <body>\n*   <p> #a\n");
    }
}
