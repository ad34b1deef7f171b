//! # Reorder Engine
//!
//! Structural moves of the selected element among its siblings.
//!
//! ## Script-last invariant
//!
//! In any parent holding both scripts and other elements, the scripts stay
//! the trailing children. Every move goes through [`place_before_scripts`],
//! which inserts before the earlier (in document order) of the requested
//! reference and the parent's first script. A move can therefore never land
//! a node behind a script, and no corrective pass is needed afterwards.
//!
//! ## Failures
//!
//! Every check runs before the tree is touched. A failed operation leaves
//! the document exactly as it was, and an operation that would not change
//! the tree reports `Ok(false)` so callers skip the history snapshot.

use crate::overlay::OverlayMatcher;
use livepage_dom::{is_void, DomError, Document, NodeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReorderOp {
    Up,
    Down,
    ToFirst,
    ToLast,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReorderError {
    #[error("Selected element is not attached to the document")]
    NotAttached,

    #[error("Script elements cannot be moved")]
    ScriptSelected,

    #[error("No previous sibling to indent into")]
    NoPreviousSibling,

    #[error("Cannot indent into a script element")]
    PreviousIsScript,

    #[error("Cannot indent into <{0}>: it cannot have children")]
    VoidTarget(String),

    #[error("Cannot outdent past the top-level container")]
    AtTopLevel,

    #[error(transparent)]
    Dom(#[from] DomError),
}

pub type ReorderResult = Result<bool, ReorderError>;

fn is_script(doc: &Document, node: NodeId) -> bool {
    doc.is_tag(node, "script")
}

/// Element children of `parent` excluding scripts and overlays, in order.
pub fn movable_siblings(doc: &Document, parent: NodeId, overlays: &OverlayMatcher) -> Vec<NodeId> {
    doc.element_children(parent)
        .into_iter()
        .filter(|c| !is_script(doc, *c) && !overlays.is_overlay(doc, *c))
        .collect()
}

fn first_script_child(doc: &Document, parent: NodeId) -> Option<NodeId> {
    doc.children(parent)
        .iter()
        .copied()
        .find(|c| is_script(doc, *c))
}

/// Insert `node` into `parent` before `reference` (append when `None`),
/// but never after the parent's first script. Returns whether the child
/// order changed.
pub fn place_before_scripts(
    doc: &mut Document,
    parent: NodeId,
    node: NodeId,
    reference: Option<NodeId>,
) -> Result<bool, DomError> {
    let reference = match (reference, first_script_child(doc, parent)) {
        (Some(r), Some(script)) if doc.precedes(script, r) => Some(script),
        (None, script) => script,
        (r, _) => r,
    };
    // Within the same parent, a move that keeps the element order is a no-op
    // (text between elements is not worth a history entry)
    if doc.parent(node) == Some(parent) {
        let current = doc.element_children(parent);
        let mut moved: Vec<NodeId> = current.iter().copied().filter(|c| *c != node).collect();
        let at = reference
            .and_then(|r| moved.iter().position(|c| *c == r))
            .unwrap_or(moved.len());
        moved.insert(at, node);
        if moved == current {
            return Ok(false);
        }
    }
    doc.insert_before(parent, node, reference)?;
    Ok(true)
}

fn movable_parent(doc: &Document, node: NodeId) -> Result<NodeId, ReorderError> {
    if !doc.is_connected(node) {
        return Err(ReorderError::NotAttached);
    }
    if is_script(doc, node) {
        return Err(ReorderError::ScriptSelected);
    }
    doc.parent(node).ok_or(ReorderError::NotAttached)
}

/// Move `node` within its movable-sibling set.
pub fn reorder(
    doc: &mut Document,
    node: NodeId,
    op: ReorderOp,
    overlays: &OverlayMatcher,
) -> ReorderResult {
    let parent = movable_parent(doc, node)?;
    let movable = movable_siblings(doc, parent, overlays);
    let Some(index) = movable.iter().position(|n| *n == node) else {
        return Err(ReorderError::NotAttached);
    };
    let last = movable.len() - 1;
    let target = match op {
        ReorderOp::Up => index.saturating_sub(1),
        ReorderOp::Down => (index + 1).min(last),
        ReorderOp::ToFirst => 0,
        ReorderOp::ToLast => last,
    };

    // Index space without the node itself: inserting before others[target]
    // leaves the node at position `target`.
    let others: Vec<NodeId> = movable.into_iter().filter(|n| *n != node).collect();
    let reference = others.get(target).copied();

    let changed = place_before_scripts(doc, parent, node, reference)?;
    debug!(?op, from = index, to = target, changed, "reorder");
    Ok(changed)
}

/// Make `node` the last (non-script) child of its previous sibling.
pub fn indent(doc: &mut Document, node: NodeId, overlays: &OverlayMatcher) -> ReorderResult {
    let parent = movable_parent(doc, node)?;
    let previous = doc
        .element_children(parent)
        .into_iter()
        .take_while(|c| *c != node)
        .filter(|c| !overlays.is_overlay(doc, *c))
        .last()
        .ok_or(ReorderError::NoPreviousSibling)?;

    if is_script(doc, previous) {
        return Err(ReorderError::PreviousIsScript);
    }
    if let Some(tag) = doc.tag_name(previous).filter(|t| is_void(t)) {
        return Err(ReorderError::VoidTarget(tag.to_string()));
    }

    place_before_scripts(doc, previous, node, None)?;
    debug!("indent");
    Ok(true)
}

/// Move `node` out of its parent, right after it. Fails when the parent is
/// the top-level container `top`.
pub fn outdent(
    doc: &mut Document,
    node: NodeId,
    top: NodeId,
    _overlays: &OverlayMatcher,
) -> ReorderResult {
    let parent = movable_parent(doc, node)?;
    if parent == top || !doc.is_inclusive_ancestor(top, parent) {
        return Err(ReorderError::AtTopLevel);
    }
    let grandparent = doc.parent(parent).ok_or(ReorderError::AtTopLevel)?;

    let reference = doc.next_sibling(parent);
    place_before_scripts(doc, grandparent, node, reference)?;
    debug!("outdent");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use livepage_dom::{inner_html, parse};

    fn setup(body: &str) -> (Document, NodeId) {
        let doc = parse(&format!("<body>{}</body>", body)).unwrap();
        let body = doc.body().unwrap();
        (doc, body)
    }

    fn by_id(doc: &Document, id: &str) -> NodeId {
        doc.get_element_by_id(id).unwrap()
    }

    const ABS: &str = r#"<p id="a"></p><p id="b"></p><script id="s"></script>"#;

    #[test]
    fn test_up_and_down() {
        let m = OverlayMatcher::default();
        let (mut doc, body) = setup(ABS);
        let b = by_id(&doc, "b");
        assert!(reorder(&mut doc, b, ReorderOp::Up, &m).unwrap());
        assert_eq!(
            inner_html(&doc, body),
            r#"<p id="b"></p><p id="a"></p><script id="s"></script>"#
        );

        let (mut doc, body) = setup(ABS);
        let a = by_id(&doc, "a");
        assert!(reorder(&mut doc, a, ReorderOp::Down, &m).unwrap());
        assert_eq!(
            inner_html(&doc, body),
            r#"<p id="b"></p><p id="a"></p><script id="s"></script>"#
        );
    }

    #[test]
    fn test_to_last_stops_before_script() {
        let m = OverlayMatcher::default();
        let (mut doc, body) = setup(ABS);
        let a = by_id(&doc, "a");
        assert!(reorder(&mut doc, a, ReorderOp::ToLast, &m).unwrap());
        assert_eq!(
            inner_html(&doc, body),
            r#"<p id="b"></p><p id="a"></p><script id="s"></script>"#
        );
        // Already last: nothing changes
        assert!(!reorder(&mut doc, a, ReorderOp::ToLast, &m).unwrap());
        assert!(!reorder(&mut doc, a, ReorderOp::Down, &m).unwrap());
    }

    #[test]
    fn test_clamped_moves_are_noops() {
        let m = OverlayMatcher::default();
        let (mut doc, _) = setup(ABS);
        let a = by_id(&doc, "a");
        assert!(!reorder(&mut doc, a, ReorderOp::Up, &m).unwrap());
        assert!(!reorder(&mut doc, a, ReorderOp::ToFirst, &m).unwrap());
    }

    #[test]
    fn test_moving_a_misplaced_node_repairs_order() {
        let m = OverlayMatcher::default();
        let (mut doc, body) = setup(r#"<p id="a"></p><script id="s"></script><p id="c"></p>"#);
        let c = by_id(&doc, "c");
        assert!(reorder(&mut doc, c, ReorderOp::Up, &m).unwrap());
        assert_eq!(
            inner_html(&doc, body),
            r#"<p id="c"></p><p id="a"></p><script id="s"></script>"#
        );
    }

    #[test]
    fn test_script_is_never_moved() {
        let m = OverlayMatcher::default();
        let (mut doc, _) = setup(ABS);
        let s = by_id(&doc, "s");
        assert_eq!(
            reorder(&mut doc, s, ReorderOp::Up, &m),
            Err(ReorderError::ScriptSelected)
        );
        assert_eq!(indent(&mut doc, s, &m), Err(ReorderError::ScriptSelected));
    }

    #[test]
    fn test_overlays_are_not_counted() {
        let m = OverlayMatcher::default();
        let (mut doc, body) =
            setup(r#"<p id="a"></p><div id="__editor_highlight_overlay"></div><p id="b"></p>"#);
        let b = by_id(&doc, "b");
        assert!(reorder(&mut doc, b, ReorderOp::Up, &m).unwrap());
        assert_eq!(
            inner_html(&doc, body),
            r#"<p id="b"></p><p id="a"></p><div id="__editor_highlight_overlay"></div>"#
        );
    }

    #[test]
    fn test_indent_into_previous_sibling() {
        let m = OverlayMatcher::default();
        let (mut doc, body) =
            setup(r#"<div id="d"><span></span><script></script></div><p id="p"></p>"#);
        let p = by_id(&doc, "p");
        assert!(indent(&mut doc, p, &m).unwrap());
        assert_eq!(
            inner_html(&doc, body),
            r#"<div id="d"><span></span><p id="p"></p><script></script></div>"#
        );
    }

    #[test]
    fn test_indent_failures() {
        let m = OverlayMatcher::default();
        let (mut doc, _) = setup(r#"<p id="a"></p><script></script><p id="b"></p><img id="i"><p id="c"></p>"#);
        let a = by_id(&doc, "a");
        let b = by_id(&doc, "b");
        let c = by_id(&doc, "c");
        assert_eq!(indent(&mut doc, a, &m), Err(ReorderError::NoPreviousSibling));
        assert_eq!(indent(&mut doc, b, &m), Err(ReorderError::PreviousIsScript));
        assert_eq!(
            indent(&mut doc, c, &m),
            Err(ReorderError::VoidTarget("img".to_string()))
        );
    }

    #[test]
    fn test_outdent() {
        let m = OverlayMatcher::default();
        let (mut doc, body) =
            setup(r#"<div id="d"><p id="p"></p><span></span></div><section></section><script></script>"#);
        let p = by_id(&doc, "p");
        assert!(outdent(&mut doc, p, body, &m).unwrap());
        assert_eq!(
            inner_html(&doc, body),
            r#"<div id="d"><span></span></div><p id="p"></p><section></section><script></script>"#
        );

        assert_eq!(outdent(&mut doc, p, body, &m), Err(ReorderError::AtTopLevel));
    }

    #[test]
    fn test_outdent_from_last_child_stays_before_scripts() {
        let m = OverlayMatcher::default();
        let (mut doc, body) = setup(r#"<div id="d"><p id="p"></p></div><script></script>"#);
        let p = by_id(&doc, "p");
        assert!(outdent(&mut doc, p, body, &m).unwrap());
        assert_eq!(
            inner_html(&doc, body),
            r#"<div id="d"></div><p id="p"></p><script></script>"#
        );
    }
}
