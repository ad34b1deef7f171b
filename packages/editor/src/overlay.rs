//! Highlight overlay geometry and overlay-node detection.
//!
//! The highlight box lives in the host, so it is just a rectangle here.
//! Synthetic overlay elements can still end up inside a page (injected by
//! older tooling); they are recognised by an id containing the marker and
//! excluded from the outline, reordering and serialization.

use crate::config::OVERLAY_MARKER;
use livepage_dom::{Document, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn translate(self, by: Point) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
            ..self
        }
    }
}

/// The host-side highlight box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightOverlay {
    rect: Option<Rect>,
}

impl HighlightOverlay {
    pub fn show(&mut self, rect: Rect) {
        self.rect = Some(rect);
    }

    pub fn hide(&mut self) {
        self.rect = None;
    }

    pub fn is_visible(&self) -> bool {
        self.rect.is_some()
    }

    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }
}

/// Recognises overlay nodes by a substring of their `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMatcher {
    marker: String,
}

impl Default for OverlayMatcher {
    fn default() -> Self {
        Self::new(OVERLAY_MARKER)
    }
}

impl OverlayMatcher {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn is_overlay(&self, doc: &Document, node: NodeId) -> bool {
        !self.marker.is_empty()
            && doc
                .attribute(node, "id")
                .map(|id| id.contains(&self.marker))
                .unwrap_or(false)
    }

    /// True when `node` or any ancestor is an overlay.
    pub fn is_within_overlay(&self, doc: &Document, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.is_overlay(doc, id) {
                return true;
            }
            current = doc.parent(id);
        }
        false
    }

    /// Remove every overlay subtree from `doc`. Returns how many were removed.
    pub fn strip(&self, doc: &mut Document) -> usize {
        let overlays: Vec<NodeId> = doc
            .descendants(doc.root())
            .filter(|id| self.is_overlay(doc, *id))
            .collect();
        let mut removed = 0;
        for id in overlays {
            // Nested overlays die with their ancestor
            if doc.contains(id) && doc.remove(id).is_ok() {
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livepage_dom::parse;

    #[test]
    fn test_overlay_detection_and_strip() {
        let mut doc = parse(
            r#"<body><div id="__editor_highlight_overlay"><span id="inner"></span></div><p id="_editor_highlight_overlay_parent"></p><p id="keep"></p></body>"#,
        )
        .unwrap();
        let matcher = OverlayMatcher::default();
        let inner = doc.get_element_by_id("inner").unwrap();
        assert!(matcher.is_within_overlay(&doc, inner));
        assert!(!matcher.is_overlay(&doc, inner));

        assert_eq!(matcher.strip(&mut doc), 2);
        assert!(!doc.contains(inner));
        assert!(doc.get_element_by_id("keep").is_some());
    }

    #[test]
    fn test_rect_translate() {
        let rect = Rect::new(10.0, 20.0, 5.0, 5.0).translate(Point::new(100.0, 50.0));
        assert_eq!(rect, Rect::new(110.0, 70.0, 5.0, 5.0));
    }
}
