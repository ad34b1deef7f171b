//! # Selection Controller
//!
//! Owns the single selected element and the host-side highlight box.
//!
//! - `select` marks the element's outline entry and places the highlight at
//!   the element's rectangle plus the viewport offset
//! - clicks inside the document are resolved through the registry, then by
//!   label, and otherwise ignored
//! - scroll and resize only request a reposition; the work happens once per
//!   animation frame against whatever is selected at that moment
//!
//! A selection that is no longer attached to the document counts as no
//! selection.

use crate::outline::{label_for, Outline};
use crate::overlay::{HighlightOverlay, OverlayMatcher, Point, Rect};
use crate::registry::{NodeRegistry, OutlineId};
use livepage_dom::{Document, NodeId};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Geometry supplied by whatever renders the document.
pub trait LayoutProbe {
    /// Bounding box of `node` in document coordinates, `None` when the node
    /// has no box or cannot be measured.
    fn bounding_rect(&self, doc: &Document, node: NodeId) -> Option<Rect>;

    /// Offset of the document viewport inside the host.
    fn viewport_offset(&self) -> Point;
}

/// Fixed geometry. Used by headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    rects: HashMap<NodeId, Rect>,
    offset: Point,
}

impl StaticLayout {
    pub fn new(offset: Point) -> Self {
        Self {
            rects: HashMap::new(),
            offset,
        }
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.rects.insert(node, rect);
    }

    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }
}

impl LayoutProbe for StaticLayout {
    fn bounding_rect(&self, doc: &Document, node: NodeId) -> Option<Rect> {
        if !doc.contains(node) {
            return None;
        }
        self.rects.get(&node).copied()
    }

    fn viewport_offset(&self) -> Point {
        self.offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click selected this element; its default action is suppressed
    Selected { node: NodeId, outline: OutlineId },
    /// Consumed but nothing in the outline matched
    Unresolved,
    /// Not intercepted: interception disarmed, overlay target or dead id
    Ignored,
}

impl ClickOutcome {
    /// Whether the host should prevent the click's default action.
    pub fn consumed(&self) -> bool {
        !matches!(self, ClickOutcome::Ignored)
    }
}

#[derive(Debug, Default)]
pub struct SelectionController {
    selected: Option<NodeId>,
    overlay: HighlightOverlay,
    armed: bool,
    reposition_pending: bool,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected element, if it is still attached to `doc`.
    pub fn selected(&self, doc: &Document) -> Option<NodeId> {
        self.selected.filter(|node| doc.is_connected(*node))
    }

    pub fn overlay(&self) -> &HighlightOverlay {
        &self.overlay
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Start intercepting clicks. Called after every wholesale document load.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Select `node` (or nothing) and move the highlight over it.
    pub fn select(
        &mut self,
        doc: &Document,
        outline: &mut Outline,
        registry: &NodeRegistry,
        node: Option<NodeId>,
        probe: &dyn LayoutProbe,
    ) {
        let node = node.filter(|n| doc.is_connected(*n) && doc.is_element(*n));
        self.selected = node;
        outline.mark(node.and_then(|n| registry.outline_for(doc, n)));
        self.place_overlay(doc, probe);
        debug!(selected = ?node, marked = ?outline.marked(), "select");
    }

    /// Keep `node` selected across an outline rebuild. The highlight follows
    /// on the next animation frame.
    pub fn reselect(
        &mut self,
        doc: &Document,
        outline: &mut Outline,
        registry: &NodeRegistry,
        node: NodeId,
    ) {
        self.selected = Some(node).filter(|n| doc.is_connected(*n));
        outline.mark(self.selected.and_then(|n| registry.outline_for(doc, n)));
        self.reposition_pending = true;
    }

    pub fn clear(&mut self, outline: &mut Outline) {
        self.selected = None;
        self.reposition_pending = false;
        self.overlay.hide();
        outline.mark(None);
    }

    /// Resolve a click on `target` and select what it maps to.
    pub fn handle_click(
        &mut self,
        doc: &Document,
        outline: &mut Outline,
        registry: &NodeRegistry,
        overlays: &OverlayMatcher,
        target: NodeId,
        probe: &dyn LayoutProbe,
    ) -> ClickOutcome {
        if !self.armed || !doc.contains(target) || overlays.is_within_overlay(doc, target) {
            trace!(armed = self.armed, "click ignored");
            return ClickOutcome::Ignored;
        }

        // Clicks land on the nearest element
        let mut element = Some(target);
        while let Some(id) = element.filter(|id| !doc.is_element(*id)) {
            element = doc.parent(id);
        }
        let Some(element) = element else {
            return ClickOutcome::Unresolved;
        };

        let resolved = registry
            .outline_for(doc, element)
            .or_else(|| outline.find_by_label(&label_for(doc, element)))
            .and_then(|id| registry.node_for(doc, id).map(|node| (node, id)));

        match resolved {
            Some((node, id)) => {
                self.select(doc, outline, registry, Some(node), probe);
                ClickOutcome::Selected { node, outline: id }
            }
            None => {
                debug!("click did not resolve to an outline entry");
                ClickOutcome::Unresolved
            }
        }
    }

    /// Scroll or resize happened; reposition on the next frame.
    pub fn request_reposition(&mut self) {
        self.reposition_pending = true;
    }

    pub fn reposition_pending(&self) -> bool {
        self.reposition_pending
    }

    /// Run the deferred reposition, if any. Returns whether it ran.
    pub fn on_animation_frame(&mut self, doc: &Document, probe: &dyn LayoutProbe) -> bool {
        if !std::mem::take(&mut self.reposition_pending) {
            return false;
        }
        if self.selected(doc).is_none() {
            self.selected = None;
        }
        self.place_overlay(doc, probe);
        true
    }

    fn place_overlay(&mut self, doc: &Document, probe: &dyn LayoutProbe) {
        let rect = self
            .selected(doc)
            .and_then(|node| probe.bounding_rect(doc, node))
            .map(|rect| rect.translate(probe.viewport_offset()));
        match rect {
            Some(rect) => self.overlay.show(rect),
            None => self.overlay.hide(),
        }
    }
}
