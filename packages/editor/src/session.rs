//! # Edit Session
//!
//! Everything one open project needs: the document, its outline and
//! registry, the selection, undo history, the stylesheet text and the
//! inspector state. A session is opened on a project, edited through the
//! methods below and closed, which drops the document and clears history.
//!
//! ## Commit cycle
//!
//! Every mutation that changes the document ends the same way:
//!
//! ```text
//! mutate ─▶ history snapshot ─▶ outline rebuild ─▶ reselect ─▶ reposition next frame
//! ```
//!
//! Checks run first. A failed operation returns an [`EditorError`] and leaves
//! document, selection, history and registry as they were.

use crate::config::{EditorConfig, INJECTED_STYLE_ID};
use crate::errors::{EditorError, EditorResult};
use crate::history::{HistoryError, HistoryManager};
use crate::inspector::{selector_for, InspectContext, InspectorTab, InspectorView};
use crate::outline::{self, Outline, OutlineNode};
use crate::overlay::OverlayMatcher;
use crate::registry::{NodeRegistry, OutlineId};
use crate::reorder::{self, ReorderOp, ReorderResult};
use crate::schema::{CssSchema, TagAttributes};
use crate::selection::{ClickOutcome, LayoutProbe, SelectionController};
use crate::serializer::{pretty_print, serialize_document};
use crate::shortcuts::{action_for, EditorAction, KeyEvent};
use crate::storage::{Asset, ProjectBackend};
use livepage_dom::{is_raw_text, is_void, parse, parse_fragment, to_markup, Document, NodeId};
use livepage_stylesheet::{merge_rule, Declarations, PropertyEdits};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// Look only; no selection, no edits
    #[default]
    Preview,
    Edit,
}

/// Values from the attribute panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeEdit {
    /// Empty values remove the attribute, except `id` and `class` which are
    /// kept as empty attributes
    pub attributes: BTreeMap<String, String>,
    pub inner_html: Option<String>,
    /// New document title; ignored when blank
    pub title: Option<String>,
}

fn valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '>' | '/' | '=' | '<'))
}

fn valid_tag_name(tag: &str) -> bool {
    tag.starts_with(|c: char| c.is_ascii_alphabetic())
        && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

pub struct EditSession {
    config: EditorConfig,
    overlays: OverlayMatcher,
    project: Option<String>,
    mode: Mode,
    /// `None` while closed or when the document could not be read
    document: Option<Document>,
    outline: Outline,
    registry: NodeRegistry,
    selection: SelectionController,
    history: HistoryManager,
    stylesheet: String,
    property_edits: PropertyEdits,
    tab: InspectorTab,
    tags: TagAttributes,
    schema: CssSchema,
    inline_edit: Option<NodeId>,
    staged_attributes: Option<AttributeEdit>,
    preview_injected: bool,
}

impl EditSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            overlays: OverlayMatcher::new(config.overlay_marker.clone()),
            history: HistoryManager::with_limit(config.history_limit),
            config,
            project: None,
            mode: Mode::Preview,
            document: None,
            outline: Outline::default(),
            registry: NodeRegistry::new(),
            selection: SelectionController::new(),
            stylesheet: String::new(),
            property_edits: PropertyEdits::new(),
            tab: InspectorTab::default(),
            tags: TagAttributes::default(),
            schema: CssSchema::default(),
            inline_edit: None,
            staged_attributes: None,
            preview_injected: false,
        }
    }

    /// Inspector metadata. Only shapes inspector views.
    pub fn set_metadata(&mut self, tags: TagAttributes, schema: CssSchema) {
        self.tags = tags;
        self.schema = schema;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    pub fn property_edits(&self) -> &PropertyEdits {
        &self.property_edits
    }

    pub fn tab(&self) -> InspectorTab {
        self.tab
    }

    /// The selected element, if still attached.
    pub fn selected(&self) -> Option<NodeId> {
        self.document
            .as_ref()
            .and_then(|doc| self.selection.selected(doc))
    }

    /// Outline entry of the selected element.
    pub fn selected_entry(&self) -> Option<&OutlineNode> {
        self.outline.marked().and_then(|id| self.outline.get(id))
    }

    /// No project, preview mode or an unreadable document.
    pub fn is_read_only(&self) -> bool {
        self.mode != Mode::Edit || self.document.is_none()
    }

    pub fn title(&self) -> Option<String> {
        let doc = self.document.as_ref()?;
        let title = Self::title_element(doc)?;
        Some(doc.text_content(title).trim().to_string())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Open `project`. A project whose markup cannot be fetched or read is
    /// still opened, read-only, and the error is returned for the notice.
    #[instrument(skip(self, backend))]
    pub fn open(
        &mut self,
        backend: &dyn ProjectBackend,
        project: &str,
        mode: Mode,
    ) -> EditorResult<()> {
        self.close();
        self.project = Some(project.to_string());
        self.mode = mode;
        self.stylesheet = backend.fetch_stylesheet(project).unwrap_or_else(|err| {
            debug!(%err, "no stylesheet");
            String::new()
        });

        let markup = backend.fetch_markup(project).map_err(|err| {
            warn!(%err, "document not accessible, read-only");
            EditorError::Access(err.to_string())
        })?;
        let doc = parse(&markup).map_err(|err| {
            warn!(%err, "document not readable, read-only");
            EditorError::Access(err.to_string())
        })?;

        self.document = Some(doc);
        self.rebuild();
        if mode == Mode::Edit {
            if let Some(doc) = self.document.as_ref() {
                self.history.push(to_markup(doc));
            }
            self.selection.arm();
        }
        info!(entries = self.outline.len(), "opened project");
        Ok(())
    }

    pub fn close(&mut self) {
        if let Some(project) = self.project.take() {
            debug!(%project, "closing session");
        }
        self.mode = Mode::Preview;
        self.document = None;
        self.outline = Outline::default();
        self.registry = NodeRegistry::new();
        self.selection = SelectionController::new();
        self.history.clear();
        self.stylesheet.clear();
        self.property_edits.clear();
        self.inline_edit = None;
        self.staged_attributes = None;
        self.preview_injected = false;
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select `node`, or clear the selection with `None`.
    pub fn select(&mut self, node: Option<NodeId>, probe: &dyn LayoutProbe) -> EditorResult<()> {
        self.ensure_edit()?;
        let Some(doc) = self.document.as_ref() else {
            return Err(EditorError::ReadOnly);
        };
        if node.is_some_and(|n| self.overlays.is_within_overlay(doc, n)) {
            return Err(EditorError::InvalidTarget("overlay element".to_string()));
        }
        self.selection
            .select(doc, &mut self.outline, &self.registry, node, probe);
        self.inline_edit = None;
        self.prepare_inspector()
    }

    /// Select through an outline entry.
    pub fn select_entry(&mut self, entry: OutlineId, probe: &dyn LayoutProbe) -> EditorResult<()> {
        let node = self
            .document
            .as_ref()
            .and_then(|doc| self.registry.node_for(doc, entry))
            .ok_or_else(|| EditorError::InvalidTarget(format!("outline entry {}", entry.0)))?;
        self.select(Some(node), probe)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear(&mut self.outline);
        self.property_edits.clear();
        self.inline_edit = None;
        self.staged_attributes = None;
    }

    /// A click inside the document.
    pub fn click(&mut self, target: NodeId, probe: &dyn LayoutProbe) -> EditorResult<ClickOutcome> {
        let Some(doc) = self.document.as_ref() else {
            return Ok(ClickOutcome::Ignored);
        };
        let outcome = self.selection.handle_click(
            doc,
            &mut self.outline,
            &self.registry,
            &self.overlays,
            target,
            probe,
        );
        if let ClickOutcome::Selected { .. } = outcome {
            self.inline_edit = None;
            self.prepare_inspector()?;
        }
        Ok(outcome)
    }

    pub fn set_tab(&mut self, tab: InspectorTab) -> EditorResult<()> {
        self.tab = tab;
        self.prepare_inspector()
    }

    /// Inspector view of the selection under the active tab.
    pub fn inspect(&self) -> Option<InspectorView> {
        let doc = self.document.as_ref()?;
        let node = self.selection.selected(doc)?;
        let ctx = InspectContext {
            doc,
            node,
            tags: &self.tags,
            schema: &self.schema,
            stylesheet: &self.stylesheet,
        };
        Some(self.tab.inspector().inspect(ctx, &self.property_edits))
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn move_selected(&mut self, op: ReorderOp) -> EditorResult<bool> {
        self.structural(|doc, node, _, overlays| reorder::reorder(doc, node, op, overlays))
    }

    pub fn indent_selected(&mut self) -> EditorResult<bool> {
        self.structural(|doc, node, _, overlays| reorder::indent(doc, node, overlays))
    }

    pub fn outdent_selected(&mut self) -> EditorResult<bool> {
        self.structural(|doc, node, top, overlays| reorder::outdent(doc, node, top, overlays))
    }

    #[instrument(skip(self))]
    pub fn delete_selected(&mut self) -> EditorResult<()> {
        self.ensure_edit()?;
        let node = self.selected_node()?;
        let doc = self.document.as_mut().ok_or(EditorError::ReadOnly)?;
        let protected = [doc.top_container(), doc.document_element(), doc.head()];
        if protected.contains(&Some(node)) {
            return Err(EditorError::InvalidTarget(format!(
                "<{}> cannot be deleted",
                doc.tag_name(node).unwrap_or_default()
            )));
        }
        doc.remove(node)?;
        self.commit(None);
        self.property_edits.clear();
        Ok(())
    }

    /// Create a `tag` element inside the selection (or the top container),
    /// before its first script child. Returns the new element.
    #[instrument(skip(self))]
    pub fn add_element(&mut self, tag: Option<&str>) -> EditorResult<NodeId> {
        self.ensure_edit()?;
        let tag = tag
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| valid_tag_name(t))
            .unwrap_or_else(|| self.config.default_new_tag.clone());

        let selected = self.selected();
        let doc = self.document.as_mut().ok_or(EditorError::ReadOnly)?;
        let parent = selected
            .or_else(|| doc.top_container())
            .ok_or_else(|| EditorError::InvalidTarget("document has no container".to_string()))?;
        if let Some(parent_tag) = doc.tag_name(parent).filter(|t| is_void(t) || is_raw_text(t)) {
            return Err(EditorError::InvalidTarget(format!(
                "<{}> cannot contain elements",
                parent_tag
            )));
        }

        let element = doc.create_element(&tag);
        match tag.as_str() {
            "img" => doc.set_attribute(element, "src", "")?,
            "a" => {
                doc.set_attribute(element, "href", "#")?;
                doc.set_text_content(element, "link")?;
            }
            _ => {}
        }
        reorder::place_before_scripts(doc, parent, element, None)?;

        self.commit(selected);
        Ok(element)
    }

    /// Apply the attribute panel to the selection.
    #[instrument(skip(self, edit))]
    pub fn apply_attributes(&mut self, edit: &AttributeEdit) -> EditorResult<()> {
        self.ensure_edit()?;
        let node = self.selected_node()?;
        let doc = self.document.as_mut().ok_or(EditorError::ReadOnly)?;
        let tag = doc.tag_name(node).unwrap_or_default().to_string();

        if let Some(bad) = edit.attributes.keys().find(|n| !valid_attribute_name(n)) {
            return Err(EditorError::InvalidTarget(format!("attribute name {:?}", bad)));
        }
        if let Some(inner) = edit.inner_html.as_deref() {
            if is_void(&tag) && !inner.trim().is_empty() {
                return Err(EditorError::InvalidTarget(format!("<{}> cannot have content", tag)));
            }
            if !is_raw_text(&tag) {
                // Surface markup errors before anything changes
                parse_fragment(&mut Document::new(), inner)?;
            }
        }

        for (name, value) in &edit.attributes {
            let value = value.trim();
            if value.is_empty() && name != "id" && name != "class" {
                doc.remove_attribute(node, name)?;
            } else {
                doc.set_attribute(node, name, value)?;
            }
        }
        match edit.inner_html.as_deref() {
            Some(inner) if is_raw_text(&tag) => doc.set_text_content(node, inner)?,
            Some(inner) if !is_void(&tag) => doc.set_inner_html(node, inner)?,
            _ => {}
        }
        if let Some(title) = edit.title.as_deref() {
            Self::write_title(doc, title)?;
        }

        self.staged_attributes = None;
        self.commit(Some(node));
        self.prepare_inspector()
    }

    /// Keep panel values for the Enter shortcut.
    pub fn stage_attributes(&mut self, edit: AttributeEdit) {
        self.staged_attributes = Some(edit);
    }

    /// Start editing the selection's content in place. Returns the current
    /// inner markup.
    pub fn begin_inline_edit(&mut self) -> EditorResult<String> {
        self.ensure_edit()?;
        let node = self.selected_node()?;
        let doc = self.document.as_ref().ok_or(EditorError::ReadOnly)?;
        if let Some(tag) = doc.tag_name(node).filter(|t| is_void(t) || is_raw_text(t)) {
            return Err(EditorError::InvalidTarget(format!("<{}> is not editable in place", tag)));
        }
        self.inline_edit = Some(node);
        Ok(livepage_dom::inner_html(doc, node))
    }

    /// Finish the in-place edit with the element's new inner markup.
    pub fn commit_inline_edit(&mut self, markup: &str) -> EditorResult<()> {
        self.ensure_edit()?;
        let node = self
            .inline_edit
            .ok_or_else(|| EditorError::InvalidTarget("no inline edit in progress".to_string()))?;
        let doc = self.document.as_mut().ok_or(EditorError::ReadOnly)?;
        if !doc.is_connected(node) {
            self.inline_edit = None;
            return Err(EditorError::InvalidTarget("edited element was removed".to_string()));
        }
        doc.set_inner_html(node, markup)?;
        self.inline_edit = None;
        self.commit(Some(node));
        self.prepare_inspector()
    }

    pub fn cancel_inline_edit(&mut self) {
        self.inline_edit = None;
    }

    pub fn is_inline_editing(&self) -> bool {
        self.inline_edit.is_some()
    }

    /// Set the document `<title>`. Blank or unchanged titles do nothing.
    pub fn set_title(&mut self, title: &str) -> EditorResult<bool> {
        self.ensure_edit()?;
        let title = title.trim();
        if title.is_empty() || self.title().as_deref() == Some(title) {
            return Ok(false);
        }
        let selected = self.selected();
        let doc = self.document.as_mut().ok_or(EditorError::ReadOnly)?;
        Self::write_title(doc, title)?;
        self.commit(selected);
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Styles
    // ------------------------------------------------------------------

    /// Stage a property value for the selection.
    pub fn stage_style(&mut self, property: &str, value: &str) -> EditorResult<()> {
        self.ensure_edit()?;
        self.selected_node()?;
        let property = property.trim();
        if property.is_empty() {
            return Err(EditorError::InvalidTarget("empty property".to_string()));
        }
        self.property_edits.set(property, value.trim());
        Ok(())
    }

    /// Write every staged property with a value into the selection's
    /// `style` attribute.
    pub fn apply_inline_style(&mut self) -> EditorResult<()> {
        self.ensure_edit()?;
        let node = self.selected_node()?;
        let declarations = self.property_edits.all_declarations();
        if declarations.is_empty() {
            return Err(EditorError::InvalidTarget("No properties set".to_string()));
        }
        let doc = self.document.as_mut().ok_or(EditorError::ReadOnly)?;
        let mut style = Declarations::parse(doc.attribute(node, "style").unwrap_or_default());
        style.merge(&declarations);
        doc.set_attribute(node, "style", style.to_inline())?;
        self.commit(Some(node));
        Ok(())
    }

    /// Merge the dirty properties into the selection's stylesheet rule and
    /// persist the stylesheet. Dirty flags clear only when the write
    /// succeeds; the merged text is kept either way.
    #[instrument(skip(self, backend))]
    pub fn save_stylesheet(&mut self, backend: &mut dyn ProjectBackend) -> EditorResult<String> {
        self.ensure_edit()?;
        let project = self.project.clone().ok_or(EditorError::NoProject)?;
        let node = self.selected_node()?;
        let doc = self.document.as_ref().ok_or(EditorError::ReadOnly)?;
        let selector = selector_for(doc, node)
            .ok_or_else(|| EditorError::InvalidTarget("no selector for element".to_string()))?;

        let dirty = self.property_edits.dirty_declarations();
        if dirty.is_empty() {
            return Err(EditorError::InvalidTarget("No changed properties to save".to_string()));
        }

        self.stylesheet = merge_rule(&self.stylesheet, &selector, &dirty)?;
        self.sync_preview_style()?;

        backend.persist_stylesheet(&project, &self.stylesheet)?;
        self.property_edits.mark_persisted(&dirty);
        info!(%selector, properties = dirty.len(), "stylesheet saved");
        Ok(self.stylesheet.clone())
    }

    /// Mirror the stylesheet into the preview `<style>` element.
    fn sync_preview_style(&mut self) -> EditorResult<()> {
        if !self.config.inject_preview_style {
            return Ok(());
        }
        let Some(doc) = self.document.as_mut() else {
            return Ok(());
        };
        let style = match doc.get_element_by_id(INJECTED_STYLE_ID) {
            Some(style) => style,
            None => {
                let parent = doc
                    .head()
                    .or_else(|| doc.document_element())
                    .unwrap_or_else(|| doc.root());
                let style = doc.create_element("style");
                doc.set_attribute(style, "id", INJECTED_STYLE_ID)?;
                doc.append_child(parent, style)?;
                style
            }
        };
        doc.set_text_content(style, &self.stylesheet)?;
        self.preview_injected = true;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Persistence and history
    // ------------------------------------------------------------------

    /// Serialize the document and persist it. History is untouched whether
    /// or not the write succeeds.
    #[instrument(skip(self, backend))]
    pub fn save_markup(&mut self, backend: &mut dyn ProjectBackend) -> EditorResult<String> {
        let project = self.project.clone().ok_or(EditorError::NoProject)?;
        self.ensure_edit()?;
        let doc = self.document.as_ref().ok_or(EditorError::ReadOnly)?;

        let mut markup = serialize_document(doc, &self.overlays);
        if self.config.pretty_print {
            markup = pretty_print(&markup);
            markup.push('\n');
        }
        backend.persist_markup(&project, &markup)?;
        info!(bytes = markup.len(), "markup saved");
        Ok(markup)
    }

    pub fn upload_asset(
        &self,
        backend: &mut dyn ProjectBackend,
        target: &str,
        asset: Asset,
    ) -> EditorResult<String> {
        let project = self.project.as_deref().ok_or(EditorError::NoProject)?;
        Ok(backend.upload_asset(project, target, asset)?)
    }

    /// Restore the previous snapshot. The document is replaced wholesale, so
    /// selection is cleared and click interception re-armed.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> EditorResult<()> {
        self.ensure_edit()?;
        // parse before stepping back so a bad snapshot leaves history alone
        let previous = self.history.previous().ok_or(HistoryError::NothingToUndo)?;
        let doc = parse(previous.markup())?;
        self.history.undo()?;

        match self.document.as_mut() {
            Some(current) => current.replace_with(doc),
            None => self.document = Some(doc),
        }
        self.rebuild();
        self.clear_selection();
        self.selection.arm();
        if self.preview_injected {
            self.sync_preview_style()?;
        }
        debug!(position = ?self.history.position(), "undo");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Host events
    // ------------------------------------------------------------------

    /// Run the shortcut bound to `event`, returning the action taken.
    pub fn handle_key(
        &mut self,
        event: &KeyEvent,
        typing: bool,
        backend: &mut dyn ProjectBackend,
    ) -> EditorResult<Option<EditorAction>> {
        if self.is_read_only() {
            return Ok(None);
        }
        let typing = typing || self.inline_edit.is_some();
        let Some(action) = action_for(event, typing, self.selected().is_some()) else {
            return Ok(None);
        };
        match action {
            EditorAction::Save => {
                self.save_markup(backend)?;
            }
            EditorAction::Undo => self.undo()?,
            EditorAction::Close => self.close(),
            EditorAction::Delete => self.delete_selected()?,
            EditorAction::ApplyAttributes => {
                if let Some(edit) = self.staged_attributes.clone() {
                    self.apply_attributes(&edit)?;
                }
            }
            EditorAction::Move(op) => {
                self.move_selected(op)?;
            }
            EditorAction::Indent => {
                self.indent_selected()?;
            }
            EditorAction::Outdent => {
                self.outdent_selected()?;
            }
        }
        Ok(Some(action))
    }

    pub fn on_scroll(&mut self) {
        self.selection.request_reposition();
    }

    pub fn on_resize(&mut self) {
        self.selection.request_reposition();
    }

    pub fn on_animation_frame(&mut self, probe: &dyn LayoutProbe) -> bool {
        match self.document.as_ref() {
            Some(doc) => self.selection.on_animation_frame(doc, probe),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_edit(&self) -> EditorResult<()> {
        if self.project.is_none() {
            return Err(EditorError::NoProject);
        }
        if self.is_read_only() {
            return Err(EditorError::ReadOnly);
        }
        Ok(())
    }

    fn selected_node(&self) -> EditorResult<NodeId> {
        self.selected().ok_or(EditorError::NoSelection)
    }

    fn structural<F>(&mut self, op: F) -> EditorResult<bool>
    where
        F: FnOnce(&mut Document, NodeId, NodeId, &OverlayMatcher) -> ReorderResult,
    {
        self.ensure_edit()?;
        let node = self.selected_node()?;
        let doc = self.document.as_mut().ok_or(EditorError::ReadOnly)?;
        let top = doc
            .top_container()
            .ok_or_else(|| EditorError::InvalidTarget("document has no container".to_string()))?;
        let changed = op(doc, node, top, &self.overlays)?;
        if changed {
            self.commit(Some(node));
        }
        Ok(changed)
    }

    /// Snapshot, rebuild, reselect.
    fn commit(&mut self, reselect: Option<NodeId>) {
        if let Some(doc) = self.document.as_ref() {
            self.history.push(to_markup(doc));
        }
        self.rebuild();
        let Some(doc) = self.document.as_ref() else {
            return;
        };
        match reselect {
            Some(node) => {
                self.selection
                    .reselect(doc, &mut self.outline, &self.registry, node)
            }
            None => self.selection.clear(&mut self.outline),
        }
    }

    fn rebuild(&mut self) {
        let (outline, registry) = match self.document.as_ref() {
            Some(doc) => match doc.top_container() {
                Some(top) => outline::build(doc, top, &self.overlays),
                None => (Outline::default(), NodeRegistry::new()),
            },
            None => (Outline::default(), NodeRegistry::new()),
        };
        let marked = self.outline.marked().and(self.selected());
        self.outline = outline;
        self.registry = registry;
        if let (Some(node), Some(doc)) = (marked, self.document.as_ref()) {
            self.outline.mark(self.registry.outline_for(doc, node));
        }
    }

    fn prepare_inspector(&mut self) -> EditorResult<()> {
        self.property_edits.clear();
        let Some(doc) = self.document.as_ref() else {
            return Ok(());
        };
        let Some(node) = self.selection.selected(doc) else {
            return Ok(());
        };
        let ctx = InspectContext {
            doc,
            node,
            tags: &self.tags,
            schema: &self.schema,
            stylesheet: &self.stylesheet,
        };
        self.tab.inspector().prepare(ctx, &mut self.property_edits)
    }

    fn title_element(doc: &Document) -> Option<NodeId> {
        let head = doc.head()?;
        doc.descendants(head).find(|n| doc.is_tag(*n, "title"))
    }

    fn write_title(doc: &mut Document, title: &str) -> EditorResult<()> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(());
        }
        let element = match Self::title_element(doc) {
            Some(element) => element,
            None => {
                let parent = doc
                    .head()
                    .or_else(|| doc.document_element())
                    .unwrap_or_else(|| doc.root());
                let element = doc.create_element("title");
                doc.append_child(parent, element)?;
                element
            }
        };
        doc.set_text_content(element, title)?;
        Ok(())
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
