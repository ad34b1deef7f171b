//! # Inspectors
//!
//! The side panel shows one of two views of the selected element, chosen by
//! the active [`InspectorTab`]. Each view is produced by an [`Inspector`]
//! strategy; the session never branches on the tab itself.

use crate::errors::EditorResult;
use crate::schema::{CssSchema, PropertyDef, TagAttributes};
use livepage_dom::{inner_html, Document, NodeId};
use livepage_stylesheet::{rule_declarations, Declarations, PropertyEditState, PropertyEdits};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InspectorTab {
    #[default]
    Attributes,
    Style,
}

impl InspectorTab {
    pub fn inspector(self) -> &'static dyn Inspector {
        static ATTRIBUTES: AttributeInspector = AttributeInspector;
        static STYLE: StyleInspector = StyleInspector;
        match self {
            InspectorTab::Attributes => &ATTRIBUTES,
            InspectorTab::Style => &STYLE,
        }
    }
}

/// Stylesheet selector for `node`: `#id`, else `.firstclass`, else the tag.
pub fn selector_for(doc: &Document, node: NodeId) -> Option<String> {
    if let Some(id) = doc.element_id(node).filter(|id| !id.is_empty()) {
        return Some(format!("#{}", id));
    }
    if let Some(class) = doc.first_class(node) {
        return Some(format!(".{}", class));
    }
    doc.tag_name(node).map(str::to_ascii_lowercase)
}

/// Upload bucket for an attribute that can take an uploaded file's path.
pub fn upload_target(tag: &str, attribute: &str) -> Option<&'static str> {
    let upload_capable = matches!(attribute, "src" | "href" | "poster" | "data" | "srcset")
        || attribute.ends_with("src");
    if !upload_capable {
        return None;
    }
    Some(match tag {
        "video" => "videos",
        "audio" => "audio",
        _ => "images",
    })
}

/// Everything an inspector may read.
#[derive(Clone, Copy)]
pub struct InspectContext<'a> {
    pub doc: &'a Document,
    pub node: NodeId,
    pub tags: &'a TagAttributes,
    pub schema: &'a CssSchema,
    pub stylesheet: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRow {
    pub name: String,
    pub value: String,
    pub upload_target: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeView {
    pub tag: String,
    pub rows: Vec<AttributeRow>,
    pub inner_html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRow {
    pub property: String,
    pub def: PropertyDef,
    pub state: PropertyEditState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleView {
    pub selector: String,
    pub rows: Vec<StyleRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tab", rename_all = "camelCase")]
pub enum InspectorView {
    Attributes(AttributeView),
    Style(StyleView),
}

/// A way of presenting the selected element.
pub trait Inspector: Send + Sync {
    fn tab(&self) -> InspectorTab;

    /// Runs once when an element becomes selected (or the tab changes).
    fn prepare(&self, _ctx: InspectContext<'_>, _edits: &mut PropertyEdits) -> EditorResult<()> {
        Ok(())
    }

    fn inspect(&self, ctx: InspectContext<'_>, edits: &PropertyEdits) -> InspectorView;
}

#[derive(Debug, Default)]
pub struct AttributeInspector;

impl Inspector for AttributeInspector {
    fn tab(&self) -> InspectorTab {
        InspectorTab::Attributes
    }

    fn inspect(&self, ctx: InspectContext<'_>, _edits: &PropertyEdits) -> InspectorView {
        let doc = ctx.doc;
        let tag = doc.tag_name(ctx.node).unwrap_or_default().to_string();

        let mut names = ctx.tags.attributes_for(&tag);
        if let Some(element) = doc.element(ctx.node) {
            for attr in &element.attributes {
                if !names.contains(&attr.name) {
                    names.push(attr.name.clone());
                }
            }
        }

        let rows = names
            .into_iter()
            .map(|name| AttributeRow {
                value: doc.attribute(ctx.node, &name).unwrap_or_default().to_string(),
                upload_target: upload_target(&tag, &name),
                name,
            })
            .collect();

        InspectorView::Attributes(AttributeView {
            tag,
            rows,
            inner_html: inner_html(doc, ctx.node),
        })
    }
}

#[derive(Debug, Default)]
pub struct StyleInspector;

impl StyleInspector {
    fn inline(ctx: &InspectContext<'_>) -> Declarations {
        Declarations::parse(ctx.doc.attribute(ctx.node, "style").unwrap_or_default())
    }

    fn properties(ctx: &InspectContext<'_>, inline: &Declarations, rule: &Declarations) -> Vec<String> {
        let mut names: Vec<String> = ctx.schema.ordered("").into_iter().map(String::from).collect();
        for (property, _) in inline.iter().chain(rule.iter()) {
            if !names.iter().any(|n| n == property) {
                names.push(property.to_string());
            }
        }
        names
    }
}

impl Inspector for StyleInspector {
    fn tab(&self) -> InspectorTab {
        InspectorTab::Style
    }

    /// Seed every property's original value from the inline style, falling
    /// back to the stylesheet rule for the element's selector.
    fn prepare(&self, ctx: InspectContext<'_>, edits: &mut PropertyEdits) -> EditorResult<()> {
        let inline = Self::inline(&ctx);
        let rule = match selector_for(ctx.doc, ctx.node) {
            Some(selector) => rule_declarations(ctx.stylesheet, &selector)?.unwrap_or_default(),
            None => Declarations::new(),
        };

        edits.clear();
        for property in Self::properties(&ctx, &inline, &rule) {
            let original = inline
                .get(&property)
                .or_else(|| rule.get(&property))
                .unwrap_or_default();
            edits.inspect(&property, original);
        }
        Ok(())
    }

    fn inspect(&self, ctx: InspectContext<'_>, edits: &PropertyEdits) -> InspectorView {
        let rows = edits
            .iter()
            .map(|(property, state)| StyleRow {
                property: property.to_string(),
                def: ctx.schema.get(property).cloned().unwrap_or_default(),
                state: state.clone(),
            })
            .collect();
        InspectorView::Style(StyleView {
            selector: selector_for(ctx.doc, ctx.node).unwrap_or_default(),
            rows,
        })
    }
}
