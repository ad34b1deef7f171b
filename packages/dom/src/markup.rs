//! Markup writers
//!
//! Text and attribute values are stored raw, so writing is a straight walk:
//! only `"` inside attribute values needs escaping because every value is
//! written double-quoted.

use crate::document::{Document, ElementData, NodeData, NodeId};
use std::borrow::Cow;

pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is read verbatim up to the matching end tag.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

pub fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    if value.contains('"') {
        Cow::Owned(value.replace('"', "&quot;"))
    } else {
        Cow::Borrowed(value)
    }
}

/// Markup of a node including its own tags.
pub fn outer_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

/// Markup of a node's children.
pub fn inner_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    for child in doc.children(id) {
        write_node(doc, *child, &mut out);
    }
    out
}

/// Whole-document markup: doctype followed by every top-level node.
pub fn to_markup(doc: &Document) -> String {
    let mut out = String::new();
    if let Some(doctype) = &doc.doctype {
        out.push_str(&doctype.to_markup());
        out.push('\n');
    }
    out.push_str(&inner_html(doc, doc.root()));
    out
}

/// `<tag attr="value">` for an element.
pub fn start_tag(element: &ElementData) -> String {
    let mut out = String::new();
    write_start_tag(element, &mut out);
    out
}

fn write_start_tag(element: &ElementData, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for attr in &element.attributes {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(&attr.value));
        out.push('"');
    }
    out.push('>');
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let Some(node) = doc.node(id) else {
        return;
    };
    match &node.data {
        NodeData::Document => {
            for child in node.children() {
                write_node(doc, *child, out);
            }
        }
        NodeData::Text(text) => out.push_str(text),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Element(element) => {
            write_start_tag(element, out);
            if is_void(&element.tag) {
                return;
            }
            for child in node.children() {
                write_node(doc, *child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Attribute;

    #[test]
    fn test_outer_html_escapes_quotes() {
        let mut doc = Document::new();
        let a = doc.create_element_with("a", vec![Attribute::new("title", r#"say "hi""#)]);
        let text = doc.create_text("link &amp; more");
        doc.append_child(a, text).unwrap();

        assert_eq!(
            outer_html(&doc, a),
            r#"<a title="say &quot;hi&quot;">link &amp; more</a>"#
        );
    }

    #[test]
    fn test_void_elements_have_no_end_tag() {
        let mut doc = Document::new();
        let img = doc.create_element_with("img", vec![Attribute::new("src", "a.png")]);
        assert_eq!(outer_html(&doc, img), r#"<img src="a.png">"#);
    }

    #[test]
    fn test_inner_html_skips_own_tags() {
        let mut doc = Document::new();
        let ul = doc.create_element("ul");
        let li = doc.create_element("li");
        let comment = doc.create_comment(" note ");
        doc.append_child(ul, li).unwrap();
        doc.append_child(ul, comment).unwrap();

        assert_eq!(inner_html(&doc, ul), "<li></li><!-- note -->");
    }
}
