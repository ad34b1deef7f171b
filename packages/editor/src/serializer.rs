//! # Canonical Serializer
//!
//! Produces the markup written back to a project's `index.html`:
//!
//! ```text
//! <!DOCTYPE ...>
//! <html attrs>
//! <head>
//! ...head content without scripts...
//! </head>
//! <body attrs>
//! ...body content without scripts...
//!
//! <script>...</script>          every script, in document order
//! </body>
//! </html>
//! ```
//!
//! Overlay nodes and the preview `<style>` are removed from a copy first;
//! the live document is never touched.

use crate::config::INJECTED_STYLE_ID;
use crate::overlay::OverlayMatcher;
use livepage_dom::{inner_html, markup, outer_html, Doctype, Document, NodeId};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn remove_scripts(doc: &mut Document, within: NodeId) {
    let scripts: Vec<NodeId> = doc
        .descendants(within)
        .filter(|id| doc.is_tag(*id, "script"))
        .collect();
    for script in scripts {
        if doc.contains(script) {
            let _ = doc.remove(script);
        }
    }
}

/// Serialize `doc` into its persisted form.
pub fn serialize_document(doc: &Document, overlays: &OverlayMatcher) -> String {
    let mut copy = doc.clone();
    overlays.strip(&mut copy);
    if let Some(style) = copy.get_element_by_id(INJECTED_STYLE_ID) {
        let _ = copy.remove(style);
    }

    let scripts: Vec<String> = copy
        .elements_by_tag("script")
        .into_iter()
        .map(|s| outer_html(&copy, s))
        .collect();

    let doctype = copy
        .doctype
        .clone()
        .unwrap_or_else(Doctype::html5)
        .to_markup();
    let html_tag = copy
        .document_element()
        .and_then(|html| copy.element(html))
        .map(markup::start_tag)
        .unwrap_or_else(|| "<html>".to_string());
    let body_tag = copy
        .body()
        .and_then(|body| copy.element(body))
        .map(markup::start_tag)
        .unwrap_or_else(|| "<body>".to_string());

    let head_inner = match copy.head() {
        Some(head) => {
            remove_scripts(&mut copy, head);
            inner_html(&copy, head)
        }
        None => String::new(),
    };
    let body_inner = match copy.body() {
        Some(body) => {
            remove_scripts(&mut copy, body);
            inner_html(&copy, body)
        }
        None => String::new(),
    };

    let mut lines = vec![
        doctype,
        html_tag,
        "<head>".to_string(),
        head_inner.trim().to_string(),
        "</head>".to_string(),
        body_tag,
        body_inner.trim().to_string(),
    ];
    if !scripts.is_empty() {
        lines.push(String::new());
        lines.push(scripts.join("\n"));
    }
    lines.push("</body>".to_string());
    lines.push("</html>".to_string());

    debug!(scripts = scripts.len(), "serialized document");
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn script_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("static script pattern")
    })
}

fn between_tags() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r">\s*<").expect("static tag boundary pattern"))
}

fn tag_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('<')?;
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
        .unwrap_or(rest.len());
    let name = &rest[..end];
    if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        None
    } else {
        Some(name)
    }
}

/// Does this line open an element that stays open past the line?
fn opens_block(line: &str) -> bool {
    if line.starts_with("</") || line.ends_with("/>") {
        return false;
    }
    let Some(name) = tag_name(line) else {
        return false;
    };
    if markup::is_void(name) {
        return false;
    }
    let closing = format!("</{}>", name.to_ascii_lowercase());
    !line.to_ascii_lowercase().ends_with(&closing)
}

/// Re-indent markup by tag nesting (two spaces per level) and move every
/// `<script>` element to just before `</body>` (else `</html>`, else the
/// end), preceded by a blank line.
pub fn pretty_print(raw: &str) -> String {
    let scripts: Vec<&str> = script_pattern().find_iter(raw).map(|m| m.as_str()).collect();
    let stripped = script_pattern().replace_all(raw, "");
    let split = between_tags().replace_all(&stripped, ">\n<");

    let mut out: Vec<String> = Vec::new();
    let mut depth: usize = 0;
    for line in split.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with("</") && tag_name(line).is_some() {
            depth = depth.saturating_sub(1);
        }
        out.push(format!("{}{}", "  ".repeat(depth), line));
        if opens_block(line) {
            depth += 1;
        }
    }

    if !scripts.is_empty() {
        let closes = |tag: &str| {
            let prefix = format!("</{}", tag);
            out.iter()
                .position(|l| l.trim_start().to_ascii_lowercase().starts_with(&prefix))
        };
        let at = closes("body").or_else(|| closes("html")).unwrap_or(out.len());
        let block = std::iter::once(String::new()).chain(scripts.iter().map(|s| s.to_string()));
        out.splice(at..at, block);
    }

    out.join("\n")
}
