//! Tree builder
//!
//! Turns the token stream into a [`Document`]. The builder is lenient in the
//! ways static pages need: void elements never take children, raw-text
//! elements swallow everything up to their end tag, some elements close
//! implicitly, and stray end tags are dropped. After building, the tree is
//! normalized so that `html > head + body` always exists.

use crate::document::{Doctype, Document, NodeData, NodeId};
use crate::error::{DomError, DomResult, ParseError, ParseResult};
use crate::lexer::{LexError, StartTag, Token};
use crate::markup::{is_raw_text, is_void};
use logos::{Lexer, Logos};
use tracing::debug;

/// Elements whose start tag implicitly closes an open `<p>`.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "dialog", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hgroup", "hr", "li", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Elements that belong in `<head>` when they show up before any body content.
const HEAD_CONTENT: &[&str] = &["base", "link", "meta", "script", "style", "title"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Document,
    Fragment,
}

/// Parse a full page into a normalized document.
pub fn parse(source: &str) -> ParseResult<Document> {
    let mut doc = Document::new();
    let root = doc.root();
    TreeBuilder::new(&mut doc, root, Mode::Document).run(source)?;
    normalize(&mut doc);
    debug!(nodes = doc.len(), bytes = source.len(), "parsed document");
    Ok(doc)
}

/// Parse markup into detached nodes owned by `doc`.
///
/// The returned nodes have no parent; callers insert them where needed.
/// `html`, `head` and `body` tags are ignored in fragments.
pub fn parse_fragment(doc: &mut Document, source: &str) -> ParseResult<Vec<NodeId>> {
    let container = doc.create_element("template");
    if let Err(err) = TreeBuilder::new(doc, container, Mode::Fragment).run(source) {
        let _ = doc.remove(container);
        return Err(err);
    }

    let nodes = doc.children(container).to_vec();
    for node in &nodes {
        // Children of a live container always detach cleanly
        let _ = doc.detach(*node);
    }
    let _ = doc.remove(container);
    Ok(nodes)
}

impl Document {
    /// Replace the children of `id` with nodes parsed from `markup`.
    ///
    /// The markup is parsed before anything is removed, so a parse error
    /// leaves the element untouched.
    pub fn set_inner_html(&mut self, id: NodeId, markup: &str) -> DomResult<()> {
        if !self.is_element(id) {
            return Err(if self.contains(id) {
                DomError::NotAnElement(id)
            } else {
                DomError::NodeNotFound(id)
            });
        }
        let nodes = parse_fragment(self, markup)?;
        self.clear_children(id)?;
        for node in nodes {
            self.append_child(id, node)?;
        }
        Ok(())
    }
}

struct TreeBuilder<'d> {
    doc: &'d mut Document,
    /// Open elements; index 0 is the container and is never popped
    stack: Vec<NodeId>,
    mode: Mode,
    html: Option<NodeId>,
    head: Option<NodeId>,
    body: Option<NodeId>,
}

impl<'d> TreeBuilder<'d> {
    fn new(doc: &'d mut Document, container: NodeId, mode: Mode) -> Self {
        Self {
            doc,
            stack: vec![container],
            mode,
            html: None,
            head: None,
            body: None,
        }
    }

    fn run(mut self, source: &str) -> ParseResult<()> {
        let mut lexer = Token::lexer(source);

        while let Some(token) = lexer.next() {
            let pos = lexer.span().start;
            let token = token.map_err(|err| match err {
                LexError::UnterminatedTag(tag) => ParseError::unterminated_tag(pos, tag),
                LexError::Invalid => ParseError::lexer_error(pos),
            })?;

            match token {
                Token::Doctype(raw) => {
                    if self.mode == Mode::Document && self.doc.doctype.is_none() {
                        self.doc.doctype = Some(parse_doctype(raw));
                    }
                }
                Token::Comment(text) => {
                    let node = self.doc.create_comment(text);
                    self.append(node);
                }
                Token::Bogus(raw) => {
                    let node = self.doc.create_comment(&raw[1..raw.len() - 1]);
                    self.append(node);
                }
                Token::StartTag(tag) => self.start_tag(tag, &mut lexer),
                Token::EndTag(name) => self.end_tag(&name),
                Token::Text(text) => self.text(text),
            }
        }
        Ok(())
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn current_tag(&self) -> Option<&str> {
        if self.stack.len() <= 1 {
            return None;
        }
        self.doc.tag_name(self.current())
    }

    fn append(&mut self, node: NodeId) {
        let parent = self.current();
        // The builder only ever appends freshly created nodes to open containers
        let _ = self.doc.append_child(parent, node);
    }

    fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn start_tag<'s>(&mut self, tag: StartTag, lexer: &mut Lexer<'s, Token<'s>>) {
        if self.structural_tag(&tag) {
            return;
        }

        while let Some(open) = self.current_tag() {
            if !closes_implicitly(open, &tag.name) {
                break;
            }
            self.pop();
        }

        let name = tag.name.clone();
        let element = self.doc.create_element_with(&name, tag.attributes);
        self.append(element);

        if tag.self_closing || is_void(&name) {
            return;
        }
        if is_raw_text(&name) {
            let rest = lexer.remainder();
            let end = find_raw_text_end(rest, &name);
            if end > 0 {
                let text = self.doc.create_text(&rest[..end]);
                let _ = self.doc.append_child(element, text);
            }
            lexer.bump(end);
            // The matching end tag (if any) is lexed next and closes nothing.
            if end == rest.len() {
                return;
            }
        }
        self.stack.push(element);
    }

    /// `html`, `head` and `body` are created at most once; repeats only
    /// contribute missing attributes. Returns true when the tag was consumed.
    fn structural_tag(&mut self, tag: &StartTag) -> bool {
        let slot = match tag.name.as_str() {
            "html" => self.html,
            "head" => self.head,
            "body" => self.body,
            _ => return false,
        };
        if self.mode == Mode::Fragment {
            return true;
        }

        if let Some(existing) = slot {
            if let Ok(el) = self.doc.element_mut(existing) {
                for attr in &tag.attributes {
                    if el.get(&attr.name).is_none() {
                        el.set(&attr.name, attr.value.clone());
                    }
                }
            }
            return true;
        }

        if tag.name != "html" && self.html.is_none() {
            let html = self.doc.create_element("html");
            self.append(html);
            self.stack.push(html);
            self.html = Some(html);
        }
        if tag.name == "body" {
            if let Some(head) = self.head {
                if let Some(idx) = self.stack.iter().position(|n| *n == head) {
                    self.stack.truncate(idx);
                }
            }
        }

        let element = self.doc.create_element_with(&tag.name, tag.attributes.clone());
        self.append(element);
        self.stack.push(element);
        match tag.name.as_str() {
            "html" => self.html = Some(element),
            "head" => self.head = Some(element),
            _ => self.body = Some(element),
        }
        true
    }

    fn end_tag(&mut self, name: &str) {
        let matching = (1..self.stack.len())
            .rev()
            .find(|i| self.doc.is_tag(self.stack[*i], name));
        match matching {
            Some(idx) => self.stack.truncate(idx),
            None => debug!(tag = name, "ignoring unmatched end tag"),
        }
    }

    fn text(&mut self, text: &str) {
        if self.current_tag() == Some("head") && !text.trim().is_empty() {
            self.pop();
        }
        let parent = self.current();
        let last = self.doc.children(parent).last().copied();
        if let Some(last) = last {
            if let Some(node) = self.doc.text_mut(last) {
                node.push_str(text);
                return;
            }
        }
        let node = self.doc.create_text(text);
        self.append(node);
    }
}

fn closes_implicitly(open: &str, incoming: &str) -> bool {
    match open {
        "p" => CLOSES_P.contains(&incoming),
        "li" => incoming == "li",
        "option" => incoming == "option" || incoming == "optgroup",
        "dt" | "dd" => incoming == "dt" || incoming == "dd",
        "tr" => incoming == "tr",
        "td" | "th" => matches!(incoming, "td" | "th" | "tr"),
        "head" => !HEAD_CONTENT.contains(&incoming),
        _ => false,
    }
}

/// Byte offset of `</name` (case-insensitive) in `rest`, or `rest.len()`.
fn find_raw_text_end(rest: &str, name: &str) -> usize {
    let lower = rest.to_ascii_lowercase();
    let needle = format!("</{}", name);
    let mut from = 0;
    while let Some(found) = lower[from..].find(&needle) {
        let idx = from + found;
        let after = lower.as_bytes().get(idx + needle.len());
        match after {
            None => return idx,
            Some(b) if *b == b'>' || *b == b'/' || b.is_ascii_whitespace() => return idx,
            Some(_) => from = idx + needle.len(),
        }
    }
    rest.len()
}

/// Read `<!DOCTYPE name PUBLIC "pub" "sys">` into its parts.
fn parse_doctype(raw: &str) -> Doctype {
    let inner = raw
        .get("<!DOCTYPE".len()..raw.len().saturating_sub(1))
        .unwrap_or("")
        .trim();
    let name = inner
        .split_whitespace()
        .next()
        .unwrap_or("html")
        .to_string();

    let quoted: Vec<&str> = inner
        .split(|c| c == '"' || c == '\'')
        .skip(1)
        .step_by(2)
        .collect();
    let upper = inner.to_ascii_uppercase();
    let (public_id, system_id) = if upper.contains("PUBLIC") {
        (
            quoted.first().map(|s| s.to_string()),
            quoted.get(1).map(|s| s.to_string()),
        )
    } else if upper.contains("SYSTEM") {
        (None, quoted.first().map(|s| s.to_string()))
    } else {
        (None, None)
    };

    Doctype {
        name,
        public_id,
        system_id,
    }
}

fn is_whitespace_text(doc: &Document, id: NodeId) -> bool {
    matches!(doc.node(id).map(|n| &n.data), Some(NodeData::Text(t)) if t.trim().is_empty())
}

fn is_comment(doc: &Document, id: NodeId) -> bool {
    matches!(doc.node(id).map(|n| &n.data), Some(NodeData::Comment(_)))
}

/// Guarantee `html > head + body` and move stray content into place.
fn normalize(doc: &mut Document) {
    if let Err(err) = try_normalize(doc) {
        // Only reachable with ids the builder did not create
        debug!(%err, "normalization stopped early");
    }
}

fn try_normalize(doc: &mut Document) -> Result<(), DomError> {
    let root = doc.root();
    let html = match doc
        .children(root)
        .iter()
        .copied()
        .find(|c| doc.is_tag(*c, "html"))
    {
        Some(html) => html,
        None => {
            let html = doc.create_element("html");
            doc.append_child(root, html)?;
            html
        }
    };

    // Stray nodes in document order: before the body's content or after it
    let mut before = Vec::new();
    let mut root_after = Vec::new();
    let mut seen_html = false;
    for child in doc.children(root).to_vec() {
        if child == html {
            seen_html = true;
        } else if is_whitespace_text(doc, child) {
            doc.remove(child)?;
        } else if is_comment(doc, child) {
            continue;
        } else if seen_html {
            root_after.push(child);
        } else {
            before.push(child);
        }
    }

    let mut head = None;
    let mut body = None;
    let mut after = Vec::new();
    for child in doc.children(html).to_vec() {
        if is_whitespace_text(doc, child) {
            doc.remove(child)?;
        } else if head.is_none() && body.is_none() && doc.is_tag(child, "head") {
            head = Some(child);
        } else if body.is_none() && doc.is_tag(child, "body") {
            body = Some(child);
        } else if body.is_none() {
            before.push(child);
        } else {
            after.push(child);
        }
    }
    after.extend(root_after);

    let head = match head {
        Some(head) => head,
        None => {
            let head = doc.create_element("head");
            let first = doc.children(html).first().copied();
            doc.insert_before(html, head, first)?;
            head
        }
    };
    let body = match body {
        Some(body) => body,
        None => {
            let body = doc.create_element("body");
            let next = doc.next_sibling(head);
            doc.insert_before(html, body, next)?;
            body
        }
    };

    let body_first = doc.children(body).first().copied();
    let mut head_phase = body_first.is_none();
    for node in before {
        let head_content = doc
            .tag_name(node)
            .map(|t| HEAD_CONTENT.contains(&t))
            .unwrap_or(false);
        if head_phase && head_content {
            doc.append_child(head, node)?;
        } else {
            head_phase = false;
            doc.insert_before(body, node, body_first)?;
        }
    }
    for node in after {
        doc.append_child(body, node)?;
    }
    Ok(())
}
