//! Compound selector matching (`tag`, `#id`, `.class` and combinations,
//! comma-separated lists). No combinators: this is only used to address
//! elements by the same selectors the style merge engine writes.

use crate::document::{Document, NodeId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl CompoundSelector {
    /// Parse one compound selector. Returns `None` for anything with
    /// combinators, attribute selectors or pseudo-classes.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let mut selector = CompoundSelector::default();
        let mut rest = input;

        let tag_len = rest
            .find(|c: char| c == '#' || c == '.')
            .unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if tag != "*" {
                if !is_ident(tag) {
                    return None;
                }
                selector.tag = Some(tag.to_ascii_lowercase());
            }
            rest = &rest[tag_len..];
        }

        while let Some(prefix) = rest.chars().next() {
            let body = &rest[1..];
            let len = body
                .find(|c: char| c == '#' || c == '.')
                .unwrap_or(body.len());
            let name = &body[..len];
            if !is_ident(name) {
                return None;
            }
            match prefix {
                '#' => selector.id = Some(name.to_string()),
                _ => selector.classes.push(name.to_string()),
            }
            rest = &body[len..];
        }
        Some(selector)
    }

    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        if !doc.is_element(id) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !doc.is_tag(id, tag) {
                return false;
            }
        }
        if let Some(expected) = &self.id {
            if doc.attribute(id, "id") != Some(expected.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| doc.has_class(id, c))
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// A comma-separated list of compound selectors.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<CompoundSelector>);

impl SelectorList {
    pub fn parse(input: &str) -> Option<Self> {
        input
            .split(',')
            .map(CompoundSelector::parse)
            .collect::<Option<Vec<_>>>()
            .map(SelectorList)
    }

    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        self.0.iter().any(|s| s.matches(doc, id))
    }
}

impl Document {
    /// First element in document order matching `selector`.
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        let list = SelectorList::parse(selector)?;
        self.descendants(self.root())
            .find(|id| list.matches(self, *id))
    }

    /// Every element matching `selector`, in document order. An
    /// unsupported selector matches nothing.
    pub fn query_all(&self, selector: &str) -> Vec<NodeId> {
        match SelectorList::parse(selector) {
            Some(list) => self
                .descendants(self.root())
                .filter(|id| list.matches(self, *id))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_parse_compound() {
        let sel = CompoundSelector::parse("DIV#main.card.wide").unwrap();
        assert_eq!(sel.tag.as_deref(), Some("div"));
        assert_eq!(sel.id.as_deref(), Some("main"));
        assert_eq!(sel.classes, vec!["card", "wide"]);

        assert!(CompoundSelector::parse("div > p").is_none());
        assert!(CompoundSelector::parse("a:hover").is_none());
        assert!(CompoundSelector::parse("#").is_none());
    }

    #[test]
    fn test_query() {
        let doc = parse(
            r#"<body><div class="card"><p id="a" class="lead">x</p></div><p class="lead wide">y</p></body>"#,
        )
        .unwrap();

        let a = doc.query("#a").unwrap();
        assert_eq!(doc.tag_name(a), Some("p"));
        assert_eq!(doc.query_all("p.lead").len(), 2);
        assert_eq!(doc.query_all(".wide, .card").len(), 2);
        assert!(doc.query("section").is_none());
        assert!(doc.query_all("div p").is_empty());
    }
}
