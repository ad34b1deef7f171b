//! Ordered declaration lists (`prop: value; prop2: value2`).

use serde::{Deserialize, Serialize};

/// Property/value pairs in first-seen order. Setting an existing property
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declarations {
    entries: Vec<(String, String)>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `;`-separated list. Entries without a `:` or with an empty
    /// property name are skipped; for duplicates the last value wins.
    pub fn parse(text: &str) -> Self {
        let mut decls = Self::new();
        for pair in text.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((prop, value)) = pair.split_once(':') else {
                continue;
            };
            let prop = prop.trim();
            if prop.is_empty() {
                continue;
            }
            decls.set(prop, value.trim());
        }
        decls
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(p, _)| p == property)?;
        Some(self.entries.remove(pos).1)
    }

    /// Overlay `other` onto `self`: its values win, untouched properties stay.
    pub fn merge(&mut self, other: &Declarations) {
        for (prop, value) in other.iter() {
            self.set(prop, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `selector {\n  p: v;\n  p2: v2;\n}`
    pub fn to_block(&self, selector: &str) -> String {
        let body = self
            .iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .collect::<Vec<_>>()
            .join("\n  ");
        format!("{} {{\n  {}\n}}", selector, body)
    }

    /// Single-line form used for `style` attributes: `p: v; p2: v2`.
    pub fn to_inline(&self) -> String {
        self.iter()
            .map(|(p, v)| format!("{}: {}", p, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Declarations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut decls = Declarations::new();
        for (k, v) in iter {
            decls.set(k, v);
        }
        decls
    }
}

/// Free-function form of [`Declarations::parse`].
pub fn parse_declarations(text: &str) -> Declarations {
    Declarations::parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_malformed_entries() {
        let decls = parse_declarations(" color: red ;;margin:0; bogus ; : 1px; width: calc(1px + 2px)");
        assert_eq!(
            decls.iter().collect::<Vec<_>>(),
            vec![("color", "red"), ("margin", "0"), ("width", "calc(1px + 2px)")]
        );
    }

    #[test]
    fn test_last_duplicate_wins_first_position_kept() {
        let decls = parse_declarations("color: red; margin: 0; color: blue");
        assert_eq!(decls.to_inline(), "color: blue; margin: 0");
    }

    #[test]
    fn test_value_keeps_colons() {
        let decls = parse_declarations("background: url(http://x/y.png)");
        assert_eq!(decls.get("background"), Some("url(http://x/y.png)"));
    }

    #[test]
    fn test_block_format() {
        let decls: Declarations = [("color", "red"), ("margin", "0")].into_iter().collect();
        assert_eq!(decls.to_block(".card"), ".card {\n  color: red;\n  margin: 0;\n}");
    }
}
