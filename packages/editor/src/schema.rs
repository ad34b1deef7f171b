//! Inspector metadata: which attributes a tag accepts and which CSS
//! properties the style inspector offers.
//!
//! Both are plain JSON documents loaded by the workspace. Neither influences
//! editing itself; they only shape inspector rows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Properties listed before the alphabetical rest.
pub const COMMON_PROPERTIES: &[&str] = &[
    "display",
    "color",
    "background-color",
    "font-size",
    "margin",
    "padding",
    "width",
    "height",
    "border",
    "box-shadow",
    "opacity",
];

/// Tag name → allowed attribute names. The `global` key applies to every
/// tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagAttributes(pub BTreeMap<String, Vec<String>>);

impl TagAttributes {
    pub const GLOBAL: &'static str = "global";

    /// `class` and `id` first, then globals, then the tag's own attributes,
    /// without duplicates.
    pub fn attributes_for(&self, tag: &str) -> Vec<String> {
        let mut list: Vec<String> = vec!["class".to_string(), "id".to_string()];
        let global = self.0.get(Self::GLOBAL).into_iter().flatten();
        let own = self.0.get(tag).into_iter().flatten();
        for name in global.chain(own) {
            if !list.contains(name) {
                list.push(name.clone());
            }
        }
        list
    }

    /// Tags offered by "add element", sorted, without `global`.
    pub fn tags(&self) -> Vec<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|t| *t != Self::GLOBAL)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDef {
    /// Control hint: `color`, `number`, `select`, `box`, ...
    pub ui: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub values: Vec<String>,
    pub units: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssSchema {
    pub properties: BTreeMap<String, PropertyDef>,
}

impl CssSchema {
    pub fn get(&self, property: &str) -> Option<&PropertyDef> {
        self.properties.get(property)
    }

    /// Property names in inspector order: common ones first, then the rest
    /// alphabetically. `filter` keeps names containing it.
    pub fn ordered(&self, filter: &str) -> Vec<&str> {
        let common = COMMON_PROPERTIES
            .iter()
            .copied()
            .filter(|p| self.properties.contains_key(*p));
        let rest = self
            .properties
            .keys()
            .map(String::as_str)
            .filter(|p| !COMMON_PROPERTIES.contains(p));
        common.chain(rest).filter(|p| p.contains(filter)).collect()
    }
}
