//! # Rule upserts
//!
//! `merge_rule` inserts or updates the block for one selector in a flat
//! stylesheet. Matching is textual: the selector is regex-escaped and only
//! single-level blocks (`selector { ... }` with no nested braces) that start
//! a top-level rule are considered. Blocks inside `@media` and friends, or
//! where the selector is only the tail of a longer one (`div .card`), are
//! never touched.
//!
//! After a merge at most one top-level block exists for the selector: every
//! matching block is folded into the first and the others are removed.

use crate::declarations::Declarations;
use crate::error::{StylesheetError, StylesheetResult};
use regex::Regex;
use std::ops::Range;
use tracing::debug;

/// A top-level block for a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBlock {
    /// Byte range of the whole block, selector through `}`
    pub range: Range<usize>,
    /// Text between the braces
    pub body: String,
}

impl RuleBlock {
    pub fn declarations(&self) -> Declarations {
        Declarations::parse(&self.body)
    }
}

fn block_pattern(selector: &str) -> StylesheetResult<Regex> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(StylesheetError::EmptySelector);
    }
    let pattern = format!(r"{}\s*\{{([^{{}}]*)\}}", regex::escape(selector));
    Regex::new(&pattern).map_err(|source| StylesheetError::Pattern {
        selector: selector.to_string(),
        source,
    })
}

/// Brace depth at `pos`, ignoring braces inside comments.
fn depth_at(css: &str, pos: usize) -> usize {
    let bytes = css.as_bytes();
    let mut depth: usize = 0;
    let mut i = 0;
    while i < pos {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = css[i + 2..]
                    .find("*/")
                    .map(|end| i + 2 + end + 2)
                    .unwrap_or(css.len());
                continue;
            }
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += 1;
    }
    depth
}

/// A rule starts after the beginning of the text, a closed block, a comment
/// or a statement such as `@import ...;`.
fn starts_top_level_rule(css: &str, start: usize) -> bool {
    let before = css[..start].trim_end();
    let boundary = before.is_empty()
        || before.ends_with('}')
        || before.ends_with("*/")
        || before.ends_with(';');
    boundary && depth_at(css, start) == 0
}

/// Every top-level block for `selector`, in text order.
pub fn find_rule_blocks(css: &str, selector: &str) -> StylesheetResult<Vec<RuleBlock>> {
    let pattern = block_pattern(selector)?;
    Ok(pattern
        .captures_iter(css)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if !starts_top_level_rule(css, whole.start()) {
                return None;
            }
            Some(RuleBlock {
                range: whole.range(),
                body: caps.get(1).map(|b| b.as_str().to_string()).unwrap_or_default(),
            })
        })
        .collect())
}

/// The effective declarations for `selector`: all of its top-level blocks
/// folded in order. `None` when the selector has no block.
pub fn rule_declarations(css: &str, selector: &str) -> StylesheetResult<Option<Declarations>> {
    let blocks = find_rule_blocks(css, selector)?;
    if blocks.is_empty() {
        return Ok(None);
    }
    let mut merged = Declarations::new();
    for block in &blocks {
        merged.merge(&block.declarations());
    }
    Ok(Some(merged))
}

/// Upsert `declarations` into the block for `selector`.
///
/// Existing properties not mentioned in `declarations` are kept. When no
/// block exists, one is appended after a single blank line. Merging nothing
/// into a stylesheet without the selector leaves it unchanged.
pub fn merge_rule(
    css: &str,
    selector: &str,
    declarations: &Declarations,
) -> StylesheetResult<String> {
    let blocks = find_rule_blocks(css, selector)?;
    let selector = selector.trim();

    let Some(first) = blocks.first() else {
        if declarations.is_empty() {
            return Ok(css.to_string());
        }
        let block = declarations.to_block(selector);
        let existing = css.trim();
        debug!(selector, "appending rule");
        return Ok(if existing.is_empty() {
            format!("{}\n", block)
        } else {
            format!("{}\n\n{}\n", existing, block)
        });
    };

    let mut merged = Declarations::new();
    for block in &blocks {
        merged.merge(&block.declarations());
    }
    merged.merge(declarations);

    let mut out = String::with_capacity(css.len());
    out.push_str(&css[..first.range.start]);
    out.push_str(&merged.to_block(selector));
    let mut cursor = first.range.end;
    for duplicate in &blocks[1..] {
        out.push_str(&css[cursor..duplicate.range.start]);
        // Drop the duplicate together with the whitespace that followed it
        let rest = &css[duplicate.range.end..];
        cursor = duplicate.range.end + (rest.len() - rest.trim_start().len());
    }
    out.push_str(&css[cursor..]);

    debug!(
        selector,
        blocks = blocks.len(),
        properties = merged.len(),
        "merged rule"
    );
    Ok(out)
}

/// [`merge_rule`] taking a `prop: value; ...` list.
pub fn merge_rule_text(css: &str, selector: &str, declarations: &str) -> StylesheetResult<String> {
    merge_rule(css, selector, &Declarations::parse(declarations))
}
