//! Upsert properties of `merge_rule` over realistic stylesheets.

use livepage_stylesheet::{find_rule_blocks, merge_rule, merge_rule_text, Declarations, PropertyEdits};

const SITE_CSS: &str = r#"/* site styles */
body {
  margin: 0;
  font-family: sans-serif;
}

#hero {
  color: blue;
  margin: 0;
}

@media (max-width: 600px) {
  #hero { margin: 8px; }
}

.card { padding: 4px; }
"#;

#[test]
fn test_merge_is_idempotent() {
    let decls = Declarations::parse("color: red; border: 1px solid black");
    for selector in ["#hero", ".card", "section", ".new-thing"] {
        let once = merge_rule(SITE_CSS, selector, &decls).unwrap();
        let twice = merge_rule(&once, selector, &decls).unwrap();
        assert_eq!(once, twice, "merge not idempotent for {}", selector);
    }
}

#[test]
fn test_merge_overrides_and_preserves() {
    let merged = merge_rule_text(SITE_CSS, "#hero", "color: red").unwrap();
    assert!(merged.contains("#hero {\n  color: red;\n  margin: 0;\n}"));
    // The rule inside @media is left alone
    assert!(merged.contains("  #hero { margin: 8px; }"));
    assert_eq!(find_rule_blocks(&merged, "#hero").unwrap().len(), 1);
}

#[test]
fn test_at_most_one_block_after_merge() {
    let css = format!("{}\n.card {{ margin: 2px; }}\n", SITE_CSS);
    assert_eq!(find_rule_blocks(&css, ".card").unwrap().len(), 2);

    let merged = merge_rule_text(&css, ".card", "color: red").unwrap();
    let blocks = find_rule_blocks(&merged, ".card").unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(
        blocks[0].declarations().to_inline(),
        "padding: 4px; margin: 2px; color: red"
    );
}

#[test]
fn test_partial_write_only_merges_dirty_properties() {
    let mut edits = PropertyEdits::new();
    edits.inspect("color", "blue");
    edits.inspect("margin", "0");
    edits.inspect("padding", "");

    edits.set("color", "red");

    let written = edits.dirty_declarations();
    let merged = merge_rule(SITE_CSS, "#hero", &written).unwrap();
    assert!(merged.contains("#hero {\n  color: red;\n  margin: 0;\n}"));
    assert!(!merged.contains("padding: ;"));

    edits.mark_persisted(&written);
    assert!(edits.dirty_declarations().is_empty());
}
