//! # Livepage Stylesheet
//!
//! Text-level editing of a project's stylesheet. There is no CSS object
//! model here: a stylesheet is a flat string of `selector { ... }` blocks and
//! every operation reads and writes that string.
//!
//! - [`Declarations`]: ordered `prop: value` lists
//! - [`merge_rule`]: insert-or-merge the block for one selector
//! - [`PropertyEdits`]: per-property dirty tracking for partial writes

pub mod declarations;
pub mod edit_state;
pub mod error;
pub mod merge;

pub use declarations::{parse_declarations, Declarations};
pub use edit_state::{PropertyEditState, PropertyEdits};
pub use error::{StylesheetError, StylesheetResult};
pub use merge::{find_rule_blocks, merge_rule, merge_rule_text, rule_declarations, RuleBlock};
