//! # Livepage DOM
//!
//! The document model edited by Livepage: an arena-backed node tree, a
//! lenient reader for static pages and the matching markup writers.
//!
//! ```text
//! markup ──lexer──▶ tokens ──tree builder──▶ Document ──markup──▶ markup
//! ```
//!
//! Reading is lenient but not an HTML5 parser. It handles what hand-written
//! and generated static pages contain: void elements, raw-text elements,
//! implied end tags and missing `html`/`head`/`body`.

pub mod document;
pub mod error;
pub mod lexer;
pub mod markup;
pub mod parser;
pub mod query;

pub use document::{Attribute, Doctype, Document, ElementData, Node, NodeData, NodeId};
pub use error::{DomError, DomResult, ParseError, ParseResult};
pub use markup::{inner_html, is_raw_text, is_void, outer_html, to_markup};
pub use parser::{parse, parse_fragment};
pub use query::{CompoundSelector, SelectorList};
