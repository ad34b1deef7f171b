use crate::NodeId;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;
pub type DomResult<T> = Result<T, DomError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unterminated tag at {pos}: <{tag}")]
    UnterminatedTag { pos: usize, tag: String },

    #[error("Lexer error at {pos}")]
    LexerError { pos: usize },
}

impl ParseError {
    pub fn unterminated_tag(pos: usize, tag: impl Into<String>) -> Self {
        Self::UnterminatedTag {
            pos,
            tag: tag.into(),
        }
    }

    pub fn lexer_error(pos: usize) -> Self {
        Self::LexerError { pos }
    }
}

/// Tree manipulation failures. Every operation validates before touching the
/// arena, so an error always leaves the document unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    #[error("Node is not an element: {0:?}")]
    NotAnElement(NodeId),

    #[error("Node cannot have children: {0:?}")]
    NotAContainer(NodeId),

    #[error("Inserting {child:?} into {parent:?} would create a cycle")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Reference {reference:?} is not a child of {parent:?}")]
    ReferenceNotAChild { parent: NodeId, reference: NodeId },

    #[error("The document root cannot be moved or removed")]
    RootImmutable,

    #[error(transparent)]
    Markup(#[from] ParseError),
}
