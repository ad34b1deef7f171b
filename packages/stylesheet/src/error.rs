use thiserror::Error;

pub type StylesheetResult<T> = Result<T, StylesheetError>;

#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Selector is empty")]
    EmptySelector,

    #[error("Selector {selector:?} cannot be matched: {source}")]
    Pattern {
        selector: String,
        #[source]
        source: regex::Error,
    },
}
