//! Parse error types.

/// Error returned when a source file (or a cached record) cannot be turned
/// into a valid [`Document`](crate::Document).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Source bytes are not valid UTF-8.
    #[error("source is not valid UTF-8")]
    InvalidEncoding,
    /// No `---` line separates the tag block from the body.
    #[error("missing `---` line between tag block and body")]
    MissingSentinel,
    /// One of `Author`, `Title`, `Date` is absent.
    #[error("missing required tag `{0}`")]
    MissingRequiredTag(String),
    /// The `Date` value is not a valid `DD/MM/YYYY` calendar date.
    #[error("invalid date `{0}`, expected DD/MM/YYYY")]
    InvalidDate(String),
    /// A stored record lacks one of the document's own fields.
    #[error("stored record lacks field `{0}`")]
    MissingField(&'static str),
}
