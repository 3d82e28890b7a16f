//! Render error types.

/// Error returned when a document body cannot be rendered.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A `**` subsection appears before any `*` section.
    #[error("subsection `{heading}` on body line {line} has no enclosing section")]
    OrphanSubsection {
        /// 1-based body line number.
        line: usize,
        /// Raw heading line.
        heading: String,
    },
}
