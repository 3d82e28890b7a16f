//! Error types for the article store.

use std::path::PathBuf;

use lightcms_document::ParseError;
use lightcms_renderer::RenderError;

/// Why a document could not be produced.
///
/// The causes stay distinct so callers can tell a missing file from a broken
/// one; [`is_not_found`](Self::is_not_found) and friends help a router collapse
/// them into a single "unavailable" answer.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// No source file with this name.
    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    /// The source file is not a valid document.
    #[error("Failed to parse {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: ParseError,
    },

    /// The document body could not be rendered.
    #[error("Failed to render {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: RenderError,
    },

    /// Reading the source failed for a reason other than absence.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    /// Whether the source file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SourceNotFound(_))
    }

    /// Whether the source exists but is not a valid document.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Render { .. })
    }
}

/// Template rendering failure.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// No template with this name in the template directory.
    #[error("Template not found: {0}")]
    NotFound(String),

    /// The template failed to load or render.
    #[error("Template error: {0}")]
    Render(#[source] minijinja::Error),
}
