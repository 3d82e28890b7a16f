//! Configurable outline renderer.

use lightcms_document::{Document, Rendered};

use crate::html::{content_html, toc_html};
use crate::{Outline, RenderError, render_markdown};

/// How consecutive prose lines of one section are joined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProseSeparator {
    /// Keep line breaks (`\n`) between prose lines.
    #[default]
    Newline,
    /// Collapse line breaks into single spaces.
    Space,
}

impl ProseSeparator {
    fn as_str(self) -> &'static str {
        match self {
            Self::Newline => "\n",
            Self::Space => " ",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Newline => "newline",
            Self::Space => "space",
        }
    }
}

/// Rendered outline body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOutput {
    /// Article HTML.
    pub html: String,
    /// Table of contents HTML.
    pub toc: String,
}

/// Outline-to-HTML renderer.
///
/// Numbering is enabled by default: headings read `1 - Intro`, `1.1 - Detail`.
#[derive(Clone, Debug)]
pub struct OutlineRenderer {
    numbered: bool,
    separator: ProseSeparator,
}

impl Default for OutlineRenderer {
    fn default() -> Self {
        Self {
            numbered: true,
            separator: ProseSeparator::default(),
        }
    }
}

impl OutlineRenderer {
    /// Create a renderer with numbering on and newline-joined prose.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the `label - ` prefix on visible headings.
    #[must_use]
    pub fn with_numbering(mut self, numbered: bool) -> Self {
        self.numbered = numbered;
        self
    }

    /// Set how prose lines are joined.
    #[must_use]
    pub fn with_prose_separator(mut self, separator: ProseSeparator) -> Self {
        self.separator = separator;
        self
    }

    /// Short stable identifier of the settings that shape rendered output.
    ///
    /// Two renderers with the same fingerprint produce identical HTML for the
    /// same input, so persisted output is only reusable under a matching one.
    pub fn fingerprint(&self) -> String {
        let numbering = if self.numbered { "numbered" } else { "plain" };
        format!("{numbering}-{}", self.separator.name())
    }

    /// Render outline lines to article HTML and a table of contents.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::OrphanSubsection`] for a `**` heading without an
    /// enclosing `*` section.
    pub fn render<'a, I>(&self, lines: I) -> Result<RenderOutput, RenderError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let outline = Outline::parse(lines)?;
        Ok(RenderOutput {
            html: content_html(&outline, self.numbered, self.separator.as_str()),
            toc: toc_html(&outline, self.numbered),
        })
    }

    /// Render a parsed document's body and attach the result.
    ///
    /// Markdown documents go through [`render_markdown`] and get no table of
    /// contents; everything else is rendered as an outline.
    ///
    /// # Errors
    ///
    /// Propagates [`RenderError`] from outline rendering.
    pub fn render_document(&self, document: Document) -> Result<Document, RenderError> {
        let rendered = if document.is_markdown() {
            Rendered {
                content: render_markdown(document.body()),
                table_of_contents: None,
            }
        } else {
            let output = self.render(document.body_lines())?;
            Rendered {
                content: output.html,
                table_of_contents: Some(output.toc),
            }
        };
        Ok(document.with_rendered(rendered))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(source: &str) -> Document {
        Document::parse("test", source.as_bytes()).unwrap()
    }

    #[test]
    fn test_render_example_document() {
        let doc = parse(
            "{Author}{J Doe}\n{Title}{_my first post}\n{Date}{05/03/2021}\n---\n*Intro\nHello world.\n",
        );
        let doc = OutlineRenderer::new().render_document(doc).unwrap();

        assert_eq!(
            doc.content(),
            Some("<h2 id='1'>1 - Intro</h2><p>Hello world.</p>")
        );
        assert_eq!(
            doc.table_of_contents(),
            Some("<ul><li><a href='#1'>1 - Intro</a></li></ul>")
        );
    }

    #[test]
    fn test_render_markdown_document() {
        let doc = parse("{Author}{a}\n{Title}{t}\n{Date}{01/01/2020}\n{Filetype}{Markdown}\n---\n*Intro*\n");
        let doc = OutlineRenderer::new().render_document(doc).unwrap();

        assert_eq!(doc.content(), Some("<p><em>Intro</em></p>\n"));
        assert_eq!(doc.table_of_contents(), None);
        assert!(doc.rendered().is_some());
    }

    #[test]
    fn test_render_document_orphan() {
        let doc = parse("{Author}{a}\n{Title}{t}\n{Date}{01/01/2020}\n---\n**Orphan\n");
        let err = OutlineRenderer::new().render_document(doc).unwrap_err();
        assert!(matches!(err, RenderError::OrphanSubsection { line: 1, .. }));
    }

    #[test]
    fn test_render_is_deterministic() {
        let lines = ["*A", "x", "**b", "y\\\\z", "*C"];
        let renderer = OutlineRenderer::new();
        assert_eq!(renderer.render(lines).unwrap(), renderer.render(lines).unwrap());
    }

    #[test]
    fn test_fingerprint_tracks_output_settings() {
        let default = OutlineRenderer::new();
        assert_eq!(default.fingerprint(), "numbered-newline");
        assert_eq!(
            OutlineRenderer::new()
                .with_numbering(false)
                .with_prose_separator(ProseSeparator::Space)
                .fingerprint(),
            "plain-space"
        );
        assert_ne!(
            default.fingerprint(),
            OutlineRenderer::new().with_numbering(false).fingerprint()
        );
    }

    #[test]
    fn test_render_space_separator_unnumbered() {
        let output = OutlineRenderer::new()
            .with_numbering(false)
            .with_prose_separator(ProseSeparator::Space)
            .render(["*_intro", "a", "b"])
            .unwrap();
        assert_eq!(output.html, "<h2 id='1'>intro</h2><p>a b</p>");
        assert_eq!(output.toc, "<ul><li><a href='#1'>intro</a></li></ul>");
    }
}
