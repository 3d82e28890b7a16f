//! The [`Document`] type and the source-file parser.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::tags::{TagLine, parse_tag_line};
use crate::{ParseError, display_date, heading_text, parse_date};

/// Line separating the tag block from the body.
pub const SENTINEL: &str = "---";

/// Author tag name.
pub const AUTHOR_TAG: &str = "Author";
/// Title tag name.
pub const TITLE_TAG: &str = "Title";
/// Date tag name.
pub const DATE_TAG: &str = "Date";
/// Tag selecting the body format; `markdown` switches to passthrough rendering.
pub const FILETYPE_TAG: &str = "Filetype";

/// Tags every document must carry, in validation order.
pub const REQUIRED_TAGS: [&str; 3] = [AUTHOR_TAG, TITLE_TAG, DATE_TAG];

/// Rendered form of a document body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    /// HTML article content.
    pub content: String,
    /// HTML table of contents; `None` for markdown passthrough documents.
    pub table_of_contents: Option<String>,
}

/// One article: validated tags, raw body and, once rendered, its HTML.
///
/// Invariant: `Author`, `Title` and `Date` are always present in the tags.
/// The `Date` tag holds the display form (`05. Mar 2021`); the raw source
/// value is kept as [`original_date`](Self::original_date) and the sortable
/// [`sort_date`](Self::sort_date) is always derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub(crate) filename: String,
    pub(crate) tags: BTreeMap<String, String>,
    pub(crate) body: String,
    pub(crate) original_date: String,
    pub(crate) sort_date: NaiveDate,
    pub(crate) rendered: Option<Rendered>,
}

impl Document {
    /// Parse a source file.
    ///
    /// # Errors
    ///
    /// - [`ParseError::InvalidEncoding`] if `raw` is not UTF-8
    /// - [`ParseError::MissingSentinel`] if no `---` line exists
    /// - [`ParseError::MissingRequiredTag`] if `Author`, `Title` or `Date` is absent
    /// - [`ParseError::InvalidDate`] if `Date` is not a valid `DD/MM/YYYY` date
    pub fn parse(filename: &str, raw: &[u8]) -> Result<Self, ParseError> {
        let text = std::str::from_utf8(raw).map_err(|_| ParseError::InvalidEncoding)?;
        let lines: Vec<&str> = text.lines().collect();

        let sentinel = lines
            .iter()
            .position(|line| line.trim_end() == SENTINEL)
            .ok_or(ParseError::MissingSentinel)?;

        let mut tags = BTreeMap::new();
        for (number, line) in lines[..sentinel].iter().enumerate() {
            match parse_tag_line(line) {
                TagLine::Tag { name, value } => {
                    tags.insert(name.to_owned(), value.to_owned());
                }
                TagLine::Blank => {}
                TagLine::Malformed => {
                    tracing::warn!(
                        filename = %filename,
                        line = number + 1,
                        "Skipping tag line without a brace group"
                    );
                }
            }
        }

        for required in REQUIRED_TAGS {
            if !tags.contains_key(required) {
                return Err(ParseError::MissingRequiredTag(required.to_owned()));
            }
        }

        let title = heading_text(&tags[TITLE_TAG]);
        tags.insert(TITLE_TAG.to_owned(), title);

        let original_date = tags[DATE_TAG].clone();
        let sort_date = parse_date(&original_date)?;
        tags.insert(DATE_TAG.to_owned(), display_date(sort_date));

        Ok(Self {
            filename: filename.to_owned(),
            tags,
            body: lines[sentinel + 1..].join("\n"),
            original_date,
            sort_date,
            rendered: None,
        })
    }

    /// Source filename, also the cache key.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// All tags, including the normalized `Title` and `Date`.
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Look up a single tag.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    /// Author tag.
    pub fn author(&self) -> &str {
        self.required(AUTHOR_TAG)
    }

    /// Normalized title.
    pub fn title(&self) -> &str {
        self.required(TITLE_TAG)
    }

    /// Display date, e.g. `05. Mar 2021`.
    pub fn date(&self) -> &str {
        self.required(DATE_TAG)
    }

    /// Date exactly as written in the source, e.g. `05/03/2021`.
    pub fn original_date(&self) -> &str {
        &self.original_date
    }

    /// Calendar date used for ordering listings.
    pub fn sort_date(&self) -> NaiveDate {
        self.sort_date
    }

    /// Raw body text (everything after the `---` line).
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Body split into lines.
    pub fn body_lines(&self) -> impl Iterator<Item = &str> {
        self.body.lines()
    }

    /// Whether the body is markdown rather than outline markup.
    pub fn is_markdown(&self) -> bool {
        self.tag(FILETYPE_TAG)
            .is_some_and(|filetype| filetype.eq_ignore_ascii_case("markdown"))
    }

    /// Rendered HTML, if the document has been rendered.
    pub fn rendered(&self) -> Option<&Rendered> {
        self.rendered.as_ref()
    }

    /// Rendered article content.
    pub fn content(&self) -> Option<&str> {
        self.rendered.as_ref().map(|r| r.content.as_str())
    }

    /// Rendered table of contents (`None` before rendering and for markdown).
    pub fn table_of_contents(&self) -> Option<&str> {
        self.rendered.as_ref()?.table_of_contents.as_deref()
    }

    /// Attach the rendered body.
    #[must_use]
    pub fn with_rendered(mut self, rendered: Rendered) -> Self {
        self.rendered = Some(rendered);
        self
    }

    /// Flat tag → value mapping handed to the template engine.
    ///
    /// Contains every tag plus `Filename`, `OriginalDate`, and, once rendered,
    /// `Content` and `TableOfContents`.
    pub fn template_context(&self) -> BTreeMap<String, String> {
        let mut context = self.tags.clone();
        context.insert("Filename".to_owned(), self.filename.clone());
        context.insert("OriginalDate".to_owned(), self.original_date.clone());
        if let Some(rendered) = &self.rendered {
            context.insert("Content".to_owned(), rendered.content.clone());
            if let Some(toc) = &rendered.table_of_contents {
                context.insert("TableOfContents".to_owned(), toc.clone());
            }
        }
        context
    }

    fn required(&self, name: &str) -> &str {
        self.tags.get(name).map_or("", String::as_str)
    }
}
