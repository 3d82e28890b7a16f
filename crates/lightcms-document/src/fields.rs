//! Flat string-field form of a [`Document`], used for durable storage.
//!
//! Tag names never contain `}` (the first closing brace ends the name), so the
//! document's own fields are stored under `}`-prefixed names that cannot clash
//! with a tag. The sort date is never stored; it is recomputed from the
//! original date on load.

use std::collections::BTreeMap;

use crate::{DATE_TAG, Document, ParseError, REQUIRED_TAGS, Rendered, display_date, parse_date};

const FILENAME_FIELD: &str = "}filename";
const BODY_FIELD: &str = "}body";
const ORIGINAL_DATE_FIELD: &str = "}original_date";
const CONTENT_FIELD: &str = "}content";
const TOC_FIELD: &str = "}table_of_contents";

impl Document {
    /// All string-valued fields as `(name, value)` pairs.
    pub fn to_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::with_capacity(self.tags.len() + 5);
        fields.push((FILENAME_FIELD.to_owned(), self.filename.clone()));
        fields.push((ORIGINAL_DATE_FIELD.to_owned(), self.original_date.clone()));
        fields.push((BODY_FIELD.to_owned(), self.body.clone()));
        if let Some(rendered) = &self.rendered {
            fields.push((CONTENT_FIELD.to_owned(), rendered.content.clone()));
            if let Some(toc) = &rendered.table_of_contents {
                fields.push((TOC_FIELD.to_owned(), toc.clone()));
            }
        }
        fields.extend(
            self.tags
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        fields
    }

    /// Rebuild a document from [`to_fields`](Self::to_fields) output.
    ///
    /// The sort date and display date are recomputed from the original date.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingField`] or [`ParseError::MissingRequiredTag`]
    /// for incomplete input and [`ParseError::InvalidDate`] if the stored
    /// original date does not parse.
    pub fn from_fields(
        fields: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ParseError> {
        let mut tags = BTreeMap::new();
        let mut filename = None;
        let mut body = None;
        let mut original_date = None;
        let mut content = None;
        let mut toc = None;

        for (name, value) in fields {
            match name.as_str() {
                FILENAME_FIELD => filename = Some(value),
                BODY_FIELD => body = Some(value),
                ORIGINAL_DATE_FIELD => original_date = Some(value),
                CONTENT_FIELD => content = Some(value),
                TOC_FIELD => toc = Some(value),
                _ => {
                    tags.insert(name, value);
                }
            }
        }

        let filename = filename.ok_or(ParseError::MissingField(FILENAME_FIELD))?;
        let body = body.ok_or(ParseError::MissingField(BODY_FIELD))?;
        let original_date = original_date.ok_or(ParseError::MissingField(ORIGINAL_DATE_FIELD))?;

        for required in REQUIRED_TAGS {
            if !tags.contains_key(required) {
                return Err(ParseError::MissingRequiredTag(required.to_owned()));
            }
        }

        let sort_date = parse_date(&original_date)?;
        tags.insert(DATE_TAG.to_owned(), display_date(sort_date));

        let rendered = content.map(|content| Rendered {
            content,
            table_of_contents: toc,
        });

        Ok(Self {
            filename,
            tags,
            body,
            original_date,
            sort_date,
            rendered,
        })
    }
}
