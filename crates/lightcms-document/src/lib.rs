//! Document parser for lightcms.
//!
//! A source file is a tag block followed by a body, separated by a `---` line:
//!
//! ```text
//! {Author}{J Doe}
//! {Title}{_my first post}
//! {Date}{05/03/2021}
//! ---
//! *Intro
//! Hello world.
//! ```
//!
//! [`Document::parse`] turns the raw bytes into a [`Document`]: validated tags
//! (`Author`, `Title`, `Date` are required), the normalized title and date, and
//! the unprocessed body. Rendering the body is the job of `lightcms-renderer`;
//! this crate knows nothing about HTML or caching.
//!
//! # Example
//!
//! ```
//! use lightcms_document::Document;
//!
//! let source = b"{Author}{J Doe}\n{Title}{_my first post}\n{Date}{05/03/2021}\n---\n*Intro\n";
//! let doc = Document::parse("first-post", source).unwrap();
//! assert_eq!(doc.title(), "my first post");
//! assert_eq!(doc.date(), "05. Mar 2021");
//! ```

mod date;
mod document;
mod error;
mod fields;
mod tags;
mod text;

pub use date::{display_date, parse_date};
pub use document::{
    AUTHOR_TAG, DATE_TAG, Document, FILETYPE_TAG, REQUIRED_TAGS, Rendered, SENTINEL, TITLE_TAG,
};
pub use error::ParseError;
pub use text::{heading_text, title_case};
