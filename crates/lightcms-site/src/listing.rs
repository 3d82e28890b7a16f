//! Sorting, truncating and grouping of article listings.

use std::cmp::Reverse;
use std::str::FromStr;
use std::sync::Arc;

use lightcms_document::Document;

/// Order of a listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first by sort date; equal dates keep filename order.
    #[default]
    Date,
    /// Descending by a tag's value; documents without the tag come last.
    Tag(String),
    /// Filename order.
    None,
}

/// Unrecognized `--sort` value.
#[derive(Debug, thiserror::Error)]
#[error("Unknown sort key {0:?} (expected \"date\", \"none\" or \"tag:NAME\")")]
pub struct UnknownSortKey(String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Date),
            "none" => Ok(Self::None),
            _ => match s.strip_prefix("tag:") {
                Some(tag) if !tag.is_empty() => Ok(Self::Tag(tag.to_owned())),
                _ => Err(UnknownSortKey(s.to_owned())),
            },
        }
    }
}

/// Options for [`ArticleStore::list_documents`](crate::ArticleStore::list_documents).
#[derive(Clone, Debug, Default)]
pub struct ListOptions {
    /// Group the result by this tag's value.
    pub group_by: Option<String>,
    /// Keep only the first `n` documents after sorting.
    pub limit: Option<usize>,
    pub sort: SortKey,
}

impl ListOptions {
    #[must_use]
    pub fn group_by(mut self, tag: impl Into<String>) -> Self {
        self.group_by = Some(tag.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

/// Result of a listing.
#[derive(Clone, Debug)]
pub enum Listing {
    Flat(Vec<Arc<Document>>),
    /// `(tag value, documents)` groups in order of first appearance. Documents
    /// without the grouping tag are collected under `""`.
    Grouped(Vec<(String, Vec<Arc<Document>>)>),
}

impl Listing {
    /// Total number of documents.
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(docs) => docs.len(),
            Self::Grouped(groups) => groups.iter().map(|(_, docs)| docs.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All documents in listing order, ignoring groups.
    pub fn documents(&self) -> Vec<&Arc<Document>> {
        match self {
            Self::Flat(docs) => docs.iter().collect(),
            Self::Grouped(groups) => groups.iter().flat_map(|(_, docs)| docs).collect(),
        }
    }
}

/// Sort, truncate, then group documents given in filename order.
pub(crate) fn arrange(mut docs: Vec<Arc<Document>>, options: &ListOptions) -> Listing {
    match &options.sort {
        SortKey::Date => docs.sort_by_key(|doc| Reverse(doc.sort_date())),
        SortKey::Tag(tag) => docs.sort_by(|a, b| {
            // `Some` sorts above `None`, so reversing puts missing tags last.
            b.tag(tag).cmp(&a.tag(tag))
        }),
        SortKey::None => {}
    }

    if let Some(limit) = options.limit {
        docs.truncate(limit);
    }

    let Some(group_by) = &options.group_by else {
        return Listing::Flat(docs);
    };

    let mut groups: Vec<(String, Vec<Arc<Document>>)> = Vec::new();
    for doc in docs {
        let value = doc.tag(group_by).unwrap_or_default();
        match groups.iter_mut().find(|(key, _)| key == value) {
            Some((_, members)) => members.push(doc),
            None => groups.push((value.to_owned(), vec![doc])),
        }
    }
    Listing::Grouped(groups)
}
