//! Cached article store for lightcms.
//!
//! [`ArticleStore`] ties the parser, the outline renderer and the two cache
//! tiers together. It answers the three questions a web front end asks:
//!
//! - [`get_document`](ArticleStore::get_document): one rendered article
//! - [`list_documents`](ArticleStore::list_documents): all articles, sorted,
//!   optionally truncated and grouped by a tag
//! - [`render_to_template`](ArticleStore::render_to_template): an article run
//!   through a minijinja template
//!
//! # Example
//!
//! ```no_run
//! use lightcms_site::{ArticleStore, CacheSettings, ListOptions, StoreConfig};
//!
//! let config = StoreConfig::new("scripts", "templates")
//!     .with_cache(CacheSettings::new(".cache"))
//!     .with_warm_up(true);
//! let store = ArticleStore::open(config)?;
//!
//! let latest = store.list_documents(&ListOptions::default().limit(5))?;
//! for doc in latest.documents() {
//!     println!("{} ({})", doc.title(), doc.date());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod listing;
mod source;
mod store;
mod template;

pub use error::{DocumentError, TemplateError};
pub use lightcms_cache::{CacheMode, HashAlgorithm};
pub use listing::{ListOptions, Listing, SortKey, UnknownSortKey};
pub use source::SourceDir;
pub use store::{ArticleStore, CacheSettings, Fetched, Origin, StoreConfig};
pub use template::Templates;
