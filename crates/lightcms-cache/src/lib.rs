//! Two-tier content cache for lightcms.
//!
//! Entries are keyed by source filename and validated by a [`Digest`] of the
//! source bytes. A lookup only hits when the stored digest equals the live one.
//!
//! - [`HotTier`]: bounded in-memory tier with least-frequently-used eviction
//! - [`DurableTier`]: unbounded tier storing flat string fields per key
//!   - [`FileTier`]: one record file per key, atomic replace on write
//!   - [`NullTier`]: always misses, used when caching is disabled
//!
//! # Example
//!
//! ```
//! use lightcms_cache::{DurableTier, HashAlgorithm, HotTier, NullTier};
//!
//! let digest = HashAlgorithm::Sha1.digest(b"{Author}{a}\n---\n");
//!
//! let hot = HotTier::new(2);
//! hot.insert("first-post", digest.clone(), "<p>cached</p>");
//! assert_eq!(hot.get("first-post", &digest), Some("<p>cached</p>"));
//!
//! let durable = NullTier;
//! durable.store("first-post", &digest, &[]).unwrap();
//! assert_eq!(durable.load("first-post", &digest).unwrap(), None);
//! ```

mod digest;
mod error;
mod file;
mod hot;
pub mod record;

pub use digest::{Digest, HashAlgorithm};
pub use error::CacheError;
pub use file::{CacheMode, FileTier, RECORD_FORMAT_VERSION};
pub use hot::HotTier;

/// Persistent storage of flat string records, keyed by name.
///
/// Implementations only return a record when it was stored with the same
/// digest that is passed to [`load`](Self::load).
pub trait DurableTier: Send + Sync {
    /// Load the fields stored for `key` under `digest`.
    ///
    /// Returns `Ok(None)` when no record exists or it was stored under a
    /// different digest.
    fn load(&self, key: &str, digest: &Digest)
    -> Result<Option<Vec<(String, String)>>, CacheError>;

    /// Store `fields` for `key`, replacing any previous record.
    fn store(&self, key: &str, digest: &Digest, fields: &[(String, String)])
    -> Result<(), CacheError>;
}

/// No-op [`DurableTier`]: every store is discarded, every load misses.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTier;

impl DurableTier for NullTier {
    fn load(
        &self,
        _key: &str,
        _digest: &Digest,
    ) -> Result<Option<Vec<(String, String)>>, CacheError> {
        Ok(None)
    }

    fn store(
        &self,
        _key: &str,
        _digest: &Digest,
        _fields: &[(String, String)],
    ) -> Result<(), CacheError> {
        Ok(())
    }
}
