//! Cached article store.
//!
//! [`ArticleStore`] serves rendered documents through two cache tiers:
//!
//! 1. Hash the live source file.
//! 2. Hot tier hit with the same digest: return it and count the hit.
//! 3. Durable tier record with the same digest: rebuild the document, promote
//!    it to the hot tier, return it.
//! 4. Otherwise parse and render the source, then store the result in both
//!    tiers. Failures are returned and nothing is cached.
//!
//! The durable tier is an optimization. Its read and write errors are logged
//! and the request is served as if the record were absent.

use std::path::PathBuf;
use std::sync::Arc;

use lightcms_cache::{
    CacheError, CacheMode, Digest, DurableTier, FileTier, HashAlgorithm, HotTier, NullTier,
};
use lightcms_document::Document;
use lightcms_renderer::OutlineRenderer;

use crate::listing::arrange;
use crate::{DocumentError, ListOptions, Listing, SourceDir, TemplateError, Templates};

/// Cache settings for an [`ArticleStore`].
#[derive(Clone, Debug)]
pub struct CacheSettings {
    /// Durable tier directory.
    pub dir: PathBuf,
    /// Hot tier capacity.
    pub limit: usize,
    /// Hash algorithm name; unsupported names fall back to `sha1`.
    pub hash_algorithm: String,
    pub mode: CacheMode,
}

impl CacheSettings {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            limit: 100,
            hash_algorithm: HashAlgorithm::default().name().to_owned(),
            mode: CacheMode::Reset,
        }
    }
}

/// Construction-time configuration of an [`ArticleStore`].
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub source_dir: PathBuf,
    pub template_dir: PathBuf,
    /// `None` disables both cache tiers.
    pub cache: Option<CacheSettings>,
    pub renderer: OutlineRenderer,
    /// Parse every source once while opening the store.
    pub warm_up: bool,
}

impl StoreConfig {
    /// Configuration with caching disabled and no warm-up.
    pub fn new(source_dir: impl Into<PathBuf>, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            template_dir: template_dir.into(),
            cache: None,
            renderer: OutlineRenderer::new(),
            warm_up: false,
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheSettings) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: OutlineRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    #[must_use]
    pub fn with_warm_up(mut self, warm_up: bool) -> Self {
        self.warm_up = warm_up;
        self
    }
}

/// Where a fetched document came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// In-memory tier.
    Hot,
    /// On-disk record.
    Durable,
    /// Freshly parsed and rendered.
    Parsed,
}

/// A rendered document together with its provenance.
#[derive(Clone, Debug)]
pub struct Fetched {
    pub document: Arc<Document>,
    /// Digest of the source bytes the document was built from.
    pub digest: Digest,
    pub origin: Origin,
}

/// Rendered documents served from a source directory through a hot and a
/// durable cache tier.
///
/// All methods take `&self`; the store can be shared across threads.
pub struct ArticleStore {
    source: SourceDir,
    renderer: OutlineRenderer,
    algorithm: HashAlgorithm,
    hot: HotTier<Arc<Document>>,
    durable: Box<dyn DurableTier>,
    templates: Templates,
}

impl ArticleStore {
    /// Open the store, initializing the durable tier and warming up if
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the cache directory cannot be prepared.
    /// Documents failing during warm-up are only logged.
    pub fn open(config: StoreConfig) -> Result<Self, CacheError> {
        let (algorithm, limit, durable) = match &config.cache {
            Some(settings) => {
                let algorithm = HashAlgorithm::resolve(&settings.hash_algorithm);
                let durable: Box<dyn DurableTier> = Box::new(FileTier::open(
                    &settings.dir,
                    settings.mode,
                    algorithm,
                    &config.renderer.fingerprint(),
                )?);
                (algorithm, settings.limit, durable)
            }
            None => {
                let durable: Box<dyn DurableTier> = Box::new(NullTier);
                (HashAlgorithm::default(), 0, durable)
            }
        };

        let store = Self {
            source: SourceDir::new(config.source_dir),
            renderer: config.renderer,
            algorithm,
            hot: HotTier::new(limit),
            durable,
            templates: Templates::new(config.template_dir),
        };

        if config.warm_up && config.cache.is_some() {
            store.warm_up();
        }

        Ok(store)
    }

    /// Hash algorithm in effect after fallback.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn source(&self) -> &SourceDir {
        &self.source
    }

    /// Names of all source documents, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] if the source directory cannot be listed.
    pub fn names(&self) -> Result<Vec<String>, DocumentError> {
        self.source.names()
    }

    /// Rendered document `name`.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub fn get_document(&self, name: &str) -> Result<Arc<Document>, DocumentError> {
        self.fetch(name).map(|fetched| fetched.document)
    }

    /// Rendered document `name` with its digest and origin.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::SourceNotFound`] if there is no such source file
    /// - [`DocumentError::Parse`] / [`DocumentError::Render`] if the source is
    ///   not a valid document
    /// - [`DocumentError::Io`] if the source cannot be read
    pub fn fetch(&self, name: &str) -> Result<Fetched, DocumentError> {
        let raw = self.source.read(name)?;
        let digest = self.algorithm.digest(&raw);

        if let Some(document) = self.hot.get(name, &digest) {
            tracing::debug!(name, %digest, "Hot tier hit");
            return Ok(Fetched {
                document,
                digest,
                origin: Origin::Hot,
            });
        }

        if let Some(document) = self.load_durable(name, &digest) {
            tracing::debug!(name, %digest, "Durable tier hit");
            let document = Arc::new(document);
            self.hot.insert(name, digest.clone(), Arc::clone(&document));
            return Ok(Fetched {
                document,
                digest,
                origin: Origin::Durable,
            });
        }

        tracing::debug!(name, %digest, "Parsing source");
        let document = Document::parse(name, &raw).map_err(|source| DocumentError::Parse {
            name: name.to_owned(),
            source,
        })?;
        let document =
            self.renderer
                .render_document(document)
                .map_err(|source| DocumentError::Render {
                    name: name.to_owned(),
                    source,
                })?;

        if let Err(e) = self.durable.store(name, &digest, &document.to_fields()) {
            tracing::warn!(name, error = %e, "Failed to write durable cache record");
        }
        let document = Arc::new(document);
        self.hot.insert(name, digest.clone(), Arc::clone(&document));

        Ok(Fetched {
            document,
            digest,
            origin: Origin::Parsed,
        })
    }

    /// All documents that currently parse, arranged per `options`.
    ///
    /// Documents that fail to load are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] if the source directory cannot be listed.
    pub fn list_documents(&self, options: &ListOptions) -> Result<Listing, DocumentError> {
        let documents = self
            .names()?
            .iter()
            .filter_map(|name| match self.get_document(name) {
                Ok(document) => Some(document),
                Err(e) => {
                    tracing::warn!(name = %name, error = %e, "Skipping document in listing");
                    None
                }
            })
            .collect();
        Ok(arrange(documents, options))
    }

    /// Render `document` through the named template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the template is missing or fails.
    pub fn render_to_template(
        &self,
        document: &Document,
        template: &str,
    ) -> Result<String, TemplateError> {
        self.templates.render(template, document)
    }

    fn load_durable(&self, name: &str, digest: &Digest) -> Option<Document> {
        let fields = match self.durable.load(name, digest) {
            Ok(fields) => fields?,
            Err(e) => {
                tracing::warn!(name, error = %e, "Failed to read durable cache record");
                return None;
            }
        };

        match Document::from_fields(fields) {
            Ok(document) if document.filename() == name && document.rendered().is_some() => {
                Some(document)
            }
            Ok(_) => {
                tracing::warn!(name, "Durable cache record belongs to another document");
                None
            }
            Err(e) => {
                tracing::warn!(name, error = %e, "Invalid durable cache record");
                None
            }
        }
    }

    fn warm_up(&self) {
        let names = match self.names() {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot list sources for warm-up");
                return;
            }
        };

        let mut ready = 0;
        for name in &names {
            match self.fetch(name) {
                Ok(_) => ready += 1,
                Err(e) => tracing::warn!(name = %name, error = %e, "Warm-up skipped document"),
            }
        }
        tracing::info!(ready, total = names.len(), "Cache warm-up complete");
    }
}

impl std::fmt::Debug for ArticleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleStore")
            .field("source", &self.source)
            .field("algorithm", &self.algorithm)
            .field("hot_limit", &self.hot.limit())
            .finish_non_exhaustive()
    }
}
