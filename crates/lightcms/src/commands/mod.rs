//! CLI command implementations.

pub(crate) mod list;
pub(crate) mod show;

use std::path::PathBuf;

use clap::Args;
use lightcms_config::{CliSettings, Config};
use lightcms_renderer::{OutlineRenderer, ProseSeparator};
use lightcms_site::{ArticleStore, CacheMode, CacheSettings, StoreConfig};

use crate::error::CliError;

pub(crate) use list::ListArgs;
pub(crate) use show::ShowArgs;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct StoreArgs {
    /// Path to configuration file (default: auto-discover lightcms.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Document source directory (overrides config).
    #[arg(short, long, global = true)]
    source_dir: Option<PathBuf>,

    /// Disable caching.
    #[arg(long, global = true)]
    no_cache: bool,

    /// Keep durable cache records from a previous run.
    #[arg(long, global = true, conflicts_with = "no_cache")]
    resume: bool,

    /// Enable verbose output (cache decisions and warm-up logs).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl StoreArgs {
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            source_dir: self.source_dir.clone(),
            cache_enabled: self.no_cache.then_some(false),
            cache_mode: self
                .resume
                .then_some(lightcms_config::CacheMode::Resume),
        }
    }

    /// Load configuration and open the article store.
    pub(crate) fn open_store(&self) -> Result<ArticleStore, CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        Ok(ArticleStore::open(store_config(&config))?)
    }
}

/// Translate loaded configuration into store construction settings.
fn store_config(config: &Config) -> StoreConfig {
    let articles = &config.articles_resolved;
    let cache = &config.cache_resolved;

    let separator = match articles.prose_separator {
        lightcms_config::ProseSeparator::Newline => ProseSeparator::Newline,
        lightcms_config::ProseSeparator::Space => ProseSeparator::Space,
    };
    let renderer = OutlineRenderer::new()
        .with_numbering(articles.numbered)
        .with_prose_separator(separator);

    let store = StoreConfig::new(&articles.source_dir, &articles.template_dir)
        .with_renderer(renderer)
        .with_warm_up(cache.warm_up);

    if !cache.enabled {
        return store;
    }

    store.with_cache(CacheSettings {
        dir: cache.dir.clone(),
        limit: cache.limit,
        hash_algorithm: cache.hash_algorithm.clone(),
        mode: match cache.mode {
            lightcms_config::CacheMode::Reset => CacheMode::Reset,
            lightcms_config::CacheMode::Resume => CacheMode::Resume,
        },
    })
}
