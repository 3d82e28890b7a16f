//! CLI error types.

use lightcms_cache::CacheError;
use lightcms_config::ConfigError;
use lightcms_site::{DocumentError, TemplateError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Cache(#[from] CacheError),

    #[error("{0}")]
    Document(#[from] DocumentError),

    #[error("{0}")]
    Template(#[from] TemplateError),
}
