//! Configuration management for lightcms.
//!
//! Parses `lightcms.toml` with serde and discovers it in the current directory
//! or its parents. Relative paths resolve against the directory holding the
//! config file. CLI settings are applied during load via [`CliSettings`].
//!
//! ```toml
//! [articles]
//! source_dir = "scripts"
//! template_dir = "templates"
//! numbered = true
//! prose_separator = "newline"
//!
//! [cache]
//! enabled = true
//! dir = ".cache"
//! limit = 100
//! hash_algorithm = "sha1"
//! mode = "reset"
//! warm_up = true
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` and `${VAR:-default}` are expanded in `articles.source_dir`,
//! `articles.template_dir`, `cache.dir` and `cache.hash_algorithm`.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "lightcms.toml";

const DEFAULT_SOURCE_DIR: &str = "scripts";
const DEFAULT_TEMPLATE_DIR: &str = "templates";
const DEFAULT_CACHE_DIR: &str = ".cache";
const DEFAULT_CACHE_LIMIT: usize = 100;
const DEFAULT_HASH_ALGORITHM: &str = "sha1";

/// CLI settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub source_dir: Option<PathBuf>,
    pub cache_enabled: Option<bool>,
    pub cache_mode: Option<CacheMode>,
}

/// How the durable cache directory is treated at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// Wipe the directory on every start.
    #[default]
    Reset,
    /// Keep records written by a compatible earlier run.
    Resume,
}

/// How prose lines within a section are joined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProseSeparator {
    #[default]
    Newline,
    Space,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    articles: ArticlesConfigRaw,
    cache: CacheConfigRaw,

    /// Resolved `[articles]` section (set after loading).
    #[serde(skip)]
    pub articles_resolved: ArticlesConfig,
    /// Resolved `[cache]` section (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Path to the config file, if one was loaded.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ArticlesConfigRaw {
    source_dir: Option<String>,
    template_dir: Option<String>,
    numbered: Option<bool>,
    prose_separator: Option<ProseSeparator>,
}

/// Resolved `[articles]` configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ArticlesConfig {
    /// Directory of document sources.
    pub source_dir: PathBuf,
    /// Directory of templates.
    pub template_dir: PathBuf,
    /// Prefix headings with their section label.
    pub numbered: bool,
    pub prose_separator: ProseSeparator,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
    limit: Option<usize>,
    hash_algorithm: Option<String>,
    mode: Option<CacheMode>,
    warm_up: Option<bool>,
}

/// Resolved `[cache]` configuration.
#[derive(Debug, Default)]
pub struct CacheConfig {
    /// Whether the hot and durable tiers are used at all.
    pub enabled: bool,
    /// Durable tier directory.
    pub dir: PathBuf,
    /// Hot tier capacity.
    pub limit: usize,
    /// Hash algorithm name. Unsupported names are substituted when the store
    /// opens, not rejected here.
    pub hash_algorithm: String,
    pub mode: CacheMode,
    /// Parse every document once at startup.
    pub warm_up: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`cache.dir`").
        field: String,
        /// Error message (e.g., "${`CACHE_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: Option<&str>, field: &str) -> Result<(), ConfigError> {
    if value.is_some_and(|v| v.trim().is_empty()) {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `lightcms.toml` in the current directory and its parents, falling
    /// back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, or reading,
    /// parsing, expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.articles_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(enabled) = settings.cache_enabled {
            self.cache_resolved.enabled = enabled;
        }
        if let Some(mode) = settings.cache_mode {
            self.cache_resolved.mode = mode;
        }
    }

    /// Search for the config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Default config with paths relative to `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            articles: ArticlesConfigRaw::default(),
            cache: CacheConfigRaw::default(),
            articles_resolved: ArticlesConfig {
                source_dir: base.join(DEFAULT_SOURCE_DIR),
                template_dir: base.join(DEFAULT_TEMPLATE_DIR),
                numbered: true,
                prose_separator: ProseSeparator::default(),
            },
            cache_resolved: CacheConfig {
                enabled: true,
                dir: base.join(DEFAULT_CACHE_DIR),
                limit: DEFAULT_CACHE_LIMIT,
                hash_algorithm: DEFAULT_HASH_ALGORITHM.to_owned(),
                mode: CacheMode::default(),
                warm_up: true,
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate resolved values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if caching is enabled with a zero
    /// limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_resolved.enabled && self.cache_resolved.limit == 0 {
            return Err(ConfigError::Validation(
                "cache.limit must be greater than 0 when caching is enabled".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let apply = |value: &mut Option<String>, field: &str| -> Result<(), ConfigError> {
            if let Some(raw) = value {
                *raw = expand::expand_env(raw, field)?;
            }
            Ok(())
        };

        apply(&mut self.articles.source_dir, "articles.source_dir")?;
        apply(&mut self.articles.template_dir, "articles.template_dir")?;
        apply(&mut self.cache.dir, "cache.dir")?;
        apply(&mut self.cache.hash_algorithm, "cache.hash_algorithm")?;
        Ok(())
    }

    /// Resolve raw values against `config_dir`, applying defaults.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        require_non_empty(self.articles.source_dir.as_deref(), "articles.source_dir")?;
        require_non_empty(self.articles.template_dir.as_deref(), "articles.template_dir")?;
        require_non_empty(self.cache.dir.as_deref(), "cache.dir")?;
        require_non_empty(self.cache.hash_algorithm.as_deref(), "cache.hash_algorithm")?;

        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.articles_resolved = ArticlesConfig {
            source_dir: resolve(self.articles.source_dir.as_deref(), DEFAULT_SOURCE_DIR),
            template_dir: resolve(self.articles.template_dir.as_deref(), DEFAULT_TEMPLATE_DIR),
            numbered: self.articles.numbered.unwrap_or(true),
            prose_separator: self.articles.prose_separator.unwrap_or_default(),
        };

        self.cache_resolved = CacheConfig {
            enabled: self.cache.enabled.unwrap_or(true),
            dir: resolve(self.cache.dir.as_deref(), DEFAULT_CACHE_DIR),
            limit: self.cache.limit.unwrap_or(DEFAULT_CACHE_LIMIT),
            hash_algorithm: self
                .cache
                .hash_algorithm
                .clone()
                .unwrap_or_else(|| DEFAULT_HASH_ALGORITHM.to_owned()),
            mode: self.cache.mode.unwrap_or_default(),
            warm_up: self.cache.warm_up.unwrap_or(true),
        };

        Ok(())
    }
}
