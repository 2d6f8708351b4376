//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables
//! and default values, then validates every section before the engine is
//! wired.

use std::env;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use kindred_application::jobs::JobPolicies;
use kindred_domain::error::{Error, Result};
use kindred_domain::value_objects::{ClusteringConfig, ScoringConfig, SimilarityConfig};

use crate::config::{AppConfig, CacheConfig, LoggingConfig, ProvidersConfig, TimeoutsConfig};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    #[must_use]
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    #[must_use]
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix (e.g., `KINDRED_CACHE__PROVIDER`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        // Double underscore separates nested keys so that single underscores
        // stay inside field names (KINDRED_CACHE__TTL_MATCHES_SECS)
        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Reload configuration from the same sources
    pub fn reload(&self) -> Result<AppConfig> {
        self.load()
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).config_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// First existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
            dirs::home_dir().map(|d| {
                d.join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME)
            }),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Validate application configuration
///
/// Every failure is an [`Error::Configuration`] and aborts start-up.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_logging_config(&config.logging)?;
    validate_cache_config(&config.cache)?;
    config.similarity.validate()?;
    config.clustering.validate()?;
    config.scoring.validate()?;
    config.jobs.validate()?;
    validate_timeouts_config(&config.timeouts)?;
    validate_providers_config(&config.providers)?;
    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    parse_log_level(&config.level).map(|_| ())
}

fn validate_cache_config(config: &CacheConfig) -> Result<()> {
    if config.provider.trim().is_empty() {
        return Err(Error::configuration("Cache provider cannot be empty"));
    }
    if config.provider == "redis" && config.redis_url.is_none() {
        return Err(Error::configuration(
            "cache.redis_url is required when the redis provider is selected",
        ));
    }
    if config.max_entries == 0 {
        return Err(Error::configuration("cache.max_entries cannot be 0"));
    }
    let ttls = [
        ("ttl_matches_secs", config.ttl_matches_secs),
        ("ttl_analysis_secs", config.ttl_analysis_secs),
        ("ttl_clusters_secs", config.ttl_clusters_secs),
        ("ttl_symbolic_secs", config.ttl_symbolic_secs),
    ];
    if let Some((name, _)) = ttls.iter().find(|(_, secs)| *secs == 0) {
        return Err(Error::configuration(format!("cache.{name} cannot be 0")));
    }
    Ok(())
}

fn validate_timeouts_config(config: &TimeoutsConfig) -> Result<()> {
    let timeouts = [
        ("embedding_secs", config.embedding_secs),
        ("astrology_secs", config.astrology_secs),
        ("narrative_secs", config.narrative_secs),
        ("persistence_secs", config.persistence_secs),
    ];
    match timeouts.iter().find(|(_, secs)| *secs == 0) {
        Some((name, _)) => Err(Error::configuration(format!("timeouts.{name} cannot be 0"))),
        None => Ok(()),
    }
}

fn validate_providers_config(config: &ProvidersConfig) -> Result<()> {
    if config.embedding.provider.trim().is_empty() {
        return Err(Error::configuration("Embedding provider cannot be empty"));
    }
    if config.embedding.dimensions == Some(0) {
        return Err(Error::configuration(
            "providers.embedding.dimensions cannot be 0",
        ));
    }
    if config.narrative.provider.trim().is_empty() {
        return Err(Error::configuration("Narrative provider cannot be empty"));
    }
    Ok(())
}

// ============================================================================
// Builder
// ============================================================================

/// Configuration builder for programmatic configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set logging configuration
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Set cache configuration
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.config.cache = cache;
        self
    }

    /// Set similarity thresholds
    #[must_use]
    pub fn with_similarity(mut self, similarity: SimilarityConfig) -> Self {
        self.config.similarity = similarity;
        self
    }

    /// Set clustering parameters
    #[must_use]
    pub fn with_clustering(mut self, clustering: ClusteringConfig) -> Self {
        self.config.clustering = clustering;
        self
    }

    /// Set scoring weights and tables
    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.config.scoring = scoring;
        self
    }

    /// Set job policies
    #[must_use]
    pub fn with_jobs(mut self, jobs: JobPolicies) -> Self {
        self.config.jobs = jobs;
        self
    }

    /// Set I/O deadlines
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: TimeoutsConfig) -> Self {
        self.config.timeouts = timeouts;
        self
    }

    /// Set collaborator selection
    #[must_use]
    pub fn with_providers(mut self, providers: ProvidersConfig) -> Self {
        self.config.providers = providers;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<AppConfig> {
        validate_app_config(&self.config)?;
        Ok(self.config)
    }
}
