//! External collaborator selection

use std::time::Duration;

use serde::{Deserialize, Serialize};

use kindred_application::ports::registry::{EmbeddingProviderConfig, NarrativeProviderConfig};

use crate::constants::{DEFAULT_EMBEDDING_PROVIDER, DEFAULT_NARRATIVE_PROVIDER};

/// Embedding generator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Provider name (`null`, `openai`)
    pub provider: String,
    /// Model name
    pub model: Option<String>,
    /// API key
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: Option<String>,
    /// Requested vector length
    pub dimensions: Option<usize>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_EMBEDDING_PROVIDER.to_string(),
            model: None,
            api_key: None,
            base_url: None,
            dimensions: None,
        }
    }
}

impl EmbeddingSettings {
    /// Registry lookup for the configured generator
    pub fn registry_config(&self, timeout: Duration) -> EmbeddingProviderConfig {
        let mut config = EmbeddingProviderConfig::new(&self.provider).with_timeout(timeout);
        if let Some(model) = &self.model {
            config = config.with_model(model);
        }
        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(dimensions) = self.dimensions {
            config = config.with_dimensions(dimensions);
        }
        config
    }
}

/// Narrative generator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeSettings {
    /// Provider name (`template`, `openai`)
    pub provider: String,
    /// Chat model name
    pub model: Option<String>,
    /// API key
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: Option<String>,
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_NARRATIVE_PROVIDER.to_string(),
            model: None,
            api_key: None,
            base_url: None,
        }
    }
}

impl NarrativeSettings {
    /// Registry lookup for the configured generator
    pub fn registry_config(&self, timeout: Duration) -> NarrativeProviderConfig {
        let mut config = NarrativeProviderConfig::new(&self.provider).with_timeout(timeout);
        if let Some(model) = &self.model {
            config = config.with_model(model);
        }
        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }
        config
    }
}

/// Provider configurations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Embedding generator
    pub embedding: EmbeddingSettings,
    /// Narrative generator
    pub narrative: NarrativeSettings,
}
