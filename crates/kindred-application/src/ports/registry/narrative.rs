//! Narrative Provider Registry

use std::sync::Arc;
use std::time::Duration;

use kindred_domain::ports::NarrativeProvider;

/// Configuration for narrative provider creation
#[derive(Debug, Clone, Default)]
pub struct NarrativeProviderConfig {
    /// Provider name (e.g., "template", "openai")
    pub provider: String,
    /// Chat model name
    pub model: Option<String>,
    /// API key for authentication
    pub api_key: Option<String>,
    /// Base URL for the provider API
    pub base_url: Option<String>,
    /// HTTP request timeout
    pub timeout: Option<Duration>,
}

impl NarrativeProviderConfig {
    /// Create a new config with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Registry entry for narrative providers
pub struct NarrativeProviderEntry {
    /// Unique provider name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&NarrativeProviderConfig) -> Result<Arc<dyn NarrativeProvider>, String>,
}

#[linkme::distributed_slice]
pub static NARRATIVE_PROVIDERS: [NarrativeProviderEntry] = [..];

/// Resolve narrative provider by name from registry
pub fn resolve_narrative_provider(
    config: &NarrativeProviderConfig,
) -> Result<Arc<dyn NarrativeProvider>, String> {
    if let Some(entry) = NARRATIVE_PROVIDERS
        .iter()
        .find(|e| e.name == config.provider)
    {
        return (entry.factory)(config);
    }
    let available: Vec<&str> = NARRATIVE_PROVIDERS.iter().map(|e| e.name).collect();
    Err(format!(
        "Unknown narrative provider '{}'. Available providers: {:?}",
        config.provider, available
    ))
}

/// List all registered narrative providers as (name, description)
pub fn list_narrative_providers() -> Vec<(&'static str, &'static str)> {
    NARRATIVE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
