//! Tests for provider registration through the linkme registries

use kindred_application::ports::registry::{
    CacheProviderConfig, EmbeddingProviderConfig, NarrativeProviderConfig, list_cache_providers,
    list_embedding_providers, resolve_cache_provider, resolve_embedding_provider,
    resolve_narrative_provider,
};

#[test]
fn test_builtin_cache_providers_are_registered() {
    let names: Vec<&str> = list_cache_providers().into_iter().map(|(n, _)| n).collect();
    assert!(names.contains(&"ttl_memory"));
    assert!(names.contains(&"null"));
}

#[test]
fn test_resolves_cache_provider_by_name() {
    let cache = resolve_cache_provider(&CacheProviderConfig::new("ttl_memory").with_max_size(16))
        .unwrap();
    assert_eq!(cache.provider_name(), "ttl_memory");
}

#[test]
fn test_unknown_provider_lists_the_available_ones() {
    let err = resolve_cache_provider(&CacheProviderConfig::new("memcached"))
        .err()
        .unwrap();
    assert!(err.contains("memcached"));
    assert!(err.contains("ttl_memory"));
}

#[test]
fn test_null_embedding_provider_honours_dimensions() {
    let provider =
        resolve_embedding_provider(&EmbeddingProviderConfig::new("null").with_dimensions(32))
            .unwrap();
    assert_eq!(provider.dimensions(), 32);
    assert!(list_embedding_providers().iter().any(|(n, _)| *n == "null"));
}

#[cfg(feature = "embedding-openai")]
#[test]
fn test_openai_embedding_requires_api_key() {
    let err = resolve_embedding_provider(&EmbeddingProviderConfig::new("openai"))
        .err()
        .unwrap();
    assert!(err.contains("api_key"));
}

#[cfg(feature = "narrative-template")]
#[test]
fn test_template_narrative_provider_is_registered() {
    let provider = resolve_narrative_provider(&NarrativeProviderConfig::new("template")).unwrap();
    assert_eq!(provider.provider_name(), "template");
}
