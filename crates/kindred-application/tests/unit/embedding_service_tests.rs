//! Tests for the embedding service

use std::sync::Arc;

use async_trait::async_trait;

use kindred_application::ports::services::EmbeddingServiceInterface;
use kindred_application::use_cases::EmbeddingServiceImpl;
use kindred_application::use_cases::embedding_service::{METADATA_PROVIDER, METADATA_SOURCE_HASH};
use kindred_domain::entities::{Element, ProfileDocument};
use kindred_domain::error::{Error, Result};
use kindred_domain::ports::EmbeddingProvider;
use kindred_domain::repositories::{EmbeddingRepository, ProfileRepository};
use kindred_domain::value_objects::Embedding;
use kindred_providers::embedding::NullEmbeddingProvider;
use kindred_providers::repository::{MemoryEmbeddingRepository, MemoryProfileRepository};

use crate::support::embedding;

/// Claims one dimension and returns another
struct MisreportingProvider;

#[async_trait]
impl EmbeddingProvider for MisreportingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts
            .iter()
            .map(|_| Embedding {
                vector: vec![0.5; 4],
                model: "misreporting".to_string(),
                dimensions: 4,
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        8
    }

    fn provider_name(&self) -> &str {
        "misreporting"
    }
}

struct Fixture {
    embeddings: Arc<MemoryEmbeddingRepository>,
    profiles: Arc<MemoryProfileRepository>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            embeddings: Arc::new(MemoryEmbeddingRepository::new()),
            profiles: Arc::new(MemoryProfileRepository::new()),
        }
    }

    fn service(&self, provider: Arc<dyn EmbeddingProvider>) -> EmbeddingServiceImpl {
        EmbeddingServiceImpl::new(self.embeddings.clone(), self.profiles.clone(), provider)
    }

    async fn add_document(&self, user_id: &str) {
        let document = ProfileDocument {
            user_id: user_id.to_string(),
            bio: Some("Builds furniture and plays cello".to_string()),
            element: Some(Element::Earth),
            interests: vec!["woodwork".to_string(), "music".to_string()],
            ..ProfileDocument::default()
        };
        self.profiles.put_document(document).await.unwrap();
    }
}

#[tokio::test]
async fn test_refresh_embeds_the_profile_document() {
    let fixture = Fixture::new();
    fixture.add_document("u1").await;
    let service = fixture.service(Arc::new(NullEmbeddingProvider::with_dimensions(16)));

    let outcome = service.refresh("u1", false).await.unwrap();

    assert_eq!(outcome.dimensions, 16);
    assert!(!outcome.reused);
    let stored = fixture.embeddings.get("u1").await.unwrap().unwrap();
    assert_eq!(stored.vector.len(), 16);
    assert_eq!(stored.metadata.get(METADATA_PROVIDER).map(String::as_str), Some("null"));
    assert_eq!(stored.metadata[METADATA_SOURCE_HASH].len(), 64);
}

#[tokio::test]
async fn test_existing_embedding_is_kept_unless_forced() {
    let fixture = Fixture::new();
    fixture.add_document("u1").await;
    fixture
        .embeddings
        .put(embedding("u1", vec![1.0, 0.0, 0.0]))
        .await
        .unwrap();
    let service = fixture.service(Arc::new(NullEmbeddingProvider::with_dimensions(16)));

    let kept = service.refresh("u1", false).await.unwrap();
    assert!(kept.reused);
    assert_eq!(kept.dimensions, 3);

    let forced = service.refresh("u1", true).await.unwrap();
    assert!(!forced.reused);
    assert_eq!(fixture.embeddings.get("u1").await.unwrap().unwrap().vector.len(), 16);
}

#[tokio::test]
async fn test_same_document_embeds_identically() {
    let fixture = Fixture::new();
    fixture.add_document("u1").await;
    let service = fixture.service(Arc::new(NullEmbeddingProvider::with_dimensions(16)));

    service.refresh("u1", true).await.unwrap();
    let first = fixture.embeddings.get("u1").await.unwrap().unwrap();
    service.refresh("u1", true).await.unwrap();
    let second = fixture.embeddings.get("u1").await.unwrap().unwrap();

    assert_eq!(first.vector, second.vector);
}

#[tokio::test]
async fn test_missing_or_blank_document_fails() {
    let fixture = Fixture::new();
    let service = fixture.service(Arc::new(NullEmbeddingProvider::new()));

    assert!(matches!(
        service.refresh("ghost", false).await,
        Err(Error::NotFound { .. })
    ));

    fixture
        .profiles
        .put_document(ProfileDocument {
            user_id: "blank".to_string(),
            bio: Some("   ".to_string()),
            ..ProfileDocument::default()
        })
        .await
        .unwrap();
    assert!(matches!(
        service.refresh("blank", false).await,
        Err(Error::InvalidArgument { .. })
    ));
}

#[tokio::test]
async fn test_wrong_vector_length_is_not_stored() {
    let fixture = Fixture::new();
    fixture.add_document("u1").await;
    let service = fixture.service(Arc::new(MisreportingProvider));

    let err = service.refresh("u1", false).await.unwrap_err();

    assert!(matches!(
        err,
        Error::DimensionMismatch {
            expected: 8,
            actual: 4
        }
    ));
    assert!(fixture.embeddings.get("u1").await.unwrap().is_none());
}
