//! In-memory repository implementations
//!
//! Backed by concurrent maps. Data is not persisted and is lost on restart;
//! every write replaces whole values so readers never see a partial one.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

use kindred_domain::entities::{
    ClusterGeneration, Job, MatchInterest, MatchRecord, PersonalityProfile, ProfileDocument,
    ProjectIdea, UserEmbedding,
};
use kindred_domain::error::Result;
use kindred_domain::repositories::{
    ClusterRepository, EmbeddingRepository, JobRepository, MatchRepository, ProfileRepository,
    ProjectRepository,
};

// ============================================================================
// Embeddings
// ============================================================================

/// In-memory embedding store
///
/// A `BTreeMap` keeps `list_all` ordered by user id without sorting.
#[derive(Debug, Clone, Default)]
pub struct MemoryEmbeddingRepository {
    embeddings: Arc<RwLock<BTreeMap<String, UserEmbedding>>>,
}

impl MemoryEmbeddingRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmbeddingRepository for MemoryEmbeddingRepository {
    async fn get(&self, user_id: &str) -> Result<Option<UserEmbedding>> {
        Ok(self.embeddings.read().await.get(user_id).cloned())
    }

    async fn put(&self, embedding: UserEmbedding) -> Result<()> {
        self.embeddings
            .write()
            .await
            .insert(embedding.user_id.clone(), embedding);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<UserEmbedding>> {
        Ok(self.embeddings.read().await.values().cloned().collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.embeddings.read().await.len())
    }
}

// ============================================================================
// Cluster generations
// ============================================================================

/// In-memory cluster store holding the current generation
#[derive(Debug, Default)]
pub struct MemoryClusterRepository {
    current: ArcSwapOption<ClusterGeneration>,
}

impl MemoryClusterRepository {
    /// Create a store with no generation
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClusterRepository for MemoryClusterRepository {
    async fn current(&self) -> Result<Option<Arc<ClusterGeneration>>> {
        Ok(self.current.load_full())
    }

    async fn replace(&self, generation: ClusterGeneration) -> Result<()> {
        self.current.store(Some(Arc::new(generation)));
        Ok(())
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// In-memory personality and profile document store
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileRepository {
    personalities: Arc<DashMap<String, PersonalityProfile>>,
    documents: Arc<DashMap<String, ProfileDocument>>,
}

impl MemoryProfileRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn personality(&self, user_id: &str) -> Result<Option<PersonalityProfile>> {
        Ok(self
            .personalities
            .get(user_id)
            .map(|entry| entry.value().clone()))
    }

    async fn document(&self, user_id: &str) -> Result<Option<ProfileDocument>> {
        Ok(self.documents.get(user_id).map(|entry| entry.value().clone()))
    }

    async fn put_personality(&self, profile: PersonalityProfile) -> Result<()> {
        self.personalities.insert(profile.user_id.clone(), profile);
        Ok(())
    }

    async fn put_document(&self, document: ProfileDocument) -> Result<()> {
        self.documents.insert(document.user_id.clone(), document);
        Ok(())
    }
}

// ============================================================================
// Match interests and records
// ============================================================================

/// In-memory match interest and audit store
#[derive(Debug, Clone, Default)]
pub struct MemoryMatchRepository {
    interests: Arc<DashMap<(String, String), MatchInterest>>,
    records: Arc<DashMap<String, Vec<MatchRecord>>>,
}

impl MemoryMatchRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchRepository for MemoryMatchRepository {
    async fn save_interest(&self, interest: MatchInterest) -> Result<()> {
        self.interests.insert(
            (interest.user_id.clone(), interest.target_id.clone()),
            interest,
        );
        Ok(())
    }

    async fn interest(&self, user_id: &str, target_id: &str) -> Result<Option<MatchInterest>> {
        Ok(self
            .interests
            .get(&(user_id.to_string(), target_id.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn save_record(&self, record: MatchRecord) -> Result<()> {
        self.records
            .entry(record.user_id.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn records_for(&self, user_id: &str) -> Result<Vec<MatchRecord>> {
        Ok(self
            .records
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}

// ============================================================================
// Jobs
// ============================================================================

/// In-memory job record store
#[derive(Debug, Clone, Default)]
pub struct MemoryJobRepository {
    jobs: Arc<DashMap<String, Job>>,
}

impl MemoryJobRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no record is stored
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn save(&self, job: &Job) -> Result<()> {
        self.jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn get(&self, job_id: &str) -> Result<Option<Job>> {
        Ok(self.jobs.get(job_id).map(|entry| entry.value().clone()))
    }
}

// ============================================================================
// Projects
// ============================================================================

/// In-memory project idea store
#[derive(Debug, Clone, Default)]
pub struct MemoryProjectRepository {
    projects: Arc<RwLock<Vec<ProjectIdea>>>,
}

impl MemoryProjectRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for MemoryProjectRepository {
    async fn save_all(&self, projects: &[ProjectIdea]) -> Result<()> {
        self.projects.write().await.extend_from_slice(projects);
        Ok(())
    }

    async fn for_pair(&self, user_id: &str, partner_id: &str) -> Result<Vec<ProjectIdea>> {
        Ok(self
            .projects
            .read()
            .await
            .iter()
            .filter(|p| {
                (p.user_id == user_id && p.partner_id == partner_id)
                    || (p.user_id == partner_id && p.partner_id == user_id)
            })
            .cloned()
            .collect())
    }
}
