//! Profile Repository Interface

use async_trait::async_trait;

use crate::entities::{PersonalityProfile, ProfileDocument};
use crate::error::Result;

/// Repository: personality profiles and profile documents
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Personality snapshot of `user_id`
    async fn personality(&self, user_id: &str) -> Result<Option<PersonalityProfile>>;

    /// Structured profile document of `user_id`
    async fn document(&self, user_id: &str) -> Result<Option<ProfileDocument>>;

    /// Store a personality snapshot
    async fn put_personality(&self, profile: PersonalityProfile) -> Result<()>;

    /// Store a profile document
    async fn put_document(&self, document: ProfileDocument) -> Result<()>;
}
