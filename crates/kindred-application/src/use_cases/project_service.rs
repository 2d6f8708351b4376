//! Project Service Use Case
//!
//! Proposes collaborative projects for a pair: the pair is scored, the
//! narrative collaborator drafts the ideas, and each idea gets a
//! feasibility score before it is stored.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use kindred_domain::constants::PROJECT_IMPACT_MAX;
use kindred_domain::entities::{ElementRelation, ProjectContext, ProjectIdea};
use kindred_domain::error::{Error, Result};
use kindred_domain::ports::NarrativeProvider;
use kindred_domain::repositories::ProjectRepository;

use crate::ports::services::{MatchingServiceInterface, ProjectServiceInterface};
use crate::timeouts::{IoTimeouts, bounded};

/// Largest batch of ideas generated at once
pub const MAX_PROJECT_IDEAS: usize = 10;

/// Project service implementation
pub struct ProjectServiceImpl {
    matching: Arc<dyn MatchingServiceInterface>,
    narrative: Arc<dyn NarrativeProvider>,
    projects: Arc<dyn ProjectRepository>,
    timeouts: IoTimeouts,
}

impl ProjectServiceImpl {
    /// Create the service with injected collaborators
    pub fn new(
        matching: Arc<dyn MatchingServiceInterface>,
        narrative: Arc<dyn NarrativeProvider>,
        projects: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self {
            matching,
            narrative,
            projects,
            timeouts: IoTimeouts::default(),
        }
    }

    /// Use custom I/O deadlines
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: IoTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

/// Stamp identity, partners and feasibility onto a drafted idea
fn finalize(draft: ProjectIdea, user_id: &str, partner_id: &str) -> ProjectIdea {
    let feasibility = ProjectIdea::feasibility_of(&draft.difficulty, &draft.estimated_duration);
    ProjectIdea {
        project_id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        partner_id: partner_id.to_string(),
        potential_impact: draft.potential_impact.clamp(1, PROJECT_IMPACT_MAX),
        feasibility,
        created_at: Utc::now(),
        ..draft
    }
}

#[async_trait::async_trait]
impl ProjectServiceInterface for ProjectServiceImpl {
    async fn generate(&self, user_id: &str, partner_id: &str, count: usize) -> Result<Vec<ProjectIdea>> {
        if !(1..=MAX_PROJECT_IDEAS).contains(&count) {
            return Err(Error::invalid_argument(format!(
                "project count must be within 1..={MAX_PROJECT_IDEAS}, got {count}"
            )));
        }

        let insight = self.matching.score_pair(user_id, partner_id).await?;
        let scored = insight.scored;
        let context = ProjectContext {
            user_id: user_id.to_string(),
            partner_id: partner_id.to_string(),
            shared_traits: insight.shared_traits,
            element_relation: ElementRelation::from_compat(scored.breakdown.element_compat),
            complementary_pairs: scored.breakdown.complementary_pairs,
            combined_score: scored.combined_score,
            count,
        };

        let drafts = bounded(
            "project proposal",
            self.timeouts.narrative,
            self.narrative.propose_projects(&context),
        )
        .await?;
        if drafts.is_empty() {
            return Err(Error::external_service(
                self.narrative.provider_name(),
                "no project ideas returned",
            ));
        }

        let projects: Vec<ProjectIdea> = drafts
            .into_iter()
            .take(count)
            .map(|draft| finalize(draft, user_id, partner_id))
            .collect();
        bounded(
            "project write",
            self.timeouts.persistence,
            self.projects.save_all(&projects),
        )
        .await?;

        info!(user_id, partner_id, count = projects.len(), "project ideas generated");
        Ok(projects)
    }
}
