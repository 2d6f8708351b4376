//! Matching Service Use Case
//!
//! Serves match lists and pair analyses. Every read goes through the
//! [`MatchCache`] first; misses are computed from the current embeddings,
//! personality profiles and symbolic summaries.
//!
//! Synchronous reads degrade instead of failing: a missing embedding, an
//! unreachable astrological calculator or a slow narrative generator turn
//! into neutral sub-scores or an absent narrative. Recalculation runs as a
//! background job and propagates every failure so the orchestrator can
//! retry it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::{StreamExt, stream};
use tracing::{debug, info, warn};

use kindred_domain::entities::{
    AspectDescription, DetailedAnalysis, ElementRelation, Match, MatchFilters, MatchInterest,
    MatchRecord, MatchStrategy, PercentageBreakdown, Planet, SymbolicSummary, UserEmbedding,
    as_percentage,
};
use kindred_domain::error::{Error, Result};
use kindred_domain::ports::{NarrativeProvider, SymbolicSummaryProvider};
use kindred_domain::repositories::{EmbeddingRepository, MatchRepository, ProfileRepository};

use super::compute;
use super::match_cache::{MatchCache, keys};
use crate::domain_services::{CompatibilityScorer, PartyProfile, SimilarityIndex};
use crate::ports::services::{MatchingServiceInterface, PairInsight};
use crate::timeouts::{IoTimeouts, bounded};

/// Default number of candidate profiles loaded concurrently
pub const DEFAULT_LOAD_FAN_OUT: usize = 8;

/// Matching service implementation
pub struct MatchingServiceImpl {
    embeddings: Arc<dyn EmbeddingRepository>,
    profiles: Arc<dyn ProfileRepository>,
    records: Arc<dyn MatchRepository>,
    symbolic: Arc<dyn SymbolicSummaryProvider>,
    narrative: Arc<dyn NarrativeProvider>,
    cache: MatchCache,
    scorer: CompatibilityScorer,
    index: SimilarityIndex,
    timeouts: IoTimeouts,
    fan_out: usize,
}

impl MatchingServiceImpl {
    /// Create the service with injected collaborators
    pub fn new(
        embeddings: Arc<dyn EmbeddingRepository>,
        profiles: Arc<dyn ProfileRepository>,
        records: Arc<dyn MatchRepository>,
        symbolic: Arc<dyn SymbolicSummaryProvider>,
        narrative: Arc<dyn NarrativeProvider>,
        cache: MatchCache,
        scorer: CompatibilityScorer,
    ) -> Self {
        Self {
            embeddings,
            profiles,
            records,
            symbolic,
            narrative,
            cache,
            scorer,
            index: SimilarityIndex::default(),
            timeouts: IoTimeouts::default(),
            fan_out: DEFAULT_LOAD_FAN_OUT,
        }
    }

    /// Use a configured similarity index
    #[must_use]
    pub fn with_index(mut self, index: SimilarityIndex) -> Self {
        self.index = index;
        self
    }

    /// Use custom I/O deadlines
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: IoTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Bound concurrent candidate loading
    #[must_use]
    pub fn with_fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = fan_out.max(1);
        self
    }

    // ========================================================================
    // Data loading
    // ========================================================================

    async fn embedding_of(&self, user_id: &str) -> Result<Option<UserEmbedding>> {
        bounded(
            "embedding lookup",
            self.timeouts.persistence,
            self.embeddings.get(user_id),
        )
        .await
    }

    async fn population(&self) -> Result<Vec<UserEmbedding>> {
        bounded(
            "embedding scan",
            self.timeouts.persistence,
            self.embeddings.list_all(),
        )
        .await
    }

    /// Symbolic summary through the cache; any failure scores neutral
    async fn symbolic_of(&self, user_id: &str) -> Option<SymbolicSummary> {
        let key = keys::symbolic(user_id);
        match self.cache.get::<SymbolicSummary>(&key).await {
            Ok(Some(summary)) => return Some(summary),
            Ok(None) => {}
            Err(e) => warn!(user_id, error = %e, "symbolic cache read failed"),
        }

        match bounded(
            "symbolic summary",
            self.timeouts.astrology,
            self.symbolic.summary(user_id),
        )
        .await
        {
            Ok(Some(summary)) => {
                if let Err(e) = self
                    .cache
                    .set(&key, &summary, self.cache.ttls().symbolic)
                    .await
                {
                    warn!(user_id, error = %e, "symbolic cache write failed");
                }
                Some(summary)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(
                    user_id,
                    provider = self.symbolic.provider_name(),
                    error = %e,
                    "symbolic summary unavailable, using neutral astro score"
                );
                None
            }
        }
    }

    /// Everything known about `user_id`, given their embedding
    async fn party(&self, user_id: &str, embedding: Option<UserEmbedding>) -> PartyProfile {
        let personality = match bounded(
            "personality lookup",
            self.timeouts.persistence,
            self.profiles.personality(user_id),
        )
        .await
        {
            Ok(profile) => profile,
            Err(e) => {
                warn!(user_id, error = %e, "personality unavailable, using neutral score");
                None
            }
        };
        PartyProfile {
            user_id: user_id.to_string(),
            embedding,
            symbolic: self.symbolic_of(user_id).await,
            personality,
        }
    }

    // ========================================================================
    // Computation
    // ========================================================================

    /// Candidate pool for `user_id`, ranked by the similarity index when the
    /// requester has an embedding
    async fn candidate_pool(
        &self,
        query: Option<&UserEmbedding>,
        user_id: &str,
        strategy: MatchStrategy,
        limit: usize,
        filters: &MatchFilters,
    ) -> Result<Vec<UserEmbedding>> {
        let candidates: Vec<UserEmbedding> = self
            .population()
            .await?
            .into_iter()
            .filter(|e| e.user_id != user_id)
            .filter(|e| {
                filters
                    .target_id
                    .as_deref()
                    .is_none_or(|target| target == e.user_id)
            })
            .collect();
        let pool_size = limit.saturating_mul(self.index.config().pool_multiplier);

        let Some(query) = query else {
            warn!(
                user_id,
                error = %Error::embedding_not_found(user_id),
                "scoring candidates with a neutral vector score"
            );
            let mut pool = candidates;
            pool.truncate(pool_size);
            return Ok(pool);
        };

        let index = self.index;
        let vector = query.vector.clone();
        compute("similarity ranking", move || {
            let ranked = index.top_k(&vector, &candidates, pool_size, strategy)?;
            let by_id: HashMap<&str, &UserEmbedding> = candidates
                .iter()
                .map(|c| (c.user_id.as_str(), c))
                .collect();
            Ok(ranked
                .iter()
                .filter_map(|r| by_id.get(r.user_id.as_str()).map(|c| (*c).clone()))
                .collect())
        })
        .await
    }

    /// Score, filter and order the match list of `user_id`
    async fn compute_matches(
        &self,
        user_id: &str,
        strategy: MatchStrategy,
        limit: usize,
        filters: &MatchFilters,
    ) -> Result<Vec<Match>> {
        let query = self.embedding_of(user_id).await?;
        let pool = self
            .candidate_pool(query.as_ref(), user_id, strategy, limit, filters)
            .await?;
        debug!(user_id, %strategy, pool = pool.len(), "candidate pool ready");

        let requester = self.party(user_id, query).await;
        let candidates: Vec<PartyProfile> = stream::iter(pool)
            .map(|embedding| async move {
                let id = embedding.user_id.clone();
                self.party(&id, Some(embedding)).await
            })
            .buffered(self.fan_out)
            .collect()
            .await;

        let scorer = self.scorer.clone();
        let filters = filters.clone();
        compute("match scoring", move || {
            let mut scored = Vec::with_capacity(candidates.len());
            for candidate in &candidates {
                let result = scorer.score(&requester, candidate)?;
                if filters.accepts(&result) {
                    scored.push(result);
                }
            }
            scored.sort_by(|a, b| {
                b.combined_score
                    .total_cmp(&a.combined_score)
                    .then_with(|| a.target_id.cmp(&b.target_id))
            });
            scored.truncate(limit);
            Ok(scored)
        })
        .await
    }

    async fn load_pair(&self, user_id: &str, target_id: &str) -> Result<(PartyProfile, PartyProfile)> {
        if user_id == target_id {
            return Err(Error::invalid_argument("a user cannot be matched with themselves"));
        }
        let (embedding_a, embedding_b) =
            futures::try_join!(self.embedding_of(user_id), self.embedding_of(target_id))?;
        let (a, b) = futures::join!(
            self.party(user_id, embedding_a),
            self.party(target_id, embedding_b)
        );
        for party in [&a, &b] {
            if party.is_unknown() {
                return Err(Error::not_found(format!("profile data for user {}", party.user_id)));
            }
        }
        Ok((a, b))
    }
}

fn check_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(Error::invalid_argument("limit must be at least 1"));
    }
    Ok(())
}

#[async_trait::async_trait]
impl MatchingServiceInterface for MatchingServiceImpl {
    async fn find_matches(
        &self,
        user_id: &str,
        strategy: MatchStrategy,
        limit: usize,
        filters: &MatchFilters,
    ) -> Result<Vec<Match>> {
        check_limit(limit)?;
        let key = keys::matches(user_id, strategy, limit, filters);
        match self.cache.get::<Vec<Match>>(&key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(user_id, error = %e, "match cache read failed, recomputing"),
        }

        let matches = self
            .compute_matches(user_id, strategy, limit, filters)
            .await?;
        if let Err(e) = self
            .cache
            .set(&key, &matches, self.cache.ttls().matches)
            .await
        {
            warn!(user_id, error = %e, "match cache write failed");
        }
        Ok(matches)
    }

    async fn recalculate(
        &self,
        user_id: &str,
        strategy: MatchStrategy,
        limit: usize,
    ) -> Result<Vec<Match>> {
        check_limit(limit)?;
        let filters = MatchFilters::none();
        let matches = self
            .compute_matches(user_id, strategy, limit, &filters)
            .await?;

        self.cache
            .set(
                &keys::matches(user_id, strategy, limit, &filters),
                &matches,
                self.cache.ttls().matches,
            )
            .await?;

        let record = MatchRecord {
            record_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            strategy,
            limit,
            matches: matches.clone(),
            created_at: Utc::now(),
        };
        bounded(
            "match record write",
            self.timeouts.persistence,
            self.records.save_record(record),
        )
        .await?;

        info!(user_id, %strategy, count = matches.len(), "match list recalculated");
        Ok(matches)
    }

    async fn score_pair(&self, user_id: &str, target_id: &str) -> Result<PairInsight> {
        let (a, b) = self.load_pair(user_id, target_id).await?;
        let scorer = self.scorer.clone();
        compute("pair scoring", move || {
            let scored = scorer.score(&a, &b)?;
            let aspects = match (&a.symbolic, &b.symbolic) {
                (Some(sa), Some(sb)) => scorer.pair_aspects(sa, sb),
                _ => Vec::new(),
            };
            let shared_traits = match (&a.personality, &b.personality) {
                (Some(pa), Some(pb)) => pa.traits.intersection(&pb.traits).cloned().collect(),
                _ => Vec::new(),
            };
            Ok(PairInsight {
                scored,
                aspects,
                shared_traits,
            })
        })
        .await
    }

    async fn analysis(&self, user_id: &str, target_id: &str) -> Result<DetailedAnalysis> {
        let key = keys::analysis(user_id, target_id);
        match self.cache.get::<DetailedAnalysis>(&key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(user_id, target_id, error = %e, "analysis cache read failed"),
        }

        let insight = self.score_pair(user_id, target_id).await?;
        let narrative = match bounded(
            "match narrative",
            self.timeouts.narrative,
            self.narrative.explain_match(&insight.scored),
        )
        .await
        {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(
                    user_id,
                    target_id,
                    provider = self.narrative.provider_name(),
                    error = %e,
                    "narrative unavailable, returning analysis without it"
                );
                None
            }
        };

        let scored = insight.scored;
        let analysis = DetailedAnalysis {
            synergy_level: as_percentage(scored.combined_score),
            breakdown: PercentageBreakdown {
                values: as_percentage(scored.vector_score),
                energy: as_percentage(scored.astro_score),
                personality: as_percentage(scored.personality_score),
            },
            sun: AspectDescription::for_planet(&insight.aspects, Planet::Sun),
            moon: AspectDescription::for_planet(&insight.aspects, Planet::Moon),
            element_relation: ElementRelation::from_compat(scored.breakdown.element_compat),
            complementary_pairs: scored.breakdown.complementary_pairs.clone(),
            narrative,
            generated_at: Utc::now(),
            match_result: scored,
        };

        // a degraded analysis is not worth keeping for a full TTL
        if analysis.narrative.is_some()
            && let Err(e) = self
                .cache
                .set(&key, &analysis, self.cache.ttls().analysis)
                .await
        {
            warn!(user_id, target_id, error = %e, "analysis cache write failed");
        }
        Ok(analysis)
    }

    async fn save_interest(&self, user_id: &str, target_id: &str, interested: bool) -> Result<()> {
        if user_id == target_id {
            return Err(Error::invalid_argument("a user cannot be interested in themselves"));
        }
        let interest = MatchInterest {
            user_id: user_id.to_string(),
            target_id: target_id.to_string(),
            interested,
            updated_at: Utc::now(),
        };
        bounded(
            "match interest write",
            self.timeouts.persistence,
            self.records.save_interest(interest),
        )
        .await?;
        debug!(user_id, target_id, interested, "match interest saved");
        Ok(())
    }
}
