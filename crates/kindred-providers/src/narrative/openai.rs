//! OpenAI Narrative Provider
//!
//! Explanations and project ideas from the chat completions API. Project
//! ideas are requested as a JSON object and parsed into typed drafts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use kindred_application::ports::registry::{
    NARRATIVE_PROVIDERS, NarrativeProviderConfig, NarrativeProviderEntry,
};
use kindred_domain::entities::{Match, ProjectContext, ProjectIdea, as_percentage};
use kindred_domain::error::{Error, Result};
use kindred_domain::ports::NarrativeProvider;

use crate::constants::{
    CONTENT_TYPE_JSON, HTTP_REQUEST_TIMEOUT_SECS, NARRATIVE_TEMPERATURE, OPENAI_BASE_URL_DEFAULT,
    OPENAI_CHAT_MODEL_DEFAULT,
};
use crate::http::HttpClientConfig;
use crate::utils::HttpResponseUtils;

const EXPLAIN_SYSTEM_PROMPT: &str = "You explain why two people were matched as collaborators. \
Write two or three warm, concrete sentences. Do not invent facts beyond the scores given.";

const PROJECTS_SYSTEM_PROMPT: &str = "You propose collaborative projects for two partners. \
Answer with a JSON object {\"projects\": [...]} where every project has the fields \
title, description, roles (array of strings), estimated_duration (one of \"2-4 weeks\", \
\"1-2 months\", \"3-6 months\", \"6+ months\"), difficulty (beginner, intermediate or advanced) \
and potential_impact (integer 1-10).";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectDrafts {
    #[serde(default)]
    projects: Vec<ProjectDraft>,
}

#[derive(Debug, Deserialize)]
struct ProjectDraft {
    title: String,
    description: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    estimated_duration: String,
    #[serde(default)]
    difficulty: String,
    #[serde(default)]
    potential_impact: u8,
}

/// OpenAI chat-completions narrative provider
pub struct OpenAINarrativeProvider {
    api_key: String,
    base_url: Option<String>,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl OpenAINarrativeProvider {
    /// Create a new OpenAI narrative provider
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: String,
        timeout: Duration,
        http_client: Client,
    ) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            model,
            timeout,
            http_client,
        }
    }

    /// Get the base URL for this provider
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(OPENAI_BASE_URL_DEFAULT)
    }

    async fn complete(&self, system: &str, user: String, json_mode: bool) -> Result<String> {
        let mut payload = json!({
            "model": self.model,
            "temperature": NARRATIVE_TEMPERATURE,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });
        if json_mode {
            payload["response_format"] = json!({"type": "json_object"});
        }

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url()))
            .bearer_auth(&self.api_key)
            .header("Content-Type", CONTENT_TYPE_JSON)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| HttpResponseUtils::transport_error(self.provider_name(), &e))?;

        let parsed: ChatResponse =
            HttpResponseUtils::check_and_parse(response, self.provider_name()).await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::external_service(self.provider_name(), "empty completion"))
    }
}

fn describe_match(scored: &Match) -> String {
    let pairs = scored
        .breakdown
        .complementary_pairs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    format!(
        "Match quality: {} ({}% synergy). Shared values: {}%. Energetic resonance: {}%. \
         Personality fit: {}%. Complementary traits: {}.",
        scored.match_type,
        as_percentage(scored.combined_score),
        as_percentage(scored.vector_score),
        as_percentage(scored.astro_score),
        as_percentage(scored.personality_score),
        if pairs.is_empty() {
            "none identified".to_string()
        } else {
            pairs.join(", ")
        }
    )
}

fn describe_pair(context: &ProjectContext) -> String {
    let pairs = context
        .complementary_pairs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    format!(
        "Propose {} projects. Shared traits: {}. Complementary traits: {}. \
         Element relation: {:?}. Match score: {}%.",
        context.count,
        if context.shared_traits.is_empty() {
            "none".to_string()
        } else {
            context.shared_traits.join(", ")
        },
        if pairs.is_empty() {
            "none".to_string()
        } else {
            pairs.join(", ")
        },
        context.element_relation,
        as_percentage(context.combined_score),
    )
}

#[async_trait]
impl NarrativeProvider for OpenAINarrativeProvider {
    async fn explain_match(&self, scored: &Match) -> Result<String> {
        self.complete(EXPLAIN_SYSTEM_PROMPT, describe_match(scored), false)
            .await
    }

    async fn propose_projects(&self, context: &ProjectContext) -> Result<Vec<ProjectIdea>> {
        let content = self
            .complete(PROJECTS_SYSTEM_PROMPT, describe_pair(context), true)
            .await?;
        let drafts: ProjectDrafts = serde_json::from_str(&content).map_err(|e| {
            Error::external_service_with_source(self.provider_name(), "malformed project list", e)
        })?;

        Ok(drafts
            .projects
            .into_iter()
            .take(context.count)
            .map(|draft| ProjectIdea {
                project_id: String::new(),
                user_id: context.user_id.clone(),
                partner_id: context.partner_id.clone(),
                title: draft.title,
                description: draft.description,
                roles: draft.roles,
                estimated_duration: draft.estimated_duration,
                difficulty: draft.difficulty,
                potential_impact: draft.potential_impact,
                feasibility: 0.0,
                created_at: Utc::now(),
            })
            .collect())
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

fn openai_narrative_factory(
    config: &NarrativeProviderConfig,
) -> std::result::Result<Arc<dyn NarrativeProvider>, String> {
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| "OpenAI requires api_key".to_string())?;
    let model = config
        .model
        .clone()
        .unwrap_or_else(|| OPENAI_CHAT_MODEL_DEFAULT.to_string());
    let timeout = config
        .timeout
        .unwrap_or(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS));
    let http_client = HttpClientConfig::with_timeout(timeout).build()?;
    Ok(Arc::new(OpenAINarrativeProvider::new(
        api_key,
        config.base_url.clone(),
        model,
        timeout,
        http_client,
    )))
}

#[linkme::distributed_slice(NARRATIVE_PROVIDERS)]
static OPENAI_PROVIDER: NarrativeProviderEntry = NarrativeProviderEntry {
    name: "openai",
    description: "OpenAI chat completions for explanations and project ideas",
    factory: openai_narrative_factory,
};
