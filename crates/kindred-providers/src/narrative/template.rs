//! Template narrative provider
//!
//! Renders match explanations and project ideas from Handlebars templates.
//! Works offline and is deterministic, so it doubles as the fallback when
//! no language model is configured.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use kindred_application::ports::registry::{
    NARRATIVE_PROVIDERS, NarrativeProviderConfig, NarrativeProviderEntry,
};
use kindred_domain::entities::{
    ElementRelation, Match, ProjectContext, ProjectIdea, as_percentage,
};
use kindred_domain::error::{Error, Result};
use kindred_domain::ports::NarrativeProvider;

const EXPLANATION_TEMPLATE: &str = "explanation";

const EXPLANATION: &str = "\
{{user_id}} and {{target_id}} are a {{match_type}} match with {{synergy}}% overall synergy. \
Shared values contribute {{values}}%, energetic resonance {{energy}}% and personality fit {{personality}}%.\
{{#if pairs}} Their strengths complete each other: {{pairs}}.{{/if}}\
{{#unless astro_available}} No birth data was available for both of them, so the energetic reading is neutral.{{/unless}}";

/// One entry of the project catalogue
struct ProjectBlueprint {
    title: &'static str,
    description: &'static str,
    roles: [&'static str; 2],
    duration: &'static str,
    difficulty: &'static str,
    impact: u8,
}

const CATALOGUE: [ProjectBlueprint; 10] = [
    ProjectBlueprint {
        title: "Shared learning journal",
        description: "Document what {{user_id}} and {{partner_id}} learn each week and publish a short digest{{#if shared}} around {{shared}}{{/if}}.",
        roles: ["editor", "researcher"],
        duration: "2-4 weeks",
        difficulty: "beginner",
        impact: 4,
    },
    ProjectBlueprint {
        title: "Community workshop",
        description: "Design and host a hands-on workshop where {{user_id}} leads the content and {{partner_id}} runs the experience.",
        roles: ["facilitator", "organizer"],
        duration: "1-2 months",
        difficulty: "intermediate",
        impact: 6,
    },
    ProjectBlueprint {
        title: "Prototype sprint",
        description: "Build a working prototype of an idea both care about{{#if pairs}}, combining {{pairs}}{{/if}}.",
        roles: ["builder", "designer"],
        duration: "2-4 weeks",
        difficulty: "intermediate",
        impact: 7,
    },
    ProjectBlueprint {
        title: "Podcast series",
        description: "Record a short series of conversations exploring how {{relation}} perspectives approach the same questions.",
        roles: ["host", "producer"],
        duration: "1-2 months",
        difficulty: "beginner",
        impact: 5,
    },
    ProjectBlueprint {
        title: "Open-source toolkit",
        description: "Package the practices {{user_id}} and {{partner_id}} use day to day into a documented, reusable toolkit.",
        roles: ["maintainer", "documentation lead"],
        duration: "3-6 months",
        difficulty: "advanced",
        impact: 8,
    },
    ProjectBlueprint {
        title: "Mentorship circle",
        description: "Start a small circle where each partner mentors newcomers in their strongest area{{#if shared}}, anchored in {{shared}}{{/if}}.",
        roles: ["mentor", "coordinator"],
        duration: "3-6 months",
        difficulty: "intermediate",
        impact: 7,
    },
    ProjectBlueprint {
        title: "Field research study",
        description: "Interview people affected by a problem both partners notice and turn the findings into a public report.",
        roles: ["interviewer", "analyst"],
        duration: "1-2 months",
        difficulty: "intermediate",
        impact: 6,
    },
    ProjectBlueprint {
        title: "Creative exhibition",
        description: "Curate an exhibition or online gallery that mixes the partners' different ways of seeing{{#if pairs}} ({{pairs}}){{/if}}.",
        roles: ["curator", "artist"],
        duration: "3-6 months",
        difficulty: "advanced",
        impact: 6,
    },
    ProjectBlueprint {
        title: "Local impact initiative",
        description: "Launch a neighbourhood initiative with a measurable goal, with {{user_id}} on strategy and {{partner_id}} on outreach.",
        roles: ["strategist", "outreach lead"],
        duration: "6+ months",
        difficulty: "advanced",
        impact: 9,
    },
    ProjectBlueprint {
        title: "Weekly challenge",
        description: "Set a small weekly challenge for each other and share the results, keeping each other accountable.",
        roles: ["challenger", "reviewer"],
        duration: "2-4 weeks",
        difficulty: "beginner",
        impact: 3,
    },
];

fn blueprint_template(index: usize) -> String {
    format!("project_{index}")
}

fn relation_label(relation: ElementRelation) -> &'static str {
    match relation {
        ElementRelation::VeryCompatible => "closely aligned",
        ElementRelation::Compatible => "compatible",
        ElementRelation::Complementary => "complementary",
    }
}

#[derive(Serialize)]
struct ProjectView<'a> {
    user_id: &'a str,
    partner_id: &'a str,
    shared: String,
    pairs: String,
    relation: &'static str,
}

/// Template-driven narrative provider
pub struct TemplateNarrativeProvider {
    registry: Handlebars<'static>,
}

impl TemplateNarrativeProvider {
    /// Create a provider with the built-in templates
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a built-in template fails to parse.
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(EXPLANATION_TEMPLATE, EXPLANATION)
            .map_err(|e| Error::configuration(format!("invalid explanation template: {e}")))?;
        for (index, blueprint) in CATALOGUE.iter().enumerate() {
            registry
                .register_template_string(&blueprint_template(index), blueprint.description)
                .map_err(|e| Error::configuration(format!("invalid project template {index}: {e}")))?;
        }
        Ok(Self { registry })
    }

    /// Number of project ideas the catalogue can produce
    pub fn catalogue_size() -> usize {
        CATALOGUE.len()
    }

    fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        self.registry
            .render(template, data)
            .map_err(|e| Error::external_service("template", format!("render failed: {e}")))
    }
}

#[async_trait]
impl NarrativeProvider for TemplateNarrativeProvider {
    async fn explain_match(&self, scored: &Match) -> Result<String> {
        let pairs = scored
            .breakdown
            .complementary_pairs
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let data = json!({
            "user_id": scored.user_id,
            "target_id": scored.target_id,
            "match_type": scored.match_type.as_str(),
            "synergy": as_percentage(scored.combined_score),
            "values": as_percentage(scored.vector_score),
            "energy": as_percentage(scored.astro_score),
            "personality": as_percentage(scored.personality_score),
            "pairs": pairs,
            "astro_available": scored.breakdown.astro_available,
        });
        self.render(EXPLANATION_TEMPLATE, &data)
    }

    async fn propose_projects(&self, context: &ProjectContext) -> Result<Vec<ProjectIdea>> {
        let view = ProjectView {
            user_id: &context.user_id,
            partner_id: &context.partner_id,
            shared: context.shared_traits.join(", "),
            pairs: context
                .complementary_pairs
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            relation: relation_label(context.element_relation),
        };

        // Rotate the catalogue by the pair's score so different pairs see
        // different leading ideas.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let offset = (context.combined_score.clamp(0.0, 1.0) * 100.0) as usize % CATALOGUE.len();

        (0..context.count.min(CATALOGUE.len()))
            .map(|step| {
                let index = (offset + step) % CATALOGUE.len();
                let blueprint = &CATALOGUE[index];
                Ok(ProjectIdea {
                    project_id: String::new(),
                    user_id: context.user_id.clone(),
                    partner_id: context.partner_id.clone(),
                    title: blueprint.title.to_string(),
                    description: self.render(&blueprint_template(index), &view)?,
                    roles: blueprint.roles.iter().map(ToString::to_string).collect(),
                    estimated_duration: blueprint.duration.to_string(),
                    difficulty: blueprint.difficulty.to_string(),
                    potential_impact: blueprint.impact,
                    feasibility: 0.0,
                    created_at: Utc::now(),
                })
            })
            .collect()
    }

    fn provider_name(&self) -> &str {
        "template"
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

#[linkme::distributed_slice(NARRATIVE_PROVIDERS)]
static TEMPLATE_PROVIDER: NarrativeProviderEntry = NarrativeProviderEntry {
    name: "template",
    description: "Offline Handlebars templates for explanations and project ideas",
    factory: |_config: &NarrativeProviderConfig| {
        let provider = TemplateNarrativeProvider::new().map_err(|e| e.to_string())?;
        Ok(Arc::new(provider))
    },
};
