//! Narrative Provider Implementations
//!
//! | Provider | Description |
//! |----------|-------------|
//! | [`OpenAINarrativeProvider`] | OpenAI chat completions |
//! | [`TemplateNarrativeProvider`] | Offline Handlebars templates |

#[cfg(feature = "narrative-openai")]
pub mod openai;
#[cfg(feature = "narrative-template")]
pub mod template;

#[cfg(feature = "narrative-openai")]
pub use openai::OpenAINarrativeProvider;
#[cfg(feature = "narrative-template")]
pub use template::TemplateNarrativeProvider;
