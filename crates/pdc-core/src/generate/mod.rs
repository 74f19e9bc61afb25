//! Text generation for knowledge-area blocks and significant adaptations.
//!
//! The controller talks to a [`TextGenerator`]; [`GeminiClient`] is the
//! production implementation. Prompts and response schemas are pure and
//! live in [`prompt`].

pub mod client;
pub mod error;
pub mod gemini;
pub mod prompt;
pub mod types;

pub use client::TextGenerator;
pub use error::GenerationError;
pub use gemini::GeminiClient;
pub use types::{
    AdaptationRequest, AdaptationSuggestion, GenerationContext, KnowledgeAreaRequest,
    KnowledgeAreaSuggestion, SuggestedCriteria,
};
