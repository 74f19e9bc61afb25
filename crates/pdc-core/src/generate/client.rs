//! The `TextGenerator` trait -- the seam between the form controller and
//! the generation backend.

use async_trait::async_trait;

use super::error::GenerationError;
use super::types::{
    AdaptationRequest, AdaptationSuggestion, KnowledgeAreaRequest, KnowledgeAreaSuggestion,
};

/// One request/response call per entity.
///
/// Object safe, so the controller can hold an `Arc<dyn TextGenerator>`.
/// Implementations must not retain state between calls that would make
/// concurrent requests interfere with each other.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable name for logs (e.g. "gemini").
    fn name(&self) -> &str;

    async fn generate_knowledge_area(
        &self,
        request: &KnowledgeAreaRequest,
    ) -> Result<KnowledgeAreaSuggestion, GenerationError>;

    async fn generate_adaptation(
        &self,
        request: &AdaptationRequest,
    ) -> Result<AdaptationSuggestion, GenerationError>;
}

// Compile-time assertion: TextGenerator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator) {}
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::types::GenerationContext;
    use crate::model::CurricularContent;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate_knowledge_area(
            &self,
            request: &KnowledgeAreaRequest,
        ) -> Result<KnowledgeAreaSuggestion, GenerationError> {
            Ok(KnowledgeAreaSuggestion {
                objective_aprendizaje: request.area_name.clone(),
                ..Default::default()
            })
        }

        async fn generate_adaptation(
            &self,
            _request: &AdaptationRequest,
        ) -> Result<AdaptationSuggestion, GenerationError> {
            Err(GenerationError::EmptyResponse)
        }
    }

    #[tokio::test]
    async fn generator_usable_as_trait_object() {
        let generator: Box<dyn TextGenerator> = Box::new(EchoGenerator);
        assert_eq!(generator.name(), "echo");

        let request = KnowledgeAreaRequest {
            area_name: "Matemática".into(),
            learning_objective: String::new(),
            contents: CurricularContent::default(),
            context: GenerationContext::default(),
        };
        let out = generator.generate_knowledge_area(&request).await.unwrap();
        assert_eq!(out.objective_aprendizaje, "Matemática");

        let err = generator
            .generate_adaptation(&AdaptationRequest {
                content: "x".into(),
                descriptor: "y".into(),
                holistic_objective: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }
}
