//! Request and response types for the text-generation seam.
//!
//! Responses use the camelCase keys the model is instructed to emit; every
//! field is required, so a partial answer fails to parse.

use serde::{Deserialize, Serialize};

use crate::catalog::{Level, SchoolYear};
use crate::model::{CurricularContent, EvaluationCriteria, KnowledgeAreaBlock, SignificantAdaptation};

/// Plan-wide context sent with a knowledge-area request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationContext {
    pub holistic_objective: String,
    pub level: Option<Level>,
    pub school_year: Option<SchoolYear>,
}

/// Inputs for generating one knowledge-area block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeAreaRequest {
    pub area_name: String,
    pub learning_objective: String,
    pub contents: CurricularContent,
    pub context: GenerationContext,
}

impl KnowledgeAreaRequest {
    pub fn from_block(block: &KnowledgeAreaBlock, context: GenerationContext) -> Self {
        Self {
            area_name: block.area_name.clone(),
            learning_objective: block.learning_objective.clone(),
            contents: block.contents.clone(),
            context,
        }
    }
}

/// Inputs for generating one significant adaptation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptationRequest {
    pub content: String,
    pub descriptor: String,
    pub holistic_objective: String,
}

impl AdaptationRequest {
    pub fn from_row(row: &SignificantAdaptation, holistic_objective: &str) -> Self {
        Self {
            content: row.content.clone(),
            descriptor: row.descriptor.clone(),
            holistic_objective: holistic_objective.to_owned(),
        }
    }
}

/// SER / SABER / HACER as returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedCriteria {
    pub ser: String,
    pub saber: String,
    pub hacer: String,
}

impl From<SuggestedCriteria> for EvaluationCriteria {
    fn from(c: SuggestedCriteria) -> Self {
        Self {
            ser: c.ser,
            saber: c.saber,
            hacer: c.hacer,
        }
    }
}

/// Generated fields of a knowledge-area block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeAreaSuggestion {
    pub objective_aprendizaje: String,
    pub momentos_proceso_formativo: String,
    pub recursos: String,
    pub periodos: String,
    pub criterios_evaluacion: SuggestedCriteria,
}

/// Generated fields of a significant adaptation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationSuggestion {
    pub adaptacion: String,
    pub criterio_evaluacion: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knowledge_area_suggestion_uses_camel_case_keys() {
        let json = r#"{
            "objectiveAprendizaje": "o",
            "momentosProcesoFormativo": "m",
            "recursos": "r",
            "periodos": "p",
            "criteriosEvaluacion": {"ser": "s", "saber": "k", "hacer": "h"}
        }"#;
        let parsed: KnowledgeAreaSuggestion = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.momentos_proceso_formativo, "m");
        assert_eq!(parsed.criterios_evaluacion.saber, "k");
    }

    #[test]
    fn missing_criteria_dimension_is_rejected() {
        let json = r#"{
            "objectiveAprendizaje": "o",
            "momentosProcesoFormativo": "m",
            "recursos": "r",
            "periodos": "p",
            "criteriosEvaluacion": {"ser": "s", "saber": "k"}
        }"#;
        assert!(serde_json::from_str::<KnowledgeAreaSuggestion>(json).is_err());
    }

    #[test]
    fn adaptation_suggestion_parses() {
        let json = r#"{"adaptacion": "a", "criterioEvaluacion": "c"}"#;
        let parsed: AdaptationSuggestion = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.adaptacion, "a");
        assert_eq!(parsed.criterio_evaluacion, "c");
    }
}
