//! Shared test utilities for pdc integration tests.
//!
//! Provides [`ScriptedGenerator`], an in-memory [`TextGenerator`] that
//! records every call, answers with predictable text derived from the
//! request, and can be told to fail, run without a key, or hold calls
//! until the test releases them. Also provides form fixtures.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use pdc_core::catalog::Level;
use pdc_core::generate::{
    AdaptationRequest, AdaptationSuggestion, GenerationError, KnowledgeAreaRequest,
    KnowledgeAreaSuggestion, SuggestedCriteria, TextGenerator,
};
use pdc_core::model::{KnowledgeAreaBlock, PdcFormData, SignificantAdaptation};

/// A recorded generator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    KnowledgeArea(KnowledgeAreaRequest),
    Adaptation(AdaptationRequest),
}

/// Deterministic generator for tests.
///
/// A knowledge-area answer for area `A` has learning objective
/// `"objetivo generado: A"`; an adaptation answer for content `C` has
/// adaptation `"adaptación generada: C"`.
#[derive(Default)]
pub struct ScriptedGenerator {
    calls: Mutex<Vec<Call>>,
    failing_areas: HashSet<String>,
    failing_students: HashSet<String>,
    panicking_students: HashSet<String>,
    missing_key: bool,
    /// When set, every call waits for a permit before answering.
    gate: Option<Semaphore>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail generation for blocks with this area name.
    pub fn failing_area(mut self, area: impl Into<String>) -> Self {
        self.failing_areas.insert(area.into());
        self
    }

    /// Fail generation for adaptation rows with this content.
    pub fn failing_student(mut self, content: impl Into<String>) -> Self {
        self.failing_students.insert(content.into());
        self
    }

    /// Panic inside the call for adaptation rows with this content.
    pub fn panicking_student(mut self, content: impl Into<String>) -> Self {
        self.panicking_students.insert(content.into());
        self
    }

    /// Behave like a client with no API key configured.
    pub fn without_api_key(mut self) -> Self {
        self.missing_key = true;
        self
    }

    /// Hold every call until [`release`](Self::release) hands out a permit.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Let `n` held calls proceed.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn enter(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

/// Expected answer for a knowledge-area request on `area`.
pub fn knowledge_area_answer(area: &str) -> KnowledgeAreaSuggestion {
    KnowledgeAreaSuggestion {
        objective_aprendizaje: format!("objetivo generado: {area}"),
        momentos_proceso_formativo: format!("momentos generados: {area}"),
        recursos: "pizarra, cuadernos".into(),
        periodos: "4 semanas".into(),
        criterios_evaluacion: SuggestedCriteria {
            ser: "ser generado".into(),
            saber: "saber generado".into(),
            hacer: "hacer generado".into(),
        },
    }
}

/// Expected answer for an adaptation request on `content`.
pub fn adaptation_answer(content: &str) -> AdaptationSuggestion {
    AdaptationSuggestion {
        adaptacion: format!("adaptación generada: {content}"),
        criterio_evaluacion: format!("criterio generado: {content}"),
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate_knowledge_area(
        &self,
        request: &KnowledgeAreaRequest,
    ) -> Result<KnowledgeAreaSuggestion, GenerationError> {
        self.enter(Call::KnowledgeArea(request.clone())).await;
        if self.missing_key {
            return Err(GenerationError::MissingApiKey);
        }
        if self.failing_areas.contains(&request.area_name) {
            return Err(GenerationError::Api {
                status: 500,
                message: format!("scripted failure for {}", request.area_name),
            });
        }
        Ok(knowledge_area_answer(&request.area_name))
    }

    async fn generate_adaptation(
        &self,
        request: &AdaptationRequest,
    ) -> Result<AdaptationSuggestion, GenerationError> {
        self.enter(Call::Adaptation(request.clone())).await;
        if self.missing_key {
            return Err(GenerationError::MissingApiKey);
        }
        if self.failing_students.contains(&request.content) {
            return Err(GenerationError::EmptyResponse);
        }
        if self.panicking_students.contains(&request.content) {
            panic!("scripted panic for {}", request.content);
        }
        Ok(adaptation_answer(&request.content))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A block for `area` with first-week content, ready for generation.
pub fn ready_block(area: &str) -> KnowledgeAreaBlock {
    let mut block = KnowledgeAreaBlock::new(area);
    block.contents.week1 = format!("contenido de {area}");
    block
}

/// An adaptation row numbered `n` with a descriptor, ready for generation.
pub fn ready_student(n: usize, descriptor: &str) -> SignificantAdaptation {
    let mut row = SignificantAdaptation::numbered(n);
    row.descriptor = descriptor.to_owned();
    row
}

/// A Primaria plan with the given blocks and rows; areas mirror the blocks.
pub fn primaria_form(
    blocks: Vec<KnowledgeAreaBlock>,
    adaptations: Vec<SignificantAdaptation>,
) -> PdcFormData {
    let mut form = PdcFormData::default();
    form.referential.level = Some(Level::Primaria);
    form.referential.areas = blocks.iter().map(|b| b.area_name.clone()).collect();
    form.holistic_objective = pdc_core::catalog::default_objective(Some(Level::Primaria))
        .unwrap_or_default()
        .to_owned();
    form.knowledge_areas = blocks;
    form.adaptations = adaptations;
    form
}
