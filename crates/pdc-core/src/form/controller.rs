//! The form controller: single owner of the document model.
//!
//! Every mutation is one atomic read-modify-write on a
//! `tokio::sync::watch` channel, so observers always see a committed
//! state and async generation results are merged into the state current
//! at completion time, never into the snapshot taken at dispatch.

use std::sync::Arc;

use futures::future::{join, join_all};
use tokio::sync::watch;

use crate::export::{self, Artifact, ExportError};
use crate::generate::{
    AdaptationRequest, GenerationContext, GenerationError, KnowledgeAreaRequest, TextGenerator,
};
use crate::model::{EntityId, PdcFormData};

use super::cascade;
use super::error::FormError;
use super::intent::{AdaptationPatch, Intent, KnowledgeAreaPatch, ReferentialField, apply};

/// Session-wide flags and the banner error shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerStatus {
    /// Message of the most recent failure, cleared when an async
    /// operation starts.
    pub last_error: Option<String>,
    pub generating_all: bool,
    pub exporting: bool,
}

/// Outcome of [`FormController::generate_all`].
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Entities whose preconditions held and that got a generation call.
    pub dispatched: usize,
    pub succeeded: usize,
    /// Entities left out because they were incomplete or already loading.
    pub skipped: usize,
    pub failed: Vec<FormError>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Owns one [`PdcFormData`] and the generator used to fill it.
pub struct FormController {
    state: watch::Sender<PdcFormData>,
    status: watch::Sender<ControllerStatus>,
    generator: Arc<dyn TextGenerator>,
}

impl FormController {
    /// Controller over the starter form (two blank blocks, two students).
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_form(PdcFormData::starter(), generator)
    }

    /// Controller over an existing form. Transient loading flags are reset.
    pub fn with_form(mut form: PdcFormData, generator: Arc<dyn TextGenerator>) -> Self {
        form.knowledge_areas.iter_mut().for_each(|b| b.is_loading = false);
        form.adaptations.iter_mut().for_each(|a| a.is_loading = false);
        let (state, _) = watch::channel(form);
        let (status, _) = watch::channel(ControllerStatus::default());
        Self {
            state,
            status,
            generator,
        }
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// Clone of the latest committed state.
    pub fn snapshot(&self) -> PdcFormData {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PdcFormData> {
        self.state.subscribe()
    }

    pub fn status(&self) -> ControllerStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<ControllerStatus> {
        self.status.subscribe()
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    // -----------------------------------------------------------------------
    // Structural mutations
    // -----------------------------------------------------------------------

    /// Apply one intent atomically and publish the result.
    pub fn dispatch(&self, intent: Intent) {
        tracing::debug!(?intent, "applying intent");
        self.state.send_modify(|form| {
            let current = std::mem::take(form);
            *form = apply(current, intent);
        });
    }

    pub fn set_referential_field(&self, field: ReferentialField) {
        self.dispatch(Intent::SetReferential(field));
    }

    pub fn set_holistic_objective(&self, text: impl Into<String>) {
        self.dispatch(Intent::SetHolisticObjective(text.into()));
    }

    pub fn update_knowledge_area_field(&self, id: EntityId, patch: KnowledgeAreaPatch) {
        self.dispatch(Intent::UpdateKnowledgeArea { id, patch });
    }

    pub fn remove_knowledge_area_block(&self, id: EntityId) {
        self.dispatch(Intent::RemoveKnowledgeArea(id));
    }

    pub fn update_significant_adaptation_field(&self, id: EntityId, patch: AdaptationPatch) {
        self.dispatch(Intent::UpdateAdaptation { id, patch });
    }

    /// Append a new student row and return its id.
    pub fn add_significant_adaptation(&self) -> EntityId {
        let mut added = EntityId::nil();
        self.state.send_modify(|form| {
            let current = std::mem::take(form);
            *form = apply(current, Intent::AddAdaptation);
            if let Some(row) = form.adaptations.last() {
                added = row.id;
            }
        });
        added
    }

    pub fn remove_significant_adaptation(&self, id: EntityId) {
        self.dispatch(Intent::RemoveAdaptation(id));
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Fill one knowledge-area block from the generator.
    ///
    /// Fails without calling the generator when the block is unknown,
    /// already loading, or lacks an area name and first-week content. The
    /// block's loading flag is always cleared when this returns.
    pub async fn generate_knowledge_area_block(&self, id: EntityId) -> Result<(), FormError> {
        self.clear_error();
        self.run_knowledge_area(id).await
    }

    /// Fill one significant-adaptation row from the generator.
    pub async fn generate_significant_adaptation(&self, id: EntityId) -> Result<(), FormError> {
        self.clear_error();
        self.run_adaptation(id).await
    }

    /// Generate every entity whose inputs are complete, concurrently.
    ///
    /// Entities that are incomplete or already loading are skipped. Each
    /// call settles independently; one failure never cancels another.
    pub async fn generate_all(&self) -> BatchReport {
        self.clear_error();
        let _busy = BusyGuard::set(&self.status, |s| &mut s.generating_all);

        let form = self.snapshot();
        let block_ids: Vec<EntityId> = form
            .knowledge_areas
            .iter()
            .filter(|b| !b.is_loading && b.is_ready_for_generation())
            .map(|b| b.id)
            .collect();
        let row_ids: Vec<EntityId> = form
            .adaptations
            .iter()
            .filter(|a| !a.is_loading && a.is_ready_for_generation())
            .map(|a| a.id)
            .collect();

        let total = form.knowledge_areas.len() + form.adaptations.len();
        let mut report = BatchReport {
            dispatched: block_ids.len() + row_ids.len(),
            skipped: total - block_ids.len() - row_ids.len(),
            ..Default::default()
        };
        tracing::info!(
            generator = self.generator.name(),
            dispatched = report.dispatched,
            skipped = report.skipped,
            "generating all ready entities"
        );

        let blocks = join_all(block_ids.into_iter().map(|id| self.run_knowledge_area(id)));
        let rows = join_all(row_ids.into_iter().map(|id| self.run_adaptation(id)));
        let (block_results, row_results) = join(blocks, rows).await;

        for result in block_results.into_iter().chain(row_results) {
            match result {
                Ok(()) => report.succeeded += 1,
                Err(e) => report.failed.push(e),
            }
        }

        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "batch generation settled"
        );
        report
    }

    async fn run_knowledge_area(&self, id: EntityId) -> Result<(), FormError> {
        let request = self.begin_knowledge_area(id).inspect_err(|e| self.record_error(e))?;
        let _loading = LoadingGuard::new(&self.state, id);
        tracing::info!(entity_id = %id, area = %request.area_name, "generating knowledge area");

        let outcome = self.generator.generate_knowledge_area(&request).await;
        let (suggestion, failure) = match outcome {
            Ok(s) => (Some(s), None),
            Err(e) => (None, Some(e)),
        };

        let mut present = false;
        self.state.send_modify(|form| {
            if let Some(block) = form.knowledge_areas.iter_mut().find(|b| b.id == id) {
                present = true;
                block.is_loading = false;
                if let Some(suggestion) = suggestion {
                    cascade::merge_knowledge_area(block, suggestion);
                }
            }
        });
        if !present {
            tracing::debug!(entity_id = %id, "block removed while generating, result discarded");
        }

        match failure {
            None => Ok(()),
            Some(source) => {
                let err = match source {
                    GenerationError::MissingApiKey => FormError::Configuration { id, source },
                    source => FormError::KnowledgeAreaGeneration { id, source },
                };
                tracing::warn!(entity_id = %id, error = %err, "knowledge area generation failed");
                self.record_error(&err);
                Err(err)
            }
        }
    }

    async fn run_adaptation(&self, id: EntityId) -> Result<(), FormError> {
        let request = self.begin_adaptation(id).inspect_err(|e| self.record_error(e))?;
        let _loading = LoadingGuard::new(&self.state, id);
        tracing::info!(entity_id = %id, "generating significant adaptation");

        let outcome = self.generator.generate_adaptation(&request).await;
        let (suggestion, failure) = match outcome {
            Ok(s) => (Some(s), None),
            Err(e) => (None, Some(e)),
        };

        let mut present = false;
        self.state.send_modify(|form| {
            if let Some(row) = form.adaptations.iter_mut().find(|a| a.id == id) {
                present = true;
                row.is_loading = false;
                if let Some(suggestion) = suggestion {
                    cascade::merge_adaptation(row, suggestion);
                }
            }
        });
        if !present {
            tracing::debug!(entity_id = %id, "row removed while generating, result discarded");
        }

        match failure {
            None => Ok(()),
            Some(source) => {
                let err = match source {
                    GenerationError::MissingApiKey => FormError::Configuration { id, source },
                    source => FormError::AdaptationGeneration { id, source },
                };
                tracing::warn!(entity_id = %id, error = %err, "adaptation generation failed");
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Check preconditions and mark the block loading in one step.
    fn begin_knowledge_area(&self, id: EntityId) -> Result<KnowledgeAreaRequest, FormError> {
        let mut outcome = Err(FormError::UnknownEntity(id));
        self.state.send_if_modified(|form| {
            let context = GenerationContext {
                holistic_objective: form.holistic_objective.clone(),
                level: form.referential.level,
                school_year: form.referential.school_year,
            };
            let Some(block) = form.knowledge_areas.iter_mut().find(|b| b.id == id) else {
                return false;
            };
            if block.is_loading {
                outcome = Err(FormError::AlreadyGenerating(id));
                return false;
            }
            if !block.is_ready_for_generation() {
                outcome = Err(FormError::IncompleteKnowledgeArea { id });
                return false;
            }
            block.is_loading = true;
            outcome = Ok(KnowledgeAreaRequest::from_block(block, context));
            true
        });
        outcome
    }

    fn begin_adaptation(&self, id: EntityId) -> Result<AdaptationRequest, FormError> {
        let mut outcome = Err(FormError::UnknownEntity(id));
        self.state.send_if_modified(|form| {
            let objective = form.holistic_objective.clone();
            let Some(row) = form.adaptations.iter_mut().find(|a| a.id == id) else {
                return false;
            };
            if row.is_loading {
                outcome = Err(FormError::AlreadyGenerating(id));
                return false;
            }
            if !row.is_ready_for_generation() {
                outcome = Err(FormError::IncompleteAdaptation { id });
                return false;
            }
            row.is_loading = true;
            outcome = Ok(AdaptationRequest::from_row(row, &objective));
            true
        });
        outcome
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    /// Render the current state to a Word document.
    pub async fn export_to_document(&self) -> Result<Artifact, FormError> {
        self.clear_error();
        let busy = BusyGuard::set(&self.status, |s| &mut s.exporting);

        let form = self.snapshot();
        let result = tokio::task::spawn_blocking(move || export::export_document(&form))
            .await
            .map_err(ExportError::from)
            .and_then(|inner| inner)
            .map_err(FormError::from);

        drop(busy);
        match &result {
            Ok(artifact) => tracing::info!(
                file_name = %artifact.file_name,
                bytes = artifact.bytes.len(),
                "document exported"
            ),
            Err(e) => {
                tracing::warn!(error = %e, "document export failed");
                self.record_error(e);
            }
        }
        result
    }

    // -----------------------------------------------------------------------
    // Status helpers
    // -----------------------------------------------------------------------

    fn clear_error(&self) {
        self.status.send_if_modified(|s| s.last_error.take().is_some());
    }

    fn record_error(&self, err: &FormError) {
        let message = err.to_string();
        self.status.send_modify(|s| s.last_error = Some(message));
    }
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

/// Clears an entity's loading flag on drop. A generation future that is
/// dropped mid-call or unwinds from a panicking generator still returns
/// the entity to idle.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<PdcFormData>,
    id: EntityId,
}

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a watch::Sender<PdcFormData>, id: EntityId) -> Self {
        Self { state, id }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let id = self.id;
        let cleared = self.state.send_if_modified(|form| {
            let block = form
                .knowledge_areas
                .iter_mut()
                .find(|b| b.id == id)
                .map(|b| &mut b.is_loading);
            let row = form
                .adaptations
                .iter_mut()
                .find(|a| a.id == id)
                .map(|a| &mut a.is_loading);
            match block.or(row) {
                Some(loading) if *loading => {
                    *loading = false;
                    true
                }
                _ => false,
            }
        });
        if cleared {
            tracing::debug!(entity_id = %id, "generation abandoned, loading flag cleared");
        }
    }
}

/// Holds one [`ControllerStatus`] busy flag set until dropped.
struct BusyGuard<'a> {
    status: &'a watch::Sender<ControllerStatus>,
    flag: fn(&mut ControllerStatus) -> &mut bool,
}

impl<'a> BusyGuard<'a> {
    fn set(
        status: &'a watch::Sender<ControllerStatus>,
        flag: fn(&mut ControllerStatus) -> &mut bool,
    ) -> Self {
        status.send_modify(|s| *flag(s) = true);
        Self { status, flag }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let flag = self.flag;
        self.status.send_modify(|s| *flag(s) = false);
    }
}
