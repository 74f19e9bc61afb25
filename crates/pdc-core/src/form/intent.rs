//! Typed intents and the form transition function.
//!
//! Every user edit is expressed as an [`Intent`] and applied with
//! [`apply`], a pure `(state, intent) -> state'` function. Structural
//! cascades are delegated to [`super::cascade`].

use chrono::NaiveDate;

use crate::catalog::{Level, SchoolYear};
use crate::model::{
    CurricularContent, Dimension, EntityId, EvaluationCriteria, KnowledgeAreaBlock, PdcFormData,
    SignificantAdaptation, Week,
};

use super::cascade;

/// Assignment to one field of the referential data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferentialField {
    District(String),
    Institution(String),
    /// Re-seeds the holistic objective and prunes areas invalid for the level.
    Level(Option<Level>),
    SchoolYear(Option<SchoolYear>),
    Director(String),
    Teacher(String),
    /// Reconciles the knowledge-area blocks with the new selection.
    Areas(Vec<String>),
    TermStart(Option<NaiveDate>),
    TermEnd(Option<NaiveDate>),
}

/// Partial update of a knowledge-area block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeAreaPatch {
    AreaName(String),
    LearningObjective(String),
    Week(Week, String),
    CurricularAdaptations(String),
    Contents(CurricularContent),
    FormativeMoments(String),
    Resources(String),
    Periods(String),
    Criterion(Dimension, String),
    Criteria(EvaluationCriteria),
}

/// Partial update of a significant-adaptation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdaptationPatch {
    Content(String),
    Descriptor(String),
    Adaptation(String),
    Criterion(String),
}

/// A user edit to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SetReferential(ReferentialField),
    SetHolisticObjective(String),
    UpdateKnowledgeArea {
        id: EntityId,
        patch: KnowledgeAreaPatch,
    },
    RemoveKnowledgeArea(EntityId),
    UpdateAdaptation {
        id: EntityId,
        patch: AdaptationPatch,
    },
    AddAdaptation,
    RemoveAdaptation(EntityId),
}

/// Apply one intent to the form and return the next state.
///
/// Intents naming an unknown id leave the state unchanged.
pub fn apply(mut form: PdcFormData, intent: Intent) -> PdcFormData {
    match intent {
        Intent::SetReferential(field) => set_referential(&mut form, field),
        Intent::SetHolisticObjective(text) => form.holistic_objective = text,
        Intent::UpdateKnowledgeArea { id, patch } => {
            if let Some(block) = form.knowledge_areas.iter_mut().find(|b| b.id == id) {
                patch_knowledge_area(block, patch);
            }
        }
        Intent::RemoveKnowledgeArea(id) => form.knowledge_areas.retain(|b| b.id != id),
        Intent::UpdateAdaptation { id, patch } => {
            if let Some(row) = form.adaptations.iter_mut().find(|a| a.id == id) {
                patch_adaptation(row, patch);
            }
        }
        Intent::AddAdaptation => {
            let number = form.adaptations.len() + 1;
            form.adaptations.push(SignificantAdaptation::numbered(number));
        }
        Intent::RemoveAdaptation(id) => form.adaptations.retain(|a| a.id != id),
    }
    form
}

impl PdcFormData {
    /// Method form of [`apply`].
    pub fn apply(self, intent: Intent) -> Self {
        apply(self, intent)
    }
}

fn set_referential(form: &mut PdcFormData, field: ReferentialField) {
    let data = &mut form.referential;
    match field {
        ReferentialField::District(v) => data.district = v,
        ReferentialField::Institution(v) => data.institution = v,
        ReferentialField::Level(level) => {
            data.level = level;
            if let Some(objective) = cascade::reseed_objective(&form.holistic_objective, level) {
                form.holistic_objective = objective;
            }
            let pruned = cascade::prune_areas(&data.areas, level);
            if pruned.len() != data.areas.len() {
                let blocks = std::mem::take(&mut form.knowledge_areas);
                form.knowledge_areas = cascade::reconcile_blocks(blocks, &pruned);
                data.areas = pruned;
            }
        }
        ReferentialField::SchoolYear(v) => data.school_year = v,
        ReferentialField::Director(v) => data.director = v,
        ReferentialField::Teacher(v) => data.teacher = v,
        ReferentialField::Areas(areas) => {
            let areas = cascade::dedup_areas(areas);
            let blocks = std::mem::take(&mut form.knowledge_areas);
            form.knowledge_areas = cascade::reconcile_blocks(blocks, &areas);
            data.areas = areas;
        }
        ReferentialField::TermStart(v) => data.term_start = v,
        ReferentialField::TermEnd(v) => data.term_end = v,
    }
}

fn patch_knowledge_area(block: &mut KnowledgeAreaBlock, patch: KnowledgeAreaPatch) {
    match patch {
        KnowledgeAreaPatch::AreaName(v) => block.area_name = v,
        KnowledgeAreaPatch::LearningObjective(v) => block.learning_objective = v,
        KnowledgeAreaPatch::Week(week, v) => block.contents = block.contents.with_week(week, v),
        KnowledgeAreaPatch::CurricularAdaptations(v) => {
            block.contents = CurricularContent {
                curricular_adaptations: v,
                ..block.contents.clone()
            }
        }
        KnowledgeAreaPatch::Contents(v) => block.contents = v,
        KnowledgeAreaPatch::FormativeMoments(v) => block.formative_moments = v,
        KnowledgeAreaPatch::Resources(v) => block.resources = v,
        KnowledgeAreaPatch::Periods(v) => block.periods = v,
        KnowledgeAreaPatch::Criterion(dimension, v) => {
            block.criteria = block.criteria.with(dimension, v)
        }
        KnowledgeAreaPatch::Criteria(v) => block.criteria = v,
    }
}

fn patch_adaptation(row: &mut SignificantAdaptation, patch: AdaptationPatch) {
    match patch {
        AdaptationPatch::Content(v) => row.content = v,
        AdaptationPatch::Descriptor(v) => row.descriptor = v,
        AdaptationPatch::Adaptation(v) => row.adaptation = v,
        AdaptationPatch::Criterion(v) => row.criterion = v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn select(form: PdcFormData, areas: &[&str]) -> PdcFormData {
        apply(
            form,
            Intent::SetReferential(ReferentialField::Areas(
                areas.iter().map(|s| s.to_string()).collect(),
            )),
        )
    }

    fn set_level(form: PdcFormData, level: Option<Level>) -> PdcFormData {
        apply(form, Intent::SetReferential(ReferentialField::Level(level)))
    }

    #[test]
    fn primaria_scenario() {
        let form = set_level(PdcFormData::starter(), Some(Level::Primaria));
        assert_eq!(
            Some(form.holistic_objective.as_str()),
            catalog::default_objective(Some(Level::Primaria))
        );
        assert_eq!(catalog::areas_for_level(form.referential.level).len(), 9);

        let form = select(form, &["Matemática", "Ciencias Naturales"]);
        let names: Vec<&str> = form
            .knowledge_areas
            .iter()
            .map(|b| b.area_name.as_str())
            .collect();
        assert_eq!(names, vec!["Matemática", "Ciencias Naturales"]);

        let natural_id = form.knowledge_areas[1].id;
        let form = apply(
            form,
            Intent::UpdateKnowledgeArea {
                id: natural_id,
                patch: KnowledgeAreaPatch::Week(Week::One, "La célula".into()),
            },
        );

        let form = select(form, &["Ciencias Naturales"]);
        assert_eq!(form.knowledge_areas.len(), 1);
        assert_eq!(form.knowledge_areas[0].id, natural_id);
        assert_eq!(form.knowledge_areas[0].contents.week1, "La célula");
    }

    #[test]
    fn level_change_prunes_stale_areas_and_blocks() {
        let form = set_level(PdcFormData::default(), Some(Level::Primaria));
        let form = select(form, &["Matemática"]);
        let form = set_level(form, Some(Level::Secundaria));

        assert!(form.referential.areas.is_empty());
        assert!(form.knowledge_areas.is_empty());
    }

    #[test]
    fn level_change_keeps_blocks_when_nothing_pruned() {
        let form = set_level(PdcFormData::starter(), Some(Level::Inicial));
        assert_eq!(form.knowledge_areas.len(), 2);
    }

    #[test]
    fn unsetting_level_keeps_custom_objective() {
        let form = apply(
            PdcFormData::default(),
            Intent::SetHolisticObjective("propio".into()),
        );
        let form = set_level(form, None);
        assert_eq!(form.holistic_objective, "propio");
    }

    #[test]
    fn removed_area_reselected_gets_new_identity() {
        let form = select(PdcFormData::default(), &["Matemática"]);
        let old_id = form.knowledge_areas[0].id;
        let form = apply(
            form,
            Intent::UpdateKnowledgeArea {
                id: old_id,
                patch: KnowledgeAreaPatch::Resources("ábaco".into()),
            },
        );
        let form = apply(form, Intent::RemoveKnowledgeArea(old_id));
        assert!(form.knowledge_areas.is_empty());

        let form = select(form, &["Matemática"]);
        assert_eq!(form.knowledge_areas.len(), 1);
        assert_ne!(form.knowledge_areas[0].id, old_id);
        assert!(form.knowledge_areas[0].resources.is_empty());
    }

    #[test]
    fn remove_only_touches_that_id() {
        let form = select(PdcFormData::default(), &["A", "B", "C"]);
        let target = form.knowledge_areas[1].id;
        let form = apply(form, Intent::RemoveKnowledgeArea(target));
        let names: Vec<&str> = form
            .knowledge_areas
            .iter()
            .map(|b| b.area_name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn unknown_id_is_a_no_op() {
        let form = PdcFormData::starter();
        let next = apply(
            form.clone(),
            Intent::UpdateKnowledgeArea {
                id: uuid::Uuid::new_v4(),
                patch: KnowledgeAreaPatch::Periods("2 semanas".into()),
            },
        );
        assert_eq!(next, form);
        let next = apply(form.clone(), Intent::RemoveAdaptation(uuid::Uuid::new_v4()));
        assert_eq!(next, form);
    }

    #[test]
    fn add_adaptation_numbers_from_current_length() {
        let form = apply(PdcFormData::starter(), Intent::AddAdaptation);
        let form = apply(form, Intent::AddAdaptation);
        let labels: Vec<&str> = form.adaptations.iter().map(|a| a.content.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Estudiante 1", "Estudiante 2", "Estudiante 3", "Estudiante 4"]
        );
    }

    #[test]
    fn add_after_delete_is_not_renumbered() {
        let form = PdcFormData::starter();
        let first = form.adaptations[0].id;
        let form = apply(form, Intent::RemoveAdaptation(first));
        let form = apply(form, Intent::AddAdaptation);
        let labels: Vec<&str> = form.adaptations.iter().map(|a| a.content.as_str()).collect();
        assert_eq!(labels, vec!["Estudiante 2", "Estudiante 2"]);
    }

    #[test]
    fn criterion_patch_merges_single_dimension() {
        let form = select(PdcFormData::default(), &["Matemática"]);
        let id = form.knowledge_areas[0].id;
        let form = apply(
            form,
            Intent::UpdateKnowledgeArea {
                id,
                patch: KnowledgeAreaPatch::Criterion(Dimension::Saber, "conoce".into()),
            },
        );
        let form = apply(
            form,
            Intent::UpdateKnowledgeArea {
                id,
                patch: KnowledgeAreaPatch::Criterion(Dimension::Ser, "respeta".into()),
            },
        );
        let criteria = &form.knowledge_areas[0].criteria;
        assert_eq!(criteria.ser, "respeta");
        assert_eq!(criteria.saber, "conoce");
        assert!(criteria.hacer.is_empty());
    }

    #[test]
    fn adaptation_patch_sets_field() {
        let form = PdcFormData::starter();
        let id = form.adaptations[1].id;
        let form = apply(
            form,
            Intent::UpdateAdaptation {
                id,
                patch: AdaptationPatch::Descriptor("TDAH".into()),
            },
        );
        assert_eq!(form.adaptations[1].descriptor, "TDAH");
        assert!(form.adaptations[0].descriptor.is_empty());
    }
}
