//! Cascading rules that keep the form consistent with its top-level
//! selections. Each rule is a pure function over plain data.

use std::collections::HashSet;

use crate::catalog::{self, Level};
use crate::generate::{AdaptationSuggestion, KnowledgeAreaSuggestion};
use crate::model::{KnowledgeAreaBlock, SignificantAdaptation};

/// Objective text to install after the level changes to `level`, or `None`
/// to keep `current`.
///
/// The default for the new level replaces the current text whenever one is
/// defined, even if the teacher already edited or generated an objective.
/// With no default the objective is only touched when it is empty.
pub fn reseed_objective(current: &str, level: Option<Level>) -> Option<String> {
    let default = catalog::default_objective(level);
    if current.is_empty() || default.is_some() {
        Some(default.unwrap_or_default().to_owned())
    } else {
        None
    }
}

/// Drop every selected area that is not valid for `level`, keeping order.
pub fn prune_areas(areas: &[String], level: Option<Level>) -> Vec<String> {
    let valid = catalog::areas_for_level(level);
    areas
        .iter()
        .filter(|area| valid.contains(&area.as_str()))
        .cloned()
        .collect()
}

/// Remove repeated names, keeping the first occurrence.
pub fn dedup_areas(areas: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    areas
        .into_iter()
        .filter(|area| seen.insert(area.clone()))
        .collect()
}

/// Reconcile knowledge-area blocks with the selected area names.
///
/// Blocks whose area is still selected are kept untouched in their original
/// order; the rest are dropped. One fresh block is then appended for each
/// selected name that no kept block represents, in selection order.
pub fn reconcile_blocks(
    blocks: Vec<KnowledgeAreaBlock>,
    selected: &[String],
) -> Vec<KnowledgeAreaBlock> {
    let wanted: HashSet<&str> = selected.iter().map(String::as_str).collect();

    let mut kept: Vec<KnowledgeAreaBlock> = blocks
        .into_iter()
        .filter(|block| wanted.contains(block.area_name.as_str()))
        .collect();

    let mut represented: HashSet<String> = kept.iter().map(|b| b.area_name.clone()).collect();
    for area in selected {
        if represented.insert(area.clone()) {
            kept.push(KnowledgeAreaBlock::new(area.clone()));
        }
    }
    kept
}

/// Merge a generation result into a block. Only the generated fields change.
pub fn merge_knowledge_area(block: &mut KnowledgeAreaBlock, suggestion: KnowledgeAreaSuggestion) {
    block.learning_objective = suggestion.objective_aprendizaje;
    block.formative_moments = suggestion.momentos_proceso_formativo;
    block.resources = suggestion.recursos;
    block.periods = suggestion.periodos;
    block.criteria = suggestion.criterios_evaluacion.into();
}

pub fn merge_adaptation(row: &mut SignificantAdaptation, suggestion: AdaptationSuggestion) {
    row.adaptation = suggestion.adaptacion;
    row.criterion = suggestion.criterio_evaluacion;
}
