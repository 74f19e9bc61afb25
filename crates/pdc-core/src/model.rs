//! Document model for a curricular development plan.
//!
//! [`PdcFormData`] is the aggregate root. It is plain data: all structural
//! rules live in [`crate::form`], which is the only code that mutates it.
//! Field order matters for TOML serialization (plain values before tables).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Level, SchoolYear};

/// Identity of a knowledge-area block or adaptation row. Assigned once,
/// never reused within a session.
pub type EntityId = Uuid;

/// Identifying fields at the top of the plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferentialData {
    pub district: String,
    pub institution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_year: Option<SchoolYear>,
    pub director: String,
    pub teacher: String,
    /// Selected knowledge areas; always a subset of the level's area list.
    pub areas: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_end: Option<NaiveDate>,
}

/// Week slot within [`CurricularContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Week {
    One,
    Two,
    Three,
    Four,
}

/// Weekly contents of a knowledge-area block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurricularContent {
    pub week1: String,
    pub week2: String,
    pub week3: String,
    pub week4: String,
    pub curricular_adaptations: String,
}

impl CurricularContent {
    pub fn week(&self, week: Week) -> &str {
        match week {
            Week::One => &self.week1,
            Week::Two => &self.week2,
            Week::Three => &self.week3,
            Week::Four => &self.week4,
        }
    }

    /// Copy of `self` with one week slot replaced.
    pub fn with_week(&self, week: Week, value: String) -> Self {
        let mut next = self.clone();
        match week {
            Week::One => next.week1 = value,
            Week::Two => next.week2 = value,
            Week::Three => next.week3 = value,
            Week::Four => next.week4 = value,
        }
        next
    }
}

/// Evaluation dimension mandated by the curricular framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Ser,
    Saber,
    Hacer,
}

/// SER / SABER / HACER evaluation criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationCriteria {
    pub ser: String,
    pub saber: String,
    pub hacer: String,
}

impl EvaluationCriteria {
    pub fn get(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Ser => &self.ser,
            Dimension::Saber => &self.saber,
            Dimension::Hacer => &self.hacer,
        }
    }

    /// Copy of `self` with one dimension replaced.
    pub fn with(&self, dimension: Dimension, value: String) -> Self {
        let mut next = self.clone();
        match dimension {
            Dimension::Ser => next.ser = value,
            Dimension::Saber => next.saber = value,
            Dimension::Hacer => next.hacer = value,
        }
        next
    }
}

/// One block per selected knowledge area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeAreaBlock {
    pub id: EntityId,
    #[serde(default)]
    pub area_name: String,
    #[serde(default)]
    pub learning_objective: String,
    #[serde(default)]
    pub formative_moments: String,
    #[serde(default)]
    pub resources: String,
    #[serde(default)]
    pub periods: String,
    #[serde(default)]
    pub contents: CurricularContent,
    #[serde(default)]
    pub criteria: EvaluationCriteria,
    /// Transient: a generation call for this block is in flight.
    #[serde(skip)]
    pub is_loading: bool,
}

impl KnowledgeAreaBlock {
    /// A freshly initialized block with a new identity and empty fields.
    pub fn new(area_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            area_name: area_name.into(),
            learning_objective: String::new(),
            formative_moments: String::new(),
            resources: String::new(),
            periods: String::new(),
            contents: CurricularContent::default(),
            criteria: EvaluationCriteria::default(),
            is_loading: false,
        }
    }

    /// Whether the block has the inputs a generation call needs.
    pub fn is_ready_for_generation(&self) -> bool {
        !self.area_name.is_empty() && !self.contents.week1.is_empty()
    }
}

/// Per-student accommodation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificantAdaptation {
    pub id: EntityId,
    #[serde(default)]
    pub content: String,
    /// Disability / extraordinary talent / ADHD / ASD and similar.
    #[serde(default)]
    pub descriptor: String,
    #[serde(default)]
    pub adaptation: String,
    #[serde(default)]
    pub criterion: String,
    #[serde(skip)]
    pub is_loading: bool,
}

impl SignificantAdaptation {
    /// A new row labelled `Estudiante {number}`.
    pub fn numbered(number: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: format!("Estudiante {number}"),
            descriptor: String::new(),
            adaptation: String::new(),
            criterion: String::new(),
            is_loading: false,
        }
    }

    pub fn is_ready_for_generation(&self) -> bool {
        !self.content.is_empty() && !self.descriptor.is_empty()
    }
}

/// Aggregate root of one editing session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdcFormData {
    pub holistic_objective: String,
    pub referential: ReferentialData,
    pub knowledge_areas: Vec<KnowledgeAreaBlock>,
    pub adaptations: Vec<SignificantAdaptation>,
}

impl PdcFormData {
    /// The form a new session starts from: two unassigned knowledge-area
    /// blocks and two numbered adaptation rows.
    pub fn starter() -> Self {
        Self {
            holistic_objective: String::new(),
            referential: ReferentialData::default(),
            knowledge_areas: vec![KnowledgeAreaBlock::new(""), KnowledgeAreaBlock::new("")],
            adaptations: vec![
                SignificantAdaptation::numbered(1),
                SignificantAdaptation::numbered(2),
            ],
        }
    }

    pub fn knowledge_area(&self, id: EntityId) -> Option<&KnowledgeAreaBlock> {
        self.knowledge_areas.iter().find(|b| b.id == id)
    }

    pub fn adaptation(&self, id: EntityId) -> Option<&SignificantAdaptation> {
        self.adaptations.iter().find(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_form_matches_initial_session() {
        let form = PdcFormData::starter();
        assert_eq!(form.knowledge_areas.len(), 2);
        assert!(form.knowledge_areas.iter().all(|b| b.area_name.is_empty()));
        let labels: Vec<&str> = form.adaptations.iter().map(|a| a.content.as_str()).collect();
        assert_eq!(labels, vec!["Estudiante 1", "Estudiante 2"]);
        assert_ne!(form.knowledge_areas[0].id, form.knowledge_areas[1].id);
    }

    #[test]
    fn with_week_replaces_only_that_slot() {
        let content = CurricularContent {
            week1: "a".into(),
            week2: "b".into(),
            ..Default::default()
        };
        let next = content.with_week(Week::Two, "B".into());
        assert_eq!(next.week1, "a");
        assert_eq!(next.week(Week::Two), "B");
    }

    #[test]
    fn criteria_with_replaces_only_that_dimension() {
        let criteria = EvaluationCriteria {
            ser: "s".into(),
            saber: "k".into(),
            hacer: "h".into(),
        };
        let next = criteria.with(Dimension::Hacer, "H".into());
        assert_eq!(next.get(Dimension::Ser), "s");
        assert_eq!(next.get(Dimension::Saber), "k");
        assert_eq!(next.get(Dimension::Hacer), "H");
    }

    #[test]
    fn readiness_requires_area_and_first_week() {
        let mut block = KnowledgeAreaBlock::new("Matemática");
        assert!(!block.is_ready_for_generation());
        block.contents.week1 = "Números naturales".into();
        assert!(block.is_ready_for_generation());
        block.area_name.clear();
        assert!(!block.is_ready_for_generation());
    }

    #[test]
    fn toml_round_trip_preserves_ids_and_fields() {
        let mut form = PdcFormData::starter();
        form.referential.level = Some(Level::Secundaria);
        form.referential.school_year = Some(SchoolYear::Fourth);
        form.referential.areas = vec!["Matemática".into()];
        form.referential.term_start = NaiveDate::from_ymd_opt(2025, 2, 3);
        form.knowledge_areas[0].area_name = "Matemática".into();
        form.knowledge_areas[0].contents.week1 = "Álgebra".into();
        form.knowledge_areas[0].criteria.hacer = "Resuelve".into();
        form.adaptations[1].descriptor = "TEA".into();

        let text = toml::to_string(&form).unwrap();
        let back: PdcFormData = toml::from_str(&text).unwrap();
        assert_eq!(back, form);
    }

    #[test]
    fn loading_flag_is_not_serialized() {
        let mut block = KnowledgeAreaBlock::new("Matemática");
        block.is_loading = true;
        let json = serde_json::to_string(&block).unwrap();
        assert!(!json.contains("is_loading"));
        let back: KnowledgeAreaBlock = serde_json::from_str(&json).unwrap();
        assert!(!back.is_loading);
        assert_eq!(back.id, block.id);
    }
}
