//! Translation of `pdc set`, `pdc block` and `pdc student` arguments into
//! form intents.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::ValueEnum;

use pdc_core::catalog::{self, Level, SchoolYear};
use pdc_core::form::{AdaptationPatch, Intent, KnowledgeAreaPatch, ReferentialField};
use pdc_core::model::{Dimension, EntityId, PdcFormData, Week};

/// Plan-level fields accepted by `pdc set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanField {
    District,
    Institution,
    Level,
    Year,
    Director,
    Teacher,
    /// Comma-separated knowledge areas.
    Areas,
    /// Term start date (YYYY-MM-DD).
    From,
    /// Term end date (YYYY-MM-DD).
    To,
    /// Holistic objective of the level.
    Objective,
}

/// Knowledge-area block fields accepted by `pdc block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BlockField {
    /// Rename the block's area.
    Area,
    Objective,
    Week1,
    Week2,
    Week3,
    Week4,
    /// Curricular adaptations (general and specific).
    Adaptations,
    Moments,
    Resources,
    Periods,
    Ser,
    Saber,
    Hacer,
}

/// Student row fields accepted by `pdc student set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StudentField {
    Content,
    /// Disability / extraordinary talent / ADHD / ASD and others.
    Descriptor,
    Adaptation,
    Criterion,
}

fn joined(values: &[String]) -> String {
    values.join(" ")
}

fn optional_date(values: &[String]) -> Result<Option<NaiveDate>> {
    let text = joined(values);
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(Some)
        .with_context(|| format!("invalid date {text:?} (expected YYYY-MM-DD)"))
}

/// Build the intent for `pdc set <field> <value...>`. An empty value
/// clears optional fields.
pub fn plan_intent(field: PlanField, values: &[String]) -> Result<Intent> {
    let text = joined(values);
    let referential = match field {
        PlanField::District => ReferentialField::District(text),
        PlanField::Institution => ReferentialField::Institution(text),
        PlanField::Level => {
            let level = match text.trim() {
                "" => None,
                s => Some(s.parse::<Level>()?),
            };
            ReferentialField::Level(level)
        }
        PlanField::Year => {
            let year = match text.trim() {
                "" => None,
                s => Some(s.parse::<SchoolYear>()?),
            };
            ReferentialField::SchoolYear(year)
        }
        PlanField::Director => ReferentialField::Director(text),
        PlanField::Teacher => ReferentialField::Teacher(text),
        PlanField::Areas => ReferentialField::Areas(
            values
                .iter()
                .flat_map(|v| v.split(','))
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        PlanField::From => ReferentialField::TermStart(optional_date(values)?),
        PlanField::To => ReferentialField::TermEnd(optional_date(values)?),
        PlanField::Objective => return Ok(Intent::SetHolisticObjective(text)),
    };
    Ok(Intent::SetReferential(referential))
}

pub fn block_patch(field: BlockField, values: &[String]) -> KnowledgeAreaPatch {
    let text = joined(values);
    match field {
        BlockField::Area => KnowledgeAreaPatch::AreaName(text),
        BlockField::Objective => KnowledgeAreaPatch::LearningObjective(text),
        BlockField::Week1 => KnowledgeAreaPatch::Week(Week::One, text),
        BlockField::Week2 => KnowledgeAreaPatch::Week(Week::Two, text),
        BlockField::Week3 => KnowledgeAreaPatch::Week(Week::Three, text),
        BlockField::Week4 => KnowledgeAreaPatch::Week(Week::Four, text),
        BlockField::Adaptations => KnowledgeAreaPatch::CurricularAdaptations(text),
        BlockField::Moments => KnowledgeAreaPatch::FormativeMoments(text),
        BlockField::Resources => KnowledgeAreaPatch::Resources(text),
        BlockField::Periods => KnowledgeAreaPatch::Periods(text),
        BlockField::Ser => KnowledgeAreaPatch::Criterion(Dimension::Ser, text),
        BlockField::Saber => KnowledgeAreaPatch::Criterion(Dimension::Saber, text),
        BlockField::Hacer => KnowledgeAreaPatch::Criterion(Dimension::Hacer, text),
    }
}

pub fn student_patch(field: StudentField, values: &[String]) -> AdaptationPatch {
    let text = joined(values);
    match field {
        StudentField::Content => AdaptationPatch::Content(text),
        StudentField::Descriptor => AdaptationPatch::Descriptor(text),
        StudentField::Adaptation => AdaptationPatch::Adaptation(text),
        StudentField::Criterion => AdaptationPatch::Criterion(text),
    }
}

/// Map typed area names onto the catalog spelling for `level`,
/// case-insensitively. Unknown names are an error listing the valid ones.
pub fn canonical_areas(names: Vec<String>, level: Option<Level>) -> Result<Vec<String>> {
    let Some(level) = level else {
        bail!("choose the level before the areas (`pdc set <file> level <level>`)");
    };
    let valid = catalog::areas_for_level(Some(level));
    names
        .into_iter()
        .map(|name| {
            let wanted = name.to_lowercase();
            valid
                .iter()
                .find(|area| area.to_lowercase() == wanted)
                .map(|area| (*area).to_owned())
                .with_context(|| {
                    format!(
                        "{name:?} is not a {level} area (valid: {})",
                        valid.join(", ")
                    )
                })
        })
        .collect()
}

/// Id of the first block whose area name matches `area` (case-insensitive).
pub fn find_block(form: &PdcFormData, area: &str) -> Result<EntityId> {
    let wanted = area.trim().to_lowercase();
    match form
        .knowledge_areas
        .iter()
        .find(|b| b.area_name.to_lowercase() == wanted)
    {
        Some(block) => Ok(block.id),
        None => {
            let known: Vec<&str> = form
                .knowledge_areas
                .iter()
                .map(|b| b.area_name.as_str())
                .filter(|n| !n.is_empty())
                .collect();
            bail!(
                "no knowledge-area block named {area:?} (blocks: {})",
                if known.is_empty() { "none".to_owned() } else { known.join(", ") }
            )
        }
    }
}

/// Id of the student row at 1-based `index`.
pub fn find_student(form: &PdcFormData, index: usize) -> Result<EntityId> {
    index
        .checked_sub(1)
        .and_then(|i| form.adaptations.get(i))
        .map(|row| row.id)
        .with_context(|| {
            format!(
                "no student row {index} (the plan has {} rows, numbered from 1)",
                form.adaptations.len()
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn areas_split_on_commas_and_arguments() {
        let intent = plan_intent(
            PlanField::Areas,
            &args(&["Matemática, Ciencias Naturales", "Música", ","]),
        )
        .unwrap();
        assert_eq!(
            intent,
            Intent::SetReferential(ReferentialField::Areas(args(&[
                "Matemática",
                "Ciencias Naturales",
                "Música"
            ])))
        );
    }

    #[test]
    fn level_parses_and_clears() {
        let intent = plan_intent(PlanField::Level, &args(&["primaria"])).unwrap();
        assert_eq!(
            intent,
            Intent::SetReferential(ReferentialField::Level(Some(Level::Primaria)))
        );
        let intent = plan_intent(PlanField::Level, &[]).unwrap();
        assert_eq!(intent, Intent::SetReferential(ReferentialField::Level(None)));
        assert!(plan_intent(PlanField::Level, &args(&["universidad"])).is_err());
    }

    #[test]
    fn dates_are_validated() {
        let intent = plan_intent(PlanField::From, &args(&["2025-02-03"])).unwrap();
        assert_eq!(
            intent,
            Intent::SetReferential(ReferentialField::TermStart(NaiveDate::from_ymd_opt(
                2025, 2, 3
            )))
        );
        let err = plan_intent(PlanField::To, &args(&["03/02/2025"])).unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn multi_word_values_are_joined() {
        let intent = plan_intent(PlanField::Director, &args(&["Ana", "María", "Quispe"])).unwrap();
        assert_eq!(
            intent,
            Intent::SetReferential(ReferentialField::Director("Ana María Quispe".into()))
        );
        assert_eq!(
            block_patch(BlockField::Saber, &args(&["Conoce", "fracciones"])),
            KnowledgeAreaPatch::Criterion(Dimension::Saber, "Conoce fracciones".into())
        );
    }

    #[test]
    fn areas_take_catalog_spelling() {
        let areas = canonical_areas(
            args(&["matemática", "CIENCIAS NATURALES"]),
            Some(Level::Primaria),
        )
        .unwrap();
        assert_eq!(areas, args(&["Matemática", "Ciencias Naturales"]));

        let err = canonical_areas(args(&["Música"]), Some(Level::Primaria)).unwrap_err();
        assert!(err.to_string().contains("Educación Musical"));
        assert!(canonical_areas(args(&["Matemática"]), None).is_err());
    }

    #[test]
    fn lookups_report_what_exists() {
        let mut form = PdcFormData::starter();
        form.knowledge_areas[0].area_name = "Matemática".into();
        assert_eq!(
            find_block(&form, "matemática").unwrap(),
            form.knowledge_areas[0].id
        );
        let err = find_block(&form, "Música").unwrap_err();
        assert!(err.to_string().contains("Matemática"));

        assert_eq!(find_student(&form, 2).unwrap(), form.adaptations[1].id);
        assert!(find_student(&form, 0).is_err());
        assert!(find_student(&form, 3).is_err());
    }
}
