//! Plan file commands: `pdc new`, `pdc show`, `pdc set`, `pdc block`,
//! `pdc student` and `pdc levels`.

use std::path::Path;

use anyhow::Result;

use pdc_core::PdcFormData;
use pdc_core::catalog::{self, Level, SchoolYear};
use pdc_core::form::{Intent, ReferentialField};

use crate::StudentCommands;
use crate::edit::{self, BlockField, PlanField};
use crate::store;

const UNSET: &str = "-";

/// Write a starter plan, optionally with the level (and its default
/// objective) already chosen.
pub fn run_new(path: &Path, level: Option<Level>, force: bool) -> Result<()> {
    let mut form = PdcFormData::starter();
    if level.is_some() {
        form = form.apply(Intent::SetReferential(ReferentialField::Level(level)));
    }
    store::create_form(path, &form, force)?;

    println!("Plan written to {}", path.display());
    println!();
    println!(
        "Next: `pdc set {} areas <area,...>` to choose knowledge areas.",
        path.display()
    );
    Ok(())
}

/// Apply a plan-level edit and save.
pub fn run_set(path: &Path, field: PlanField, values: &[String]) -> Result<()> {
    let form = store::load_form(path)?;
    let intent = match edit::plan_intent(field, values)? {
        Intent::SetReferential(ReferentialField::Areas(names)) => Intent::SetReferential(
            ReferentialField::Areas(edit::canonical_areas(names, form.referential.level)?),
        ),
        intent => intent,
    };
    let before = form.knowledge_areas.len();
    let form = form.apply(intent);
    store::save_form(path, &form)?;

    let after = form.knowledge_areas.len();
    if after != before {
        println!("Knowledge-area blocks: {before} -> {after}");
    }
    println!("Updated {}.", path.display());
    Ok(())
}

/// Edit or remove one knowledge-area block, addressed by area name.
pub fn run_block(
    path: &Path,
    area: &str,
    field: Option<BlockField>,
    values: &[String],
) -> Result<()> {
    let form = store::load_form(path)?;
    let id = edit::find_block(&form, area)?;

    let form = match field {
        Some(field) => form.apply(Intent::UpdateKnowledgeArea {
            id,
            patch: edit::block_patch(field, values),
        }),
        None => {
            let form = form.apply(Intent::RemoveKnowledgeArea(id));
            println!("Removed block {area:?}.");
            form
        }
    };
    store::save_form(path, &form)
}

pub fn run_student_command(command: StudentCommands) -> Result<()> {
    match command {
        StudentCommands::Add { file } => {
            let form = store::load_form(&file)?.apply(Intent::AddAdaptation);
            store::save_form(&file, &form)?;
            let row = form.adaptations.len();
            println!("Added student row {row} ({}).", form.adaptations[row - 1].content);
        }
        StudentCommands::Remove { file, index } => {
            let form = store::load_form(&file)?;
            let id = edit::find_student(&form, index)?;
            store::save_form(&file, &form.apply(Intent::RemoveAdaptation(id)))?;
            println!("Removed student row {index}.");
        }
        StudentCommands::Set {
            file,
            index,
            field,
            value,
        } => {
            let form = store::load_form(&file)?;
            let id = edit::find_student(&form, index)?;
            let form = form.apply(Intent::UpdateAdaptation {
                id,
                patch: edit::student_patch(field, &value),
            });
            store::save_form(&file, &form)?;
        }
    }
    Ok(())
}

/// Print levels, school years and the areas each level offers.
pub fn run_levels() {
    for level in Level::ALL {
        println!("{level}: {}", catalog::level_title(Some(level)));
        for area in catalog::areas_for_level(Some(level)) {
            println!("  - {area}");
        }
        println!();
    }
    let years: Vec<String> = SchoolYear::ALL.iter().map(ToString::to_string).collect();
    println!("School years: {}", years.join(", "));
}

/// Print a plan in reading order.
pub fn run_show(path: &Path) -> Result<()> {
    let form = store::load_form(path)?;
    print!("{}", render(&form));
    Ok(())
}

fn or_unset(value: &str) -> &str {
    if value.trim().is_empty() { UNSET } else { value }
}

fn render(form: &PdcFormData) -> String {
    use std::fmt::Write;

    let r = &form.referential;
    let mut out = String::new();
    let _ = writeln!(out, "{}", catalog::level_title(r.level));
    let _ = writeln!(out);
    let _ = writeln!(out, "District:     {}", or_unset(&r.district));
    let _ = writeln!(out, "Institution:  {}", or_unset(&r.institution));
    let _ = writeln!(
        out,
        "Level:        {}",
        r.level.map(|l| l.to_string()).unwrap_or_else(|| UNSET.into())
    );
    let _ = writeln!(
        out,
        "Year:         {}",
        r.school_year.map(|y| y.to_string()).unwrap_or_else(|| UNSET.into())
    );
    let _ = writeln!(out, "Director:     {}", or_unset(&r.director));
    let _ = writeln!(out, "Teacher:      {}", or_unset(&r.teacher));
    let _ = writeln!(
        out,
        "Term:         {} .. {}",
        r.term_start.map(|d| d.to_string()).unwrap_or_else(|| UNSET.into()),
        r.term_end.map(|d| d.to_string()).unwrap_or_else(|| UNSET.into())
    );
    let areas = if r.areas.is_empty() {
        UNSET.to_owned()
    } else {
        r.areas.join(", ")
    };
    let _ = writeln!(out, "Areas:        {areas}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Holistic objective:");
    let _ = writeln!(out, "  {}", or_unset(&form.holistic_objective));

    for block in &form.knowledge_areas {
        let _ = writeln!(out);
        let marker = if block.is_ready_for_generation() { "+" } else { "." };
        let _ = writeln!(out, "[{marker}] {}", or_unset(&block.area_name));
        let _ = writeln!(out, "    objective:   {}", or_unset(&block.learning_objective));
        for (n, week) in [
            &block.contents.week1,
            &block.contents.week2,
            &block.contents.week3,
            &block.contents.week4,
        ]
        .into_iter()
        .enumerate()
        {
            let _ = writeln!(out, "    week {}:      {}", n + 1, or_unset(week));
        }
        let _ = writeln!(
            out,
            "    adaptations: {}",
            or_unset(&block.contents.curricular_adaptations)
        );
        let _ = writeln!(out, "    moments:     {}", or_unset(&block.formative_moments));
        let _ = writeln!(out, "    resources:   {}", or_unset(&block.resources));
        let _ = writeln!(out, "    periods:     {}", or_unset(&block.periods));
        let _ = writeln!(out, "    ser:         {}", or_unset(&block.criteria.ser));
        let _ = writeln!(out, "    saber:       {}", or_unset(&block.criteria.saber));
        let _ = writeln!(out, "    hacer:       {}", or_unset(&block.criteria.hacer));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Significant adaptations:");
    for (n, row) in form.adaptations.iter().enumerate() {
        let marker = if row.is_ready_for_generation() { "+" } else { "." };
        let _ = writeln!(
            out,
            "  [{marker}] {}. {} | {} | {} | {}",
            n + 1,
            or_unset(&row.content),
            or_unset(&row.descriptor),
            or_unset(&row.adaptation),
            or_unset(&row.criterion)
        );
    }
    out
}
