//! `pdc generate` command: fill blocks and student rows from the
//! generation service and save the merged plan.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use futures::future::join_all;

use pdc_core::generate::GeminiClient;
use pdc_core::{FormController, FormError};

use crate::{config, edit, store};

/// What `pdc generate` should fill.
#[derive(Debug, Default)]
pub struct Selection {
    /// Knowledge-area names.
    pub areas: Vec<String>,
    /// 1-based student rows.
    pub students: Vec<usize>,
}

impl Selection {
    fn is_empty(&self) -> bool {
        self.areas.is_empty() && self.students.is_empty()
    }
}

/// Build a controller over the plan at `path` backed by the configured
/// generation service.
pub fn open_controller(path: &Path, cli_api_key: Option<&str>) -> Result<FormController> {
    let form = store::load_form(path)?;
    let gemini = config::resolve_gemini(cli_api_key)?;
    let client = GeminiClient::new(gemini).context("failed to build generation client")?;
    Ok(FormController::with_form(form, Arc::new(client)))
}

pub async fn run_generate(path: &Path, selection: Selection, cli_api_key: Option<&str>) -> Result<()> {
    let controller = open_controller(path, cli_api_key)?;

    let failures: Vec<FormError> = if selection.is_empty() {
        let report = controller.generate_all().await;
        println!(
            "Generated {}/{} ready entries with {} ({} skipped).",
            report.succeeded,
            report.dispatched,
            controller.generator_name(),
            report.skipped
        );
        report.failed
    } else {
        let form = controller.snapshot();
        let block_ids = selection
            .areas
            .iter()
            .map(|area| edit::find_block(&form, area))
            .collect::<Result<Vec<_>>>()?;
        let row_ids = selection
            .students
            .iter()
            .map(|&index| edit::find_student(&form, index))
            .collect::<Result<Vec<_>>>()?;

        let total = block_ids.len() + row_ids.len();
        let blocks = join_all(
            block_ids
                .into_iter()
                .map(|id| controller.generate_knowledge_area_block(id)),
        );
        let rows = join_all(
            row_ids
                .into_iter()
                .map(|id| controller.generate_significant_adaptation(id)),
        );
        let (blocks, rows) = futures::join!(blocks, rows);
        let failures: Vec<FormError> = blocks
            .into_iter()
            .chain(rows)
            .filter_map(Result::err)
            .collect();
        println!(
            "Generated {}/{total} selected entries with {}.",
            total - failures.len(),
            controller.generator_name()
        );
        failures
    };

    // Partial results are kept even when some entries failed.
    store::save_form(path, &controller.snapshot())?;

    if failures.is_empty() {
        return Ok(());
    }
    for failure in &failures {
        eprintln!("  {failure}");
    }
    bail!("{} generation(s) failed", failures.len())
}
