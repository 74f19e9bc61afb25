//! `pdc export` command: render a plan as a Word document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::generate_cmd::open_controller;

/// Export the plan at `path`. Without `--output` the document is written
/// next to the plan under its standard file name.
pub async fn run_export(path: &Path, output: Option<PathBuf>) -> Result<()> {
    let controller = open_controller(path, None)?;
    let artifact = controller.export_to_document().await?;

    let target = output.unwrap_or_else(|| {
        path.parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&artifact.file_name)
    });
    std::fs::write(&target, &artifact.bytes)
        .with_context(|| format!("failed to write document to {}", target.display()))?;

    tracing::info!(path = %target.display(), bytes = artifact.bytes.len(), "document exported");
    println!("Document written to {}", target.display());
    Ok(())
}
