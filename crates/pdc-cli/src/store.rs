//! Plan files: one TOML document per plan.

use std::path::Path;

use anyhow::{Context, Result, bail};

use pdc_core::PdcFormData;

/// Read and parse a plan file.
pub fn load_form(path: &Path) -> Result<PdcFormData> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read plan file: {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse plan file: {}", path.display()))
}

/// Write a plan file, replacing any existing content.
pub fn save_form(path: &Path, form: &PdcFormData) -> Result<()> {
    let contents = toml::to_string_pretty(form).context("failed to serialize plan")?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write plan file: {}", path.display()))
}

/// Write a new plan file. Refuses to overwrite unless `force` is set.
pub fn create_form(path: &Path, form: &PdcFormData, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "plan file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }
    save_form(path, form)
}
