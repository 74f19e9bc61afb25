//! Word export of a complete plan.
//!
//! [`layout::build_document`] turns the form into a small document model;
//! [`docx::write_docx`] serializes that model as a WordprocessingML
//! archive. Both steps are pure and synchronous.

pub mod docx;
pub mod error;
pub mod layout;

pub use error::ExportError;
pub use layout::{Block, Document, Section, SectionKind};

use crate::model::PdcFormData;

/// File name given to every exported plan.
pub const ARTIFACT_FILE_NAME: &str = "Plan_Desarrollo_Curricular.docx";

/// A rendered document ready to be saved or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Render `form` to a `.docx` artifact.
pub fn export_document(form: &PdcFormData) -> Result<Artifact, ExportError> {
    let document = layout::build_document(form);
    let bytes = docx::write_docx(&document)?;
    Ok(Artifact {
        file_name: ARTIFACT_FILE_NAME.to_owned(),
        bytes,
    })
}
