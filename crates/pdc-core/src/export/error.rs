use thiserror::Error;

/// Failure while rendering the plan to a document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to package document archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to write document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error while writing document: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking export task panicked or was cancelled.
    #[error("export task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
