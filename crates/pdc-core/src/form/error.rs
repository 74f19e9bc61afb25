use thiserror::Error;

use crate::export::ExportError;
use crate::generate::GenerationError;
use crate::model::EntityId;

/// Errors surfaced by [`super::FormController`] operations.
///
/// The `Display` text is the message shown to the teacher.
#[derive(Debug, Error)]
pub enum FormError {
    #[error(
        "Por favor, complete el Nombre del Área y al menos una semana de Contenidos para generar."
    )]
    IncompleteKnowledgeArea { id: EntityId },

    #[error("Por favor, complete el Contenido y la Discapacidad/Talento para generar la adaptación.")]
    IncompleteAdaptation { id: EntityId },

    #[error("no existe ninguna fila con id {0}")]
    UnknownEntity(EntityId),

    #[error("la fila {0} ya se está generando")]
    AlreadyGenerating(EntityId),

    #[error("No se configuró la clave de la API de generación de texto: {source}")]
    Configuration {
        id: EntityId,
        source: GenerationError,
    },

    #[error("Error al generar el contenido del bloque: {source}")]
    KnowledgeAreaGeneration {
        id: EntityId,
        source: GenerationError,
    },

    #[error("Error al generar la adaptación: {source}")]
    AdaptationGeneration {
        id: EntityId,
        source: GenerationError,
    },

    #[error("Error al descargar el documento de Word: {0}")]
    Export(#[from] ExportError),
}

/// Coarse classification of a [`FormError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required fields missing (or the row is unusable); no call was made.
    Validation,
    /// The text-generation call failed or returned unusable data.
    Generation,
    /// Building the document failed.
    Export,
    /// The service credential is missing.
    Configuration,
}

impl FormError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IncompleteKnowledgeArea { .. }
            | Self::IncompleteAdaptation { .. }
            | Self::UnknownEntity(_)
            | Self::AlreadyGenerating(_) => ErrorKind::Validation,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::KnowledgeAreaGeneration { .. } | Self::AdaptationGeneration { .. } => {
                ErrorKind::Generation
            }
            Self::Export(_) => ErrorKind::Export,
        }
    }

    /// Row the error belongs to, when it belongs to one.
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Self::IncompleteKnowledgeArea { id }
            | Self::IncompleteAdaptation { id }
            | Self::Configuration { id, .. }
            | Self::KnowledgeAreaGeneration { id, .. }
            | Self::AdaptationGeneration { id, .. } => Some(*id),
            Self::UnknownEntity(id) | Self::AlreadyGenerating(id) => Some(*id),
            Self::Export(_) => None,
        }
    }
}
