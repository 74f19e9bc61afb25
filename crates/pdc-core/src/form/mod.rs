//! Form state: intents, cascades, and the controller that owns the model.

pub mod cascade;
pub mod controller;
pub mod error;
pub mod intent;

pub use controller::{BatchReport, ControllerStatus, FormController};
pub use error::{ErrorKind, FormError};
pub use intent::{AdaptationPatch, Intent, KnowledgeAreaPatch, ReferentialField, apply};
