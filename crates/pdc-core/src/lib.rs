//! Core library for the curricular development plan (PDC) editor.
//!
//! ```text
//! caller (CLI, UI)
//!     |
//!     v
//! FormController --apply(Intent)--> PdcFormData (published via watch)
//!     |                |
//!     |                +-- cascades: reseed_objective, prune_areas, reconcile_blocks
//!     |
//!     +-- generate_*  --> dyn TextGenerator (GeminiClient, test doubles)
//!     +-- export      --> export::build_document --> export::write_docx
//! ```

pub mod catalog;
pub mod config;
pub mod export;
pub mod form;
pub mod generate;
pub mod model;

pub use form::{FormController, FormError, Intent};
pub use model::PdcFormData;
