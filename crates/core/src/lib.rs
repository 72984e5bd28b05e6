//! avs-core: After-Visit Summary prompt construction
//!
//! This crate holds the clinical input record, the closed vocabularies for
//! its selectable fields, and the deterministic Prompt Builder that turns a
//! record into text for a text-generation API. It performs no I/O.

pub mod catalog;
pub mod error;
pub mod prompt;
pub mod record;
pub mod status;

// Re-export our types
pub use catalog::{FormCatalog, LabCategory};
pub use error::AvsError;
pub use prompt::{
    DiabetesGate, PromptBuilder, PromptOptions, PromptStyle, UnsetLabLabel, build_prompt,
};
pub use record::{ClinicalInputRecord, MEDICATION_VOCABULARY};
pub use status::{
    BpStatus, CkdStage, DiabetesStatus, FluidStatus, KidneyTrend, LabStatus, MedChange,
    ProteinuriaStatus, Sentinel,
};
