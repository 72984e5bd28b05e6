//! Output renderings of a generated summary (PDF download, printable HTML)

pub mod pdf;
pub mod print;

use thiserror::Error;

/// Download filename offered for the PDF export
pub const PDF_FILENAME: &str = "AVS_Summary.pdf";

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF font error: {0}")]
    Font(String),

    #[error("PDF save error: {0}")]
    Save(String),
}
