//! Error types for the pdf-poster library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PosterError`]: **Fatal**: the run cannot proceed at all (bad
//!   configuration value, nothing to process, PDFium unavailable). Returned
//!   as `Err(PosterError)` before any document is touched.
//!
//! * [`DocumentError`]: **Non-fatal**: a single document failed (corrupt
//!   file, zero pages, unwritable output) but the rest of the batch is fine.
//!   Stored inside [`crate::output::DocumentReport`] so one bad PDF never
//!   costs the whole run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-poster library.
///
/// Document-level failures use [`DocumentError`] and are stored in
/// [`crate::output::DocumentReport`] rather than propagated here.
#[derive(Debug, Error)]
pub enum PosterError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// A configuration value could not be parsed or is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// The input path is neither a PDF file nor a directory containing any.
    #[error("No PDFs found at '{path}'\nProvide a path to a PDF or a folder containing PDFs.")]
    NoInputFound { path: PathBuf },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place the platform library (libpdfium.so / libpdfium.dylib / pdfium.dll)\n\
    in the current directory.\n\
  • Install pdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),
}

/// A non-fatal error for a single document.
///
/// Stored alongside [`crate::output::DocumentReport`] when a document fails.
/// The batch continues with the next document.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentError {
    /// The document has no pages, so there is nothing to compose.
    #[error("'{path}' has no pages to compose")]
    EmptyInput { path: PathBuf },

    /// PDFium could not open or rasterise the document.
    #[error("Rendering '{path}' failed: {detail}")]
    RenderFailure { path: PathBuf, detail: String },

    /// The computed poster would not fit in a single image buffer.
    #[error("Poster for '{path}' would be {width}x{height} px, which exceeds the image buffer limit\nLower --dpi or use more columns.")]
    CanvasTooLarge {
        path: PathBuf,
        width: u64,
        height: u64,
    },

    /// The pages do not fit the requested grid.
    #[error("Cannot lay out '{path}': {detail}")]
    InvalidLayout { path: PathBuf, detail: String },

    /// Encoding the poster to the requested format failed.
    #[error("Encoding '{path}' as {format} failed: {detail}")]
    EncodeFailure {
        path: PathBuf,
        format: String,
        detail: String,
    },

    /// Could not create the output directory or write an output file.
    #[error("Failed to write '{path}': {detail}")]
    IoFailure { path: PathBuf, detail: String },
}

impl DocumentError {
    /// Short machine-friendly name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentError::EmptyInput { .. } => "EmptyInput",
            DocumentError::RenderFailure { .. } => "RenderFailure",
            DocumentError::CanvasTooLarge { .. } => "CanvasTooLarge",
            DocumentError::InvalidLayout { .. } => "InvalidLayout",
            DocumentError::EncodeFailure { .. } => "EncodeFailure",
            DocumentError::IoFailure { .. } => "IOFailure",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        DocumentError::IoFailure {
            path: path.into(),
            detail: err.to_string(),
        }
    }
}
