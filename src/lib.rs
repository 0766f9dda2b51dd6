//! # pdf-poster
//!
//! Render every page of a PDF and tile the pages into a single grid-shaped
//! "poster" image, with configurable margins, spacing and background.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    resolve a file, or walk a directory for *.pdf
//!  ├─ 2. Render   rasterise pages via pdfium at dpi / 72 scale
//!  ├─ 3. Grid     choose (columns, rows): auto near-square, or fixed
//!  ├─ 4. Compose  centre each page in a uniform cell sized to the largest page
//!  ├─ 5. Resize   optional Lanczos downscale to a maximum width
//!  └─ 6. Output   PNG and/or JPEG per document + a run report
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_poster::{convert_batch, PdfiumRenderer, PosterConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let renderer = PdfiumRenderer::bind()?;
//!     let config = PosterConfig::builder().dpi(150).build()?;
//!     let report = convert_batch(Path::new("papers/"), Path::new("posters/"), &renderer, &config)?;
//!     for (pdf, err) in report.failures() {
//!         eprintln!("{}: {err}", pdf.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2poster` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf-poster = { version = "0.1", default-features = false }
//! ```
//!
//! ## Memory
//!
//! A poster holds every page at full resolution. At 300 DPI one Letter page
//! is about 2550 × 3300 px (25 MB of RGB), so a 40-page document produces a
//! poster near 1 GB before any downscale. Lower `dpi` for long documents.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod color;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use color::parse_color;
pub use config::{
    parse_format_list, resolve_formats, ColumnSpec, OutputFormat, PosterConfig,
    PosterConfigBuilder,
};
pub use convert::{convert_batch, convert_file, render_poster, Poster};
pub use error::{DocumentError, PosterError};
pub use output::{display_name, BatchReport, DocumentReport};
pub use pipeline::compose::{compose, LayoutParams, PosterGeometry};
pub use pipeline::grid::{plan, GridShape};
pub use pipeline::render::{PageRenderer, PdfiumRenderer};
pub use pipeline::resize::downscale;
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
