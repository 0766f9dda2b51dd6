//! Pipeline stages for PDF-to-poster conversion.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and the renderer can be swapped without touching the
//! layout code.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ grid ──▶ compose ──▶ resize ──▶ encode
//! (paths)  (pdfium)   (shape)  (poster)   (Lanczos)  (PNG/JPEG)
//! ```
//!
//! 1. [`input`]: expand a file or directory argument into sorted PDF paths
//! 2. [`render`]: rasterise every page at `dpi / 72` scale
//! 3. [`grid`]: choose `(columns, rows)` for the page count
//! 4. [`compose`]: tile the pages into one canvas, centred in uniform cells
//! 5. [`resize`]: optionally downscale to a maximum width
//! 6. [`encode`]: serialise the poster as PNG or JPEG

pub mod compose;
pub mod encode;
pub mod grid;
pub mod input;
pub mod render;
pub mod resize;
