//! PDF rasterisation: render every page of a document to an RGB image.
//!
//! Rendering is hidden behind the [`PageRenderer`] trait so the batch driver
//! does not care where pixels come from. [`PdfiumRenderer`] is the real
//! implementation; tests substitute an in-memory one.
//!
//! ## Binding pdfium
//!
//! A process binds the pdfium library once and reuses the handle for every
//! document. [`PdfiumRenderer::bind`] looks in three places, first match wins:
//!
//! 1. `PDFIUM_LIB_PATH`: an explicit path to the library file.
//! 2. The platform library name in the current directory.
//! 3. The system library search path.

use crate::error::{DocumentError, PosterError};
use image::RgbImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Produces one raster per page, in page order.
///
/// Images must be opaque RGB at `scale` times the page's size in points.
pub trait PageRenderer {
    fn render(&self, pdf_path: &Path, scale: f32) -> Result<Vec<RgbImage>, DocumentError>;
}

/// [`PageRenderer`] backed by a bound pdfium library.
pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    /// Bind pdfium, see the module docs for the lookup order.
    pub fn bind() -> Result<Self, PosterError> {
        let bindings = match std::env::var("PDFIUM_LIB_PATH") {
            Ok(path) if !path.is_empty() => Pdfium::bind_to_library(&path)
                .map_err(|e| PosterError::PdfiumBindingFailed(format!("'{path}': {e:?}")))?,
            _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library())
                .map_err(|e| PosterError::PdfiumBindingFailed(format!("{e:?}")))?,
        };
        Ok(Self::from_pdfium(Pdfium::new(bindings)))
    }

    /// Wrap an already bound pdfium instance.
    pub fn from_pdfium(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }
}

impl PageRenderer for PdfiumRenderer {
    fn render(&self, pdf_path: &Path, scale: f32) -> Result<Vec<RgbImage>, DocumentError> {
        let failure = |detail: String| DocumentError::RenderFailure {
            path: pdf_path.to_path_buf(),
            detail,
        };

        let document = self
            .pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| failure(format!("{e:?}")))?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        info!("PDF loaded: {} pages", total_pages);

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

        let mut images = Vec::with_capacity(total_pages);
        for (idx, page) in pages.iter().enumerate() {
            let bitmap = page
                .render_with_config(&render_config)
                .map_err(|e| failure(format!("page {}: {e:?}", idx + 1)))?;

            // Drop the alpha channel; pdfium clears the bitmap to opaque white.
            let image = bitmap.as_image().into_rgb8();
            debug!(
                "  - page {}/{} -> {}x{}",
                idx + 1,
                total_pages,
                image.width(),
                image.height()
            );
            images.push(image);
        }

        Ok(images)
    }
}
