//! Conversion entry points: one document, or a whole batch.
//!
//! Documents are processed strictly one after another, each to completion
//! (render → plan → compose → resize → encode → write) before the next one
//! starts. A document failure is recorded in its [`DocumentReport`] and the
//! batch moves on; only run-level problems surface as [`PosterError`].

use crate::config::PosterConfig;
use crate::error::{DocumentError, PosterError};
use crate::output::{display_name, output_file_name, write_atomic, BatchReport, DocumentReport};
use crate::pipeline::compose::{ComposeError, PosterGeometry};
use crate::pipeline::render::PageRenderer;
use crate::pipeline::{encode, grid, input, resize};
use image::RgbImage;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A composed (and possibly downscaled) poster held in memory.
#[derive(Debug, Clone)]
pub struct Poster {
    pub image: RgbImage,
    pub page_count: usize,
    /// Layout before downscaling.
    pub geometry: PosterGeometry,
}

/// Render `pdf_path` and compose its pages into a poster, without writing
/// anything to disk.
pub fn render_poster(
    pdf_path: &Path,
    renderer: &dyn PageRenderer,
    config: &PosterConfig,
) -> Result<Poster, DocumentError> {
    info!("[render] {} @ {} DPI", display_name(pdf_path), config.dpi);
    let pages = renderer.render(pdf_path, config.scale())?;

    let empty = || DocumentError::EmptyInput {
        path: pdf_path.to_path_buf(),
    };
    let shape = grid::plan(pages.len(), config.columns).ok_or_else(empty)?;

    let layout = config.layout();
    let sizes: Vec<(u32, u32)> = pages.iter().map(|p| p.dimensions()).collect();
    let geometry = PosterGeometry::measure(&sizes, shape, &layout)
        .map_err(|e| compose_error(pdf_path, e))?;
    info!(
        "[compose] grid {}, cell={}x{}, total={}x{}",
        geometry.grid, geometry.cell_width, geometry.cell_height, geometry.width, geometry.height
    );

    let image = geometry.paint(&pages, layout.background);
    // Page buffers are no longer needed; release them before resampling.
    let page_count = pages.len();
    drop(pages);

    let image = resize::downscale(image, config.max_width);
    if image.width() != geometry.width {
        info!(
            "[resize] {}x{} -> {}x{}",
            geometry.width,
            geometry.height,
            image.width(),
            image.height()
        );
    }

    Ok(Poster {
        image,
        page_count,
        geometry,
    })
}

/// Convert one PDF and write one poster per configured format into
/// `output_dir`.
///
/// Never fails outright: the returned report carries the error, if any,
/// together with whatever outputs were written before it occurred.
pub fn convert_file(
    pdf_path: &Path,
    output_dir: &Path,
    renderer: &dyn PageRenderer,
    config: &PosterConfig,
) -> DocumentReport {
    let start = Instant::now();
    let mut report = DocumentReport {
        input: pdf_path.to_path_buf(),
        outputs: Vec::new(),
        page_count: 0,
        geometry: None,
        poster_size: None,
        duration_ms: 0,
        error: None,
    };

    match render_poster(pdf_path, renderer, config) {
        Ok(poster) => {
            report.page_count = poster.page_count;
            report.geometry = Some(poster.geometry);
            report.poster_size = Some(poster.image.dimensions());
            if let Err(e) = write_poster(&poster.image, pdf_path, output_dir, config, &mut report.outputs) {
                report.error = Some(e);
            }
        }
        Err(e) => report.error = Some(e),
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    report
}

/// Find every PDF under `input` and convert each one.
///
/// # Errors
/// Returns [`PosterError::NoInputFound`] if `input` holds no PDFs. Every
/// other failure is per-document and lands in the [`BatchReport`].
pub fn convert_batch(
    input: &Path,
    output_dir: &Path,
    renderer: &dyn PageRenderer,
    config: &PosterConfig,
) -> Result<BatchReport, PosterError> {
    let total_start = Instant::now();
    let pdfs = input::find_pdfs(input);
    if pdfs.is_empty() {
        return Err(PosterError::NoInputFound {
            path: input.to_path_buf(),
        });
    }

    let total = pdfs.len();
    let formats: Vec<String> = config.formats.iter().map(|f| f.to_string()).collect();
    info!(
        "Found {} PDF(s). Output -> {}. Formats: {}",
        total,
        output_dir.display(),
        formats.join(", ")
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut written: HashSet<PathBuf> = HashSet::new();
    let mut documents = Vec::with_capacity(total);

    for (i, pdf) in pdfs.iter().enumerate() {
        let index = i + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(index, total, pdf);
        }

        let report = convert_file(pdf, output_dir, renderer, config);

        for out in &report.outputs {
            if !written.insert(out.clone()) {
                warn!(
                    "{} overwrote the poster of an earlier document with the same name",
                    out.display()
                );
            }
        }

        match &report.error {
            None => {
                let names: Vec<String> = report.outputs.iter().map(|p| display_name(p)).collect();
                info!("OK: {} -> {}", display_name(pdf), names.join(", "));
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_complete(index, total, pdf, &report.outputs);
                }
            }
            Some(e) => {
                warn!("Skipped {} ({}): {}", pdf.display(), e.kind(), e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_error(index, total, pdf, &e.to_string());
                }
            }
        }
        documents.push(report);
    }

    let report = BatchReport {
        output_dir: output_dir.to_path_buf(),
        documents,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Batch complete: {}/{} documents, {}ms total",
        report.succeeded(),
        total,
        report.total_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, report.succeeded());
    }

    Ok(report)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Encode and write each configured format, recording paths as they land.
fn write_poster(
    image: &RgbImage,
    pdf_path: &Path,
    output_dir: &Path,
    config: &PosterConfig,
    outputs: &mut Vec<PathBuf>,
) -> Result<(), DocumentError> {
    for &format in &config.formats {
        let out_path = output_dir.join(output_file_name(pdf_path, &config.suffix, format));
        let bytes = encode::encode_poster(image, format, config.quality).map_err(|e| {
            DocumentError::EncodeFailure {
                path: pdf_path.to_path_buf(),
                format: format.to_string(),
                detail: e.to_string(),
            }
        })?;
        write_atomic(&out_path, &bytes)?;
        debug!("[save] {} ({}, {} bytes)", out_path.display(), format, bytes.len());
        outputs.push(out_path);
    }
    Ok(())
}

fn compose_error(pdf_path: &Path, err: ComposeError) -> DocumentError {
    let path = pdf_path.to_path_buf();
    match err {
        ComposeError::EmptyInput => DocumentError::EmptyInput { path },
        ComposeError::CanvasTooLarge { width, height } => {
            DocumentError::CanvasTooLarge { path, width, height }
        }
        err @ ComposeError::GridTooSmall { .. } => DocumentError::InvalidLayout {
            path,
            detail: err.to_string(),
        },
    }
}
