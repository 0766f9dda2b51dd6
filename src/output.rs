//! Output naming, file writing and run reports.

use crate::config::OutputFormat;
use crate::error::DocumentError;
use crate::pipeline::compose::PosterGeometry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Output file name for one document and format: `<stem><suffix><ext>`.
pub fn output_file_name(input: &Path, suffix: &str, format: OutputFormat) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "poster".to_string());
    format!("{stem}{suffix}{}", format.extension())
}

/// File name of `path` for log lines, or the whole path if it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Write `bytes` to `path`, creating parent directories as needed.
///
/// Uses atomic write (temp file + rename) so an interrupted run never leaves
/// a truncated poster behind under the final name.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DocumentError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DocumentError::io(parent, &e))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, bytes).map_err(|e| DocumentError::io(path, &e))?;
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        DocumentError::io(path, &e)
    })
}

/// Outcome of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// The PDF that was processed.
    pub input: PathBuf,
    /// Files written, one per requested format. May be partial on error.
    pub outputs: Vec<PathBuf>,
    /// Pages rendered; 0 if rendering failed.
    pub page_count: usize,
    /// Poster layout before any downscale; `None` if composition never ran.
    pub geometry: Option<PosterGeometry>,
    /// Final poster size after any downscale.
    pub poster_size: Option<(u32, u32)>,
    /// Wall-clock time spent on this document.
    pub duration_ms: u64,
    /// Why the document was skipped, if it was.
    pub error: Option<DocumentError>,
}

impl DocumentReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub documents: Vec<DocumentReport>,
    pub total_duration_ms: u64,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.documents.iter().filter(|d| d.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.documents.len() - self.succeeded()
    }

    /// `true` when at least one document was skipped.
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Failed documents with their errors, in processing order.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &DocumentError)> {
        self.documents
            .iter()
            .filter_map(|d| d.error.as_ref().map(|e| (d.input.as_path(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_stem_suffix_and_extension() {
        let p = Path::new("/docs/report.final.pdf");
        assert_eq!(output_file_name(p, "_poster", OutputFormat::Png), "report.final_poster.png");
        assert_eq!(output_file_name(p, "", OutputFormat::Jpeg), "report.final.jpg");
    }

    #[test]
    fn formats_never_collide() {
        let p = Path::new("a.pdf");
        assert_ne!(
            output_file_name(p, "_x", OutputFormat::Png),
            output_file_name(p, "_x", OutputFormat::Jpeg)
        );
    }

    #[test]
    fn display_name_falls_back_to_full_path() {
        assert_eq!(display_name(Path::new("/a/b.pdf")), "b.pdf");
        assert_eq!(display_name(Path::new("/")), "/");
    }

    #[test]
    fn write_atomic_creates_directories_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out/a_poster.png");
        write_atomic(&target, b"data").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"data");
        let leftovers: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn write_atomic_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is needed.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let err = write_atomic(&blocker.join("a.png"), b"data").unwrap_err();
        assert_eq!(err.kind(), "IOFailure");
    }

    #[test]
    fn batch_report_counts() {
        let ok = DocumentReport {
            input: PathBuf::from("a.pdf"),
            outputs: vec![PathBuf::from("a_poster.png")],
            page_count: 2,
            geometry: None,
            poster_size: Some((10, 10)),
            duration_ms: 1,
            error: None,
        };
        let bad = DocumentReport {
            input: PathBuf::from("b.pdf"),
            outputs: vec![],
            page_count: 0,
            geometry: None,
            poster_size: None,
            duration_ms: 1,
            error: Some(DocumentError::EmptyInput {
                path: PathBuf::from("b.pdf"),
            }),
        };
        let report = BatchReport {
            output_dir: PathBuf::from("out"),
            documents: vec![ok, bad],
            total_duration_ms: 2,
        };
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(report.has_failures());
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, Path::new("b.pdf"));
    }
}
