//! Input discovery: turn a file-or-directory argument into an ordered list
//! of PDF paths.
//!
//! Directories are walked recursively. Any file whose extension is `pdf` in
//! any letter case counts. The result is sorted so repeated runs process
//! documents in the same order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Check whether `path` has a `.pdf` extension, ignoring case.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Collect the PDFs to process.
///
/// * A `.pdf` file yields just that file.
/// * A directory yields every PDF beneath it, sorted lexicographically.
/// * Anything else yields nothing.
pub fn find_pdfs(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return if is_pdf(input) {
            vec![input.to_path_buf()]
        } else {
            Vec::new()
        };
    }
    if !input.is_dir() {
        return Vec::new();
    }

    let mut found = Vec::new();
    walk(input, &mut found);
    found.sort();
    debug!("Discovered {} PDF(s) under {}", found.len(), input.display());
    found
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Skipping unreadable directory {}: {}", dir.display(), e);
            return;
        }
    };
    for entry in entries {
        let path = match entry.and_then(|e| e.file_type().map(|t| (e.path(), t))) {
            Ok((path, file_type)) if file_type.is_dir() => {
                walk(&path, found);
                continue;
            }
            Ok((path, _)) => path,
            Err(e) => {
                warn!("Skipping entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        if is_pdf(&path) && is_file_or_link_to_file(&path) {
            found.push(path);
        }
    }
}

fn is_file_or_link_to_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or_else(|e: io::Error| {
        warn!("Skipping {}: {}", path.display(), e);
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"%PDF-1.4\n").unwrap();
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("a.pdf")));
        assert!(is_pdf(Path::new("dir/B.PDF")));
        assert!(is_pdf(Path::new("c.Pdf")));
        assert!(!is_pdf(Path::new("d.pdf.txt")));
        assert!(!is_pdf(Path::new("pdf")));
        assert!(!is_pdf(Path::new("")));
    }

    #[test]
    fn single_file_input() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("one.pdf");
        let txt = dir.path().join("notes.txt");
        touch(&pdf);
        touch(&txt);
        assert_eq!(find_pdfs(&pdf), vec![pdf]);
        assert!(find_pdfs(&txt).is_empty());
    }

    #[test]
    fn directory_is_walked_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("b.pdf"));
        touch(&root.join("a.PDF"));
        touch(&root.join("sub/deeper/c.pdf"));
        touch(&root.join("sub/skip.png"));
        fs::create_dir_all(root.join("folder.pdf")).unwrap();

        let found = find_pdfs(root);
        let rel: Vec<PathBuf> = found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("a.PDF"),
                PathBuf::from("b.pdf"),
                PathBuf::from("sub/deeper/c.pdf"),
            ]
        );
    }

    #[test]
    fn missing_path_yields_nothing() {
        assert!(find_pdfs(Path::new("/definitely/not/a/real/dir")).is_empty());
    }
}
