//! Input discovery: page images for the assembler, PDFs for the batch driver.
//!
//! Page images carry their order in the file name (`page_3.png`). Directory
//! listings come back in arbitrary order and a lexicographic sort would put
//! `page_10` before `page_2`, so the ordinal is parsed and sorted numerically.

use crate::error::DeckError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Last underscore-delimited token before the `.png` extension.
static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*_(?P<ordinal>[^_]*)\.png$").expect("ordinal pattern is valid")
});

/// A rasterised page waiting to be placed on a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub ordinal: u64,
    pub path: PathBuf,
}

impl PageImage {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Parse the page ordinal out of a file name such as `page_12.png`.
pub fn parse_ordinal(name: &str) -> Result<u64, DeckError> {
    let invalid = |reason: &str| DeckError::InvalidFilename {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let caps = ORDINAL_RE
        .captures(name)
        .ok_or_else(|| invalid("no underscore-delimited page number before '.png'"))?;
    let token = &caps["ordinal"];
    if token.is_empty() {
        return Err(invalid("page number is empty"));
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(&format!("page number '{token}' is not numeric")));
    }
    token
        .parse::<u64>()
        .map_err(|e| invalid(&format!("page number '{token}' is out of range: {e}")))
}

/// List every `.png` page image in `folder`, sorted by ordinal.
///
/// Files with other extensions are ignored. A `.png` whose name carries no
/// ordinal, or repeats an ordinal already seen, is an error.
pub fn collect_page_images(folder: &Path) -> Result<Vec<PageImage>, DeckError> {
    let entries = std::fs::read_dir(folder).map_err(|e| DeckError::io(folder, e))?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DeckError::io(folder, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(".png") {
            continue;
        }
        let ordinal = parse_ordinal(&name)?;
        images.push(PageImage { ordinal, path });
    }

    images.sort_by(|a, b| a.ordinal.cmp(&b.ordinal).then_with(|| a.path.cmp(&b.path)));

    let mut seen = HashSet::with_capacity(images.len());
    for img in &images {
        if !seen.insert(img.ordinal) {
            return Err(DeckError::InvalidFilename {
                name: img.file_name(),
                reason: format!("page number {} appears more than once", img.ordinal),
            });
        }
    }

    debug!("Found {} page images in {}", images.len(), folder.display());
    Ok(images)
}

/// List the PDFs waiting in `folder`, sorted by file name.
///
/// Only the `.pdf` extension is checked here; content is validated by
/// [`check_pdf_magic`] before rasterisation.
pub fn collect_pdfs(folder: &Path) -> Result<Vec<PathBuf>, DeckError> {
    let entries = std::fs::read_dir(folder).map_err(|e| DeckError::io(folder, e))?;

    let mut pdfs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DeckError::io(folder, e))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "pdf") {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

/// Verify the `%PDF` magic bytes so pdfium gets a meaningful error path.
pub fn check_pdf_magic(path: &Path) -> Result<(), DeckError> {
    use std::io::Read;

    let mut f = std::fs::File::open(path).map_err(|e| DeckError::io(path, e))?;
    let mut magic = [0u8; 4];
    if f.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
        return Err(DeckError::CorruptPdf {
            path: path.to_path_buf(),
            detail: format!("not a PDF (first bytes: {magic:?})"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn parses_simple_ordinal() {
        assert_eq!(parse_ordinal("page_3.png").unwrap(), 3);
        assert_eq!(parse_ordinal("page_0.png").unwrap(), 0);
        assert_eq!(parse_ordinal("my_scan_12.png").unwrap(), 12);
    }

    #[test]
    fn rejects_missing_or_non_numeric_ordinal() {
        for name in ["cover.png", "page_.png", "page_x.png", "page_3b.png", "page_-1.png"] {
            let err = parse_ordinal(name).unwrap_err();
            assert!(
                matches!(err, DeckError::InvalidFilename { .. }),
                "{name}: got {err}"
            );
        }
    }

    #[test]
    fn sorts_numerically_not_lexicographically() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "page_2.png");
        touch(dir.path(), "page_10.png");
        touch(dir.path(), "page_1.png");

        let images = collect_page_images(dir.path()).unwrap();
        let names: Vec<String> = images.iter().map(|i| i.file_name()).collect();
        assert_eq!(names, vec!["page_1.png", "page_2.png", "page_10.png"]);
    }

    #[test]
    fn ignores_other_extensions() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "page_1.png");
        touch(dir.path(), "page_1_compressed.jpg");
        touch(dir.path(), "notes.txt");

        let images = collect_page_images(dir.path()).unwrap();
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn rejects_duplicate_ordinals() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a_1.png");
        touch(dir.path(), "b_1.png");

        let err = collect_page_images(dir.path()).unwrap_err();
        assert!(matches!(err, DeckError::InvalidFilename { .. }), "got {err}");
    }

    #[test]
    fn unparseable_png_fails_whole_listing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "page_1.png");
        touch(dir.path(), "cover.png");
        assert!(collect_page_images(dir.path()).is_err());
    }

    #[test]
    fn collects_pdfs_sorted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.pdf");
        touch(dir.path(), "a.pdf");
        touch(dir.path(), "readme.md");

        let pdfs = collect_pdfs(dir.path()).unwrap();
        let names: Vec<_> = pdfs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn pdf_magic_check() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.pdf");
        let bad = dir.path().join("bad.pdf");
        std::fs::write(&good, b"%PDF-1.7\n").unwrap();
        std::fs::write(&bad, b"<html>").unwrap();

        assert!(check_pdf_magic(&good).is_ok());
        assert!(matches!(
            check_pdf_magic(&bad),
            Err(DeckError::CorruptPdf { .. })
        ));
    }
}
