//! Error types for the pdf2deck library.
//!
//! A single fatal error type, [`DeckError`], covers every stage. The batch
//! has no per-file isolation: the first failure aborts the deck being built
//! and the whole run, so there is no non-fatal counterpart.
//!
//! Variants are grouped by the stage that raises them. Messages carry the
//! offending path and, where it helps, a hint on how to fix the input.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2deck library.
#[derive(Debug, Error)]
pub enum DeckError {
    // ── Assembly errors ───────────────────────────────────────────────────
    /// A source image could not be opened or decoded.
    #[error("Cannot decode image '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A compressed image could not be encoded.
    #[error("Cannot encode compressed image '{path}': {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A `.png` file name does not carry a usable page ordinal.
    #[error("Invalid page image name '{name}': {reason}\nExpected names like 'page_3.png'.")]
    InvalidFilename { name: String, reason: String },

    /// A configuration value is out of its permitted range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The image folder holds no page images.
    #[error("No page images (*_<N>.png) found in '{folder}'")]
    EmptyInput { folder: PathBuf },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Generic file-system failure on a named path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write the finished presentation file.
    #[error("Failed to write deck '{path}': {detail}")]
    OutputWriteFailed { path: PathBuf, detail: String },

    // ── Rasterizer errors ─────────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install pdfium for your platform, then either:\n\
  • place it on the system library path, or\n\
  • set PDFIUM_LIB_PATH=/directory/containing/libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    /// The PDF cannot be opened by pdfium.
    #[error("PDF '{path}' is corrupt or unreadable: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── Uploader errors ───────────────────────────────────────────────────
    /// The service-account key is missing, malformed or rejected.
    #[error("Service-account credentials error: {0}")]
    Credentials(String),

    /// The deck could not be uploaded.
    #[error("Upload of '{path}' failed: {reason}")]
    UploadFailed { path: PathBuf, reason: String },

    /// The uploaded deck could not be shared with a recipient.
    #[error("Sharing file {file_id} with '{recipient}' failed: {reason}")]
    ShareFailed {
        file_id: String,
        recipient: String,
        reason: String,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeckError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeckError::Io {
            path: path.into(),
            source,
        }
    }
}
