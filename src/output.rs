//! Result records returned by the assembler, the uploader and the batch driver.
//!
//! All records are `Serialize` so the CLI can print a run as JSON.

use crate::config::{CompressionTier, ImagesPerSlide};
use serde::Serialize;
use std::path::PathBuf;

/// One image as placed on a slide. Geometry is in EMU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedImage {
    /// Page ordinal parsed from the source file name.
    pub ordinal: u64,
    /// Source page image.
    pub source: PathBuf,
    /// Pixel size after compression.
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// One slide of an assembled deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideSummary {
    /// 1-indexed slide number.
    pub number: usize,
    pub images: Vec<PlacedImage>,
}

/// Handle to a deck that has been written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct DeckSummary {
    pub path: PathBuf,
    pub images_per_slide: ImagesPerSlide,
    pub tier: CompressionTier,
    pub slides: Vec<SlideSummary>,
    /// Size of the written file in bytes.
    pub file_size: u64,
}

impl DeckSummary {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn image_count(&self) -> usize {
        self.slides.iter().map(|s| s.images.len()).sum()
    }
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub file_id: String,
    /// Browser link to the uploaded deck, when the service returned one.
    pub web_view_link: Option<String>,
    /// Recipients that were granted access.
    pub shared_with: Vec<String>,
}

/// Per-PDF record of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Where the PDF ended up (inside the done folder).
    pub pdf: PathBuf,
    pub page_count: usize,
    pub deck: DeckSummary,
    pub upload: Option<UploadReceipt>,
    pub rasterize_duration_ms: u64,
    pub assemble_duration_ms: u64,
    pub upload_duration_ms: u64,
}

/// Summary of a whole batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub total_duration_ms: u64,
}
