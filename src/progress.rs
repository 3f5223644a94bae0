//! Progress-callback trait for batch and per-slide events.
//!
//! Inject an [`Arc<dyn DeckProgressCallback>`] through
//! [`crate::config::BatchConfig::progress_callback`] (or pass a reference to
//! [`crate::assemble::assemble_with_progress`]) to observe a run as it moves
//! through each PDF and each slide. The library never prints; the callback
//! decides how events are shown.
//!
//! # Example
//!
//! ```rust
//! use pdf2deck::{BatchConfig, DeckProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct SlideCounter {
//!     slides: AtomicUsize,
//! }
//!
//! impl DeckProgressCallback for SlideCounter {
//!     fn on_slide_complete(&self, slide_num: usize, total_slides: usize) {
//!         self.slides.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("slide {slide_num}/{total_slides}");
//!     }
//! }
//!
//! let counter = Arc::new(SlideCounter { slides: AtomicUsize::new(0) });
//! let config = BatchConfig::default()
//!     .progress_callback(counter as Arc<dyn DeckProgressCallback>);
//! ```

use std::sync::Arc;

/// Stage of a single PDF's conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Rasterize,
    Assemble,
    Upload,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Rasterize => "rasterize",
            Stage::Assemble => "assemble",
            Stage::Upload => "upload",
        }
    }
}

/// Called by the batch driver and the deck assembler as work progresses.
///
/// Implementations must be `Send + Sync`: the assembler runs on tokio's
/// blocking pool, so slide events arrive from a different thread than batch
/// events. All methods default to no-ops.
pub trait DeckProgressCallback: Send + Sync {
    /// Called once with the number of PDFs found.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before a PDF is processed.
    ///
    /// # Arguments
    /// * `file_num` — 1-indexed position in the batch
    /// * `name`     — file name of the PDF
    fn on_file_start(&self, file_num: usize, total_files: usize, name: &str) {
        let _ = (file_num, total_files, name);
    }

    /// Called when a PDF enters a new stage.
    fn on_stage(&self, file_num: usize, stage: Stage) {
        let _ = (file_num, stage);
    }

    /// Called once a slide has been filled with its images.
    fn on_slide_complete(&self, slide_num: usize, total_slides: usize) {
        let _ = (slide_num, total_slides);
    }

    /// Called after a PDF's deck is written (and uploaded, if configured).
    ///
    /// # Arguments
    /// * `link` — web link of the uploaded deck, when an upload took place
    fn on_file_complete(&self, file_num: usize, total_files: usize, link: Option<&str>) {
        let _ = (file_num, total_files, link);
    }

    /// Called when a PDF fails; the batch stops right after.
    fn on_file_error(&self, file_num: usize, total_files: usize, error: &str) {
        let _ = (file_num, total_files, error);
    }

    /// Called once when the batch ends, successfully or not.
    fn on_batch_complete(&self, total_files: usize, completed: usize) {
        let _ = (total_files, completed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl DeckProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn DeckProgressCallback>;
