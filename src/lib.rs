//! # pdf2deck
//!
//! Turn PDF documents into two-up PowerPoint decks and share them on Google
//! Drive.
//!
//! ## Why this crate?
//!
//! Printed handouts and scanned reports read badly on a projector, and a
//! slide per page wastes most of a 16:9 screen. This crate rasterises each
//! page, places pages side by side on wide slides, and keeps the file small
//! enough to share by compressing every image into a size tier chosen for
//! the whole deck.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Rasterize  every page → page_N.png via pdfium (spawn_blocking)
//!  ├─ 2. Order      parse the page number from each file name
//!  ├─ 3. Compress   downscale + JPEG into the deck's tier
//!  ├─ 4. Layout     two images per slide, meeting at the center line
//!  ├─ 5. Write      .pptx, atomically
//!  └─ 6. Upload     Drive upload + per-recipient sharing
//! ```
//!
//! ## Quick Start
//!
//! Assemble a folder of page images without touching pdfium or the network:
//!
//! ```rust,no_run
//! use pdf2deck::{assemble, DeckConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let deck = assemble(
//!         Path::new("outputs/images"),
//!         Path::new("outputs/report.pptx"),
//!         &DeckConfig::default(),
//!     )?;
//!     eprintln!("{} slides, {} tier", deck.slide_count(), deck.tier.label);
//!     Ok(())
//! }
//! ```
//!
//! Or run the whole batch:
//!
//! ```rust,no_run
//! use pdf2deck::{BatchConfig, BatchRunner, DriveUploader, PdfiumRasterizer, UploadConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let upload = UploadConfig {
//!         recipients: vec!["team@example.com".into()],
//!         ..UploadConfig::default()
//!     };
//!     let runner = BatchRunner::new(
//!         BatchConfig::default(),
//!         Arc::new(PdfiumRasterizer::new()),
//!         Some(DriveUploader::from_config(upload)?),
//!     );
//!     let report = runner.run().await?;
//!     eprintln!("{} decks", report.files.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2deck` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2deck = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod assemble;
pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod pptx;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use assemble::{assemble, assemble_with_progress};
pub use batch::BatchRunner;
pub use config::{
    BatchConfig, CompressionTier, DeckConfig, DeckConfigBuilder, ImagesPerSlide, RaggedLastSlide,
    ShareRole, UploadConfig,
};
pub use error::DeckError;
pub use output::{BatchReport, DeckSummary, FileReport, PlacedImage, SlideSummary, UploadReceipt};
pub use pipeline::rasterize::{PdfiumRasterizer, Rasterizer};
pub use pipeline::upload::{DriveUploader, ServiceAccountKey, Uploader};
pub use progress::{DeckProgressCallback, NoopProgressCallback, ProgressCallback, Stage};
