//! Batch driver: every PDF in the input folder becomes an uploaded deck.
//!
//! For each PDF, in file-name order:
//!
//! ```text
//! clear images_dir ─▶ rasterize ─▶ assemble ─▶ upload + share ─▶ move to done_dir
//!                     (blocking)   (blocking)   (async, optional)
//! ```
//!
//! PDFs are processed one at a time and the run stops at the first failure.
//! A PDF is only moved to the done folder after all of its steps succeeded,
//! so re-running the batch picks up exactly the files that did not finish.

use crate::assemble::{assemble, assemble_with_progress};
use crate::config::BatchConfig;
use crate::error::DeckError;
use crate::output::{BatchReport, FileReport};
use crate::pipeline::input::collect_pdfs;
use crate::pipeline::rasterize::Rasterizer;
use crate::pipeline::upload::Uploader;
use crate::progress::{DeckProgressCallback, NoopProgressCallback, Stage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Runs the whole pipeline over a folder of PDFs.
///
/// Generic over the rasterizer and uploader so either external system can be
/// swapped out; pass `None` as the uploader to only produce decks locally.
pub struct BatchRunner<R: Rasterizer, U: Uploader> {
    config: BatchConfig,
    rasterizer: Arc<R>,
    uploader: Option<U>,
}

impl<R: Rasterizer, U: Uploader> BatchRunner<R, U> {
    pub fn new(config: BatchConfig, rasterizer: Arc<R>, uploader: Option<U>) -> Self {
        Self {
            config,
            rasterizer,
            uploader,
        }
    }

    /// Process every PDF in `input_dir`.
    ///
    /// # Errors
    /// The first error of any step; PDFs after the failing one are untouched.
    pub async fn run(&self) -> Result<BatchReport, DeckError> {
        let start = Instant::now();
        self.config.validate()?;

        for dir in [&self.config.output_dir, &self.config.done_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| DeckError::io(dir, e))?;
        }

        let pdfs = collect_pdfs(&self.config.input_dir)?;
        let total = pdfs.len();
        let progress = self.progress();
        progress.on_batch_start(total);

        if pdfs.is_empty() {
            info!("No PDFs in {}", self.config.input_dir.display());
            progress.on_batch_complete(0, 0);
            return Ok(BatchReport::default());
        }
        info!("Found {} PDFs in {}", total, self.config.input_dir.display());

        let mut files = Vec::with_capacity(total);
        for (index, pdf) in pdfs.iter().enumerate() {
            let file_num = index + 1;
            match self.process_one(pdf, file_num, total).await {
                Ok(report) => {
                    progress.on_file_complete(
                        file_num,
                        total,
                        report.upload.as_ref().and_then(|u| u.web_view_link.as_deref()),
                    );
                    files.push(report);
                }
                Err(e) => {
                    error!("{} failed: {}", pdf.display(), e);
                    progress.on_file_error(file_num, total, &e.to_string());
                    progress.on_batch_complete(total, files.len());
                    return Err(e);
                }
            }
        }

        progress.on_batch_complete(total, files.len());
        let total_duration_ms = start.elapsed().as_millis() as u64;
        info!("Batch finished: {} decks in {}ms", files.len(), total_duration_ms);

        Ok(BatchReport {
            files,
            total_duration_ms,
        })
    }

    async fn process_one(
        &self,
        pdf: &Path,
        file_num: usize,
        total: usize,
    ) -> Result<FileReport, DeckError> {
        let progress = self.progress();
        let name = pdf
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = pdf
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "deck".to_string());
        progress.on_file_start(file_num, total, &name);
        info!("[{}/{}] {}", file_num, total, name);

        // ── Step 1: Rasterise ────────────────────────────────────────────
        progress.on_stage(file_num, Stage::Rasterize);
        let images_dir = self.config.images_dir.clone();
        clear_page_images(&images_dir).await?;

        let raster_start = Instant::now();
        let rasterizer = Arc::clone(&self.rasterizer);
        let pdf_path = pdf.to_path_buf();
        let dpi = self.config.dpi;
        let folder = images_dir.clone();
        let pages = tokio::task::spawn_blocking(move || rasterizer.rasterize(&pdf_path, &folder, dpi))
            .await
            .map_err(|e| DeckError::Internal(format!("Rasterize task panicked: {e}")))??;
        let rasterize_duration_ms = raster_start.elapsed().as_millis() as u64;
        info!("Rasterised {} pages in {}ms", pages.len(), rasterize_duration_ms);

        // ── Step 2: Assemble ─────────────────────────────────────────────
        progress.on_stage(file_num, Stage::Assemble);
        let output = self.config.output_dir.join(format!("{stem}.pptx"));
        let assemble_start = Instant::now();
        let deck_config = self.config.deck.clone();
        let callback = self.config.progress_callback.clone();
        let deck_path = output.clone();
        let deck = tokio::task::spawn_blocking(move || match callback {
            Some(cb) => assemble_with_progress(&images_dir, &deck_path, &deck_config, cb.as_ref()),
            None => assemble(&images_dir, &deck_path, &deck_config),
        })
        .await
        .map_err(|e| DeckError::Internal(format!("Assemble task panicked: {e}")))??;
        let assemble_duration_ms = assemble_start.elapsed().as_millis() as u64;

        // ── Step 3: Upload ───────────────────────────────────────────────
        let upload_start = Instant::now();
        let upload = match &self.uploader {
            Some(uploader) => {
                progress.on_stage(file_num, Stage::Upload);
                Some(uploader.upload(&deck.path).await?)
            }
            None => {
                debug!("Upload disabled; keeping {} local", deck.path.display());
                None
            }
        };
        let upload_duration_ms = upload_start.elapsed().as_millis() as u64;

        // ── Step 4: Archive the PDF ──────────────────────────────────────
        let done = move_into(pdf, &self.config.done_dir).await?;
        info!("Moved {} to {}", name, done.display());

        Ok(FileReport {
            pdf: done,
            page_count: pages.len(),
            deck,
            upload,
            rasterize_duration_ms,
            assemble_duration_ms,
            upload_duration_ms,
        })
    }

    fn progress(&self) -> Arc<dyn DeckProgressCallback> {
        self.config
            .progress_callback
            .clone()
            .unwrap_or_else(|| Arc::new(NoopProgressCallback))
    }
}

/// Remove leftover page images (`*.png`, `*_compressed.jpg`) from `dir`,
/// creating it if needed. Anything else in the folder is left alone.
async fn clear_page_images(dir: &Path) -> Result<(), DeckError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| DeckError::io(dir, e))?;

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| DeckError::io(dir, e))?;
    let mut removed = 0usize;
    while let Some(entry) = entries.next_entry().await.map_err(|e| DeckError::io(dir, e))? {
        let path = entry.path();
        let is_file = entry
            .file_type()
            .await
            .map_err(|e| DeckError::io(&path, e))?
            .is_file();
        if is_file && is_page_image(&path) {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| DeckError::io(&path, e))?;
            removed += 1;
        }
    }
    debug!("Cleared {} page images from {}", removed, dir.display());
    Ok(())
}

fn is_page_image(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    name.ends_with(".png") || name.ends_with("_compressed.jpg")
}

/// Move `file` into `folder`, keeping its name.
///
/// A plain rename fails across filesystems; fall back to copy + remove.
async fn move_into(file: &Path, folder: &Path) -> Result<PathBuf, DeckError> {
    let name = file
        .file_name()
        .ok_or_else(|| DeckError::Internal(format!("{} has no file name", file.display())))?;
    let target = folder.join(name);

    if tokio::fs::rename(file, &target).await.is_ok() {
        return Ok(target);
    }

    warn!(
        "Rename of {} failed, copying to {} instead",
        file.display(),
        target.display()
    );
    tokio::fs::copy(file, &target)
        .await
        .map_err(|e| DeckError::io(&target, e))?;
    tokio::fs::remove_file(file)
        .await
        .map_err(|e| DeckError::io(file, e))?;
    Ok(target)
}
