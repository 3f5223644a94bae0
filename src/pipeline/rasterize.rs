//! PDF rasterisation: render every page of a PDF to `page_N.png` via pdfium.
//!
//! ## Why a trait?
//!
//! pdfium is a native library that may be missing on build and CI machines.
//! The batch driver only needs "PDF in, numbered PNGs out", so it depends on
//! [`Rasterizer`] and tests substitute an implementation that writes
//! synthetic pages.
//!
//! ## Why blocking?
//!
//! pdfium keeps thread-local state and rendering is CPU-bound. The
//! implementation is plain synchronous code; the batch driver moves each call
//! onto tokio's blocking pool with `spawn_blocking`.

use crate::error::DeckError;
use crate::pipeline::input::check_pdf_magic;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Points per inch in PDF user space.
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Turns one PDF into one PNG per page.
pub trait Rasterizer: Send + Sync + 'static {
    /// Render every page of `pdf_path` at `dpi` into `output_folder`.
    ///
    /// Returns the written files in page order. File names follow the
    /// `page_<n>.png` convention (1-based) that the deck assembler parses.
    fn rasterize(
        &self,
        pdf_path: &Path,
        output_folder: &Path,
        dpi: u32,
    ) -> Result<Vec<PathBuf>, DeckError>;
}

/// File name of the 1-based `page` image.
pub fn page_file_name(page: usize) -> String {
    format!("page_{page}.png")
}

/// [`Rasterizer`] backed by the pdfium C library.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library_dir: Option<PathBuf>,
}

impl PdfiumRasterizer {
    /// Bind the system pdfium, unless `PDFIUM_LIB_PATH` says otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look for the pdfium shared library in `dir` before the system paths.
    pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: Some(dir.into()),
        }
    }

    /// Directory probed first: explicit setting, then `PDFIUM_LIB_PATH`.
    fn candidate_dir(&self) -> Option<PathBuf> {
        self.library_dir
            .clone()
            .or_else(|| std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from))
    }

    fn bind(&self) -> Result<Pdfium, DeckError> {
        if let Some(dir) = self.candidate_dir() {
            // PDFIUM_LIB_PATH may name the library file itself.
            let lib = if dir.is_file() {
                dir.clone()
            } else {
                Pdfium::pdfium_platform_library_name_at_path(&dir)
            };
            match Pdfium::bind_to_library(&lib) {
                Ok(bindings) => {
                    debug!("Bound pdfium from {}", lib.display());
                    return Ok(Pdfium::new(bindings));
                }
                Err(e) => debug!("pdfium not usable at {}: {:?}", lib.display(), e),
            }
        }

        Pdfium::bind_to_system_library()
            .map(Pdfium::new)
            .map_err(|e| DeckError::PdfiumBindingFailed(format!("{e:?}")))
    }
}

impl Rasterizer for PdfiumRasterizer {
    fn rasterize(
        &self,
        pdf_path: &Path,
        output_folder: &Path,
        dpi: u32,
    ) -> Result<Vec<PathBuf>, DeckError> {
        check_pdf_magic(pdf_path)?;
        std::fs::create_dir_all(output_folder).map_err(|e| DeckError::io(output_folder, e))?;

        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| DeckError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        info!("PDF loaded: {} pages", total_pages);

        let render_config =
            PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / PDF_POINTS_PER_INCH);

        let mut written = Vec::with_capacity(total_pages);
        for (idx, page) in pages.iter().enumerate() {
            let number = idx + 1;
            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                DeckError::RasterisationFailed {
                    page: number,
                    detail: format!("{e:?}"),
                }
            })?;

            let image = bitmap.as_image();
            let path = output_folder.join(page_file_name(number));
            image
                .save_with_format(&path, ::image::ImageFormat::Png)
                .map_err(|e| DeckError::RasterisationFailed {
                    page: number,
                    detail: format!("cannot write {}: {e}", path.display()),
                })?;

            debug!(
                "Rendered page {} → {}x{} px",
                number,
                image.width(),
                image.height()
            );
            written.push(path);
        }

        Ok(written)
    }
}
