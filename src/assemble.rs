//! Deck assembly: a folder of page images in, one `.pptx` out.
//!
//! Images are grouped in page order into runs of `images_per_slide`; each
//! image is compressed into the deck's tier, placed with
//! [`SlideGeometry::place`], embedded, and its compressed copy deleted before
//! the next image is touched. The deck is written once, at the end, through
//! a temporary file so a failed run never leaves a half-written deck behind.

use crate::config::{CompressionTier, DeckConfig, SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU};
use crate::error::DeckError;
use crate::output::{DeckSummary, PlacedImage, SlideSummary};
use crate::pipeline::compress::compress_image;
use crate::pipeline::input::{collect_page_images, PageImage};
use crate::pipeline::layout::SlideGeometry;
use crate::pptx::{ImageFormat, Picture, Presentation};
use crate::progress::{DeckProgressCallback, NoopProgressCallback};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Build a deck from every `*_<n>.png` in `image_folder` and write it to
/// `output`.
///
/// # Errors
/// - [`DeckError::EmptyInput`] when the folder holds no page images
/// - [`DeckError::InvalidFilename`] for a `.png` without a unique ordinal
/// - [`DeckError::Decode`] when an image cannot be read
/// - [`DeckError::OutputWriteFailed`] when the deck cannot be persisted
pub fn assemble(
    image_folder: &Path,
    output: &Path,
    config: &DeckConfig,
) -> Result<DeckSummary, DeckError> {
    assemble_with_progress(image_folder, output, config, &NoopProgressCallback)
}

/// [`assemble`], reporting each finished slide to `progress`.
pub fn assemble_with_progress(
    image_folder: &Path,
    output: &Path,
    config: &DeckConfig,
    progress: &dyn DeckProgressCallback,
) -> Result<DeckSummary, DeckError> {
    let start = Instant::now();

    let images = collect_page_images(image_folder)?;
    if images.is_empty() {
        return Err(DeckError::EmptyInput {
            folder: image_folder.to_path_buf(),
        });
    }

    let per_slide = config.images_per_slide;
    let total_slides = per_slide.slides_for(images.len());
    // Decided once for the whole deck, before the first slide.
    let tier = config.tier_for(total_slides);
    info!(
        "Assembling {} images into {} slides ({} per slide, {} tier q{})",
        images.len(),
        total_slides,
        per_slide,
        tier.label,
        tier.quality
    );

    let geometry = SlideGeometry::new(per_slide, config.ragged_last_slide);
    let mut presentation = Presentation::new(SLIDE_WIDTH_EMU, SLIDE_HEIGHT_EMU);
    presentation.title = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut slides = Vec::with_capacity(total_slides);
    for (index, group) in images.chunks(per_slide.get() as usize).enumerate() {
        let number = index + 1;
        let slide = presentation.add_slide();
        let mut placed = Vec::with_capacity(group.len());

        for (slot, page) in group.iter().enumerate() {
            let (picture, record) = place_page(page, &tier, &geometry, slot, group.len())?;
            slide.add_picture(picture);
            placed.push(record);
        }

        debug!("Slide {}/{} holds {} images", number, total_slides, placed.len());
        slides.push(SlideSummary {
            number,
            images: placed,
        });
        progress.on_slide_complete(number, total_slides);
    }

    let file_size = presentation.save(output)?;
    info!(
        "Saved {} ({} slides, {} bytes) in {}ms",
        output.display(),
        total_slides,
        file_size,
        start.elapsed().as_millis()
    );

    Ok(DeckSummary {
        path: output.to_path_buf(),
        images_per_slide: per_slide,
        tier,
        slides,
        file_size,
    })
}

/// Compress one page, position it, and read it into memory.
///
/// The compressed copy is deleted before returning, on success and failure.
fn place_page(
    page: &PageImage,
    tier: &CompressionTier,
    geometry: &SlideGeometry,
    slot: usize,
    group_len: usize,
) -> Result<(Picture, PlacedImage), DeckError> {
    let compressed = compress_image(&page.path, tier)?;
    let (pixel_width, pixel_height) = compressed.dimensions();
    let (source_width, source_height) = compressed.original_dimensions();
    debug!(
        "{}: {}x{} → {}x{} px",
        page.file_name(),
        source_width,
        source_height,
        pixel_width,
        pixel_height
    );
    let format = ImageFormat::from_path(compressed.path()).ok_or_else(|| {
        DeckError::Internal(format!(
            "unsupported media type for {}",
            compressed.path().display()
        ))
    })?;
    let at = geometry.place(pixel_width, pixel_height, slot, group_len);
    let data = compressed.read_bytes()?;
    compressed.remove()?;

    let picture = Picture {
        data,
        format,
        x: at.x,
        y: at.y,
        cx: at.cx,
        cy: at.cy,
        description: page.file_name(),
    };
    let record = PlacedImage {
        ordinal: page.ordinal,
        source: page.path.clone(),
        pixel_width,
        pixel_height,
        x: at.x,
        y: at.y,
        cx: at.cx,
        cy: at.cy,
    };
    Ok((picture, record))
}
