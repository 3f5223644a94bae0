//! Image compression: shrink a page image into a tier's envelope and
//! re-encode it as JPEG.
//!
//! Rasterised pages at 300 DPI are far larger than a half-slide needs, and
//! a deck embedding them verbatim quickly reaches hundreds of megabytes. Each
//! page is therefore downscaled (never upscaled) to fit the tier envelope and
//! written next to its source as `<stem>_compressed.jpg`.
//!
//! The derived file is owned by a [`CompressedImage`] guard. Dropping the
//! guard deletes the file, so it disappears on every exit path of the
//! insertion step, including early returns through `?`.

use crate::config::CompressionTier;
use crate::error::DeckError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A compressed copy of a page image, removed from disk on drop.
#[derive(Debug)]
pub struct CompressedImage {
    path: PathBuf,
    width: u32,
    height: u32,
    original_width: u32,
    original_height: u32,
    removed: bool,
}

impl CompressedImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pixel size of the compressed image.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel size of the source image.
    pub fn original_dimensions(&self) -> (u32, u32) {
        (self.original_width, self.original_height)
    }

    /// Read the encoded bytes.
    pub fn read_bytes(&self) -> Result<Vec<u8>, DeckError> {
        std::fs::read(&self.path).map_err(|e| DeckError::io(&self.path, e))
    }

    /// Delete the file now, reporting any I/O error.
    pub fn remove(mut self) -> Result<(), DeckError> {
        self.removed = true;
        std::fs::remove_file(&self.path).map_err(|e| DeckError::io(&self.path, e))
    }
}

impl Drop for CompressedImage {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not remove {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Path of the compressed copy of `source`: same folder, `_compressed.jpg`.
pub fn compressed_path_for(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!("{stem}_compressed.jpg"))
}

/// Size of an image of `width`×`height` after fitting it into the envelope.
///
/// Aspect ratio is preserved and the result never exceeds the input.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let ratio = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let w = ((width as f64 * ratio).round() as u32).clamp(1, max_width);
    let h = ((height as f64 * ratio).round() as u32).clamp(1, max_height);
    (w, h)
}

/// Compress `source` according to `tier`.
///
/// # Errors
/// * [`DeckError::Decode`] if `source` is not a readable image.
/// * [`DeckError::Encode`] / [`DeckError::Io`] if the copy cannot be written;
///   the partial file is removed.
pub fn compress_image(source: &Path, tier: &CompressionTier) -> Result<CompressedImage, DeckError> {
    let img = image::open(source).map_err(|e| DeckError::Decode {
        path: source.to_path_buf(),
        source: e,
    })?;
    let (original_width, original_height) = img.dimensions();

    let (width, height) = fit_within(
        original_width,
        original_height,
        tier.max_width,
        tier.max_height,
    );
    let img = if (width, height) == (original_width, original_height) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    let path = compressed_path_for(source);
    let file = File::create(&path).map_err(|e| DeckError::io(&path, e))?;

    // The guard exists before any byte is written so a failed encode cleans up.
    let guard = CompressedImage {
        path,
        width,
        height,
        original_width,
        original_height,
        removed: false,
    };

    let mut writer = BufWriter::new(file);
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, tier.quality))
        .map_err(|e| DeckError::Encode {
            path: guard.path.clone(),
            source: e,
        })?;
    writer.flush().map_err(|e| DeckError::io(&guard.path, e))?;

    debug!(
        "Compressed {} {}x{} → {}x{} q{}",
        source.display(),
        original_width,
        original_height,
        width,
        height,
        tier.quality
    );

    Ok(guard)
}
