//! Configuration types for PDF-to-deck conversion.
//!
//! Deck layout is controlled through [`DeckConfig`], built via its
//! [`DeckConfigBuilder`]. The batch driver adds folder locations and the
//! rasterisation DPI in [`BatchConfig`], and the Drive uploader takes its
//! credential source and recipient list from [`UploadConfig`].
//!
//! Nothing here is global: recipients and the key file are plain values
//! handed to the uploader when it is constructed.

use crate::error::DeckError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Deck width: 10 in.
pub const SLIDE_WIDTH_EMU: i64 = 10 * EMU_PER_INCH;

/// Deck height: 4.41 in (2.27:1, the wide presentation template).
pub const SLIDE_HEIGHT_EMU: i64 = 4_032_504;

/// Default slide-count threshold above which the large-deck tier applies.
pub const DEFAULT_LARGE_DECK_THRESHOLD: usize = 50;

/// Layout and compression settings for one deck.
///
/// # Example
/// ```rust
/// use pdf2deck::{DeckConfig, ImagesPerSlide, RaggedLastSlide};
///
/// let config = DeckConfig::builder()
///     .images_per_slide(2)
///     .ragged_last_slide(RaggedLastSlide::Leading)
///     .build()
///     .unwrap();
/// assert_eq!(config.images_per_slide, ImagesPerSlide::Two);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Page images per slide. Default: two, side by side.
    pub images_per_slide: ImagesPerSlide,

    /// Placement of the lone image on a short final slide. Default: centered.
    pub ragged_last_slide: RaggedLastSlide,

    /// Decks with more slides than this use [`CompressionTier::LARGE_DECK`].
    /// Default: 50 (so 50 slides is still standard, 51 is large).
    pub large_deck_threshold: usize,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            images_per_slide: ImagesPerSlide::Two,
            ragged_last_slide: RaggedLastSlide::default(),
            large_deck_threshold: DEFAULT_LARGE_DECK_THRESHOLD,
        }
    }
}

impl DeckConfig {
    /// Create a new builder for `DeckConfig`.
    pub fn builder() -> DeckConfigBuilder {
        DeckConfigBuilder {
            images_per_slide: ImagesPerSlide::Two.get(),
            ragged_last_slide: RaggedLastSlide::default(),
            large_deck_threshold: DEFAULT_LARGE_DECK_THRESHOLD,
        }
    }

    /// Pick the compression tier for a deck of `total_slides` slides.
    pub fn tier_for(&self, total_slides: usize) -> CompressionTier {
        if total_slides > self.large_deck_threshold {
            CompressionTier::LARGE_DECK
        } else {
            CompressionTier::STANDARD
        }
    }
}

/// Builder for [`DeckConfig`].
///
/// `images_per_slide` is kept as a raw integer until [`build`](Self::build)
/// so that a bad value surfaces as [`DeckError::InvalidParameter`].
#[derive(Debug)]
pub struct DeckConfigBuilder {
    images_per_slide: u8,
    ragged_last_slide: RaggedLastSlide,
    large_deck_threshold: usize,
}

impl DeckConfigBuilder {
    pub fn images_per_slide(mut self, n: u8) -> Self {
        self.images_per_slide = n;
        self
    }

    pub fn ragged_last_slide(mut self, policy: RaggedLastSlide) -> Self {
        self.ragged_last_slide = policy;
        self
    }

    pub fn large_deck_threshold(mut self, slides: usize) -> Self {
        self.large_deck_threshold = slides;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<DeckConfig, DeckError> {
        Ok(DeckConfig {
            images_per_slide: ImagesPerSlide::try_from(self.images_per_slide)?,
            ragged_last_slide: self.ragged_last_slide,
            large_deck_threshold: self.large_deck_threshold,
        })
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How many page images share one slide. Only one or two are permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ImagesPerSlide {
    One,
    Two,
}

impl ImagesPerSlide {
    pub fn get(self) -> u8 {
        match self {
            ImagesPerSlide::One => 1,
            ImagesPerSlide::Two => 2,
        }
    }

    /// Number of slides needed for `image_count` images (ceiling division).
    pub fn slides_for(self, image_count: usize) -> usize {
        image_count.div_ceil(self.get() as usize)
    }
}

impl TryFrom<u8> for ImagesPerSlide {
    type Error = DeckError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(ImagesPerSlide::One),
            2 => Ok(ImagesPerSlide::Two),
            other => Err(DeckError::InvalidParameter(format!(
                "images_per_slide must be 1 or 2, got {other}"
            ))),
        }
    }
}

impl From<ImagesPerSlide> for u8 {
    fn from(v: ImagesPerSlide) -> Self {
        v.get()
    }
}

impl fmt::Display for ImagesPerSlide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Placement of the single image left over when an odd number of pages is
/// laid out two per slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaggedLastSlide {
    /// Keep the half-width scale and center the image on the slide. (default)
    #[default]
    Centered,
    /// Place it in the first (left) position, right edge on the center line.
    Leading,
}

/// Quality and pixel envelope applied to every image of one deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressionTier {
    /// Short name used in logs and reports.
    pub label: &'static str,
    /// JPEG quality, 1–100.
    pub quality: u8,
    /// Maximum width in pixels after compression.
    pub max_width: u32,
    /// Maximum height in pixels after compression.
    pub max_height: u32,
}

impl CompressionTier {
    /// Tier A: decks of up to the threshold.
    pub const STANDARD: CompressionTier = CompressionTier {
        label: "standard",
        quality: 85,
        max_width: 1600,
        max_height: 900,
    };

    /// Tier B: decks above the threshold.
    pub const LARGE_DECK: CompressionTier = CompressionTier {
        label: "large-deck",
        quality: 70,
        max_width: 1200,
        max_height: 675,
    };
}

// ── Batch ────────────────────────────────────────────────────────────────

/// Folder layout and rasterisation settings for a batch run.
///
/// The defaults reproduce the working-directory layout the tool has always
/// used: PDFs in `inputs/pdf`, page images in `outputs/images`, decks in
/// `outputs`, finished PDFs moved to `inputs/done`.
#[derive(Clone)]
pub struct BatchConfig {
    /// Folder scanned for `*.pdf` files.
    pub input_dir: PathBuf,

    /// Scratch folder for rasterised pages. Its `*.png` and `*_compressed.jpg`
    /// files are removed before every PDF.
    pub images_dir: PathBuf,

    /// Folder receiving `<pdf stem>.pptx`.
    pub output_dir: PathBuf,

    /// Folder that processed PDFs are moved into.
    pub done_dir: PathBuf,

    /// Rasterisation DPI. Range: 72–600. Default: 300.
    pub dpi: u32,

    /// Layout settings shared by every deck of the batch.
    pub deck: DeckConfig,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("inputs/pdf"),
            images_dir: PathBuf::from("outputs/images"),
            output_dir: PathBuf::from("outputs"),
            done_dir: PathBuf::from("inputs/done"),
            dpi: 300,
            deck: DeckConfig::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("input_dir", &self.input_dir)
            .field("images_dir", &self.images_dir)
            .field("output_dir", &self.output_dir)
            .field("done_dir", &self.done_dir)
            .field("dpi", &self.dpi)
            .field("deck", &self.deck)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.progress_callback = Some(cb);
        self
    }

    /// Check value ranges before any file is touched.
    pub fn validate(&self) -> Result<(), DeckError> {
        if !(72..=600).contains(&self.dpi) {
            return Err(DeckError::InvalidParameter(format!(
                "DPI must be 72–600, got {}",
                self.dpi
            )));
        }
        let images = absolute(&self.images_dir)?;
        for (name, dir) in [
            ("input_dir", &self.input_dir),
            ("output_dir", &self.output_dir),
            ("done_dir", &self.done_dir),
        ] {
            // Equal, or an ancestor: clearing pages would reach into `dir`.
            if absolute(dir)?.starts_with(&images) {
                return Err(DeckError::InvalidParameter(format!(
                    "images_dir {} must not be or contain {name} {} (it is cleared before every PDF)",
                    self.images_dir.display(),
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

/// Lexically absolute form of `path`; `..` is left unresolved.
fn absolute(path: &Path) -> Result<PathBuf, DeckError> {
    std::path::absolute(path).map_err(|e| DeckError::io(path, e))
}

// ── Upload ───────────────────────────────────────────────────────────────

/// Access level granted to each recipient of an uploaded deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareRole {
    Reader,
    Commenter,
    /// Edit access. (default)
    #[default]
    Writer,
}

impl ShareRole {
    /// The role name used by the Drive permissions API.
    pub fn as_api_str(self) -> &'static str {
        match self {
            ShareRole::Reader => "reader",
            ShareRole::Commenter => "commenter",
            ShareRole::Writer => "writer",
        }
    }
}

/// Credential source and sharing policy for the Drive uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Service-account JSON key file. Default: `credentials.json`.
    pub credentials_path: PathBuf,

    /// Accounts the uploaded deck is shared with.
    pub recipients: Vec<String>,

    /// Role granted to every recipient. Default: writer.
    pub role: ShareRole,

    /// Timeout for each Drive or token request, in seconds. Default: 300.
    pub timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from("credentials.json"),
            recipients: Vec::new(),
            role: ShareRole::default(),
            timeout_secs: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_two_per_slide() {
        let c = DeckConfig::builder().build().unwrap();
        assert_eq!(c, DeckConfig::default());
        assert_eq!(c.images_per_slide, ImagesPerSlide::Two);
        assert_eq!(c.ragged_last_slide, RaggedLastSlide::Centered);
    }

    #[test]
    fn builder_rejects_three_per_slide() {
        let err = DeckConfig::builder().images_per_slide(3).build().unwrap_err();
        assert!(matches!(err, DeckError::InvalidParameter(_)), "got: {err}");
    }

    #[test]
    fn builder_rejects_zero_per_slide() {
        assert!(DeckConfig::builder().images_per_slide(0).build().is_err());
    }

    #[test]
    fn slides_for_rounds_up() {
        assert_eq!(ImagesPerSlide::Two.slides_for(0), 0);
        assert_eq!(ImagesPerSlide::Two.slides_for(1), 1);
        assert_eq!(ImagesPerSlide::Two.slides_for(3), 2);
        assert_eq!(ImagesPerSlide::Two.slides_for(4), 2);
        assert_eq!(ImagesPerSlide::One.slides_for(3), 3);
    }

    #[test]
    fn tier_boundary_is_strictly_greater_than_threshold() {
        let c = DeckConfig::default();
        assert_eq!(c.tier_for(50).quality, 85);
        assert_eq!(c.tier_for(51).quality, 70);
        assert_eq!(c.tier_for(1), CompressionTier::STANDARD);
        assert_eq!(c.tier_for(51), CompressionTier::LARGE_DECK);
    }

    #[test]
    fn tier_envelopes() {
        assert_eq!(
            (CompressionTier::STANDARD.max_width, CompressionTier::STANDARD.max_height),
            (1600, 900)
        );
        assert_eq!(
            (CompressionTier::LARGE_DECK.max_width, CompressionTier::LARGE_DECK.max_height),
            (1200, 675)
        );
    }

    #[test]
    fn images_per_slide_serde_as_integer() {
        let json = serde_json::to_string(&ImagesPerSlide::One).unwrap();
        assert_eq!(json, "1");
        let back: ImagesPerSlide = serde_json::from_str("2").unwrap();
        assert_eq!(back, ImagesPerSlide::Two);
        assert!(serde_json::from_str::<ImagesPerSlide>("5").is_err());
    }

    #[test]
    fn slide_geometry_constants() {
        assert_eq!(SLIDE_WIDTH_EMU, 9_144_000);
        assert_eq!(SLIDE_HEIGHT_EMU, (4.41 * EMU_PER_INCH as f64) as i64);
    }

    #[test]
    fn batch_config_rejects_out_of_range_dpi() {
        let c = BatchConfig {
            dpi: 1200,
            ..BatchConfig::default()
        };
        assert!(matches!(c.validate(), Err(DeckError::InvalidParameter(_))));
        assert!(BatchConfig::default().validate().is_ok());
    }

    #[test]
    fn batch_config_rejects_images_dir_over_other_folders() {
        let base = BatchConfig::default();
        for images_dir in [
            base.input_dir.clone(),
            base.output_dir.clone(),
            base.done_dir.clone(),
            PathBuf::from("inputs"),
            PathBuf::from("./outputs"),
            PathBuf::from("."),
        ] {
            let c = BatchConfig {
                images_dir: images_dir.clone(),
                ..BatchConfig::default()
            };
            assert!(
                matches!(c.validate(), Err(DeckError::InvalidParameter(_))),
                "{} accepted",
                images_dir.display()
            );
        }

        // A scratch folder nested inside the output folder is fine.
        assert!(base.images_dir.starts_with(&base.output_dir));
        assert!(base.validate().is_ok());
    }

    #[test]
    fn share_role_api_names() {
        assert_eq!(ShareRole::default().as_api_str(), "writer");
        assert_eq!(ShareRole::Reader.as_api_str(), "reader");
    }
}
