//! Minimal PowerPoint (.pptx) presentation model and writer.
//!
//! Only what a deck of page images needs: fixed slide size, blank slides,
//! absolutely positioned pictures. The package is written in one pass when
//! [`Presentation::save_to`] is called; until then pictures live in memory.

mod parts;

use crate::error::DeckError;
use std::io::{Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Encoding of an embedded picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }
}

/// A picture placed on a slide. Geometry is in EMU.
#[derive(Debug, Clone)]
pub struct Picture {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
    /// Alt text.
    pub description: String,
}

/// A blank slide holding pictures.
#[derive(Debug, Clone, Default)]
pub struct Slide {
    pub pictures: Vec<Picture>,
}

impl Slide {
    pub fn add_picture(&mut self, picture: Picture) {
        self.pictures.push(picture);
    }
}

/// A presentation under construction.
#[derive(Debug, Clone)]
pub struct Presentation {
    /// Slide width in EMUs (914400 EMU = 1 inch).
    pub slide_width: i64,
    /// Slide height in EMUs.
    pub slide_height: i64,
    pub slides: Vec<Slide>,
    /// Document title stored in the core properties.
    pub title: String,
}

impl Presentation {
    pub fn new(slide_width: i64, slide_height: i64) -> Self {
        Self {
            slide_width,
            slide_height,
            slides: Vec::new(),
            title: String::new(),
        }
    }

    /// Append a blank slide and return it for filling.
    pub fn add_slide(&mut self) -> &mut Slide {
        self.slides.push(Slide::default());
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Write the complete package to `writer`.
    pub fn save_to<W: Write + Seek>(&self, writer: W) -> Result<W, zip::result::ZipError> {
        let mut zip = ZipWriter::new(writer);
        let xml = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        // Media is already compressed.
        let media = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        let put = |zip: &mut ZipWriter<W>, name: &str, body: &str| -> zip::result::ZipResult<()> {
            zip.start_file(name, xml)?;
            zip.write_all(body.as_bytes())?;
            Ok(())
        };

        put(&mut zip, "[Content_Types].xml", &parts::content_types_xml(self))?;
        put(&mut zip, "_rels/.rels", &parts::root_rels_xml())?;
        put(&mut zip, "docProps/core.xml", &parts::core_props_xml(&self.title))?;
        put(&mut zip, "docProps/app.xml", &parts::app_props_xml(self.slides.len()))?;
        put(&mut zip, "ppt/presentation.xml", &parts::presentation_xml(self))?;
        put(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            &parts::presentation_rels_xml(self.slides.len()),
        )?;
        put(&mut zip, "ppt/presProps.xml", &parts::pres_props_xml())?;
        put(&mut zip, "ppt/viewProps.xml", &parts::view_props_xml())?;
        put(&mut zip, "ppt/tableStyles.xml", &parts::table_styles_xml())?;
        put(&mut zip, "ppt/theme/theme1.xml", &parts::theme_xml())?;
        put(&mut zip, "ppt/slideMasters/slideMaster1.xml", &parts::slide_master_xml())?;
        put(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &parts::slide_master_rels_xml(),
        )?;
        put(&mut zip, "ppt/slideLayouts/slideLayout1.xml", &parts::blank_layout_xml())?;
        put(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &parts::blank_layout_rels_xml(),
        )?;

        let mut media_counter = 0usize;
        for (index, slide) in self.slides.iter().enumerate() {
            let number = index + 1;
            let mut media_names = Vec::with_capacity(slide.pictures.len());
            for pic in &slide.pictures {
                media_counter += 1;
                let name = format!("image{}.{}", media_counter, pic.format.extension());
                zip.start_file(format!("ppt/media/{name}"), media)?;
                zip.write_all(&pic.data)?;
                media_names.push(name);
            }
            put(&mut zip, &format!("ppt/slides/slide{number}.xml"), &parts::slide_xml(slide))?;
            put(
                &mut zip,
                &format!("ppt/slides/_rels/slide{number}.xml.rels"),
                &parts::slide_rels_xml(&media_names),
            )?;
        }

        zip.finish()
    }

    /// Write the package to `path` atomically.
    ///
    /// The bytes go to a temporary file in the destination folder which is
    /// renamed over `path` only once the package is complete; on failure the
    /// temporary file is removed and `path` is left untouched.
    pub fn save(&self, path: &Path) -> Result<u64, DeckError> {
        let write_failed = |detail: String| DeckError::OutputWriteFailed {
            path: path.to_path_buf(),
            detail,
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => std::path::PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|e| write_failed(e.to_string()))?;

        let tmp = tempfile::Builder::new()
            .prefix(".pdf2deck-")
            .suffix(".pptx.tmp")
            .tempfile_in(&parent)
            .map_err(|e| write_failed(e.to_string()))?;

        let mut file = self
            .save_to(std::io::BufWriter::new(tmp))
            .map_err(|e| write_failed(e.to_string()))?
            .into_inner()
            .map_err(|e| write_failed(e.to_string()))?;
        file.flush().map_err(|e| write_failed(e.to_string()))?;

        let persisted = file.persist(path).map_err(|e| write_failed(e.error.to_string()))?;
        let size = persisted
            .metadata()
            .map_err(|e| write_failed(e.to_string()))?
            .len();
        Ok(size)
    }
}
