//! Pipeline stages for PDF-to-deck conversion.
//!
//! Each submodule implements exactly one step, so each can be tested alone
//! and the two external systems (pdfium, Google Drive) sit behind traits.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ rasterize ──▶ compress ──▶ layout ──▶ (pptx) ──▶ upload
//! (PDFs)    (pdfium)      (JPEG)       (EMU)                 (Drive)
//! ```
//!
//! 1. [`input`]     — list PDFs; list and order page images by ordinal
//! 2. [`rasterize`] — render every page to `page_N.png`; blocking, driven
//!    through `spawn_blocking`
//! 3. [`compress`]  — downscale and JPEG-encode into the deck's tier
//! 4. [`layout`]    — size and position each image on its slide
//! 5. [`upload`]    — the only stage with network I/O

pub mod compress;
pub mod input;
pub mod layout;
pub mod rasterize;
pub mod upload;
