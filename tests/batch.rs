//! Integration tests for the batch driver.
//!
//! pdfium and Google Drive are replaced by in-process fakes implementing
//! `Rasterizer` and `Uploader`, so these tests exercise folder handling,
//! ordering, progress reporting and abort-on-first-error without native
//! libraries or network access.

use image::{Rgb, RgbImage};
use pdf2deck::{
    BatchConfig, BatchRunner, DeckError, DeckProgressCallback, Rasterizer, Stage, UploadReceipt,
    Uploader,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Fakes ────────────────────────────────────────────────────────────────────

/// Writes `pages` synthetic page images per PDF; fails on `fail_on`.
#[derive(Default)]
struct FakeRasterizer {
    pages: usize,
    fail_on: Option<String>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl FakeRasterizer {
    fn new(pages: usize) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    fn failing_on(pages: usize, name: &str) -> Self {
        Self {
            pages,
            fail_on: Some(name.to_string()),
            ..Self::default()
        }
    }
}

impl Rasterizer for FakeRasterizer {
    fn rasterize(
        &self,
        pdf_path: &Path,
        output_folder: &Path,
        dpi: u32,
    ) -> Result<Vec<PathBuf>, DeckError> {
        let name = pdf_path.file_name().unwrap().to_string_lossy().into_owned();
        self.calls.lock().unwrap().push((name.clone(), dpi));

        if self.fail_on.as_deref() == Some(name.as_str()) {
            return Err(DeckError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: "fake failure".into(),
            });
        }

        // Leftovers from a previous PDF would show up as extra slides.
        let leftovers = std::fs::read_dir(output_folder)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                let n = e.file_name().to_string_lossy().into_owned();
                n.ends_with(".png") || n.ends_with(".jpg")
            })
            .count();
        assert_eq!(leftovers, 0, "images folder was not cleared before {name}");

        (1..=self.pages)
            .map(|n| {
                let path = output_folder.join(format!("page_{n}.png"));
                RgbImage::from_pixel(60, 80, Rgb([0, 0, 0])).save(&path).unwrap();
                Ok(path)
            })
            .collect()
    }
}

#[derive(Clone, Default)]
struct FakeUploader {
    uploads: Arc<Mutex<Vec<PathBuf>>>,
    fail: bool,
}

impl Uploader for FakeUploader {
    async fn upload(&self, deck_path: &Path) -> Result<UploadReceipt, DeckError> {
        {
            self.uploads.lock().unwrap().push(deck_path.to_path_buf());
        }
        if self.fail {
            return Err(DeckError::UploadFailed {
                path: deck_path.to_path_buf(),
                reason: "HTTP 403".into(),
            });
        }
        let name = deck_path.file_stem().unwrap().to_string_lossy().into_owned();
        Ok(UploadReceipt {
            file_id: format!("id-{name}"),
            web_view_link: Some(format!("https://drive.example/{name}")),
            shared_with: vec!["team@example.com".into()],
        })
    }
}

#[derive(Default)]
struct EventLog(Mutex<Vec<String>>);

impl EventLog {
    fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl DeckProgressCallback for EventLog {
    fn on_batch_start(&self, total_files: usize) {
        self.push(format!("batch-start {total_files}"));
    }
    fn on_file_start(&self, file_num: usize, _total: usize, name: &str) {
        self.push(format!("file-start {file_num} {name}"));
    }
    fn on_stage(&self, file_num: usize, stage: Stage) {
        self.push(format!("stage {file_num} {}", stage.as_str()));
    }
    fn on_file_complete(&self, file_num: usize, _total: usize, link: Option<&str>) {
        self.push(format!("file-done {file_num} {}", link.unwrap_or("-")));
    }
    fn on_file_error(&self, file_num: usize, _total: usize, _error: &str) {
        self.push(format!("file-error {file_num}"));
    }
    fn on_batch_complete(&self, total_files: usize, completed: usize) {
        self.push(format!("batch-done {completed}/{total_files}"));
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

struct Workspace {
    _tmp: TempDir,
    config: BatchConfig,
}

impl Workspace {
    fn new(pdfs: &[&str]) -> Self {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let config = BatchConfig {
            input_dir: root.join("inputs/pdf"),
            images_dir: root.join("outputs/images"),
            output_dir: root.join("outputs"),
            done_dir: root.join("inputs/done"),
            ..BatchConfig::default()
        };
        std::fs::create_dir_all(&config.input_dir).unwrap();
        for name in pdfs {
            std::fs::write(config.input_dir.join(name), b"%PDF-1.4\n").unwrap();
        }
        Self { _tmp: tmp, config }
    }

    fn input(&self, name: &str) -> PathBuf {
        self.config.input_dir.join(name)
    }

    fn done(&self, name: &str) -> PathBuf {
        self.config.done_dir.join(name)
    }

    fn deck(&self, stem: &str) -> PathBuf {
        self.config.output_dir.join(format!("{stem}.pptx"))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn converts_uploads_and_archives_every_pdf() {
    let ws = Workspace::new(&["b.pdf", "a.pdf"]);
    let rasterizer = Arc::new(FakeRasterizer::new(3));
    let uploader = FakeUploader::default();

    let runner = BatchRunner::new(ws.config.clone(), rasterizer.clone(), Some(uploader.clone()));
    let report = runner.run().await.unwrap();

    assert_eq!(report.files.len(), 2);
    // Processed in file-name order.
    let calls = rasterizer.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![("a.pdf".to_string(), 300), ("b.pdf".to_string(), 300)]);
    assert_eq!(*uploader.uploads.lock().unwrap(), vec![ws.deck("a"), ws.deck("b")]);

    for (file, stem) in report.files.iter().zip(["a", "b"]) {
        assert_eq!(file.page_count, 3);
        assert_eq!(file.deck.slide_count(), 2);
        assert_eq!(file.deck.path, ws.deck(stem));
        assert_eq!(file.pdf, ws.done(&format!("{stem}.pdf")));
        assert_eq!(
            file.upload.as_ref().unwrap().web_view_link.as_deref(),
            Some(format!("https://drive.example/{stem}").as_str())
        );
        assert!(ws.deck(stem).exists());
        assert!(ws.done(&format!("{stem}.pdf")).exists());
        assert!(!ws.input(&format!("{stem}.pdf")).exists());
    }
}

#[tokio::test]
async fn without_uploader_decks_stay_local() {
    let ws = Workspace::new(&["only.pdf"]);
    let runner: BatchRunner<FakeRasterizer, FakeUploader> =
        BatchRunner::new(ws.config.clone(), Arc::new(FakeRasterizer::new(1)), None);

    let report = runner.run().await.unwrap();
    assert_eq!(report.files.len(), 1);
    assert!(report.files[0].upload.is_none());
    assert!(ws.deck("only").exists());
    assert!(ws.done("only.pdf").exists());
}

#[tokio::test]
async fn first_failure_stops_the_batch() {
    let ws = Workspace::new(&["a.pdf", "b.pdf", "c.pdf"]);
    let rasterizer = Arc::new(FakeRasterizer::failing_on(2, "b.pdf"));
    let uploader = FakeUploader::default();
    let log = Arc::new(EventLog::default());
    let config = ws.config.clone().progress_callback(log.clone());

    let runner = BatchRunner::new(config, rasterizer.clone(), Some(uploader.clone()));
    let err = runner.run().await.unwrap_err();
    assert!(matches!(err, DeckError::CorruptPdf { .. }), "got {err}");

    // a finished, b failed in place, c was never attempted.
    assert!(ws.done("a.pdf").exists());
    assert!(ws.input("b.pdf").exists());
    assert!(ws.input("c.pdf").exists());
    assert!(!ws.deck("b").exists());
    assert_eq!(rasterizer.calls.lock().unwrap().len(), 2);
    assert_eq!(uploader.uploads.lock().unwrap().len(), 1);

    let events = log.events();
    assert!(events.contains(&"file-error 2".to_string()), "{events:?}");
    assert_eq!(events.last().unwrap(), "batch-done 1/3");
}

#[tokio::test]
async fn failed_upload_keeps_pdf_in_input() {
    let ws = Workspace::new(&["a.pdf"]);
    let uploader = FakeUploader {
        fail: true,
        ..FakeUploader::default()
    };

    let runner = BatchRunner::new(ws.config.clone(), Arc::new(FakeRasterizer::new(2)), Some(uploader));
    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, DeckError::UploadFailed { .. }), "got {err}");
    assert!(ws.deck("a").exists());
    assert!(ws.input("a.pdf").exists());
    assert!(!ws.done("a.pdf").exists());
}

#[tokio::test]
async fn progress_events_follow_the_pipeline() {
    let ws = Workspace::new(&["deck.pdf"]);
    let log = Arc::new(EventLog::default());
    let config = ws.config.clone().progress_callback(log.clone());

    let runner = BatchRunner::new(
        config,
        Arc::new(FakeRasterizer::new(2)),
        Some(FakeUploader::default()),
    );
    runner.run().await.unwrap();

    assert_eq!(
        log.events(),
        vec![
            "batch-start 1",
            "file-start 1 deck.pdf",
            "stage 1 rasterize",
            "stage 1 assemble",
            "stage 1 upload",
            "file-done 1 https://drive.example/deck",
            "batch-done 1/1",
        ]
    );
}

#[tokio::test]
async fn empty_input_folder_is_not_an_error() {
    let ws = Workspace::new(&[]);
    let runner: BatchRunner<FakeRasterizer, FakeUploader> =
        BatchRunner::new(ws.config.clone(), Arc::new(FakeRasterizer::new(1)), None);

    let report = runner.run().await.unwrap();
    assert!(report.files.is_empty());
    assert!(ws.config.output_dir.is_dir());
    assert!(ws.config.done_dir.is_dir());
}

#[tokio::test]
async fn out_of_range_dpi_is_rejected_before_any_work() {
    let ws = Workspace::new(&["a.pdf"]);
    let config = BatchConfig {
        dpi: 20,
        ..ws.config.clone()
    };
    let rasterizer = Arc::new(FakeRasterizer::new(1));

    let runner: BatchRunner<FakeRasterizer, FakeUploader> =
        BatchRunner::new(config, rasterizer.clone(), None);
    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, DeckError::InvalidParameter(_)), "got {err}");
    assert!(rasterizer.calls.lock().unwrap().is_empty());
    assert!(ws.input("a.pdf").exists());
}

#[tokio::test]
async fn missing_input_folder_is_an_io_error() {
    let ws = Workspace::new(&[]);
    let config = BatchConfig {
        input_dir: ws.config.input_dir.join("does-not-exist"),
        ..ws.config.clone()
    };
    let runner: BatchRunner<FakeRasterizer, FakeUploader> =
        BatchRunner::new(config, Arc::new(FakeRasterizer::new(1)), None);

    let err = runner.run().await.unwrap_err();
    assert!(matches!(err, DeckError::Io { .. }), "got {err}");
}

#[tokio::test]
async fn images_dir_equal_to_done_dir_is_rejected() {
    let ws = Workspace::new(&["a.pdf", "b.pdf"]);
    let config = BatchConfig {
        images_dir: ws.config.done_dir.clone(),
        ..ws.config.clone()
    };
    let rasterizer = Arc::new(FakeRasterizer::new(1));

    let runner: BatchRunner<FakeRasterizer, FakeUploader> =
        BatchRunner::new(config, rasterizer.clone(), None);
    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, DeckError::InvalidParameter(_)), "got {err}");
    assert!(rasterizer.calls.lock().unwrap().is_empty());
    assert!(ws.input("a.pdf").exists());
    assert!(ws.input("b.pdf").exists());
}

#[tokio::test]
async fn images_dir_equal_to_output_dir_is_rejected() {
    let ws = Workspace::new(&["a.pdf", "b.pdf"]);
    std::fs::create_dir_all(&ws.config.output_dir).unwrap();
    std::fs::write(ws.deck("earlier"), b"deck").unwrap();
    let config = BatchConfig {
        images_dir: ws.config.output_dir.clone(),
        ..ws.config.clone()
    };

    let runner: BatchRunner<FakeRasterizer, FakeUploader> =
        BatchRunner::new(config, Arc::new(FakeRasterizer::new(1)), None);
    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, DeckError::InvalidParameter(_)), "got {err}");
    assert!(ws.deck("earlier").exists());
    assert!(ws.input("a.pdf").exists());
}

#[tokio::test]
async fn images_dir_above_every_folder_is_rejected() {
    let ws = Workspace::new(&["a.pdf"]);
    let root = ws.config.input_dir.parent().unwrap().parent().unwrap().to_path_buf();
    let config = BatchConfig {
        images_dir: root,
        ..ws.config.clone()
    };

    let runner: BatchRunner<FakeRasterizer, FakeUploader> =
        BatchRunner::new(config, Arc::new(FakeRasterizer::new(1)), None);
    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, DeckError::InvalidParameter(_)), "got {err}");
    assert!(ws.input("a.pdf").exists());
}

#[tokio::test]
async fn earlier_decks_and_archives_survive_later_pdfs() {
    let ws = Workspace::new(&["a.pdf", "b.pdf", "c.pdf"]);
    std::fs::create_dir_all(&ws.config.images_dir).unwrap();
    std::fs::write(ws.config.images_dir.join("README.txt"), b"scratch").unwrap();

    let runner: BatchRunner<FakeRasterizer, FakeUploader> =
        BatchRunner::new(ws.config.clone(), Arc::new(FakeRasterizer::new(2)), None);
    runner.run().await.unwrap();

    for stem in ["a", "b", "c"] {
        assert!(ws.deck(stem).exists());
        assert!(ws.done(&format!("{stem}.pdf")).exists());
    }
    assert!(ws.config.images_dir.join("README.txt").exists());
}
