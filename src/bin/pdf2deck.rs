//! CLI binary for pdf2deck.
//!
//! A thin shim over the library crate that maps CLI flags to `BatchConfig`,
//! `DeckConfig` and `UploadConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdf2deck::{
    assemble_with_progress, BatchConfig, BatchReport, BatchRunner, DeckConfig,
    DeckProgressCallback, DeckSummary, DriveUploader, PdfiumRasterizer, ProgressCallback,
    RaggedLastSlide, ShareRole, Stage, UploadConfig,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: one bar over the slides of the deck being built, plus
/// a log line per finished PDF.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Number of the PDF currently being processed (0 outside a batch).
    current_file: AtomicUsize,
    total_files: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Scanning…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            current_file: AtomicUsize::new(0),
            total_files: AtomicUsize::new(0),
        })
    }

    fn prefix(&self) -> String {
        let total = self.total_files.load(Ordering::SeqCst);
        if total == 0 {
            "Assembling".to_string()
        } else {
            format!("{}/{}", self.current_file.load(Ordering::SeqCst), total)
        }
    }

    /// Switch to the full bar style once the slide count is known.
    fn activate_bar(&self, total_slides: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} slides  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_style(style);
        self.bar.set_length(total_slides as u64);
        self.bar.set_position(0);
        self.bar.set_prefix(self.prefix());
    }

    fn spinner(&self, message: String) {
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        self.bar.set_style(style);
        self.bar.set_prefix(self.prefix());
        self.bar.set_message(message);
    }
}

impl DeckProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.total_files.store(total_files, Ordering::SeqCst);
        if total_files > 0 {
            self.bar.println(format!(
                "{} {}",
                cyan("◆"),
                bold(&format!("Converting {total_files} PDFs…"))
            ));
        }
    }

    fn on_file_start(&self, file_num: usize, _total_files: usize, name: &str) {
        self.current_file.store(file_num, Ordering::SeqCst);
        self.spinner(name.to_string());
    }

    fn on_stage(&self, _file_num: usize, stage: Stage) {
        match stage {
            Stage::Rasterize => self.spinner("rasterizing pages…".to_string()),
            Stage::Assemble => self.spinner("building slides…".to_string()),
            Stage::Upload => self.spinner("uploading to Drive…".to_string()),
        }
    }

    fn on_slide_complete(&self, slide_num: usize, total_slides: usize) {
        if slide_num == 1 {
            self.activate_bar(total_slides);
        }
        self.bar.set_position(slide_num as u64);
    }

    fn on_file_complete(&self, file_num: usize, total_files: usize, link: Option<&str>) {
        self.bar.println(format!(
            "  {} PDF {:>3}/{:<3}  {}",
            green("✓"),
            file_num,
            total_files,
            dim(link.unwrap_or("(not uploaded)")),
        ));
    }

    fn on_file_error(&self, file_num: usize, total_files: usize, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = match error.char_indices().nth(100) {
            Some((i, _)) => format!("{}\u{2026}", &error[..i]),
            None => error.to_string(),
        };
        self.bar.println(format!(
            "  {} PDF {:>3}/{:<3}  {}",
            red("✗"),
            file_num,
            total_files,
            red(&msg),
        ));
    }

    fn on_batch_complete(&self, total_files: usize, completed: usize) {
        self.bar.finish_and_clear();
        if total_files == 0 {
            eprintln!("{} no PDFs to convert", cyan("⚠"));
        } else if completed == total_files {
            eprintln!(
                "{} {} decks built",
                green("✔"),
                bold(&completed.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} PDFs converted before the run stopped",
                red("✘"),
                bold(&completed.to_string()),
                total_files,
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every PDF in inputs/pdf, upload, share with two people
  pdf2deck run --share-with alice@example.com,bob@example.com

  # Build decks locally only, one page per slide
  pdf2deck run --no-upload --images-per-slide 1

  # Custom folder layout
  pdf2deck run --input-dir scans --output-dir decks --done-dir scans/done

  # Assemble an existing folder of page_N.png images
  pdf2deck assemble outputs/images -o handout.pptx

  # JSON report for scripting
  pdf2deck run --no-upload --json > report.json

FOLDERS (defaults, relative to the working directory):
  inputs/pdf       PDFs waiting to be converted
  outputs/images   page images of the PDF being converted (emptied per PDF)
  outputs          finished decks, named after their PDF
  inputs/done      PDFs that were converted successfully

COMPRESSION:
  Decks with more than 50 slides embed pages as JPEG q70 within 1200x675 px,
  smaller decks as JPEG q85 within 1600x900 px.

ENVIRONMENT VARIABLES:
  PDF2DECK_CREDENTIALS    Service-account JSON key file (default credentials.json)
  PDF2DECK_SHARE_WITH     Comma-separated recipients of each uploaded deck
  PDFIUM_LIB_PATH         Folder containing libpdfium (or the library file itself)
  RUST_LOG                Overrides the log filter (e.g. pdf2deck=debug)
"#;

/// Convert PDFs into two-up slide decks and share them on Google Drive.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2deck",
    version,
    about = "Convert PDFs into two-up PowerPoint decks and share them on Google Drive",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output a structured JSON report on stdout.
    #[arg(long, global = true, env = "PDF2DECK_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, global = true, env = "PDF2DECK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDF2DECK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDF2DECK_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert every PDF in the input folder, upload and share the decks.
    Run(RunArgs),
    /// Build one deck from a folder of `*_<n>.png` page images.
    Assemble(AssembleArgs),
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Page images per slide (1 or 2).
    #[arg(long, env = "PDF2DECK_IMAGES_PER_SLIDE", default_value_t = 2,
          value_parser = clap::value_parser!(u8).range(1..=2))]
    images_per_slide: u8,

    /// Placement of a lone image on the last slide of a two-up deck.
    #[arg(long, env = "PDF2DECK_RAGGED", value_enum, default_value = "centered")]
    ragged: RaggedArg,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Folder scanned for PDFs.
    #[arg(long, env = "PDF2DECK_INPUT_DIR", default_value = "inputs/pdf")]
    input_dir: PathBuf,

    /// Scratch folder for page images (emptied before every PDF).
    #[arg(long, env = "PDF2DECK_IMAGES_DIR", default_value = "outputs/images")]
    images_dir: PathBuf,

    /// Folder receiving the decks.
    #[arg(long, env = "PDF2DECK_OUTPUT_DIR", default_value = "outputs")]
    output_dir: PathBuf,

    /// Folder processed PDFs are moved into.
    #[arg(long, env = "PDF2DECK_DONE_DIR", default_value = "inputs/done")]
    done_dir: PathBuf,

    /// Rendering DPI (72–600).
    #[arg(long, env = "PDF2DECK_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    #[command(flatten)]
    layout: LayoutArgs,

    /// Service-account JSON key file.
    #[arg(long, env = "PDF2DECK_CREDENTIALS", default_value = "credentials.json")]
    credentials: PathBuf,

    /// Recipients granted access to each uploaded deck (comma-separated).
    #[arg(long, env = "PDF2DECK_SHARE_WITH", value_delimiter = ',')]
    share_with: Vec<String>,

    /// Access level granted to recipients.
    #[arg(long, env = "PDF2DECK_ROLE", value_enum, default_value = "writer")]
    role: RoleArg,

    /// Upload timeout in seconds.
    #[arg(long, env = "PDF2DECK_UPLOAD_TIMEOUT", default_value_t = 300)]
    upload_timeout: u64,

    /// Build decks locally without uploading.
    #[arg(long, env = "PDF2DECK_NO_UPLOAD")]
    no_upload: bool,

    /// Folder containing the pdfium shared library.
    #[arg(long, env = "PDF2DECK_PDFIUM_LIB_PATH")]
    pdfium_lib_path: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AssembleArgs {
    /// Folder of `*_<n>.png` page images.
    image_folder: PathBuf,

    /// Deck to write.
    #[arg(short, long, env = "PDF2DECK_OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum RaggedArg {
    Centered,
    Leading,
}

impl From<RaggedArg> for RaggedLastSlide {
    fn from(v: RaggedArg) -> Self {
        match v {
            RaggedArg::Centered => RaggedLastSlide::Centered,
            RaggedArg::Leading => RaggedLastSlide::Leading,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum RoleArg {
    Reader,
    Commenter,
    Writer,
}

impl From<RoleArg> for ShareRole {
    fn from(v: RoleArg) -> Self {
        match v {
            RoleArg::Reader => ShareRole::Reader,
            RoleArg::Commenter => ShareRole::Commenter,
            RoleArg::Writer => ShareRole::Writer,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; verbose mode always wins.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress = show_progress.then(CliProgressCallback::new);

    match &cli.command {
        Command::Run(args) => {
            let callback = progress.map(|cb| cb as Arc<dyn DeckProgressCallback>);
            let report = run_batch(args, callback).await?;
            print_batch(&cli, &report)
        }
        Command::Assemble(args) => {
            let deck = run_assemble(args, progress)?;
            print_deck(&cli, &deck)
        }
    }
}

fn deck_config(layout: &LayoutArgs) -> Result<DeckConfig> {
    DeckConfig::builder()
        .images_per_slide(layout.images_per_slide)
        .ragged_last_slide(layout.ragged.into())
        .build()
        .context("Invalid layout configuration")
}

async fn run_batch(args: &RunArgs, progress: Option<ProgressCallback>) -> Result<BatchReport> {
    let mut config = BatchConfig {
        input_dir: args.input_dir.clone(),
        images_dir: args.images_dir.clone(),
        output_dir: args.output_dir.clone(),
        done_dir: args.done_dir.clone(),
        dpi: args.dpi,
        deck: deck_config(&args.layout)?,
        ..BatchConfig::default()
    };
    if let Some(cb) = progress {
        config = config.progress_callback(cb);
    }

    let rasterizer = match &args.pdfium_lib_path {
        Some(dir) => PdfiumRasterizer::with_library_dir(dir),
        None => PdfiumRasterizer::new(),
    };

    let uploader = if args.no_upload {
        None
    } else {
        let upload = UploadConfig {
            credentials_path: args.credentials.clone(),
            recipients: args.share_with.clone(),
            role: args.role.into(),
            timeout_secs: args.upload_timeout,
        };
        Some(
            DriveUploader::from_config(upload)
                .with_context(|| format!("Cannot use credentials {:?}", args.credentials))?,
        )
    };

    BatchRunner::new(config, Arc::new(rasterizer), uploader)
        .run()
        .await
        .context("Batch failed")
}

fn run_assemble(
    args: &AssembleArgs,
    progress: Option<Arc<CliProgressCallback>>,
) -> Result<DeckSummary> {
    let config = deck_config(&args.layout)?;

    let result = tokio::task::block_in_place(|| match &progress {
        Some(cb) => {
            assemble_with_progress(&args.image_folder, &args.output, &config, cb.as_ref())
        }
        None => pdf2deck::assemble(&args.image_folder, &args.output, &config),
    });
    if let Some(cb) = &progress {
        cb.bar.finish_and_clear();
    }
    result.with_context(|| format!("Failed to assemble {:?}", args.image_folder))
}

fn print_batch(cli: &Cli, report: &BatchReport) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(report).context("Failed to serialise report")?;
        println!("{json}");
        return Ok(());
    }
    if cli.quiet {
        return Ok(());
    }
    for file in &report.files {
        let link = file
            .upload
            .as_ref()
            .and_then(|u| u.web_view_link.clone())
            .unwrap_or_else(|| "(not uploaded)".to_string());
        eprintln!(
            "{}  {} pages → {} slides  {}  →  {}",
            green("✔"),
            file.page_count,
            file.deck.slide_count(),
            bold(&file.deck.path.display().to_string()),
            dim(&link),
        );
    }
    eprintln!("   {}ms total", report.total_duration_ms);
    Ok(())
}

fn print_deck(cli: &Cli, deck: &DeckSummary) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(deck).context("Failed to serialise deck")?;
        println!("{json}");
    } else if !cli.quiet {
        eprintln!(
            "{}  {} images → {} slides  ({} tier, {} bytes)  →  {}",
            green("✔"),
            deck.image_count(),
            deck.slide_count(),
            deck.tier.label,
            deck.file_size,
            bold(&deck.path.display().to_string()),
        );
    }
    Ok(())
}
