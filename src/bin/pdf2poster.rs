//! CLI binary for pdf-poster.
//!
//! A thin shim over the library crate that maps CLI flags to `PosterConfig`,
//! runs the batch and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_poster::{
    convert_batch, display_name, parse_color, resolve_formats, BatchProgressCallback, ColumnSpec,
    OutputFormat, PdfiumRenderer, PosterConfig, ProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
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

/// Terminal progress callback: a live bar over documents plus one log line
/// per finished document.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start time of the document currently being rendered.
    started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    /// The bar starts as a spinner; `on_batch_start` sets its length.
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Looking for PDFs…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            started: Mutex::new(None),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.started
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} PDFs  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_documents as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Rendering");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_documents} PDF(s)"))
        ));
    }

    fn on_document_start(&self, _index: usize, _total: usize, input: &Path) {
        if let Ok(mut s) = self.started.lock() {
            *s = Some(Instant::now());
        }
        self.bar.set_message(display_name(input));
    }

    fn on_document_complete(&self, index: usize, total: usize, input: &Path, outputs: &[PathBuf]) {
        let names: Vec<String> = outputs.iter().map(|p| display_name(p)).collect();
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  →  {}  {}",
            green("✓"),
            index,
            total,
            display_name(input),
            names.join(", "),
            dim(&format!("{:.1}s", self.elapsed_secs())),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, total: usize, input: &Path, error: &str) {
        let first_line = error.lines().next().unwrap_or(error);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}  {}",
            red("✗"),
            index,
            total,
            input.display(),
            red(first_line),
            dim(&format!("{:.1}s", self.elapsed_secs())),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_documents: usize, success_count: usize) {
        let failed = total_documents.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} poster(s) written",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} PDFs converted  ({} failed)",
                if failed == total_documents {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_documents,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r##"EXAMPLES:
  # Single tall image (all pages stacked), 300 DPI, 20px margins, 8px spacing
  pdf2poster -i file.pdf -o out --dpi 300 --cols 1 --margin 20 --spacing 8

  # Auto grid (roughly square), 240 DPI, whole folder, PNG and JPEG
  pdf2poster -i folder_with_pdfs -o out --dpi 240 --cols auto --both

  # 3 columns, light gray background
  pdf2poster -i file.pdf -o out --cols 3 --bg "#f7f7f7" --formats PNG,JPEG

  # Keep posters small enough to share
  pdf2poster -i file.pdf -o out --dpi 150 --max-width 4000 --format JPEG --quality 85

  # Machine-readable run report
  pdf2poster -i folder -o out --json > report.json

NOTES:
  High DPI makes very large images; a 40-page document at 300 DPI is close
  to 1 GB of pixels before --max-width is applied.
  Mixed page sizes are padded to the largest page so the grid stays aligned.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to an existing libpdfium
  RUST_LOG                Override log filtering (e.g. pdf_poster=debug)
"##;

/// Render each PDF into one image containing all of its pages.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2poster",
    version,
    about = "Render each PDF into one high-quality image containing all its pages",
    long_about = "Render every page of a PDF (or of every PDF in a folder, recursively) and tile \
the pages into a single grid-shaped poster image. Margins, spacing, background colour, grid \
columns and output formats are configurable.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to a PDF file or a folder containing PDFs.
    #[arg(short, long, env = "PDF2POSTER_INPUT")]
    input: PathBuf,

    /// Output folder for generated images.
    #[arg(short, long, env = "PDF2POSTER_OUTPUT")]
    output: PathBuf,

    /// Render DPI. 300 is print quality.
    #[arg(long, env = "PDF2POSTER_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// Grid columns: a number, '1' to stack vertically, or 'auto'.
    #[arg(long, visible_alias = "columns", env = "PDF2POSTER_COLS", default_value = "auto")]
    cols: String,

    /// Outer margin around the whole poster, in pixels.
    #[arg(long, env = "PDF2POSTER_MARGIN", default_value_t = 16)]
    margin: u32,

    /// Spacing between pages in the grid, in pixels.
    #[arg(long, env = "PDF2POSTER_SPACING", default_value_t = 8)]
    spacing: u32,

    /// Background colour, e.g. '#FFFFFF', 'white' or 'rgb(247,247,247)'.
    #[arg(long, visible_alias = "background", env = "PDF2POSTER_BG", default_value = "#FFFFFF")]
    bg: String,

    /// Single output format (legacy): PNG, JPG or JPEG.
    #[arg(long, env = "PDF2POSTER_FORMAT", default_value = "PNG")]
    format: String,

    /// Export both PNG and JPEG for each PDF.
    #[arg(long, env = "PDF2POSTER_BOTH")]
    both: bool,

    /// Comma-separated formats, e.g. 'PNG,JPEG'. Overrides --format and --both.
    #[arg(long, env = "PDF2POSTER_FORMATS")]
    formats: Option<String>,

    /// Filename suffix before the extension.
    #[arg(long, env = "PDF2POSTER_SUFFIX", default_value = "_poster")]
    suffix: String,

    /// Downscale the final image if wider than this (pixels). 0 = no limit.
    #[arg(long, alias = "max_width", env = "PDF2POSTER_MAX_WIDTH", default_value_t = 0)]
    max_width: u32,

    /// JPEG quality (0–100).
    #[arg(long, env = "PDF2POSTER_QUALITY", default_value_t = 95,
          value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: u8,

    /// Print the run report as JSON on stdout.
    #[arg(long, env = "PDF2POSTER_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2POSTER_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2POSTER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2POSTER_QUIET")]
    quiet: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        // At least one document failed; each failure was already reported.
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("{} {:#}", red("error:"), e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the run finished but some documents failed.
fn run() -> Result<bool> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar owns the terminal while it is active; library logs
    // are limited to errors so they do not tear it.
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

    // ── Build config ─────────────────────────────────────────────────────
    // Every value is validated here, before any document is touched.
    let cli_progress = show_progress.then(CliProgressCallback::new);
    let progress_cb = cli_progress.clone().map(|cb| cb as ProgressCallback);
    let config = build_config(&cli, progress_cb)?;

    // ── Bind the PDF engine and run the batch ────────────────────────────
    let outcome = PdfiumRenderer::bind()
        .context("PDF engine unavailable")
        .and_then(|renderer| {
            convert_batch(&cli.input, &cli.output, &renderer, &config)
                .context("Batch could not start")
        });
    if outcome.is_err() {
        // The batch never started, so the spinner is still on screen.
        if let Some(cb) = &cli_progress {
            cb.bar.finish_and_clear();
        }
    }
    let report = outcome?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet && !show_progress {
        // Without the bar, summarise here; per-document lines were logged.
        eprintln!(
            "Converted {}/{} PDF(s) in {}ms → {}",
            report.succeeded(),
            report.documents.len(),
            report.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
    }

    if report.has_failures() && (cli.quiet || cli.json) {
        for (pdf, err) in report.failures() {
            eprintln!("{} {}: {}", red("ERROR"), pdf.display(), err);
        }
    }

    Ok(!report.has_failures())
}

/// Map CLI args to `PosterConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PosterConfig> {
    let columns: ColumnSpec = cli.cols.parse().context("Invalid --cols")?;
    let background = parse_color(&cli.bg).context("Invalid --bg")?;
    let legacy: OutputFormat = cli.format.parse().context("Invalid --format")?;

    let (formats, ignored) = resolve_formats(cli.formats.as_deref(), cli.both, legacy);
    if !cli.quiet {
        for token in &ignored {
            eprintln!(
                "{} Unsupported format '{}' ignored. Supported: PNG, JPEG.",
                yellow("WARNING:"),
                token
            );
        }
    }

    let mut builder = PosterConfig::builder()
        .dpi(cli.dpi)
        .columns(columns)
        .margin(cli.margin)
        .spacing(cli.spacing)
        .background(background)
        .formats(formats)
        .suffix(cli.suffix.clone())
        .max_width(cli.max_width)
        .quality(cli.quality);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
