//! clipmd command line
//!
//! Picks an element in a Chrome tab and copies it as Markdown or as a cropped
//! screenshot. The conversion and cropping stages can also be run on saved
//! files, without a browser.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use clipmd::browser::{BrowserSession, ConnectionOptions, LaunchOptions};
use clipmd::capture::{self, CaptureRect};
use clipmd::clipboard::{ClipboardArtifact, ClipboardBackend, SystemClipboard};
use clipmd::markdown::{ConvertOptions, HeadingStyle, MarkdownConverter};
use clipmd::picker::{CaptureMode, Viewport};
use clipmd::{BoundingBox, ClipboardWriter, LogNotifier, Normalizer, Orchestrator, PickerConfig, PipelineOutcome};
use url::Url;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Copy the element as Markdown
    Markdown,
    /// Copy a screenshot cropped to the element
    Screenshot,
}

impl From<Mode> for CaptureMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Markdown => CaptureMode::Markdown,
            Mode::Screenshot => CaptureMode::Screenshot,
        }
    }
}

#[derive(Parser)]
#[command(name = "clipmd")]
#[command(version)]
#[command(about = "Copy a page element as Markdown or as a screenshot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a page and pick an element from it
    Pick {
        /// Page to open
        url: String,

        /// What to copy
        #[arg(long, short = 'm', value_enum, default_value = "markdown")]
        mode: Mode,

        /// WebSocket endpoint of a running browser, instead of launching one
        #[arg(long, value_name = "URL")]
        ws_endpoint: Option<String>,

        /// Path to custom browser executable
        #[arg(long, value_name = "PATH")]
        chrome_path: Option<PathBuf>,

        /// Persistent browser profile directory
        #[arg(long, value_name = "DIR")]
        user_data_dir: Option<PathBuf>,

        /// Wait after scrolling the element into view, before capturing
        #[arg(long, value_name = "MS", default_value = "100")]
        settle_ms: u64,

        /// Give up after this many seconds without interaction
        #[arg(long, value_name = "SECS")]
        idle_timeout: Option<u64>,

        /// Linux: keep serving the copied content this long, unless something else is copied first
        #[arg(long, value_name = "SECS", default_value = "30")]
        hold: u64,
    },

    /// Convert saved HTML to Markdown
    Convert {
        /// HTML file; standard input when omitted
        file: Option<PathBuf>,

        /// URL relative links are resolved against
        #[arg(long, value_name = "URL", default_value = "about:blank")]
        base_url: String,

        /// Use `#` headings instead of underlined ones
        #[arg(long)]
        atx: bool,

        /// Copy the result instead of printing it
        #[arg(long)]
        copy: bool,

        /// Linux: keep serving the copied content this long, unless something else is copied first
        #[arg(long, value_name = "SECS", default_value = "30")]
        hold: u64,
    },

    /// Crop a viewport screenshot to a CSS-pixel rectangle
    Crop {
        /// Full-viewport PNG
        input: PathBuf,

        #[arg(long, allow_hyphen_values = true)]
        x: f64,

        #[arg(long, allow_hyphen_values = true)]
        y: f64,

        #[arg(long)]
        width: f64,

        #[arg(long)]
        height: f64,

        /// Device pixel ratio the screenshot was taken at
        #[arg(long, default_value = "1")]
        dpr: f64,

        /// Where to write the cropped PNG
        #[arg(long, short = 'o', value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("clipmd=info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Pick { url, mode, ws_endpoint, chrome_path, user_data_dir, settle_ms, idle_timeout, hold } => {
            let session = match ws_endpoint {
                Some(endpoint) => BrowserSession::connect(ConnectionOptions::new(endpoint))?,
                None => {
                    let mut options = LaunchOptions::new();
                    if let Some(path) = chrome_path {
                        options = options.chrome_path(path);
                    }
                    if let Some(dir) = user_data_dir {
                        options = options.user_data_dir(dir);
                    }
                    BrowserSession::launch(options)?
                }
            };

            let mut config = PickerConfig::new().settle_delay(Duration::from_millis(settle_ms));
            if let Some(secs) = idle_timeout {
                config = config.idle_timeout(Duration::from_secs(secs));
            }

            pick(&session, &url, mode.into(), config, Duration::from_secs(hold))
        }
        Command::Convert { file, base_url, atx, copy, hold } => {
            convert(file, &base_url, atx, copy.then(|| Duration::from_secs(hold)))
        }
        Command::Crop { input, x, y, width, height, dpr, output } => {
            crop(&input, BoundingBox::new(x, y, width, height), dpr, &output)
        }
    }
}

fn pick(
    session: &BrowserSession,
    url: &str,
    mode: CaptureMode,
    config: PickerConfig,
    hold: Duration,
) -> anyhow::Result<()> {
    let page = Arc::new(session.open_page(url)?);
    eprintln!("Click an element to {} (Esc to cancel)", mode.action());

    let writer = ClipboardWriter::new(SystemClipboard::new(), session);
    let notifier = (LogNotifier, Arc::clone(&page));
    let mut orchestrator = Orchestrator::new(page, writer, notifier).with_config(config);

    match orchestrator.run(mode)? {
        PipelineOutcome::Delivered(outcome) => {
            log::debug!("Delivered: {:?}", outcome);
            orchestrator.writer_mut().backend_mut().hand_off(hold)?;
        }
        PipelineOutcome::Cancelled => eprintln!("Cancelled"),
        PipelineOutcome::Failed => bail!("{} failed", mode),
    }
    Ok(())
}

/// `copy` is how long to keep serving the copied Markdown; `None` prints it instead
fn convert(file: Option<PathBuf>, base_url: &str, atx: bool, copy: Option<Duration>) -> anyhow::Result<()> {
    let html = match file {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer).context("Failed to read standard input")?;
            buffer
        }
    };

    let base = Url::parse(base_url).with_context(|| format!("Invalid base URL {}", base_url))?;
    let fragment = Normalizer::new(base).normalize_html(&html);

    let heading_style = if atx { HeadingStyle::Atx } else { HeadingStyle::Setext };
    let converter = MarkdownConverter::with_options(ConvertOptions::new().heading_style(heading_style));
    let markdown = converter.convert(&fragment.html)?;

    if let Some(hold) = copy {
        let mut clipboard = SystemClipboard::new();
        clipboard.set_text(&markdown)?;
        eprintln!("Markdown copied!");
        clipboard.hand_off(hold)?;
    } else {
        println!("{}", markdown);
    }
    Ok(())
}

fn crop(input: &Path, element: BoundingBox, dpr: f64, output: &Path) -> anyhow::Result<()> {
    let source = std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let decoded = image::load_from_memory(&source).context("Input is not a readable image")?;

    let rect = CaptureRect::from_viewport(element, viewport_of(decoded.width(), decoded.height(), dpr), dpr);
    if rect.is_clipped() {
        log::warn!("Rectangle extends past the screenshot; cropping the visible part");
    }

    match capture::crop(&source, &rect)? {
        ClipboardArtifact::Image { bytes, .. } => {
            std::fs::write(output, &bytes).with_context(|| format!("Failed to write {}", output.display()))?;
            eprintln!("Wrote {} bytes to {}", bytes.len(), output.display());
            Ok(())
        }
        ClipboardArtifact::Text { .. } => bail!("Cropping produced text instead of an image"),
    }
}

/// CSS viewport a screenshot of `width × height` device pixels was taken from
fn viewport_of(width: u32, height: u32, dpr: f64) -> Viewport {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    Viewport { width: width as f64 / dpr, height: height as f64 / dpr, device_pixel_ratio: dpr }
}
