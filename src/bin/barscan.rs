//! CLI binary for barscan.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `DecodeSettings`, enforces the service limits from `ServiceSettings`,
//! and prints results.

use anyhow::{bail, Context, Result};
use barscan::{decode, inspect, DecodeSettings, MediaType, ServiceSettings};
use clap::Parser;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract barcodes from a PDF (one payload per line)
  barscan invoice.pdf

  # Force the media type when the extension is misleading
  barscan --media-type image/jpeg upload.bin

  # Tune the render scales
  barscan --scale 4.0 --fallback-scale 6.0 label.png

  # Disable the fallback pass entirely
  barscan --no-fallback batch.pdf

  # Structured output
  barscan --json photo.jpg

  # Page count only, no scanning
  barscan --inspect-only report.pdf

ENVIRONMENT VARIABLES:
  BARSCAN_SCALE                   Primary render scale (default 3.0)
  BARSCAN_FALLBACK_SCALE          Fallback scale; 0/off/none disables (default 5.0)
  BARSCAN_MAX_PAGES               Max PDF pages accepted (default 50)
  BARSCAN_MAX_FILE_SIZE_MB_PDF    Max PDF upload size in MB (default 10)
  BARSCAN_MAX_FILE_SIZE_MB_IMAGE  Max image upload size in MB (default 6)
  PDFIUM_LIB_PATH                 Directory containing libpdfium (PDF inputs only)
"#;

/// Extract barcodes from PDF documents and raster images.
#[derive(Parser, Debug)]
#[command(
    name = "barscan",
    version,
    about = "Extract barcodes (QR, DataMatrix, 1-D retail codes) from PDFs and images",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input file: a PDF, PNG or JPEG.
    input: PathBuf,

    /// Declared media type; inferred from the file extension if omitted.
    #[arg(long, env = "BARSCAN_MEDIA_TYPE")]
    media_type: Option<String>,

    /// Primary render scale factor.
    #[arg(long, env = "BARSCAN_SCALE")]
    scale: Option<f32>,

    /// Fallback render scale, used only when a page yields nothing.
    #[arg(long, env = "BARSCAN_FALLBACK_SCALE", conflicts_with = "no_fallback")]
    fallback_scale: Option<f32>,

    /// Disable the fallback pass.
    #[arg(long)]
    no_fallback: bool,

    /// Output a JSON report instead of one payload per line.
    #[arg(long, env = "BARSCAN_JSON")]
    json: bool,

    /// Print the page count only, no scanning.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BARSCAN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, env = "BARSCAN_QUIET")]
    quiet: bool,
}

/// JSON shape for `--json` mode.
#[derive(Serialize)]
struct DecodeReport<'a> {
    file: &'a str,
    media_type: &'static str,
    count: usize,
    codes: &'a [String],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let service = ServiceSettings::from_env().context("Invalid BARSCAN_* environment")?;

    // ── Resolve the media type ───────────────────────────────────────────
    let media_type = match cli.media_type.as_deref() {
        Some(declared) => MediaType::from_declared(declared).with_context(|| {
            format!("Unsupported media type '{declared}' (accepted: application/pdf, image/png, image/jpeg)")
        })?,
        None => MediaType::from_extension(&cli.input).with_context(|| {
            format!(
                "Cannot infer a media type from '{}'; pass --media-type",
                cli.input.display()
            )
        })?,
    };

    // ── Enforce service limits before any decode work ────────────────────
    let metadata = std::fs::metadata(&cli.input)
        .with_context(|| format!("Cannot read '{}'", cli.input.display()))?;
    let limit = service.max_bytes_for(media_type);
    if metadata.len() > limit {
        bail!(
            "'{}' is {} bytes; the limit for {} inputs is {} MB",
            cli.input.display(),
            metadata.len(),
            media_type,
            limit >> 20
        );
    }

    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("Cannot read '{}'", cli.input.display()))?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let info = inspect(&bytes, media_type.as_str()).context("Inspection failed")?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
        } else {
            println!("File:        {}", cli.input.display());
            println!("Media type:  {}", info.media_type);
            println!("Pages:       {}", info.page_count);
        }
        return Ok(());
    }

    // Page-count policy applies to PDFs only; images are always one page.
    if media_type == MediaType::Pdf {
        let info = inspect(&bytes, media_type.as_str()).context("Inspection failed")?;
        if info.page_count > service.max_pages {
            bail!(
                "'{}' has {} pages; the limit is {} (BARSCAN_MAX_PAGES)",
                cli.input.display(),
                info.page_count,
                service.max_pages
            );
        }
    }

    // ── Build settings: flags override environment ───────────────────────
    let scale = cli.scale.unwrap_or(service.scale);
    let fallback_scale = if cli.no_fallback {
        None
    } else {
        cli.fallback_scale.map_or(service.fallback_scale, Some)
    };
    let settings = DecodeSettings::new(scale, fallback_scale).context("Invalid scale settings")?;

    // ── Run extraction ───────────────────────────────────────────────────
    let codes = decode(&bytes, media_type.as_str(), &settings).context("Decoding failed")?;

    if cli.json {
        let file = cli.input.display().to_string();
        let report = DecodeReport {
            file: &file,
            media_type: media_type.as_str(),
            count: codes.len(),
            codes: &codes,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if codes.is_empty() {
        if !cli.quiet {
            eprintln!(
                "No barcodes detected (try --scale {})",
                DecodeSettings::DEFAULT_FALLBACK_SCALE
            );
        }
        return Ok(());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for code in &codes {
        writeln!(handle, "{code}").context("Failed to write to stdout")?;
    }

    Ok(())
}
