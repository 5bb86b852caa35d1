//! CLI binary for pdf2items.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ParseConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2items::{
    extract_items, extract_to_file, inspect, ExtractionOutput, ExtractionProgressCallback,
    LineError, PageSelection, ParseConfig, ProgressCallback, StyleLabels,
};
use std::collections::HashMap;
use std::io::{self, Write};
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a page bar plus one log line per page and per
/// dropped row.
struct CliProgressCallback {
    bar: ProgressBar,
    dropped: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_extraction_start` tells us the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading PDF text…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            dropped: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Parsing");
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Parsing {total_pages} pages…"))
        ));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, records: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{records:>4} items")),
        ));
        self.bar.inc(1);
    }

    fn on_line_dropped(&self, page_num: usize, error: &LineError) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
        let msg = error.line();
        let msg = if msg.chars().count() > 60 {
            format!("{}\u{2026}", msg.chars().take(59).collect::<String>())
        } else {
            msg.to_string()
        };
        self.bar.println(format!(
            "  {} Page {:>3}  dropped row  {}",
            red("✗"),
            page_num,
            red(&msg)
        ));
    }

    fn on_extraction_complete(&self, total_pages: usize, records: usize) {
        self.bar.finish_and_clear();
        let dropped = self.dropped.load(Ordering::SeqCst);
        if dropped == 0 {
            eprintln!(
                "{} {} items from {} pages",
                green("✔"),
                bold(&records.to_string()),
                total_pages
            );
        } else {
            eprintln!(
                "{} {} items from {} pages  ({} rows dropped)",
                cyan("⚠"),
                bold(&records.to_string()),
                total_pages,
                red(&dropped.to_string())
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Print the parsed items as a table
  pdf2items order.pdf

  # Two decimal places, custom note joiner
  pdf2items --precision 2 --joiner " / " order.pdf

  # Write JSON (records, dropped rows, stats) to a file
  pdf2items order.pdf -o order.json

  # Apply settings-table values (same keys as the settings page)
  pdf2items --set style_door_sfp=DS-100 --set style_drawer_flat=DF-200 order.pdf

  # Specific pages, list rows that were dropped
  pdf2items --pages 2-4 --show-dropped order.pdf

  # Inspect PDF metadata only
  pdf2items --inspect-only order.pdf

SETTINGS KEYS (--set key=value):
  decimal_precision   digits after the decimal point (0-9, default 3)
  note_joiner         separator between note fragments (default " | ")
  style_door_sfp      display code for SFP doors
  style_door_flat     display code for flat doors
  style_drawer_sfp    display code for SFP drawer fronts
  style_drawer_flat   display code for flat drawer fronts
  style_panel_code    display code for every panel

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH     Path to libpdfium (file or directory)
  RUST_LOG            Override the log filter (e.g. pdf2items=debug)
"#;

/// Parse cabinet door order sheets into line items.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2items",
    version,
    about = "Parse cabinet door order sheets (PDF) into door, drawer-front and panel line items",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write JSON output to this file instead of printing to stdout.
    #[arg(short, long, env = "PDF2ITEMS_OUTPUT")]
    output: Option<PathBuf>,

    /// Digits after the decimal point for width/height (0–9).
    #[arg(long, env = "PDF2ITEMS_PRECISION",
          value_parser = clap::value_parser!(u32).range(0..=9))]
    precision: Option<u32>,

    /// Separator between note fragments.
    #[arg(long, env = "PDF2ITEMS_JOINER")]
    joiner: Option<String>,

    /// Settings-table value, repeatable: --set key=value.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    settings: Vec<String>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2ITEMS_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2ITEMS_PASSWORD")]
    password: Option<String>,

    /// Print JSON instead of a table.
    #[arg(long, env = "PDF2ITEMS_JSON")]
    json: bool,

    /// List rows that matched a grammar but were dropped.
    #[arg(long)]
    show_dropped: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2ITEMS_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no parsing.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2ITEMS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2ITEMS_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2ITEMS_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
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

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let config = build_config(&cli, None)?;
        let meta = inspect(&cli.input, &config)
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run extraction ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let stats = extract_to_file(&cli.input, output_path, &config)
            .await
            .context("Extraction failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} items  {} dropped  {}ms  →  {}",
                if stats.dropped_lines == 0 {
                    green("✔")
                } else {
                    cyan("⚠")
                },
                stats.records,
                stats.dropped_lines,
                stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
        return Ok(());
    }

    let output = extract_items(&cli.input, &config)
        .await
        .context("Extraction failed")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        writeln!(handle, "{json}").context("Failed to write to stdout")?;
    } else {
        write_table(&mut handle, &output, &config.style_labels)
            .context("Failed to write to stdout")?;
        if cli.show_dropped && !output.dropped.is_empty() {
            writeln!(handle)?;
            writeln!(handle, "Dropped rows:")?;
            for e in &output.dropped {
                writeln!(handle, "  {e}")?;
            }
        }
    }

    if output.is_empty() && !cli.quiet {
        eprintln!(
            "{} no line items recognised in {} ({} lines read)",
            cyan("⚠"),
            cli.input,
            output.stats.lines_seen
        );
    } else if !cli.quiet && !show_progress {
        eprintln!(
            "Parsed {} items from {} pages in {}ms",
            output.stats.records, output.stats.pages, output.stats.total_duration_ms
        );
    }

    Ok(())
}

/// Map CLI args to `ParseConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ParseConfig> {
    let mut settings = parse_settings(&cli.settings)?;
    if let Some(precision) = cli.precision {
        settings.insert("decimal_precision".into(), precision.to_string());
    }
    if let Some(ref joiner) = cli.joiner {
        settings.insert("note_joiner".into(), joiner.clone());
    }

    let mut config = ParseConfig::from_settings(&settings).context("Invalid configuration")?;

    config.pages = parse_page_selection(&cli.pages)?;
    config.password = cli.password.clone();
    config.download_timeout_secs = cli.download_timeout.max(1);
    config.progress_callback = progress;

    Ok(config)
}

/// Parse repeated `--set key=value` flags.
fn parse_settings(pairs: &[String]) -> Result<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("Invalid --set '{pair}': expected key=value"))?;
            Ok((key.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Parse `--pages` string into `PageSelection`.
fn parse_page_selection(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if pages.iter().any(|&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1");
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

/// Print records as an aligned table (Line, Type, Style, Qty, Width, Height,
/// Hinge, Note, Source Page).
fn write_table(out: &mut impl Write, output: &ExtractionOutput, labels: &StyleLabels) -> io::Result<()> {
    const HEADERS: [&str; 9] = [
        "Line", "Type", "Style", "Qty", "Width", "Height", "Hinge", "Note", "Source Page",
    ];

    let rows: Vec<[String; 9]> = output
        .records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            [
                (i + 1).to_string(),
                r.item_type.to_string(),
                labels.display(r.item_type, r.style_label).to_string(),
                r.quantity.to_string(),
                r.width.clone(),
                r.height.clone(),
                r.hinge_side.map_or_else(|| "None".to_string(), |h| h.to_string()),
                r.note.clone(),
                r.source_page.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    writeln!(out, "{}", render(&header[..]))?;
    for row in &rows {
        writeln!(out, "{}", render(row))?;
    }
    Ok(())
}
