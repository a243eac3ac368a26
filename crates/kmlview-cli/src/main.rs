use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kmlview_core::analysis::AnalysisConfig;
use kmlview_core::report::{Analysis, LineDetail, SummaryCounts};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "kmlview")]
#[command(about = "Summarize KML geometry: element counts and line-string lengths.")]
struct Cli {
    /// Log pipeline steps (same as RUST_LOG=debug).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Analyze {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Write the JSON report (summary + details) here.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Write the converted feature collection as GeoJSON here.
        #[arg(long)]
        geojson: Option<PathBuf>,
        /// Include LineStrings nested in multi-geometries in the details.
        #[arg(long)]
        descend_into_collections: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Analyze {
            input,
            format,
            report,
            geojson,
            descend_into_collections,
        } => analyze(
            &input,
            format,
            report.as_deref(),
            geojson.as_deref(),
            AnalysisConfig {
                descend_into_collections,
            },
        ),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn analyze(
    input: &Path,
    format: OutputFormat,
    report: Option<&Path>,
    geojson: Option<&Path>,
    cfg: AnalysisConfig,
) -> Result<()> {
    ensure_input_file(input)?;

    let analysis = kmlview_import_kml::load_kml(input, &cfg)
        .with_context(|| format!("analyze {}", input.display()))?;

    if let Some(path) = geojson {
        write_json(path, &analysis.collection).context("write geojson")?;
        tracing::info!(path = %path.display(), "wrote feature collection");
    }

    let json = serde_json::to_string_pretty(&analysis.report()).context("serialize report")?;
    if let Some(path) = report {
        create_parent(path);
        std::fs::write(path, &json).with_context(|| format!("write report: {path:?}"))?;
        tracing::info!(path = %path.display(), "wrote report");
    }

    match format {
        OutputFormat::Json => println!("{json}"),
        OutputFormat::Table => print!("{}", render_tables(&analysis)),
    }

    Ok(())
}

fn render_tables(analysis: &Analysis) -> String {
    let mut out = summary_table(&analysis.summary);
    out.push('\n');
    out.push_str(&details_table(&analysis.details));
    out
}

fn summary_table(summary: &SummaryCounts) -> String {
    let mut out = format!("{:<16} {:>6}\n", "Element Type", "Count");
    for (key, count) in summary.rows() {
        out.push_str(&format!("{key:<16} {count:>6}\n"));
    }
    out
}

fn details_table(details: &[LineDetail]) -> String {
    if details.is_empty() {
        return "No line strings.\n".to_string();
    }
    let mut out = format!("{:<12} {:>14}\n", "Type", "Length");
    for d in details {
        out.push_str(&format!("{:<12} {:>14.2}\n", d.kind, d.length));
    }
    out
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    create_parent(path);
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn create_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
}

fn ensure_input_file(input: &Path) -> Result<()> {
    match std::fs::metadata(input) {
        Ok(meta) => {
            if meta.is_file() {
                Ok(())
            } else {
                bail!("input is not a file: {input:?}");
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            bail!("input not found: {input:?} (cwd: {cwd:?}).");
        }
        Err(err) => Err(err).with_context(|| format!("stat input: {input:?}")),
    }
}
