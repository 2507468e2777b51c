//! rxlabel command line
//!
//! Usage:
//!   rxlabel aggregate --input orders.csv --output wide.csv --drop default
//!   rxlabel labels --input orders.csv --mode bundle --start 0 --limit 50 --output labels.pdf
//!   rxlabel labels --input wide.csv --json

use clap::{Args, Parser, Subcommand};
use rxlabel::layout::{FontSlot, LabelTemplate};
use rxlabel::writer::{FontSources, PdfWriterConfig};
use rxlabel::{aggregate, build_labels, render_with_sources};
use rxlabel::{DropConfig, DropList, DropMode, Error, ErrorKind, LabelMode, LabelRange, Table};
use rxlabel::MAX_LABEL_LIMIT;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "rxlabel")]
#[command(version, about = "Aggregate order CSVs and render prescription labels")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fold line items into one row per order
    Aggregate(AggregateArgs),
    /// Render labels as PDF (or JSON records)
    Labels(LabelArgs),
}

#[derive(Args)]
struct AggregateArgs {
    /// Raw line-item CSV
    #[arg(long)]
    input: PathBuf,
    /// Output CSV (stdout when absent)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Drop mode: none, default or custom
    #[arg(long, default_value = "none")]
    drop: DropMode,
    /// Additional column to drop (repeatable)
    #[arg(long = "drop-extra")]
    drop_extra: Vec<String>,
    /// JSON drop list replacing the built-in one
    #[arg(long = "drop-list")]
    drop_list: Option<PathBuf>,
}

#[derive(Args)]
struct LabelArgs {
    /// Raw or aggregated CSV
    #[arg(long)]
    input: PathBuf,
    /// Label mode: bundle or order
    #[arg(long, default_value = "bundle")]
    mode: LabelMode,
    /// First label of the window
    #[arg(long, default_value_t = 0)]
    start: usize,
    /// Labels in the window
    #[arg(long, default_value_t = MAX_LABEL_LIMIT)]
    limit: usize,
    /// Output PDF (stdout when absent)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print label records as JSON instead of rendering
    #[arg(long)]
    json: bool,
    /// Simplified Chinese font file
    #[arg(long = "font-sc")]
    font_sc: Option<PathBuf>,
    /// Japanese font file
    #[arg(long = "font-jp")]
    font_jp: Option<PathBuf>,
    /// Korean font file
    #[arg(long = "font-kr")]
    font_kr: Option<PathBuf>,
    /// Refuse documents larger than this many bytes
    #[arg(long = "max-bytes")]
    max_bytes: Option<usize>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Aggregate(args) => run_aggregate(args),
        Command::Labels(args) => run_labels(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            match e.kind() {
                ErrorKind::Validation => ExitCode::from(2),
                ErrorKind::Resource => ExitCode::FAILURE,
            }
        },
    }
}

fn write_output(path: Option<&PathBuf>, bytes: &[u8]) -> Result<(), Error> {
    match path {
        Some(path) => std::fs::write(path, bytes)?,
        None => io::stdout().lock().write_all(bytes)?,
    }
    Ok(())
}

fn run_aggregate(args: AggregateArgs) -> Result<(), Error> {
    let table = Table::from_csv_path(&args.input)?;
    let mut drops = DropConfig::new()
        .with_mode(args.drop)
        .with_extra(args.drop_extra);
    if let Some(path) = &args.drop_list {
        drops = drops.with_base(DropList::from_file(path)?);
    }

    let wide = aggregate(&table, &drops)?;
    let csv = wide.to_csv_string()?;
    write_output(args.output.as_ref(), csv.as_bytes())
}

fn run_labels(args: LabelArgs) -> Result<(), Error> {
    let table = Table::from_csv_path(&args.input)?;
    let batch = build_labels(&table, args.mode, LabelRange::new(args.start, args.limit))?;

    if args.json {
        let json = serde_json::to_vec_pretty(&batch)?;
        return write_output(args.output.as_ref(), &json);
    }

    let mut sources = FontSources::new();
    for (slot, path) in [
        (FontSlot::SimplifiedChinese, args.font_sc),
        (FontSlot::Japanese, args.font_jp),
        (FontSlot::Korean, args.font_kr),
    ] {
        if let Some(path) = path {
            sources = sources.with_font(slot, path);
        }
    }

    let mut config = PdfWriterConfig::default().with_title("Prescription labels");
    if let Some(max_bytes) = args.max_bytes {
        config = config.with_max_bytes(max_bytes);
    }

    let pdf = render_with_sources(&batch.labels, &sources, &LabelTemplate::default(), &config)?;
    eprintln!(
        "Rendered {} of {} labels (start {})",
        batch.labels.len(),
        batch.total,
        args.start
    );
    write_output(args.output.as_ref(), &pdf)
}
