use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use imgsort_core::{
    apply_plan, discover_media_files, load_config, load_config_from, order_records,
    plan_renames, scan_media, validate_base_name, Extractor, MediaRecord, MetadataReader,
    RenameMode, RenameOutcome, RenameReport,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "imgsort")]
#[command(version)]
#[command(about = "Renames photos and videos into one sequence ordered by capture time")]
struct Cli {
    /// Directory holding the media files
    directory: PathBuf,
    /// Prefix for the new names, e.g. `trip` gives trip_001.jpg
    base_name: String,
    /// Print the mapping without renaming anything
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    #[arg(long, value_enum)]
    extractor: Option<ExtractorArg>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// Read settings from this file instead of the user config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExtractorArg {
    Exiftool,
    Exif,
}

impl From<ExtractorArg> for Extractor {
    fn from(value: ExtractorArg) -> Self {
        match value {
            ExtractorArg::Exiftool => Extractor::Exiftool,
            ExtractorArg::Exif => Extractor::Exif,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                err.exit();
            }
            let _ = err.print();
            std::process::exit(1);
        }
    };

    setup_logging(cli.verbose);
    cmd_sort(cli)
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn cmd_sort(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(extractor) = cli.extractor {
        config.extractor = extractor.into();
    }
    log::info!("using {:?} extractor", config.extractor);

    validate_base_name(&cli.base_name)?;
    let dir = std::path::absolute(&cli.directory)?;
    let json = matches!(cli.output, OutputFormat::Json);
    let mode = if cli.dry_run {
        RenameMode::DryRun
    } else {
        RenameMode::Apply
    };

    if !json {
        if cli.dry_run {
            println!("dry run mode enabled, no files will be renamed\n");
        }
        println!("scanning directory for media files...");
    }

    let reader = config.metadata_reader();
    let run = sort_directory(&dir, &cli.base_name, reader.as_ref(), mode)?;
    for warning in &run.warnings {
        eprintln!("warning: {warning}");
    }

    match cli.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&run.report)?),
        OutputFormat::Table => {
            println!("\nsorted {} files by timestamp\n", run.records.len());
            print_table(&run.report);
        }
    }

    Ok(())
}

#[derive(Debug)]
struct SortRun {
    records: Vec<MediaRecord>,
    warnings: Vec<String>,
    report: RenameReport,
}

// Every fatal check happens before the first rename.
fn sort_directory(
    dir: &Path,
    base_name: &str,
    reader: &dyn MetadataReader,
    mode: RenameMode,
) -> Result<SortRun> {
    let files = discover_media_files(dir)?;
    if files.is_empty() {
        bail!("no media found in {}", dir.display());
    }

    let mut warnings = Vec::new();
    let mut records = Vec::with_capacity(files.len());
    for path in files {
        let name = display_name(&path);
        log::info!("reading metadata: {name}");

        let scanned = scan_media(&path, reader);
        if let Some(err) = &scanned.read_error {
            warnings.push(format!("could not read metadata from {name}: {err}"));
        }
        if scanned.record.source.is_fallback() {
            warnings.push(format!(
                "{name} has no valid exif timestamp, using file modification date as fallback"
            ));
        }
        records.push(scanned.record);
    }

    let records = order_records(records);
    let plan = plan_renames(&records, base_name)?;
    let report = apply_plan(&plan, mode);

    Ok(SortRun {
        records,
        warnings,
        report,
    })
}

fn print_table(report: &RenameReport) {
    for result in &report.results {
        let entry = &result.entry;
        let from = display_name(&entry.source_path);
        let to = &entry.destination_name;
        let captured = DateTime::<Utc>::from_timestamp_millis(entry.instant_ms)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| entry.instant_ms.to_string());

        match &result.outcome {
            RenameOutcome::Planned => println!("[dry-run] {from} -> {to} ({captured})"),
            RenameOutcome::Renamed => println!("renamed: {from} -> {to}"),
            RenameOutcome::SkippedExisting => println!("file exists, skipping: {to}"),
            RenameOutcome::Failed { message } => {
                eprintln!("failed: {from} -> {to} ({message})")
            }
        }
    }

    println!(
        "\nprocessed {} items (renamed={} skipped={} failed={})",
        report.total, report.renamed, report.skipped, report.failed
    );
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
