use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use textscrub::discovery::{self, DiscoveryConfig};
use textscrub::parallel_processing::{self, FileStats, FileStatus, ProcessingConfig};
use textscrub::{clean_text, reader, CharacterTables, Settings, VerboseReport, SETTING_DESCRIPTORS};

#[derive(Parser, Debug)]
#[command(name = "textscrub")]
#[command(about = "Remove invisible Unicode characters and convert typographic characters to ASCII")]
#[command(version)]
struct Args {
    /// Files or directories to clean; reads stdin and writes stdout when omitted
    paths: Vec<PathBuf>,

    /// File name glob for files found inside directories
    #[arg(long, default_value = "*.txt")]
    pattern: String,

    /// JSON settings map (normalizeCharacters, verboseMode, ...)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// TOML file with alternate character tables
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Track every change and show an annotated view
    #[arg(short, long)]
    verbose: bool,

    /// Pass text through without normalizing
    #[arg(long)]
    no_normalize: bool,

    /// Overwrite source files instead of writing <stem>_clean.<ext>
    #[arg(long)]
    in_place: bool,

    /// Write the stdin-mode change report as JSON (implies --verbose)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Per-file stats output path
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Files cleaned concurrently (defaults to CPU count)
    #[arg(long)]
    jobs: Option<usize>,

    /// Print the recognized settings and exit
    #[arg(long)]
    list_settings: bool,

    /// Log filter, overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // WHY: structured JSON logging on stderr keeps stdout free for cleaned text
    let filter = match args.log_level.as_deref() {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {level}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!("Starting textscrub");
    info!(?args, "Parsed CLI arguments");

    if args.list_settings {
        for descriptor in SETTING_DESCRIPTORS {
            println!(
                "{}\t{}\t(default: {})\t{}",
                descriptor.id, descriptor.name, descriptor.default_value, descriptor.description
            );
        }
        return Ok(());
    }

    let settings = resolve_settings(&args)?;
    let tables = match &args.tables {
        Some(path) => CharacterTables::from_toml_file(path)
            .with_context(|| format!("Failed to load character tables from {}", path.display()))?,
        None => CharacterTables::builtin().clone(),
    };
    info!(entries = tables.len(), ?settings, "Configuration resolved");

    if args.paths.is_empty() {
        clean_stdin(&args, &settings, &tables).await
    } else {
        clean_paths(&args, settings, Arc::new(tables)).await
    }
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if args.verbose || args.report.is_some() {
        settings.verbose_mode = true;
    }
    if args.no_normalize {
        settings.normalize_characters = false;
    }
    Ok(settings)
}

async fn clean_stdin(args: &Args, settings: &Settings, tables: &CharacterTables) -> Result<()> {
    let original = reader::read_stdin().await.context("Failed to read stdin")?;
    let result = clean_text(&original, settings, tables);

    {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(result.cleaned_text.as_bytes())?;
        stdout.flush()?;
    }

    if settings.verbose_mode {
        let report = VerboseReport::build(&original, &result)?;
        eprintln!("{}", report.annotated);
        eprintln!(
            "Removed {} invisible characters, replaced {} characters",
            report.invisible_count, report.replaced_count
        );

        if let Some(ref report_path) = args.report {
            let json = serde_json::to_string_pretty(&report)?;
            tokio::fs::write(report_path, json)
                .await
                .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
        }
    }

    Ok(())
}

async fn clean_paths(args: &Args, settings: Settings, tables: Arc<CharacterTables>) -> Result<()> {
    let discovery_config = DiscoveryConfig {
        fail_fast: args.fail_fast,
        pattern: args.pattern.clone(),
    };
    let discovered = discovery::collect_input_files(&args.paths, &discovery_config).await?;

    let (valid, invalid): (Vec<_>, Vec<_>) = discovered.into_iter().partition(|f| f.error.is_none());
    let valid_paths: Vec<PathBuf> = valid.into_iter().map(|f| f.path).collect();

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(valid_paths.len() as u64);
        pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} files ({elapsed})")?);
        pb
    };

    let processing_config = ProcessingConfig {
        settings,
        in_place: args.in_place,
        fail_fast: args.fail_fast,
        concurrency: args.jobs.unwrap_or_else(num_cpus::get),
    };
    let mut stats =
        parallel_processing::process_files_parallel(&valid_paths, tables, &processing_config, Some(&progress))
            .await?;
    progress.finish_and_clear();

    stats.extend(
        invalid
            .into_iter()
            .map(|f| FileStats::failed(&f.path, f.error.unwrap_or_default())),
    );
    stats.sort_by(|a, b| a.path.cmp(&b.path));

    let count = |status: FileStatus| stats.iter().filter(|s| s.status == status).count();
    let (cleaned, unchanged, failed) = (count(FileStatus::Cleaned), count(FileStatus::Unchanged), count(FileStatus::Failed));

    println!("textscrub v{} - processed {} files", env!("CARGO_PKG_VERSION"), stats.len());
    println!("  Cleaned: {cleaned}");
    println!("  Unchanged: {unchanged}");
    if failed > 0 {
        println!("  Failed: {failed}");
        for stat in stats.iter().filter(|s| s.status == FileStatus::Failed) {
            println!("    {}: {}", stat.path, stat.error.as_deref().unwrap_or("unknown error"));
        }
    }

    if let Some(ref stats_path) = args.stats_out {
        parallel_processing::write_stats(stats_path, &stats).await?;
        info!("Wrote stats to {}", stats_path.display());
    }

    if failed > 0 {
        anyhow::bail!("{failed} file(s) could not be cleaned");
    }
    Ok(())
}
