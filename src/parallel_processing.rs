// WHY: batch cleaning for the CLI, kept in the library so integration tests and
// benchmarks drive the same code path as the binary

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::characters::CharacterTables;
use crate::reader::{AsyncFileReader, ReaderConfig};
use crate::scrubber::clean_text;
use crate::settings::Settings;
use crate::verbose::VerboseReport;

const CLEAN_SUFFIX: &str = "_clean";
const REPORT_SUFFIX: &str = "_changes.json";

/// How a batch of files should be cleaned
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub settings: Settings,
    /// Overwrite sources instead of writing `<stem>_clean.<ext>`
    pub in_place: bool,
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// Files in flight at once
    pub concurrency: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            in_place: false,
            fail_fast: false,
            concurrency: num_cpus::get().max(1),
        }
    }
}

/// Outcome of cleaning one file
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Cleaned,
    Unchanged,
    Failed,
}

/// Per-file processing statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FileStats {
    pub path: String,
    pub status: FileStatus,
    /// Characters in the source text
    pub chars_in: u64,
    /// Characters in the cleaned text
    pub chars_out: u64,
    /// Only known when changes are tracked
    pub invisible_removed: Option<usize>,
    pub characters_replaced: Option<usize>,
    pub output_path: Option<String>,
    pub report_path: Option<String>,
    pub processing_time_ms: u64,
    pub error: Option<String>,
}

impl FileStats {
    pub fn failed(path: &Path, error: String) -> Self {
        Self {
            path: path.display().to_string(),
            status: FileStatus::Failed,
            chars_in: 0,
            chars_out: 0,
            invisible_removed: None,
            characters_replaced: None,
            output_path: None,
            report_path: None,
            processing_time_ms: 0,
            error: Some(error),
        }
    }
}

/// `<stem>_clean.<ext>` beside the source
pub fn generate_output_path(source_path: &Path) -> PathBuf {
    let stem = source_path.file_stem().and_then(|s| s.to_str()).unwrap_or("unknown");
    let file_name = match source_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}{CLEAN_SUFFIX}.{ext}"),
        None => format!("{stem}{CLEAN_SUFFIX}"),
    };
    source_path.with_file_name(file_name)
}

/// `<stem>.<ext>_changes.json` beside the source
///
/// The full file name is kept so `a.txt` and `a.md` never share a report.
pub fn generate_report_path(source_path: &Path) -> PathBuf {
    let name = source_path.file_name().and_then(|n| n.to_str()).unwrap_or("unknown");
    source_path.with_file_name(format!("{name}{REPORT_SUFFIX}"))
}

/// Whether a path looks like something an earlier run wrote
pub fn is_generated_output(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    name.ends_with(REPORT_SUFFIX) || stem.ends_with(CLEAN_SUFFIX)
}

/// Clean one file and write its outputs
pub async fn process_file(path: &Path, tables: Arc<CharacterTables>, config: &ProcessingConfig) -> Result<FileStats> {
    let start_time = std::time::Instant::now();
    let reader = AsyncFileReader::new(ReaderConfig { fail_fast: true });
    let (original, read_stats) = reader.read_file(path).await?;

    let settings = config.settings;
    // WHY: scanning is CPU-bound; keep it off the async workers for large files
    let (original, result, report) = tokio::task::spawn_blocking(move || {
        let result = clean_text(&original, &settings, &tables);
        let report = settings
            .verbose_mode
            .then(|| VerboseReport::build(&original, &result));
        (original, result, report)
    })
    .await
    .context("Cleaning task failed")?;
    let report = report.transpose()?;

    let changed = result.cleaned_text != original;
    let output_path = match (changed, config.in_place) {
        (false, true) => None,
        (_, true) => Some(path.to_path_buf()),
        (_, false) => Some(generate_output_path(path)),
    };
    if let Some(ref output_path) = output_path {
        tokio::fs::write(output_path, &result.cleaned_text)
            .await
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
    }

    let report_path = match report {
        Some(ref report) => {
            let report_path = generate_report_path(path);
            let json = serde_json::to_string_pretty(report)?;
            tokio::fs::write(&report_path, json)
                .await
                .with_context(|| format!("Failed to write {}", report_path.display()))?;
            Some(report_path)
        }
        None => None,
    };

    let log = result.log.as_ref();
    Ok(FileStats {
        path: path.display().to_string(),
        status: if changed { FileStatus::Cleaned } else { FileStatus::Unchanged },
        chars_in: read_stats.chars_read,
        chars_out: result.cleaned_text.chars().count() as u64,
        invisible_removed: log.map(|l| l.invisible().count()),
        characters_replaced: log.map(|l| l.replacements().count()),
        output_path: output_path.map(|p| p.display().to_string()),
        report_path: report_path.map(|p| p.display().to_string()),
        processing_time_ms: start_time.elapsed().as_millis() as u64,
        error: None,
    })
}

/// Clean many files concurrently, sharing one set of tables
///
/// Results come back in completion order. Without fail-fast, failures are recorded
/// as `FileStatus::Failed` entries and the batch continues.
pub async fn process_files_parallel(
    paths: &[PathBuf],
    tables: Arc<CharacterTables>,
    config: &ProcessingConfig,
    progress: Option<&ProgressBar>,
) -> Result<Vec<FileStats>> {
    info!("Starting batch clean of {} files", paths.len());

    let mut in_flight = stream::iter(paths)
        .map(|path| {
            let tables = Arc::clone(&tables);
            async move { (path, process_file(path, tables, config).await) }
        })
        .buffer_unordered(config.concurrency.max(1));

    let mut results = Vec::with_capacity(paths.len());
    while let Some((path, outcome)) = in_flight.next().await {
        if let Some(pb) = progress {
            pb.inc(1);
        }
        match outcome {
            Ok(stats) => results.push(stats),
            Err(e) if config.fail_fast => {
                return Err(e.context(format!("Failed to clean {}", path.display())));
            }
            Err(e) => {
                warn!("Failed to clean {}: {:#}", path.display(), e);
                results.push(FileStats::failed(path, format!("{e:#}")));
            }
        }
    }

    let failed = results.iter().filter(|s| s.status == FileStatus::Failed).count();
    info!("Completed batch clean: {} files, {} failed", results.len(), failed);
    Ok(results)
}

/// Write run statistics as pretty JSON
pub async fn write_stats(stats_path: &Path, stats: &[FileStats]) -> Result<()> {
    let json = serde_json::to_string_pretty(stats)?;
    tokio::fs::write(stats_path, json)
        .await
        .with_context(|| format!("Failed to write stats to {}", stats_path.display()))?;
    Ok(())
}
