use anyhow::{Context, Result};
use glob::Pattern;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::parallel_processing::is_generated_output;

/// Configuration for input discovery
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// File name glob applied to files found inside directories
    pub pattern: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            pattern: "*.txt".to_string(),
        }
    }
}

/// Result of input validation
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub error: Option<String>,
}

/// Expand the given inputs into a list of files to clean
///
/// Explicit file paths are taken as-is. Directories are walked recursively and
/// filtered by `config.pattern`; outputs written by earlier runs are skipped.
/// A file reached through more than one input is listed once, at its first sighting.
pub async fn collect_input_files(inputs: &[PathBuf], config: &DiscoveryConfig) -> Result<Vec<FileValidation>> {
    let pattern = Pattern::new(&config.pattern)
        .with_context(|| format!("Invalid file pattern: {}", config.pattern))?;

    let mut files = Vec::new();
    let mut seen = HashSet::new();
    for input in inputs {
        match fs::metadata(input).await {
            Ok(metadata) if metadata.is_dir() => {
                let found = walk_directory(input.clone(), pattern.clone()).await?;
                debug!("Found {} matching files under {}", found.len(), input.display());
                for path in found {
                    push_unique(&mut files, &mut seen, FileValidation { path, error: None }).await;
                }
            }
            Ok(_) => {
                push_unique(
                    &mut files,
                    &mut seen,
                    FileValidation {
                        path: input.clone(),
                        error: None,
                    },
                )
                .await
            }
            Err(e) => {
                let error = format!("Cannot access {}: {}", input.display(), e);
                warn!("{}", error);
                if config.fail_fast {
                    return Err(anyhow::anyhow!(error));
                }
                push_unique(
                    &mut files,
                    &mut seen,
                    FileValidation {
                        path: input.clone(),
                        error: Some(error),
                    },
                )
                .await;
            }
        }
    }

    let invalid_count = files.iter().filter(|f| f.error.is_some()).count();
    info!(
        "Input discovery summary: {} valid, {} invalid",
        files.len() - invalid_count,
        invalid_count
    );
    Ok(files)
}

/// WHY: `dir` and `dir/a.txt` name the same file; cleaning it twice races on its outputs
async fn push_unique(files: &mut Vec<FileValidation>, seen: &mut HashSet<PathBuf>, file: FileValidation) {
    let key = fs::canonicalize(&file.path).await.unwrap_or_else(|_| file.path.clone());
    if seen.insert(key) {
        files.push(file);
    } else {
        debug!("Skipping duplicate input {}", file.path.display());
    }
}

/// How a walked file relates to the discovery pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryMatch {
    Matched,
    NotMatched,
    /// Matches, but is named like a `_clean` or `_changes.json` output
    GeneratedOutput,
}

/// WHY: walkdir is blocking, so run it off the async worker threads
async fn walk_directory(root: PathBuf, pattern: Pattern) -> Result<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || {
        let mut found = Vec::new();
        for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            match classify_entry(entry.path(), &pattern) {
                EntryMatch::Matched => found.push(entry.into_path()),
                EntryMatch::NotMatched => {}
                EntryMatch::GeneratedOutput => info!(
                    "Skipping {}: named like textscrub output; pass it explicitly to clean it",
                    entry.path().display()
                ),
            }
        }
        found
    })
    .await
    .context("Directory walk task failed")
}

fn classify_entry(path: &Path, pattern: &Pattern) -> EntryMatch {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return EntryMatch::NotMatched;
    };
    if !pattern.matches(name) {
        EntryMatch::NotMatched
    } else if is_generated_output(path) {
        EntryMatch::GeneratedOutput
    } else {
        EntryMatch::Matched
    }
}
