use anyhow::Result;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

/// Configuration for file reading behavior
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
}

/// Statistics for file reading operations
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub chars_read: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

/// Async reader that loads whole files as UTF-8
///
/// WHY: the engine works on complete buffers and must see line endings exactly as stored,
/// so files are never split into lines here
pub struct AsyncFileReader {
    config: ReaderConfig,
}

impl AsyncFileReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a file into a `String`; failures become `read_error` unless fail-fast is set
    pub async fn read_file<P: AsRef<Path>>(&self, file_path: P) -> Result<(String, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of file: {}", path.display());

        let outcome = match tokio::fs::read(path).await {
            Ok(bytes) => String::from_utf8(bytes)
                .map_err(|e| format!("Invalid UTF-8 in {}: {}", path.display(), e.utf8_error())),
            Err(e) => Err(format!("Failed to read file {}: {}", path.display(), e)),
        };

        let duration_ms = start_time.elapsed().as_millis() as u64;
        match outcome {
            Ok(content) => {
                let stats = ReadStats {
                    file_path: path.display().to_string(),
                    chars_read: content.chars().count() as u64,
                    bytes_read: content.len() as u64,
                    duration_ms,
                    read_error: None,
                };
                info!(
                    "Read {}: {} chars, {} bytes in {}ms",
                    path.display(),
                    stats.chars_read,
                    stats.bytes_read,
                    duration_ms
                );
                Ok((content, stats))
            }
            Err(error_msg) => {
                warn!("{}", error_msg);
                if self.config.fail_fast {
                    return Err(anyhow::anyhow!(error_msg));
                }
                let stats = ReadStats {
                    file_path: path.display().to_string(),
                    chars_read: 0,
                    bytes_read: 0,
                    duration_ms,
                    read_error: Some(error_msg),
                };
                Ok((String::new(), stats))
            }
        }
    }
}

/// Read all of standard input as UTF-8
pub async fn read_stdin() -> Result<String> {
    let mut content = String::new();
    tokio::io::stdin().read_to_string(&mut content).await?;
    debug!("Read {} bytes from stdin", content.len());
    Ok(content)
}

/// Convenience function for reading a single file with default configuration
/// WHY: Simplifies common use case for integration tests and external callers
pub async fn read_file_async<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let reader = AsyncFileReader::new(ReaderConfig { fail_fast: true });
    let (content, _stats) = reader.read_file(file_path).await?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::fs;

    async fn create_test_file(dir: &Path, name: &str, content: &[u8]) -> Result<std::path::PathBuf> {
        let file_path = dir.join(name);
        fs::write(&file_path, content).await?;
        Ok(file_path)
    }

    #[tokio::test]
    async fn test_read_preserves_line_endings() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AsyncFileReader::new(ReaderConfig::default());

        let content = "Line 1\r\nLine 2\n\nLine 3\n";
        let file_path = create_test_file(temp_dir.path(), "test.txt", content.as_bytes()).await.unwrap();

        let (read, stats) = reader.read_file(&file_path).await.unwrap();
        assert_eq!(read, content);
        assert_eq!(stats.bytes_read, content.len() as u64);
        assert!(stats.read_error.is_none());
    }

    #[tokio::test]
    async fn test_read_counts_chars_not_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AsyncFileReader::new(ReaderConfig::default());

        let content = "caf\u{00E9}\u{200B}";
        let file_path = create_test_file(temp_dir.path(), "unicode.txt", content.as_bytes()).await.unwrap();

        let (_, stats) = reader.read_file(&file_path).await.unwrap();
        assert_eq!(stats.chars_read, 5);
        assert_eq!(stats.bytes_read, 8);
    }

    #[tokio::test]
    async fn test_read_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AsyncFileReader::new(ReaderConfig::default());

        let file_path = create_test_file(temp_dir.path(), "empty.txt", b"").await.unwrap();

        let (content, stats) = reader.read_file(&file_path).await.unwrap();
        assert_eq!(content, "");
        assert_eq!(stats.bytes_read, 0);
        assert!(stats.read_error.is_none());
    }

    #[tokio::test]
    async fn test_read_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AsyncFileReader::new(ReaderConfig { fail_fast: false });

        let (content, stats) = reader.read_file(temp_dir.path().join("nonexistent.txt")).await.unwrap();
        assert_eq!(content, "");
        assert!(stats.read_error.is_some());
    }

    #[tokio::test]
    async fn test_read_nonexistent_file_fail_fast() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AsyncFileReader::new(ReaderConfig { fail_fast: true });

        let result = reader.read_file(temp_dir.path().join("nonexistent.txt")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_utf8_reported() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AsyncFileReader::new(ReaderConfig::default());

        let file_path = create_test_file(temp_dir.path(), "bad.txt", &[0xFF, 0xFE, 0xFD]).await.unwrap();

        let (_, stats) = reader.read_file(&file_path).await.unwrap();
        let error = stats.read_error.expect("invalid UTF-8 should be reported");
        assert!(error.contains("Invalid UTF-8"));
    }
}
