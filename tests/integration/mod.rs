// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture helper for creating temporary directories with text files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Create a text file with given content, creating parent directories as needed
    pub fn create_text_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        self.create_raw_file(relative_path, content.as_bytes())
    }

    /// Create a file with arbitrary bytes
    pub fn create_raw_file<P: AsRef<Path>>(&self, relative_path: P, content: &[u8]) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Read the `<stem>_clean.<ext>` output written for a source file
    pub fn read_clean_output<P: AsRef<Path>>(&self, source_path: P) -> Result<String, std::io::Error> {
        fs::read_to_string(textscrub::generate_output_path(source_path.as_ref()))
    }

    /// Read and parse the `<stem>.<ext>_changes.json` report written for a source file
    pub fn read_report<P: AsRef<Path>>(&self, source_path: P) -> serde_json::Value {
        let report_path = textscrub::generate_report_path(source_path.as_ref());
        let content = fs::read_to_string(&report_path).expect("Failed to read change report");
        serde_json::from_str(&content).expect("Change report should be valid JSON")
    }
}
