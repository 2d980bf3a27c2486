/*!
 * Common test utilities for the chapterize test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, sample_srt())
}

/// Sample SRT document with three entries over ten seconds
pub fn sample_srt() -> &'static str {
    r#"1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
"#
}

/// Build an SRT document from (start_ms, end_ms, text) triples
pub fn build_srt(entries: &[(u64, u64, &str)]) -> String {
    let mut srt = String::new();
    for (i, (start_ms, end_ms, text)) in entries.iter().enumerate() {
        srt.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            chapterize::subtitle_timeline::ms_to_time(*start_ms),
            chapterize::subtitle_timeline::ms_to_time(*end_ms),
            text
        ));
    }
    srt
}
