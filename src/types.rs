/*!
 * Core types shared across the scan and export pipeline
 */

use std::path::PathBuf;

/// A collected file: its path relative to the scan root plus the
/// sanitized content produced by the reader. Created during traversal and
/// discarded once written to the output document.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path relative to the scan root
    pub relative_path: PathBuf,
    /// Sanitized text content (or a diagnostic placeholder)
    pub content: String,
}

impl FileEntry {
    /// Number of lines in the content
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Number of characters in the content
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}
